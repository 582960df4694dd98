//! Session bootstrap: decides which tenant aggregate is loaded.
//!
//! Exactly one of three states holds at a time: nothing loaded, the demo
//! fixture loaded, or a real tenant supplied by the [`Authenticator`].

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use campus_core::error::{CampusError, CampusResult};
use campus_core::models::subscriber::Subscriber;
use campus_core::store::TenantStore;
use tracing::{info, warn};

use crate::fixture::demo_subscriber;
use crate::flag::FlagStore;

/// Key under which the demo-mode switch is persisted.
pub const DEMO_MODE_KEY: &str = "demo_mode";

#[derive(Debug, Clone)]
pub struct BootstrapConfig {
    /// Simulated delay before the fixture becomes available.
    pub latency: Duration,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            latency: Duration::from_millis(500),
        }
    }
}

/// Credential pair handed to the external authenticator.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// External collaborator that turns credentials into a tenant aggregate.
pub trait Authenticator: Send + Sync {
    fn authenticate(
        &self,
        credentials: &Credentials,
    ) -> impl Future<Output = CampusResult<Subscriber>> + Send;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TenantSource {
    None,
    Fixture,
    Real,
}

pub struct SessionBootstrap<S: TenantStore, F: FlagStore> {
    store: S,
    flags: F,
    config: BootstrapConfig,
    source: Mutex<TenantSource>,
}

impl<S: TenantStore, F: FlagStore> SessionBootstrap<S, F> {
    pub fn new(store: S, flags: F, config: BootstrapConfig) -> Self {
        Self {
            store,
            flags,
            config,
            source: Mutex::new(TenantSource::None),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Where the loaded aggregate came from. Reports `None` if the store
    /// was cleared behind the bootstrap's back, and `Real` for a tenant
    /// loaded into the store directly rather than through the bootstrap.
    pub fn source(&self) -> TenantSource {
        let mut source = self.source.lock().unwrap_or_else(PoisonError::into_inner);
        if !self.store.is_loaded() {
            *source = TenantSource::None;
        } else if *source == TenantSource::None {
            *source = TenantSource::Real;
        }
        *source
    }

    fn set_source(&self, source: TenantSource) {
        *self.source.lock().unwrap_or_else(PoisonError::into_inner) = source;
    }

    /// The persisted demo-mode switch; absent means off.
    pub fn demo_mode_enabled(&self) -> CampusResult<bool> {
        Ok(self.flags.get_flag(DEMO_MODE_KEY)?.unwrap_or(false))
    }

    /// Write the demo-mode switch. The in-memory session has already
    /// changed by the time this runs, so a failed write is only logged.
    fn persist_demo_mode(&self, enabled: bool) {
        if let Err(e) = self.flags.set_flag(DEMO_MODE_KEY, enabled) {
            warn!(enabled, error = %e, "Could not persist demo mode flag");
        }
    }

    /// Replace whatever is loaded with the demo fixture.
    pub async fn activate_demo(&self) -> CampusResult<()> {
        tokio::time::sleep(self.config.latency).await;

        self.store.load(demo_subscriber());
        self.set_source(TenantSource::Fixture);
        self.persist_demo_mode(true);

        info!("Demo mode activated");
        Ok(())
    }

    /// Authenticate and load the real tenant. On failure the store is
    /// left untouched.
    pub async fn sign_in<A: Authenticator>(
        &self,
        authenticator: &A,
        credentials: &Credentials,
    ) -> CampusResult<()> {
        if credentials.email.trim().is_empty() || credentials.password.is_empty() {
            return Err(CampusError::AuthenticationFailed {
                reason: "email and password are required".into(),
            });
        }

        let aggregate = authenticator.authenticate(credentials).await.map_err(|e| {
            warn!(email = %credentials.email, error = %e, "Sign-in rejected");
            e
        })?;

        self.store.load(aggregate);
        self.set_source(TenantSource::Real);
        self.persist_demo_mode(false);

        info!(email = %credentials.email, "Signed in");
        Ok(())
    }

    /// Clear the store and switch demo mode off.
    pub fn sign_out(&self) -> CampusResult<()> {
        self.store.clear();
        self.set_source(TenantSource::None);
        self.persist_demo_mode(false);

        info!("Signed out");
        Ok(())
    }

    /// Re-enter demo mode if it was on when the process last ran.
    pub async fn restore(&self) -> CampusResult<TenantSource> {
        if self.source() != TenantSource::None {
            return Ok(self.source());
        }
        let enabled = self.demo_mode_enabled().unwrap_or_else(|e| {
            warn!(error = %e, "Unreadable demo mode flag, treating as off");
            false
        });
        if enabled {
            self.activate_demo().await?;
        }
        Ok(self.source())
    }

    /// Gate for rendering the dashboard: if no tenant is loaded, fall
    /// back to the demo fixture.
    pub async fn ensure_loaded(&self) -> CampusResult<TenantSource> {
        if self.source() == TenantSource::None {
            self.activate_demo().await?;
        }
        Ok(self.source())
    }
}
