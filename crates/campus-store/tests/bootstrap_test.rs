//! Integration tests for the session bootstrap.

use std::time::Duration;

use campus_core::error::{CampusError, CampusResult};
use campus_core::models::subscriber::Subscriber;
use campus_core::store::TenantStore;
use campus_store::fixture::{demo_subscriber, ids};
use campus_store::{
    Authenticator, BootstrapConfig, Credentials, DEMO_MODE_KEY, FlagStore, JsonFileFlagStore,
    MemoryFlagStore, MemoryTenantStore, SessionBootstrap, TenantSource,
};
use uuid::Uuid;

/// Authenticator that accepts a single password and returns a renamed
/// copy of the fixture as the "real" tenant.
struct FixedAuthenticator {
    password: &'static str,
}

impl Authenticator for FixedAuthenticator {
    async fn authenticate(&self, credentials: &Credentials) -> CampusResult<Subscriber> {
        if credentials.password != self.password {
            return Err(CampusError::AuthenticationFailed {
                reason: "invalid credentials".into(),
            });
        }
        let mut tenant = demo_subscriber();
        tenant.id = Uuid::from_u128(0xFEED);
        tenant.institution_name = "Riverside College".into();
        Ok(tenant)
    }
}

fn setup() -> SessionBootstrap<MemoryTenantStore, MemoryFlagStore> {
    SessionBootstrap::new(
        MemoryTenantStore::new(),
        MemoryFlagStore::new(),
        BootstrapConfig {
            latency: Duration::ZERO,
        },
    )
}

fn creds(password: &str) -> Credentials {
    Credentials {
        email: "registrar@riverside.edu".into(),
        password: password.into(),
    }
}

#[tokio::test]
async fn starts_with_nothing_loaded() {
    let boot = setup();
    assert_eq!(boot.source(), TenantSource::None);
    assert!(!boot.demo_mode_enabled().unwrap());
}

#[tokio::test]
async fn activate_demo_loads_fixture_and_persists_flag() {
    let boot = setup();
    boot.activate_demo().await.unwrap();

    assert_eq!(boot.source(), TenantSource::Fixture);
    assert!(boot.demo_mode_enabled().unwrap());
    assert_eq!(boot.store().get().unwrap().id, ids::SUBSCRIBER);
}

#[tokio::test]
async fn sign_in_replaces_fixture_with_real_tenant() {
    let boot = setup();
    boot.activate_demo().await.unwrap();

    let auth = FixedAuthenticator { password: "s3cret" };
    boot.sign_in(&auth, &creds("s3cret")).await.unwrap();

    assert_eq!(boot.source(), TenantSource::Real);
    assert!(!boot.demo_mode_enabled().unwrap());
    assert_eq!(boot.store().get().unwrap().institution_name, "Riverside College");
}

#[tokio::test]
async fn failed_sign_in_leaves_store_untouched() {
    let boot = setup();
    boot.activate_demo().await.unwrap();

    let auth = FixedAuthenticator { password: "s3cret" };
    let err = boot.sign_in(&auth, &creds("wrong")).await.unwrap_err();

    assert!(matches!(err, CampusError::AuthenticationFailed { .. }));
    assert_eq!(boot.source(), TenantSource::Fixture);
    assert_eq!(boot.store().get().unwrap().id, ids::SUBSCRIBER);
}

#[tokio::test]
async fn empty_credentials_are_rejected_before_authenticator() {
    let boot = setup();
    let auth = FixedAuthenticator { password: "" };
    let err = boot
        .sign_in(
            &auth,
            &Credentials {
                email: "  ".into(),
                password: String::new(),
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err.code(), "AUTHENTICATION_FAILED");
    assert_eq!(boot.source(), TenantSource::None);
}

#[tokio::test]
async fn sign_out_clears_everything() {
    let boot = setup();
    boot.activate_demo().await.unwrap();
    boot.sign_out().unwrap();

    assert_eq!(boot.source(), TenantSource::None);
    assert!(boot.store().get().is_none());
    assert!(!boot.demo_mode_enabled().unwrap());
}

#[tokio::test]
async fn ensure_loaded_falls_back_to_fixture() {
    let boot = setup();
    let source = boot.ensure_loaded().await.unwrap();
    assert_eq!(source, TenantSource::Fixture);

    // Cleared outside the bootstrap: the fallback kicks in again.
    boot.store().clear();
    assert_eq!(boot.source(), TenantSource::None);
    assert_eq!(boot.ensure_loaded().await.unwrap(), TenantSource::Fixture);
}

#[tokio::test]
async fn ensure_loaded_keeps_real_tenant() {
    let boot = setup();
    let auth = FixedAuthenticator { password: "pw" };
    boot.sign_in(&auth, &creds("pw")).await.unwrap();

    assert_eq!(boot.ensure_loaded().await.unwrap(), TenantSource::Real);
    assert_eq!(boot.store().get().unwrap().institution_name, "Riverside College");
}

#[tokio::test]
async fn restore_honours_persisted_flag() {
    let flags = MemoryFlagStore::new();
    flags.set_flag(DEMO_MODE_KEY, true).unwrap();
    let boot = SessionBootstrap::new(
        MemoryTenantStore::new(),
        flags,
        BootstrapConfig {
            latency: Duration::ZERO,
        },
    );

    assert_eq!(boot.restore().await.unwrap(), TenantSource::Fixture);
}

#[tokio::test]
async fn restore_without_flag_loads_nothing() {
    let boot = setup();
    assert_eq!(boot.restore().await.unwrap(), TenantSource::None);
    assert!(boot.store().get().is_none());
}

/// Bootstrap backed by a flag file that holds invalid JSON.
fn setup_corrupt_flags(dir: &tempfile::TempDir) -> SessionBootstrap<MemoryTenantStore, JsonFileFlagStore> {
    let path = dir.path().join("flags.json");
    std::fs::write(&path, "{not json").unwrap();
    SessionBootstrap::new(
        MemoryTenantStore::new(),
        JsonFileFlagStore::new(path),
        BootstrapConfig {
            latency: Duration::ZERO,
        },
    )
}

#[tokio::test]
async fn unwritable_flag_does_not_block_demo_or_sign_out() {
    let dir = tempfile::tempdir().unwrap();
    let boot = setup_corrupt_flags(&dir);

    assert_eq!(boot.ensure_loaded().await.unwrap(), TenantSource::Fixture);
    assert_eq!(boot.store().get().unwrap().id, ids::SUBSCRIBER);

    boot.sign_out().unwrap();
    assert_eq!(boot.source(), TenantSource::None);
    assert!(boot.store().get().is_none());
}

#[tokio::test]
async fn unreadable_flag_restores_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let boot = setup_corrupt_flags(&dir);

    assert_eq!(boot.restore().await.unwrap(), TenantSource::None);
    assert_eq!(boot.demo_mode_enabled().unwrap_err().code(), "PERSISTENCE");
}

#[tokio::test]
async fn tenant_loaded_directly_counts_as_real() {
    let mut tenant = demo_subscriber();
    tenant.institution_name = "Lakeside Academy".into();
    let boot = SessionBootstrap::new(
        MemoryTenantStore::with_aggregate(tenant),
        MemoryFlagStore::new(),
        BootstrapConfig {
            latency: Duration::ZERO,
        },
    );

    assert_eq!(boot.source(), TenantSource::Real);
    assert_eq!(boot.ensure_loaded().await.unwrap(), TenantSource::Real);
    assert_eq!(boot.restore().await.unwrap(), TenantSource::Real);
    assert_eq!(boot.store().get().unwrap().institution_name, "Lakeside Academy");
}
