//! Campus Server: application entry point.
//!
//! Restores the session (demo mode included), then logs the first page of
//! the admin roster and the plan usage report.

use std::env;

use campus_admin::{RosterService, ServiceConfig, rules};
use campus_core::error::CampusResult;
use campus_core::store::TenantStore;
use campus_store::fixture::ids;
use campus_store::{
    BootstrapConfig, FlagStore, JsonFileFlagStore, MemoryFlagStore, MemoryTenantStore,
    SessionBootstrap, TenantSource,
};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let mut filter = EnvFilter::from_default_env();
    if let Ok(directive) = "campus=info".parse() {
        filter = filter.add_directive(directive);
    }
    tracing_subscriber::fmt().with_env_filter(filter).json().init();

    info!("Starting campus server...");

    let config = ServiceConfig::from_env();
    let result = match env::var("CAMPUS_DEMO_FLAG_PATH") {
        Ok(path) => run(JsonFileFlagStore::new(path), config).await,
        Err(_) => run(MemoryFlagStore::new(), config).await,
    };
    if let Err(e) = result {
        error!(code = e.code(), "Campus server failed: {e}");
    }

    info!("Campus server stopped.");
}

async fn run<F: FlagStore>(flags: F, config: ServiceConfig) -> CampusResult<()> {
    let store = MemoryTenantStore::new();
    let bootstrap = SessionBootstrap::new(
        store.clone(),
        flags,
        BootstrapConfig {
            latency: config.latency,
        },
    );

    let restored = bootstrap.restore().await?;
    let source = bootstrap.ensure_loaded().await?;
    info!(restored = ?restored, source = ?source, "Session ready");

    let Some(aggregate) = store.get() else {
        warn!("No tenant loaded");
        return Ok(());
    };
    info!(
        institution = %aggregate.institution_name,
        plan = aggregate.current_plan().map_or("none", |p| p.name.as_str()),
        "Tenant loaded"
    );

    for usage in rules::usage_report(&aggregate) {
        let limit = usage.limit.map_or_else(|| "unlimited".to_string(), |l| l.to_string());
        if usage.is_over_limit() {
            warn!(role = %usage.role, used = usage.used, limit = %limit, "Role over plan limit");
        } else {
            info!(role = %usage.role, used = usage.used, limit = %limit, "Role usage");
        }
    }

    let roster = RosterService::new(store, config);
    let query = roster.new_query();
    // The demo session signs in as a known admin; its timezone drives date filters.
    let viewer = (source == TenantSource::Fixture).then_some(ids::VIEWER);
    let page = roster.query(&query, viewer);
    info!(
        total = page.total,
        page = page.page,
        page_count = page.page_count,
        "Admin roster"
    );
    for row in &page.items {
        info!(
            admin_id = %row.user.id,
            name = %row.full_name,
            email = %row.user.email,
            status = row.status_name.as_deref().unwrap_or("-"),
            department = row.department_name.as_deref().unwrap_or("-"),
            "Admin"
        );
    }

    Ok(())
}
