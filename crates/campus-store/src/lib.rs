//! Campus Store: in-memory tenant store, the canonical demo fixture and
//! the session bootstrap that decides which tenant is loaded.
//!
//! This crate provides:
//! - The store ([`MemoryTenantStore`])
//! - Demo-flag persistence ([`FlagStore`], [`MemoryFlagStore`], [`JsonFileFlagStore`])
//! - Bootstrap ([`SessionBootstrap`], [`Authenticator`])
//! - The demo fixture ([`fixture::demo_subscriber`])

mod bootstrap;
mod error;
pub mod fixture;
mod flag;
mod memory;

pub use bootstrap::{
    Authenticator, BootstrapConfig, Credentials, DEMO_MODE_KEY, SessionBootstrap, TenantSource,
};
pub use error::StoreError;
pub use flag::{FlagStore, JsonFileFlagStore, MemoryFlagStore};
pub use memory::MemoryTenantStore;
