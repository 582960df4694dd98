//! Campus Core: entity model, error taxonomy and the tenant store
//! contract shared by every other crate.
//!
//! The store holds exactly one [`models::subscriber::Subscriber`]
//! aggregate at a time. Writes go through [`store::TenantStore::merge`],
//! which replaces whole named collections at once.

pub mod error;
pub mod models;
pub mod pagination;
pub mod store;
