//! Domain models for the tenant dashboard.
//!
//! Every entity belongs to a single [`subscriber::Subscriber`] aggregate.

pub mod billing_address;
pub mod course;
pub mod department;
pub mod payment;
pub mod payment_method;
pub mod plan;
pub mod preference;
pub mod profile_image;
pub mod subscriber;
pub mod user;
