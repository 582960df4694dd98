//! Integrity rules.
//!
//! Pure functions over a tenant snapshot. Each either returns the
//! collections to commit or a rejection; none of them touch the store.

pub mod capacity;
pub mod card;
pub mod cascade;
pub mod department;
pub mod payment_method;

pub use capacity::{RoleUsage, check_capacity, usage_report};
pub use card::{CardDetails, check_card, luhn_valid};
pub use cascade::cascade_delete;
pub use department::{HeadAssignment, HeadConflict, assign_head, head_conflict};
pub use payment_method::{remove_method, set_default, upsert_method};
