//! Plan domain model.
//!
//! Plans are immutable snapshots of the subscription catalog. A `None`
//! limit means the plan puts no cap on that role.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::Role;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Plan {
    pub id: Uuid,
    pub name: String,
    pub price_per_month: Decimal,
    pub max_admin: Option<u32>,
    pub max_teacher: Option<u32>,
    pub max_student: Option<u32>,
    pub max_parent: Option<u32>,
}

impl Plan {
    /// The cap this plan puts on `role`, or `None` for unlimited.
    pub fn limit_for(&self, role: Role) -> Option<u32> {
        match role {
            Role::Admin => self.max_admin,
            Role::Teacher => self.max_teacher,
            Role::Student => self.max_student,
            Role::Parent => self.max_parent,
        }
    }
}
