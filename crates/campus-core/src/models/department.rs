//! Department domain model.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Department {
    pub id: Uuid,
    pub name: String,
    /// User leading this department. A user heads at most one department.
    pub head_of_department_id: Option<Uuid>,
}
