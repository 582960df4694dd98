//! Department-head uniqueness rule.
//!
//! A user heads at most one department, and a department has at most one
//! head. Assigning a new head never fails: the displaced head is reported
//! as a [`HeadConflict`] so the caller can warn before committing.

use campus_core::models::department::Department;
use campus_core::models::subscriber::Subscriber;
use uuid::Uuid;

/// The head that an assignment would displace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadConflict {
    pub department_id: Uuid,
    pub department_name: String,
    pub previous_head_id: Uuid,
    /// `None` when the previous head no longer resolves to a user.
    pub previous_head_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadAssignment {
    /// Complete replacement for the department collection.
    pub departments: Vec<Department>,
    pub conflict: Option<HeadConflict>,
    /// Department the user headed before, if a different one.
    pub released_department: Option<Uuid>,
}

/// The conflict assigning `user_id` to `department_id` would cause.
pub fn head_conflict(
    aggregate: &Subscriber,
    user_id: Uuid,
    department_id: Uuid,
) -> Option<HeadConflict> {
    let department = aggregate.department(department_id)?;
    let previous = department.head_of_department_id.filter(|&h| h != user_id)?;
    Some(HeadConflict {
        department_id,
        department_name: department.name.clone(),
        previous_head_id: previous,
        previous_head_name: aggregate.find_user(previous).map(|u| u.full_name()),
    })
}

/// Make `user_id` head of `department_id`, clearing any other department
/// the user headed. Returns `None` if the department does not exist.
pub fn assign_head(
    aggregate: &Subscriber,
    user_id: Uuid,
    department_id: Uuid,
) -> Option<HeadAssignment> {
    aggregate.department(department_id)?;
    let conflict = head_conflict(aggregate, user_id, department_id);

    let mut released_department = None;
    let departments = aggregate
        .departments
        .iter()
        .map(|d| {
            let mut d = d.clone();
            if d.id == department_id {
                d.head_of_department_id = Some(user_id);
            } else if d.head_of_department_id == Some(user_id) {
                d.head_of_department_id = None;
                released_department = Some(d.id);
            }
            d
        })
        .collect();

    Some(HeadAssignment {
        departments,
        conflict,
        released_department,
    })
}
