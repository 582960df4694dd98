//! Cascade-delete rule.
//!
//! Removing a user also removes its profile images and preference
//! records, clears any department it heads, and unassigns any course it
//! teaches. Everything lands in one update.

use campus_core::models::subscriber::{Subscriber, UpdateSubscriber};
use campus_core::models::user::Role;
use uuid::Uuid;

/// Build the update that deletes `user_id` and every reference to it.
///
/// Returns `None` when nothing in the aggregate mentions the user, so
/// deleting twice is a no-op.
pub fn cascade_delete(aggregate: &Subscriber, user_id: Uuid) -> Option<UpdateSubscriber> {
    let mut update = UpdateSubscriber::default();
    let mut changed = false;

    for role in Role::ALL {
        let users = aggregate.users(role);
        if users.iter().any(|u| u.id == user_id) {
            update.set_users(role, users.iter().filter(|u| u.id != user_id).cloned().collect());
            changed = true;
        }
    }

    if aggregate.profile_images.iter().any(|i| i.user_id == user_id) {
        update.profile_images = Some(
            aggregate
                .profile_images
                .iter()
                .filter(|i| i.user_id != user_id)
                .cloned()
                .collect(),
        );
        changed = true;
    }

    if aggregate.preferences.iter().any(|p| p.user_id == user_id) {
        update.preferences = Some(
            aggregate
                .preferences
                .iter()
                .filter(|p| p.user_id != user_id)
                .cloned()
                .collect(),
        );
        changed = true;
    }

    if aggregate
        .departments
        .iter()
        .any(|d| d.head_of_department_id == Some(user_id))
    {
        update.departments = Some(
            aggregate
                .departments
                .iter()
                .cloned()
                .map(|mut d| {
                    if d.head_of_department_id == Some(user_id) {
                        d.head_of_department_id = None;
                    }
                    d
                })
                .collect(),
        );
        changed = true;
    }

    if aggregate.courses.iter().any(|c| c.teacher_id == Some(user_id)) {
        update.courses = Some(
            aggregate
                .courses
                .iter()
                .cloned()
                .map(|mut c| {
                    if c.teacher_id == Some(user_id) {
                        c.teacher_id = None;
                    }
                    c
                })
                .collect(),
        );
        changed = true;
    }

    changed.then_some(update)
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_store::fixture::{demo_subscriber, ids};

    #[test]
    fn removes_every_reference_to_an_admin() {
        let mut agg = demo_subscriber();
        let admin = ids::admin(1);
        cascade_delete(&agg, admin).unwrap().apply_to(&mut agg);

        assert!(agg.find_user(admin).is_none());
        assert!(agg.departments.iter().all(|d| d.head_of_department_id != Some(admin)));
        assert!(agg.profile_images.iter().all(|i| i.user_id != admin));
        assert!(agg.preferences.iter().all(|p| p.user_id != admin));
        // Other heads are untouched.
        assert_eq!(
            agg.department(ids::department(0)).unwrap().head_of_department_id,
            Some(ids::admin(0))
        );
    }

    #[test]
    fn unassigns_courses_of_a_teacher() {
        let mut agg = demo_subscriber();
        let teacher = ids::teacher(0);
        let update = cascade_delete(&agg, teacher).unwrap();
        assert!(update.admins.is_none());
        update.apply_to(&mut agg);

        assert!(agg.teachers.iter().all(|t| t.id != teacher));
        assert!(agg.courses.iter().all(|c| c.teacher_id != Some(teacher)));
        assert_eq!(agg.courses.len(), demo_subscriber().courses.len());
    }

    #[test]
    fn unknown_user_needs_no_update() {
        assert!(cascade_delete(&demo_subscriber(), Uuid::from_u128(0xFFFF)).is_none());
    }
}
