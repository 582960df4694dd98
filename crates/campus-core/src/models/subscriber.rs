//! Subscriber (tenant) aggregate.
//!
//! The subscriber owns every other entity. The store keeps one
//! denormalized snapshot of it; all collections hang directly off the
//! aggregate so a write can replace any of them wholesale.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::billing_address::BillingAddress;
use super::course::Course;
use super::department::Department;
use super::payment::{Payment, Recurrence};
use super::payment_method::PaymentMethod;
use super::plan::Plan;
use super::preference::Preference;
use super::profile_image::ProfileImage;
use super::user::{Role, User, UserStatusDef};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Subscriber {
    pub id: Uuid,
    pub institution_name: String,
    pub is_active: bool,
    pub is_auto_renew: bool,
    pub recurrence: Recurrence,

    pub admins: Vec<User>,
    pub teachers: Vec<User>,
    pub students: Vec<User>,
    pub parents: Vec<User>,
    pub user_statuses: Vec<UserStatusDef>,

    pub departments: Vec<Department>,
    pub courses: Vec<Course>,
    pub plans: Vec<Plan>,
    /// Payment history, newest first.
    pub payments: Vec<Payment>,
    pub payment_methods: Vec<PaymentMethod>,
    pub preferences: Vec<Preference>,
    pub profile_images: Vec<ProfileImage>,
    pub billing_address: Option<BillingAddress>,
}

impl Subscriber {
    /// The collection holding users of `role`.
    pub fn users(&self, role: Role) -> &[User] {
        match role {
            Role::Admin => &self.admins,
            Role::Teacher => &self.teachers,
            Role::Student => &self.students,
            Role::Parent => &self.parents,
        }
    }

    /// Look a user up across every role collection.
    pub fn find_user(&self, id: Uuid) -> Option<&User> {
        Role::ALL
            .iter()
            .flat_map(|role| self.users(*role))
            .find(|u| u.id == id)
    }

    /// The payment with the latest `created_at`. Ties go to the entry
    /// that appears first in the history.
    pub fn current_payment(&self) -> Option<&Payment> {
        self.payments.iter().fold(None, |best: Option<&Payment>, p| match best {
            Some(b) if b.created_at >= p.created_at => Some(b),
            _ => Some(p),
        })
    }

    /// Plan referenced by the most recent payment.
    pub fn current_plan(&self) -> Option<&Plan> {
        let payment = self.current_payment()?;
        self.plans.iter().find(|p| p.id == payment.plan_id)
    }

    pub fn status_name(&self, status_id: Uuid) -> Option<&str> {
        self.user_statuses
            .iter()
            .find(|s| s.id == status_id)
            .map(|s| s.name.as_str())
    }

    /// Status id whose name matches `name`, ignoring case.
    pub fn status_id_by_name(&self, name: &str) -> Option<Uuid> {
        self.user_statuses
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name))
            .map(|s| s.id)
    }

    pub fn department(&self, id: Uuid) -> Option<&Department> {
        self.departments.iter().find(|d| d.id == id)
    }

    /// The department `user_id` currently heads, if any.
    pub fn department_headed_by(&self, user_id: Uuid) -> Option<&Department> {
        self.departments
            .iter()
            .find(|d| d.head_of_department_id == Some(user_id))
    }

    pub fn preference_for(&self, user_id: Uuid) -> Option<&Preference> {
        self.preferences.iter().find(|p| p.user_id == user_id)
    }

    pub fn default_payment_method(&self) -> Option<&PaymentMethod> {
        self.payment_methods.iter().find(|m| m.is_default)
    }
}

/// A merge-update: every `Some` collection replaces the aggregate's
/// collection of the same name. Callers pass whole collections, never
/// deltas.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateSubscriber {
    pub institution_name: Option<String>,
    pub is_active: Option<bool>,
    pub is_auto_renew: Option<bool>,
    pub recurrence: Option<Recurrence>,
    pub admins: Option<Vec<User>>,
    pub teachers: Option<Vec<User>>,
    pub students: Option<Vec<User>>,
    pub parents: Option<Vec<User>>,
    pub departments: Option<Vec<Department>>,
    pub courses: Option<Vec<Course>>,
    pub payments: Option<Vec<Payment>>,
    pub payment_methods: Option<Vec<PaymentMethod>>,
    pub preferences: Option<Vec<Preference>>,
    pub profile_images: Option<Vec<ProfileImage>>,
    pub billing_address: Option<BillingAddress>,
}

impl UpdateSubscriber {
    /// Set the collection for `role`.
    pub fn set_users(&mut self, role: Role, users: Vec<User>) {
        let slot = match role {
            Role::Admin => &mut self.admins,
            Role::Teacher => &mut self.teachers,
            Role::Student => &mut self.students,
            Role::Parent => &mut self.parents,
        };
        *slot = Some(users);
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Shallow-merge into `target`.
    pub fn apply_to(self, target: &mut Subscriber) {
        if let Some(v) = self.institution_name {
            target.institution_name = v;
        }
        if let Some(v) = self.is_active {
            target.is_active = v;
        }
        if let Some(v) = self.is_auto_renew {
            target.is_auto_renew = v;
        }
        if let Some(v) = self.recurrence {
            target.recurrence = v;
        }
        if let Some(v) = self.admins {
            target.admins = v;
        }
        if let Some(v) = self.teachers {
            target.teachers = v;
        }
        if let Some(v) = self.students {
            target.students = v;
        }
        if let Some(v) = self.parents {
            target.parents = v;
        }
        if let Some(v) = self.departments {
            target.departments = v;
        }
        if let Some(v) = self.courses {
            target.courses = v;
        }
        if let Some(v) = self.payments {
            target.payments = v;
        }
        if let Some(v) = self.payment_methods {
            target.payment_methods = v;
        }
        if let Some(v) = self.preferences {
            target.preferences = v;
        }
        if let Some(v) = self.profile_images {
            target.profile_images = v;
        }
        if let Some(v) = self.billing_address {
            target.billing_address = Some(v);
        }
    }
}
