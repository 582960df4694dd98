//! Plan capacity rule.

use campus_core::models::subscriber::Subscriber;
use campus_core::models::user::Role;

use crate::error::RuleViolation;

/// Reject adding another user of `role` when the current plan's limit
/// is already reached. A tenant with no current plan, or a plan with no
/// limit for the role, is unlimited.
pub fn check_capacity(aggregate: &Subscriber, role: Role) -> Result<(), RuleViolation> {
    let Some(limit) = aggregate.current_plan().and_then(|p| p.limit_for(role)) else {
        return Ok(());
    };
    let current = aggregate.users(role).len();
    if current >= limit as usize {
        return Err(RuleViolation::CapacityExceeded {
            role,
            limit,
            current,
        });
    }
    Ok(())
}

/// Occupancy of one role against the current plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleUsage {
    pub role: Role,
    pub used: usize,
    pub limit: Option<u32>,
}

impl RoleUsage {
    /// Downgrades may leave a tenant above its limits; this is how the
    /// dashboard finds out.
    pub fn is_over_limit(&self) -> bool {
        self.limit.is_some_and(|l| self.used > l as usize)
    }

    pub fn is_full(&self) -> bool {
        self.limit.is_some_and(|l| self.used >= l as usize)
    }
}

pub fn usage_report(aggregate: &Subscriber) -> Vec<RoleUsage> {
    let plan = aggregate.current_plan();
    Role::ALL
        .iter()
        .map(|&role| RoleUsage {
            role,
            used: aggregate.users(role).len(),
            limit: plan.and_then(|p| p.limit_for(role)),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use campus_store::fixture::{demo_subscriber, ids};

    fn with_plan(plan_id: uuid::Uuid) -> Subscriber {
        let mut agg = demo_subscriber();
        let latest = agg.payments[0].clone();
        let mut payment = latest.clone();
        payment.id = uuid::Uuid::from_u128(0xF00D);
        payment.plan_id = plan_id;
        payment.created_at = latest.created_at + chrono::Duration::days(1);
        agg.payments.insert(0, payment);
        agg
    }

    #[test]
    fn full_roster_is_rejected() {
        let agg = with_plan(ids::PLAN_STARTER);
        assert_eq!(
            check_capacity(&agg, Role::Admin),
            Err(RuleViolation::CapacityExceeded {
                role: Role::Admin,
                limit: 3,
                current: agg.admins.len(),
            })
        );
    }

    #[test]
    fn unlimited_plan_accepts_anything() {
        let agg = with_plan(ids::PLAN_ENTERPRISE);
        for role in Role::ALL {
            assert!(check_capacity(&agg, role).is_ok());
        }
    }

    #[test]
    fn no_payments_means_no_limit() {
        let mut agg = demo_subscriber();
        agg.payments.clear();
        assert!(check_capacity(&agg, Role::Admin).is_ok());
        assert!(usage_report(&agg).iter().all(|u| u.limit.is_none()));
    }

    #[test]
    fn usage_report_flags_over_limit_roles() {
        let report = usage_report(&with_plan(ids::PLAN_GROWTH));
        let admin = report.iter().find(|u| u.role == Role::Admin).unwrap();
        assert_eq!(admin.limit, Some(10));
        assert!(admin.is_over_limit());
        assert!(admin.is_full());
        assert_eq!(report.len(), Role::ALL.len());
    }
}
