//! Property tests: arbitrary sequences of dashboard operations never
//! leave the tenant in a state that breaks its integrity rules.

use std::collections::HashSet;

use campus_admin::billing::BillingService;
use campus_admin::config::ServiceConfig;
use campus_admin::roster::RosterService;
use campus_core::error::CampusError;
use campus_core::models::payment::Recurrence;
use campus_core::models::payment_method::PaymentMethodForm;
use campus_core::models::subscriber::Subscriber;
use campus_core::models::user::{CreateAdmin, Role};
use campus_core::store::TenantStore;
use campus_store::MemoryTenantStore;
use campus_store::fixture::{DEMO_ADMIN_COUNT, demo_subscriber, ids};
use proptest::prelude::*;
use uuid::Uuid;

const PLANS: [Uuid; 4] = [
    ids::PLAN_STARTER,
    ids::PLAN_GROWTH,
    ids::PLAN_SCALE,
    ids::PLAN_ENTERPRISE,
];

const CARDS: [(&str, &str); 3] = [
    ("4111111111111111", "123"),
    ("5555555555554444", "456"),
    ("378282246310005", "7890"),
];

#[derive(Debug, Clone)]
enum Op {
    Add { department: Option<u128> },
    Delete(u128),
    Transfer { admin: u128, department: u128 },
    ChangePlan(usize),
    SaveCard { card: usize, make_default: bool },
    DeleteCard(usize),
    SetDefault(usize),
}

fn arb_op() -> impl Strategy<Value = Op> {
    let admin = 0..(DEMO_ADMIN_COUNT as u128 + 2);
    prop_oneof![
        3 => proptest::option::of(0u128..8).prop_map(|department| Op::Add { department }),
        2 => admin.clone().prop_map(Op::Delete),
        3 => (admin, 0u128..8).prop_map(|(admin, department)| Op::Transfer { admin, department }),
        1 => (0..PLANS.len()).prop_map(Op::ChangePlan),
        2 => (0..CARDS.len(), any::<bool>())
            .prop_map(|(card, make_default)| Op::SaveCard { card, make_default }),
        1 => (0usize..4).prop_map(Op::DeleteCard),
        1 => (0usize..4).prop_map(Op::SetDefault),
    ]
}

fn check_invariants(agg: &Subscriber) -> Result<(), TestCaseError> {
    // Every admin heads at most one department, and heads are admins.
    let mut heads = HashSet::new();
    for dept in &agg.departments {
        if let Some(head) = dept.head_of_department_id {
            prop_assert!(heads.insert(head), "{head} heads two departments");
            prop_assert!(agg.admins.iter().any(|a| a.id == head));
        }
    }

    // Exactly one default whenever any method exists.
    let defaults = agg.payment_methods.iter().filter(|m| m.is_default).count();
    if agg.payment_methods.is_empty() {
        prop_assert_eq!(defaults, 0);
    } else {
        prop_assert_eq!(defaults, 1);
    }

    // Nothing references a deleted user.
    for image in &agg.profile_images {
        prop_assert!(agg.find_user(image.user_id).is_some());
    }
    for pref in &agg.preferences {
        prop_assert!(agg.find_user(pref.user_id).is_some());
    }
    for course in &agg.courses {
        if let Some(teacher) = course.teacher_id {
            prop_assert!(agg.users(Role::Teacher).iter().any(|t| t.id == teacher));
        }
    }
    Ok(())
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .unwrap()
}

fn method_id(agg: &Subscriber, index: usize) -> Uuid {
    agg.payment_methods
        .get(index)
        .map_or_else(|| Uuid::from_u128(0xDEAD), |m| m.id)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn operations_preserve_integrity(ops in proptest::collection::vec(arb_op(), 1..40)) {
        let store = MemoryTenantStore::with_aggregate(demo_subscriber());
        let roster = RosterService::new(store.clone(), ServiceConfig::immediate());
        let billing = BillingService::new(store.clone(), ServiceConfig::immediate());
        let rt = runtime();

        for (step, op) in ops.into_iter().enumerate() {
            let before = store.get().unwrap();
            match op {
                Op::Add { department } => {
                    let input = CreateAdmin {
                        first_name: format!("Prop{step}"),
                        last_name: "Tester".into(),
                        email: format!("prop{step}@example.com"),
                        department_id: department.map(ids::department),
                        ..Default::default()
                    };
                    let limit = before.current_plan().and_then(|p| p.limit_for(Role::Admin));
                    match rt.block_on(roster.add_admin(input)) {
                        Ok(_) => {
                            // Capacity: a successful add started below the cap.
                            if let Some(limit) = limit {
                                prop_assert!(before.admins.len() < limit as usize);
                            }
                        }
                        Err(CampusError::CapacityExceeded { .. }) => {
                            prop_assert_eq!(store.get().unwrap(), before);
                        }
                        Err(e) => {
                            // Only unknown departments can fail validation here.
                            prop_assert!(e.field_errors().is_some_and(|f| f.has("department_id", "UNKNOWN_DEPARTMENT")));
                        }
                    }
                }
                Op::Delete(n) => {
                    rt.block_on(roster.delete_admin(ids::admin(n))).unwrap();
                    prop_assert!(store.get().unwrap().find_user(ids::admin(n)).is_none());
                }
                Op::Transfer { admin, department } => {
                    rt.block_on(roster.transfer_admin_department(
                        ids::admin(admin),
                        Some(ids::department(department)),
                    ))
                    .unwrap();
                }
                Op::ChangePlan(i) => {
                    rt.block_on(billing.change_plan(PLANS[i], Recurrence::Monthly)).unwrap();
                    prop_assert_eq!(store.get().unwrap().current_plan().map(|p| p.id), Some(PLANS[i]));
                }
                Op::SaveCard { card, make_default } => {
                    let (number, cvv) = CARDS[card];
                    let form = PaymentMethodForm {
                        cardholder_name: "Prop Tester".into(),
                        card_number: number.into(),
                        expiry_month: 12,
                        expiry_year: 2099,
                        cvv: cvv.into(),
                        make_default,
                    };
                    let saved = rt.block_on(billing.save_payment_method(form, None)).unwrap();
                    prop_assert_eq!(saved.is_default, make_default || before.payment_methods.is_empty());
                }
                Op::DeleteCard(i) => {
                    rt.block_on(billing.delete_payment_method(method_id(&before, i))).unwrap();
                }
                Op::SetDefault(i) => {
                    rt.block_on(billing.set_default_payment_method(method_id(&before, i))).unwrap();
                }
            }
            check_invariants(&store.get().unwrap())?;
        }
    }
}
