//! Canonical demo tenant.
//!
//! Every id is deterministic so tests and demos can refer to entities
//! directly through [`ids`]. Foreign keys are consistent across the
//! whole graph.

use campus_core::models::billing_address::BillingAddress;
use campus_core::models::course::Course;
use campus_core::models::department::Department;
use campus_core::models::payment::{Payment, PaymentStatus, Recurrence};
use campus_core::models::payment_method::{CardType, PaymentMethod};
use campus_core::models::plan::Plan;
use campus_core::models::preference::Preference;
use campus_core::models::profile_image::ProfileImage;
use campus_core::models::subscriber::Subscriber;
use campus_core::models::user::{Role, User, UserStatusDef};
use chrono::{DateTime, Duration, TimeZone, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

/// Well-known fixture ids.
pub mod ids {
    use uuid::Uuid;

    pub const SUBSCRIBER: Uuid = Uuid::from_u128(0xD000);
    pub const BILLING_ADDRESS: Uuid = Uuid::from_u128(0xD001);

    pub const STATUS_ACTIVE: Uuid = Uuid::from_u128(0x5001);
    pub const STATUS_INACTIVE: Uuid = Uuid::from_u128(0x5002);
    pub const STATUS_PENDING: Uuid = Uuid::from_u128(0x5003);
    pub const STATUS_SUSPENDED: Uuid = Uuid::from_u128(0x5004);

    pub const PLAN_STARTER: Uuid = Uuid::from_u128(0x8001);
    pub const PLAN_GROWTH: Uuid = Uuid::from_u128(0x8002);
    pub const PLAN_SCALE: Uuid = Uuid::from_u128(0x8003);
    pub const PLAN_ENTERPRISE: Uuid = Uuid::from_u128(0x8004);

    pub const METHOD_VISA: Uuid = Uuid::from_u128(0xA001);
    pub const METHOD_MASTERCARD: Uuid = Uuid::from_u128(0xA002);

    /// The admin the demo session signs in as.
    pub const VIEWER: Uuid = admin(0);

    pub const fn admin(n: u128) -> Uuid {
        Uuid::from_u128(0x1000 + n)
    }

    pub const fn teacher(n: u128) -> Uuid {
        Uuid::from_u128(0x2000 + n)
    }

    pub const fn student(n: u128) -> Uuid {
        Uuid::from_u128(0x3000 + n)
    }

    pub const fn parent(n: u128) -> Uuid {
        Uuid::from_u128(0x4000 + n)
    }

    pub const fn department(n: u128) -> Uuid {
        Uuid::from_u128(0x6000 + n)
    }

    pub const fn course(n: u128) -> Uuid {
        Uuid::from_u128(0x7000 + n)
    }
}

pub const DEMO_ADMIN_COUNT: usize = 25;

const ADMIN_FIRST: [&str; DEMO_ADMIN_COUNT] = [
    "Amelia", "Noah", "Olivia", "Liam", "Emma", "Mateo", "Sofia", "Lucas", "Isabella", "Ethan",
    "Mia", "Aiden", "Harper", "Elijah", "Chloe", "Benjamin", "Zoe", "Samuel", "Nora", "Julian",
    "Grace", "Owen", "Leah", "Caleb", "Ruby",
];

const ADMIN_LAST: [&str; DEMO_ADMIN_COUNT] = [
    "Hart", "Kim", "Patel", "Okafor", "Novak", "Garcia", "Rossi", "Dubois", "Silva", "Walsh",
    "Tanaka", "Murphy", "Lindqvist", "Mensah", "Fischer", "Cohen", "Nakamura", "Reyes", "Byrne",
    "Alvarez", "Kowalski", "Price", "Haddad", "Moreau", "Jensen",
];

const ADMIN_TIMEZONES: [Option<&str>; 5] = [
    Some("America/New_York"),
    Some("Europe/London"),
    None,
    Some("UTC-5"),
    Some("Asia/Tokyo"),
];

const DEPARTMENTS: [&str; 7] = [
    "Mathematics",
    "Science",
    "English",
    "History",
    "Arts",
    "Physical Education",
    "Computer Science",
];

/// Number of fixture departments that start with a head (admins 0..N).
const HEADED_DEPARTMENTS: usize = 5;

fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .unwrap_or_default()
}

fn user_statuses() -> Vec<UserStatusDef> {
    [
        (ids::STATUS_ACTIVE, "Active"),
        (ids::STATUS_INACTIVE, "Inactive"),
        (ids::STATUS_PENDING, "Pending"),
        (ids::STATUS_SUSPENDED, "Suspended"),
    ]
    .into_iter()
    .map(|(id, name)| UserStatusDef {
        id,
        name: name.into(),
    })
    .collect()
}

fn admin_status(n: usize) -> Uuid {
    match n % 6 {
        0..=2 => ids::STATUS_ACTIVE,
        3 => ids::STATUS_INACTIVE,
        4 => ids::STATUS_PENDING,
        _ => ids::STATUS_SUSPENDED,
    }
}

fn image_id(user_id: Uuid) -> Uuid {
    Uuid::from_u128(0xC_0000 + user_id.as_u128())
}

fn preference_id(user_id: Uuid) -> Uuid {
    Uuid::from_u128(0xB_0000 + user_id.as_u128())
}

fn admins() -> Vec<User> {
    let base = at(2025, 1, 6, 8, 0);
    (0..DEMO_ADMIN_COUNT)
        .map(|n| {
            let id = ids::admin(n as u128);
            let created_at = base + Duration::days(9 * n as i64) + Duration::hours((n * 7 % 24) as i64);
            let last_login = (n % 4 != 3).then(|| created_at + Duration::days(3 + n as i64));
            User {
                id,
                first_name: ADMIN_FIRST[n].into(),
                last_name: ADMIN_LAST[n].into(),
                email: format!(
                    "{}.{}@northfield.edu",
                    ADMIN_FIRST[n].to_lowercase(),
                    ADMIN_LAST[n].to_lowercase()
                ),
                phone: (n % 5 != 2).then(|| format!("+1-555-01{n:02}")),
                role: Role::Admin,
                user_status_id: admin_status(n),
                is_online: n % 3 == 0,
                is_verified: n % 6 != 4,
                last_login,
                created_at,
                profile_image_id: Some(image_id(id)),
            }
        })
        .collect()
}

fn member(role: Role, id: Uuid, first: &str, last: &str, n: usize) -> User {
    User {
        id,
        first_name: first.into(),
        last_name: last.into(),
        email: format!("{}.{}@northfield.edu", first.to_lowercase(), last.to_lowercase()),
        phone: None,
        role,
        user_status_id: ids::STATUS_ACTIVE,
        is_online: false,
        is_verified: true,
        last_login: None,
        created_at: at(2025, 2, 1, 9, 0) + Duration::days(n as i64),
        profile_image_id: None,
    }
}

fn teachers() -> Vec<User> {
    [
        ("Helen", "Brooks"),
        ("Marcus", "Lee"),
        ("Ingrid", "Solberg"),
        ("Tomas", "Vega"),
        ("Priya", "Nair"),
        ("Daniel", "Ortiz"),
    ]
    .iter()
    .enumerate()
    .map(|(n, (f, l))| member(Role::Teacher, ids::teacher(n as u128), f, l, n))
    .collect()
}

fn students() -> Vec<User> {
    [
        ("Ava", "Brooks"),
        ("Leo", "Santos"),
        ("Maya", "Ito"),
        ("Finn", "OBrien"),
        ("Ella", "Weber"),
        ("Kai", "Lund"),
        ("Iris", "Costa"),
        ("Jude", "Marsh"),
    ]
    .iter()
    .enumerate()
    .map(|(n, (f, l))| member(Role::Student, ids::student(n as u128), f, l, n))
    .collect()
}

fn parents() -> Vec<User> {
    [
        ("Paula", "Brooks"),
        ("Rafael", "Santos"),
        ("Yuki", "Ito"),
        ("Sean", "OBrien"),
    ]
    .iter()
    .enumerate()
    .map(|(n, (f, l))| member(Role::Parent, ids::parent(n as u128), f, l, n))
    .collect()
}

fn departments() -> Vec<Department> {
    DEPARTMENTS
        .iter()
        .enumerate()
        .map(|(n, name)| Department {
            id: ids::department(n as u128),
            name: (*name).into(),
            head_of_department_id: (n < HEADED_DEPARTMENTS).then(|| ids::admin(n as u128)),
        })
        .collect()
}

fn courses() -> Vec<Course> {
    [
        ("Algebra I", 0, Some(0)),
        ("Calculus", 0, Some(0)),
        ("Biology", 1, Some(1)),
        ("Chemistry", 1, Some(2)),
        ("Literature", 2, Some(3)),
        ("World History", 3, None),
        ("Studio Art", 4, Some(4)),
        ("Intro to Programming", 6, Some(5)),
    ]
    .iter()
    .enumerate()
    .map(|(n, (name, dept, teacher))| Course {
        id: ids::course(n as u128),
        name: (*name).into(),
        department_id: ids::department(*dept),
        teacher_id: teacher.map(ids::teacher),
    })
    .collect()
}

fn plans() -> Vec<Plan> {
    vec![
        Plan {
            id: ids::PLAN_STARTER,
            name: "Starter".into(),
            price_per_month: Decimal::new(2900, 2),
            max_admin: Some(3),
            max_teacher: Some(10),
            max_student: Some(200),
            max_parent: Some(200),
        },
        Plan {
            id: ids::PLAN_GROWTH,
            name: "Growth".into(),
            price_per_month: Decimal::new(9900, 2),
            max_admin: Some(10),
            max_teacher: Some(50),
            max_student: Some(1000),
            max_parent: Some(1000),
        },
        Plan {
            id: ids::PLAN_SCALE,
            name: "Scale".into(),
            price_per_month: Decimal::new(24900, 2),
            max_admin: Some(30),
            max_teacher: Some(200),
            max_student: Some(5000),
            max_parent: Some(5000),
        },
        Plan {
            id: ids::PLAN_ENTERPRISE,
            name: "Enterprise".into(),
            price_per_month: Decimal::new(59900, 2),
            max_admin: None,
            max_teacher: None,
            max_student: None,
            max_parent: None,
        },
    ]
}

fn payments() -> Vec<Payment> {
    [
        (0x9003, ids::PLAN_SCALE, at(2025, 9, 1, 10, 0), Decimal::new(24900, 2)),
        (0x9002, ids::PLAN_GROWTH, at(2025, 6, 1, 10, 0), Decimal::new(9900, 2)),
        (0x9001, ids::PLAN_STARTER, at(2025, 3, 1, 10, 0), Decimal::new(2900, 2)),
    ]
    .into_iter()
    .map(|(id, plan_id, created_at, price)| Payment {
        id: Uuid::from_u128(id),
        plan_id,
        payment_method_id: Some(ids::METHOD_VISA),
        final_price: price,
        next_payment_date: created_at + Duration::days(30),
        payment_status: PaymentStatus::Paid,
        is_annual: false,
        created_at,
    })
    .collect()
}

fn payment_methods() -> Vec<PaymentMethod> {
    vec![
        PaymentMethod {
            id: ids::METHOD_VISA,
            cardholder_name: "Amelia Hart".into(),
            card_last_four: "1111".into(),
            expiry_month: 8,
            expiry_year: 2029,
            card_type: CardType::Visa,
            is_default: true,
        },
        PaymentMethod {
            id: ids::METHOD_MASTERCARD,
            cardholder_name: "Northfield Academy".into(),
            card_last_four: "4444".into(),
            expiry_month: 2,
            expiry_year: 2030,
            card_type: CardType::Mastercard,
            is_default: false,
        },
    ]
}

/// The complete demo tenant: 25 admins, a handful of teachers, students
/// and parents, seven departments (five headed), and a payment history
/// whose newest entry puts the tenant on the "Scale" plan.
pub fn demo_subscriber() -> Subscriber {
    let admins = admins();

    let preferences = admins
        .iter()
        .enumerate()
        .map(|(n, admin)| Preference {
            id: preference_id(admin.id),
            user_id: admin.id,
            timezone: ADMIN_TIMEZONES[n % ADMIN_TIMEZONES.len()].map(String::from),
            language: "en".into(),
            email_notifications: n % 2 == 0,
        })
        .collect();

    let profile_images = admins
        .iter()
        .map(|admin| ProfileImage {
            id: image_id(admin.id),
            user_id: admin.id,
            file_url: format!("https://cdn.northfield.edu/avatars/{}.png", admin.id),
            is_active: true,
        })
        .collect();

    Subscriber {
        id: ids::SUBSCRIBER,
        institution_name: "Northfield Academy".into(),
        is_active: true,
        is_auto_renew: true,
        recurrence: Recurrence::Monthly,
        admins,
        teachers: teachers(),
        students: students(),
        parents: parents(),
        user_statuses: user_statuses(),
        departments: departments(),
        courses: courses(),
        plans: plans(),
        payments: payments(),
        payment_methods: payment_methods(),
        preferences,
        profile_images,
        billing_address: Some(BillingAddress {
            id: ids::BILLING_ADDRESS,
            subscriber_id: ids::SUBSCRIBER,
            primary_address: "200 College Ave".into(),
            secondary_address: None,
            city: "Burlington".into(),
            state: "VT".into(),
            zip: "05401".into(),
            country: "United States".into(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn fixture_has_expected_shape() {
        let sub = demo_subscriber();
        assert_eq!(sub.admins.len(), DEMO_ADMIN_COUNT);
        assert_eq!(sub.current_plan().unwrap().id, ids::PLAN_SCALE);
        assert_eq!(sub.preferences.len(), sub.admins.len());
        assert_eq!(sub.profile_images.len(), sub.admins.len());
        assert_eq!(sub.find_user(ids::VIEWER).unwrap().first_name, "Amelia");
    }

    #[test]
    fn fixture_foreign_keys_resolve() {
        let sub = demo_subscriber();
        for admin in &sub.admins {
            assert!(sub.status_name(admin.user_status_id).is_some());
        }
        for dept in &sub.departments {
            if let Some(head) = dept.head_of_department_id {
                assert!(sub.find_user(head).is_some());
            }
        }
        for course in &sub.courses {
            assert!(sub.department(course.department_id).is_some());
            if let Some(t) = course.teacher_id {
                assert!(sub.teachers.iter().any(|u| u.id == t));
            }
        }
        for payment in &sub.payments {
            assert!(sub.plans.iter().any(|p| p.id == payment.plan_id));
        }
    }

    #[test]
    fn fixture_heads_are_unique_and_one_default_card() {
        let sub = demo_subscriber();
        let heads: Vec<_> = sub
            .departments
            .iter()
            .filter_map(|d| d.head_of_department_id)
            .collect();
        let unique: HashSet<_> = heads.iter().collect();
        assert_eq!(heads.len(), unique.len());
        assert_eq!(sub.payment_methods.iter().filter(|m| m.is_default).count(), 1);
    }

    #[test]
    fn fixture_is_deterministic() {
        assert_eq!(demo_subscriber(), demo_subscriber());
    }
}
