//! Roster query engine.
//!
//! A pure function of (admins, filters, sort, page) over a tenant
//! snapshot. Filters key on stable entity ids or explicit sentinels, so
//! adding or removing a department never shifts what a filter means.
//! Filters that name an id the tenant no longer has are ignored rather
//! than reported.

use std::cmp::Ordering;

use campus_core::models::subscriber::Subscriber;
use campus_core::models::user::User;
use campus_core::pagination::{PageSize, PaginatedResult, clamp_page, page_count};
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::timezone::ViewerZone;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Is(Uuid),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DepartmentFilter {
    #[default]
    All,
    Is(Uuid),
    /// Admins heading no department.
    Unassigned,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OnlineFilter {
    #[default]
    All,
    Online,
    Offline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateField {
    CreatedAt,
    LastLogin,
}

/// Inclusive range of calendar dates in the viewer's zone. A missing
/// bound leaves that side open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub field: DateField,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    fn is_open(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    fn contains(&self, date: NaiveDate) -> bool {
        self.from.is_none_or(|f| date >= f) && self.to.is_none_or(|t| date <= t)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Name,
    Email,
    Status,
    Phone,
    Department,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort {
    pub field: SortField,
    pub direction: SortDirection,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RosterFilters {
    pub search: String,
    pub status: StatusFilter,
    pub department: DepartmentFilter,
    pub online: OnlineFilter,
    pub date_range: Option<DateRange>,
}

/// Roster view state. Every setter that narrows or widens the result set
/// sends the view back to page 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterQuery {
    filters: RosterFilters,
    sort: Option<Sort>,
    page: usize,
    page_size: PageSize,
}

impl Default for RosterQuery {
    fn default() -> Self {
        Self::new(PageSize::default())
    }
}

impl RosterQuery {
    pub fn new(page_size: PageSize) -> Self {
        Self {
            filters: RosterFilters::default(),
            sort: None,
            page: 1,
            page_size,
        }
    }

    pub fn filters(&self) -> &RosterFilters {
        &self.filters
    }

    pub fn sort(&self) -> Option<Sort> {
        self.sort
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.filters.search = search.into();
        self.page = 1;
    }

    pub fn set_status(&mut self, status: StatusFilter) {
        self.filters.status = status;
        self.page = 1;
    }

    pub fn set_department(&mut self, department: DepartmentFilter) {
        self.filters.department = department;
        self.page = 1;
    }

    pub fn set_online(&mut self, online: OnlineFilter) {
        self.filters.online = online;
        self.page = 1;
    }

    pub fn set_date_range(&mut self, range: Option<DateRange>) {
        self.filters.date_range = range;
        self.page = 1;
    }

    pub fn clear_filters(&mut self) {
        self.filters = RosterFilters::default();
        self.page = 1;
    }

    pub fn set_page_size(&mut self, page_size: PageSize) {
        self.page_size = page_size;
        self.page = 1;
    }

    /// Out-of-range pages are clamped when the query runs.
    pub fn set_page(&mut self, page: usize) {
        self.page = page;
    }

    /// Selecting the active field again flips its direction; a new field
    /// starts ascending.
    pub fn select_sort(&mut self, field: SortField) {
        self.sort = Some(match self.sort {
            Some(current) if current.field == field => Sort {
                field,
                direction: current.direction.toggled(),
            },
            _ => Sort {
                field,
                direction: SortDirection::Ascending,
            },
        });
    }

    pub fn clear_sort(&mut self) {
        self.sort = None;
    }
}

/// One admin with its lookups resolved for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminRow {
    pub user: User,
    pub full_name: String,
    pub status_name: Option<String>,
    pub department_id: Option<Uuid>,
    pub department_name: Option<String>,
}

impl AdminRow {
    fn resolve(aggregate: &Subscriber, user: &User) -> Self {
        let department = aggregate.department_headed_by(user.id);
        Self {
            full_name: user.full_name(),
            status_name: aggregate.status_name(user.user_status_id).map(String::from),
            department_id: department.map(|d| d.id),
            department_name: department.map(|d| d.name.clone()),
            user: user.clone(),
        }
    }

    fn sort_key(&self, field: SortField) -> String {
        let value = match field {
            SortField::Name => self.full_name.as_str(),
            SortField::Email => self.user.email.as_str(),
            SortField::Status => self.status_name.as_deref().unwrap_or(""),
            SortField::Phone => self.user.phone.as_deref().unwrap_or(""),
            SortField::Department => self.department_name.as_deref().unwrap_or(""),
        };
        value.to_lowercase()
    }
}

/// Drop filters that reference ids the tenant does not have.
fn effective_filters(aggregate: &Subscriber, filters: &RosterFilters) -> RosterFilters {
    let mut f = filters.clone();
    if let StatusFilter::Is(id) = f.status {
        if aggregate.status_name(id).is_none() {
            f.status = StatusFilter::All;
        }
    }
    if let DepartmentFilter::Is(id) = f.department {
        if aggregate.department(id).is_none() {
            f.department = DepartmentFilter::All;
        }
    }
    f.search = f.search.trim().to_lowercase();
    f
}

fn matches(row: &AdminRow, filters: &RosterFilters, zone: ViewerZone) -> bool {
    if !filters.search.is_empty()
        && !row.full_name.to_lowercase().contains(&filters.search)
        && !row.user.email.to_lowercase().contains(&filters.search)
    {
        return false;
    }

    let status_ok = match filters.status {
        StatusFilter::All => true,
        StatusFilter::Is(id) => row.user.user_status_id == id,
    };
    let department_ok = match filters.department {
        DepartmentFilter::All => true,
        DepartmentFilter::Is(id) => row.department_id == Some(id),
        DepartmentFilter::Unassigned => row.department_id.is_none(),
    };
    let online_ok = match filters.online {
        OnlineFilter::All => true,
        OnlineFilter::Online => row.user.is_online,
        OnlineFilter::Offline => !row.user.is_online,
    };
    if !(status_ok && department_ok && online_ok) {
        return false;
    }

    match filters.date_range {
        Some(range) if !range.is_open() => {
            let instant: Option<DateTime<Utc>> = match range.field {
                DateField::CreatedAt => Some(row.user.created_at),
                DateField::LastLogin => row.user.last_login,
            };
            instant.is_some_and(|at| range.contains(zone.local_date(at)))
        }
        _ => true,
    }
}

/// Filter, sort and paginate the admin roster of `aggregate`.
///
/// Sorting is stable: rows with equal keys keep roster order in both
/// directions.
pub fn run_query(
    aggregate: &Subscriber,
    query: &RosterQuery,
    zone: ViewerZone,
) -> PaginatedResult<AdminRow> {
    let filters = effective_filters(aggregate, &query.filters);

    let mut rows: Vec<AdminRow> = aggregate
        .admins
        .iter()
        .map(|u| AdminRow::resolve(aggregate, u))
        .filter(|row| matches(row, &filters, zone))
        .collect();

    if let Some(sort) = query.sort {
        let mut keyed: Vec<(String, AdminRow)> =
            rows.into_iter().map(|r| (r.sort_key(sort.field), r)).collect();
        keyed.sort_by(|(a, _), (b, _)| -> Ordering {
            match sort.direction {
                SortDirection::Ascending => a.cmp(b),
                SortDirection::Descending => b.cmp(a),
            }
        });
        rows = keyed.into_iter().map(|(_, r)| r).collect();
    }

    let total = rows.len();
    let page_size = query.page_size.get();
    let page = clamp_page(query.page, total, page_size);
    let items = rows
        .into_iter()
        .skip((page - 1) * page_size)
        .take(page_size)
        .collect();

    PaginatedResult {
        items,
        total,
        page,
        page_size,
        page_count: page_count(total, page_size),
    }
}

/// A selectable filter value with its display label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOption<T> {
    pub value: T,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOptions {
    pub statuses: Vec<FilterOption<StatusFilter>>,
    /// "All" first, then each department, then the "no department" sentinel.
    pub departments: Vec<FilterOption<DepartmentFilter>>,
}

pub fn filter_options(aggregate: &Subscriber) -> FilterOptions {
    let statuses = std::iter::once(FilterOption {
        value: StatusFilter::All,
        label: "All".into(),
    })
    .chain(aggregate.user_statuses.iter().map(|s| FilterOption {
        value: StatusFilter::Is(s.id),
        label: s.name.clone(),
    }))
    .collect();

    let departments = std::iter::once(FilterOption {
        value: DepartmentFilter::All,
        label: "All".into(),
    })
    .chain(aggregate.departments.iter().map(|d| FilterOption {
        value: DepartmentFilter::Is(d.id),
        label: d.name.clone(),
    }))
    .chain(std::iter::once(FilterOption {
        value: DepartmentFilter::Unassigned,
        label: "No department".into(),
    }))
    .collect();

    FilterOptions {
        statuses,
        departments,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_field_sorts_ascending_then_toggles() {
        let mut q = RosterQuery::default();
        q.select_sort(SortField::Name);
        assert_eq!(q.sort().unwrap().direction, SortDirection::Ascending);
        q.select_sort(SortField::Name);
        assert_eq!(q.sort().unwrap().direction, SortDirection::Descending);
        q.select_sort(SortField::Email);
        assert_eq!(
            q.sort(),
            Some(Sort {
                field: SortField::Email,
                direction: SortDirection::Ascending
            })
        );
    }

    #[test]
    fn filter_changes_reset_page() {
        let mut q = RosterQuery::default();
        q.set_page(3);
        q.set_search("kim");
        assert_eq!(q.page(), 1);

        q.set_page(3);
        q.set_online(OnlineFilter::Online);
        assert_eq!(q.page(), 1);

        q.set_page(3);
        q.set_page_size(PageSize::Fifty);
        assert_eq!(q.page(), 1);

        q.set_page(3);
        q.select_sort(SortField::Phone);
        assert_eq!(q.page(), 3, "sorting keeps the page");
    }

    #[test]
    fn date_range_bounds_are_inclusive_and_optional() {
        let d = |day| NaiveDate::from_ymd_opt(2025, 6, day).unwrap();
        let range = DateRange {
            field: DateField::CreatedAt,
            from: Some(d(10)),
            to: None,
        };
        assert!(range.contains(d(10)));
        assert!(range.contains(d(30)));
        assert!(!range.contains(d(9)));

        let closed = DateRange {
            to: Some(d(12)),
            ..range
        };
        assert!(closed.contains(d(12)));
        assert!(!closed.contains(d(13)));
    }
}
