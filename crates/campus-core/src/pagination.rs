//! Pagination primitives for roster queries.

use serde::{Deserialize, Serialize};

/// The page sizes the roster offers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum PageSize {
    Five,
    #[default]
    Ten,
    TwentyFive,
    Fifty,
}

impl PageSize {
    pub const ALL: [PageSize; 4] = [
        PageSize::Five,
        PageSize::Ten,
        PageSize::TwentyFive,
        PageSize::Fifty,
    ];

    pub fn get(self) -> usize {
        match self {
            PageSize::Five => 5,
            PageSize::Ten => 10,
            PageSize::TwentyFive => 25,
            PageSize::Fifty => 50,
        }
    }

    /// The enumerated size equal to `n`, if there is one.
    pub fn from_len(n: usize) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.get() == n)
    }
}

/// A page of results plus the size of the full result set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginatedResult<T> {
    pub items: Vec<T>,
    pub total: usize,
    /// 1-based page actually served after clamping.
    pub page: usize,
    pub page_size: usize,
    pub page_count: usize,
}

/// Number of pages needed for `total` rows; at least one.
pub fn page_count(total: usize, page_size: usize) -> usize {
    total.div_ceil(page_size.max(1)).max(1)
}

/// Clamp a requested 1-based page into `[1, page_count]`.
pub fn clamp_page(requested: usize, total: usize, page_size: usize) -> usize {
    requested.clamp(1, page_count(total, page_size))
}
