//! Service configuration.

use std::env;
use std::time::Duration;

use campus_core::pagination::PageSize;
use rust_decimal::Decimal;
use tracing::warn;

/// Configuration shared by the roster and billing services.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Simulated network round trip before each mutation (default: 300 ms).
    pub latency: Duration,
    /// Discount applied to annual billing (default: 0.20).
    pub annual_discount: Decimal,
    /// Zone used when the viewer has no preference (default: `UTC`).
    pub default_timezone: String,
    /// Roster page size on first render (default: 10).
    pub default_page_size: PageSize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            latency: Duration::from_millis(300),
            annual_discount: Decimal::new(20, 2),
            default_timezone: "UTC".into(),
            default_page_size: PageSize::Ten,
        }
    }
}

impl ServiceConfig {
    /// Defaults overlaid with `CAMPUS_LATENCY_MS`, `CAMPUS_DEFAULT_TIMEZONE`
    /// and `CAMPUS_PAGE_SIZE`. Unparsable values are logged and ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(raw) = env::var("CAMPUS_LATENCY_MS") {
            match raw.parse::<u64>() {
                Ok(ms) => config.latency = Duration::from_millis(ms),
                Err(e) => warn!(value = %raw, error = %e, "Ignoring CAMPUS_LATENCY_MS"),
            }
        }

        if let Ok(tz) = env::var("CAMPUS_DEFAULT_TIMEZONE") {
            if !tz.trim().is_empty() {
                config.default_timezone = tz;
            }
        }

        if let Ok(raw) = env::var("CAMPUS_PAGE_SIZE") {
            match raw.parse::<usize>().ok().and_then(PageSize::from_len) {
                Some(size) => config.default_page_size = size,
                None => warn!(value = %raw, "Ignoring CAMPUS_PAGE_SIZE: expected 5, 10, 25 or 50"),
            }
        }

        config
    }

    /// Zero latency, for tests and scripted runs.
    pub fn immediate() -> Self {
        Self {
            latency: Duration::ZERO,
            ..Self::default()
        }
    }
}
