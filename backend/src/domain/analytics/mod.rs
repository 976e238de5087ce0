//! # Analytics
//!
//! Pure reporting functions over in-memory transaction sets. Nothing here
//! touches storage or reads the clock; callers pass `now` explicitly.
//!
//! - **window**: turns `month` / `period` / `startDate`+`endDate` selectors
//!   into a concrete `[start, end]` interval
//! - **aggregation**: totals, comparisons, category breakdowns, monthly
//!   series and budget tiers
//! - **insights**: rule-based notices derived from the aggregates

pub mod aggregation;
pub mod insights;
pub mod window;

pub use aggregation::*;
pub use insights::{generate_insights, InsightInput};
pub use window::{resolve_window, AnalyticsWindow, RollingPeriod, WindowQuery};
