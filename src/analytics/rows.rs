//! Row shapes returned by the query surface.
//!
//! Field order mirrors column order in the SQL; serde serializes structs
//! in declaration order, so the JSON output preserves it.

use chrono::NaiveDate;
use serde::Serialize;

/// One row of `hourly_events`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyEventsRow {
    pub date: NaiveDate,
    pub hour: i32,
    pub events: i32,
}

/// Events summed per date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyEventsRow {
    pub date: NaiveDate,
    pub events: i64,
}

/// One row of `hourly_stats`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyStatsRow {
    pub date: NaiveDate,
    pub hour: i32,
    pub impressions: i32,
    pub clicks: i32,
    pub revenue: f64,
}

/// Impressions, clicks, and revenue summed per date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyStatsRow {
    pub date: NaiveDate,
    pub impressions: i64,
    pub clicks: i64,
    pub revenue: f64,
}

/// One point of interest.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PoiRow {
    pub poi_id: i32,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}
