//! Fixed analytical queries against the data store.

use async_trait::async_trait;

use crate::analytics::rows::{
    DailyEventsRow, DailyStatsRow, HourlyEventsRow, HourlyStatsRow, PoiRow,
};
use crate::error::Result;
use crate::store::StorePool;

// revenue is numeric in the store; the float8 cast keeps the row structs
// plain f64. SUM over the integer columns widens to int8 on its own.
const EVENTS_HOURLY_SQL: &str = "\
    SELECT date, hour, events \
    FROM public.hourly_events \
    ORDER BY date, hour \
    LIMIT 168";

const EVENTS_DAILY_SQL: &str = "\
    SELECT date, SUM(events) AS events \
    FROM public.hourly_events \
    GROUP BY date \
    ORDER BY date \
    LIMIT 7";

const STATS_HOURLY_SQL: &str = "\
    SELECT date, hour, impressions, clicks, revenue::float8 AS revenue \
    FROM public.hourly_stats \
    ORDER BY date, hour \
    LIMIT 168";

const STATS_DAILY_SQL: &str = "\
    SELECT date, \
        SUM(impressions) AS impressions, \
        SUM(clicks) AS clicks, \
        SUM(revenue)::float8 AS revenue \
    FROM public.hourly_stats \
    GROUP BY date \
    ORDER BY date \
    LIMIT 7";

const POI_SQL: &str = "\
    SELECT poi_id, name, lat, lon \
    FROM public.poi \
    ORDER BY poi_id";

/// The five fixed read operations exposed by the gateway.
///
/// No method takes parameters; all variability (ranges, grouping) is
/// baked into the SQL text.
#[async_trait]
pub trait QueryService: Send + Sync {
    async fn events_hourly(&self) -> Result<Vec<HourlyEventsRow>>;
    async fn events_daily(&self) -> Result<Vec<DailyEventsRow>>;
    async fn stats_hourly(&self) -> Result<Vec<HourlyStatsRow>>;
    async fn stats_daily(&self) -> Result<Vec<DailyStatsRow>>;
    async fn poi(&self) -> Result<Vec<PoiRow>>;
}

/// PostgreSQL-backed query service.
pub struct PgQueryService {
    pool: StorePool,
}

impl PgQueryService {
    pub fn new(pool: StorePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl QueryService for PgQueryService {
    async fn events_hourly(&self) -> Result<Vec<HourlyEventsRow>> {
        let conn = self.pool.get().await?;
        let rows = conn.query(EVENTS_HOURLY_SQL, &[]).await?;

        Ok(rows
            .iter()
            .map(|row| HourlyEventsRow {
                date: row.get(0),
                hour: row.get(1),
                events: row.get(2),
            })
            .collect())
    }

    async fn events_daily(&self) -> Result<Vec<DailyEventsRow>> {
        let conn = self.pool.get().await?;
        let rows = conn.query(EVENTS_DAILY_SQL, &[]).await?;

        Ok(rows
            .iter()
            .map(|row| DailyEventsRow {
                date: row.get(0),
                events: row.get(1),
            })
            .collect())
    }

    async fn stats_hourly(&self) -> Result<Vec<HourlyStatsRow>> {
        let conn = self.pool.get().await?;
        let rows = conn.query(STATS_HOURLY_SQL, &[]).await?;

        Ok(rows
            .iter()
            .map(|row| HourlyStatsRow {
                date: row.get(0),
                hour: row.get(1),
                impressions: row.get(2),
                clicks: row.get(3),
                revenue: row.get(4),
            })
            .collect())
    }

    async fn stats_daily(&self) -> Result<Vec<DailyStatsRow>> {
        let conn = self.pool.get().await?;
        let rows = conn.query(STATS_DAILY_SQL, &[]).await?;

        Ok(rows
            .iter()
            .map(|row| DailyStatsRow {
                date: row.get(0),
                impressions: row.get(1),
                clicks: row.get(2),
                revenue: row.get(3),
            })
            .collect())
    }

    async fn poi(&self) -> Result<Vec<PoiRow>> {
        let conn = self.pool.get().await?;
        let rows = conn.query(POI_SQL, &[]).await?;

        Ok(rows
            .iter()
            .map(|row| PoiRow {
                poi_id: row.get(0),
                name: row.get(1),
                lat: row.get(2),
                lon: row.get(3),
            })
            .collect())
    }
}
