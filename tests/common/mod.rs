//! Shared utilities for integration testing.

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;

use analytics_gateway::analytics::{
    DailyEventsRow, DailyStatsRow, HourlyEventsRow, HourlyStatsRow, PoiRow, QueryService,
};
use analytics_gateway::config::GatewayConfig;
use analytics_gateway::error::{Error, Result};
use analytics_gateway::http::HttpServer;
use analytics_gateway::lifecycle::Shutdown;
use analytics_gateway::security::clock::ManualClock;

fn date(s: &str) -> NaiveDate {
    s.parse().expect("fixture date")
}

/// In-memory query service with a small fixed data set.
///
/// Daily rows are derived from the hourly fixtures the same way the SQL
/// does it: summed per date, ordered by date.
pub struct MemoryQueryService {
    hourly_events: Vec<HourlyEventsRow>,
    hourly_stats: Vec<HourlyStatsRow>,
    poi: Vec<PoiRow>,
}

impl MemoryQueryService {
    pub fn new() -> Self {
        Self {
            hourly_events: vec![
                HourlyEventsRow {
                    date: date("2017-01-01"),
                    hour: 0,
                    events: 5,
                },
                HourlyEventsRow {
                    date: date("2017-01-01"),
                    hour: 1,
                    events: 7,
                },
                HourlyEventsRow {
                    date: date("2017-01-02"),
                    hour: 0,
                    events: 3,
                },
            ],
            hourly_stats: vec![
                HourlyStatsRow {
                    date: date("2017-01-01"),
                    hour: 0,
                    impressions: 100,
                    clicks: 10,
                    revenue: 12.5,
                },
                HourlyStatsRow {
                    date: date("2017-01-01"),
                    hour: 1,
                    impressions: 50,
                    clicks: 5,
                    revenue: 7.5,
                },
                HourlyStatsRow {
                    date: date("2017-01-02"),
                    hour: 0,
                    impressions: 25,
                    clicks: 2,
                    revenue: 4.0,
                },
            ],
            poi: vec![
                PoiRow {
                    poi_id: 1,
                    name: "EQ Works".to_string(),
                    lat: 43.6708,
                    lon: -79.3899,
                },
                PoiRow {
                    poi_id: 2,
                    name: "CN Tower".to_string(),
                    lat: 43.6426,
                    lon: -79.3871,
                },
            ],
        }
    }
}

#[async_trait]
impl QueryService for MemoryQueryService {
    async fn events_hourly(&self) -> Result<Vec<HourlyEventsRow>> {
        Ok(self.hourly_events.clone())
    }

    async fn events_daily(&self) -> Result<Vec<DailyEventsRow>> {
        let mut by_date: BTreeMap<NaiveDate, i64> = BTreeMap::new();
        for row in &self.hourly_events {
            *by_date.entry(row.date).or_default() += i64::from(row.events);
        }

        Ok(by_date
            .into_iter()
            .map(|(date, events)| DailyEventsRow { date, events })
            .collect())
    }

    async fn stats_hourly(&self) -> Result<Vec<HourlyStatsRow>> {
        Ok(self.hourly_stats.clone())
    }

    async fn stats_daily(&self) -> Result<Vec<DailyStatsRow>> {
        let mut by_date: BTreeMap<NaiveDate, (i64, i64, f64)> = BTreeMap::new();
        for row in &self.hourly_stats {
            let entry = by_date.entry(row.date).or_default();
            entry.0 += i64::from(row.impressions);
            entry.1 += i64::from(row.clicks);
            entry.2 += row.revenue;
        }

        Ok(by_date
            .into_iter()
            .map(|(date, (impressions, clicks, revenue))| DailyStatsRow {
                date,
                impressions,
                clicks,
                revenue,
            })
            .collect())
    }

    async fn poi(&self) -> Result<Vec<PoiRow>> {
        Ok(self.poi.clone())
    }
}

/// Query service whose store is unreachable.
#[allow(dead_code)]
pub struct FailingQueryService;

#[async_trait]
impl QueryService for FailingQueryService {
    async fn events_hourly(&self) -> Result<Vec<HourlyEventsRow>> {
        Err(Error::Pool("connection refused".to_string()))
    }

    async fn events_daily(&self) -> Result<Vec<DailyEventsRow>> {
        Err(Error::Pool("connection refused".to_string()))
    }

    async fn stats_hourly(&self) -> Result<Vec<HourlyStatsRow>> {
        Err(Error::Pool("connection refused".to_string()))
    }

    async fn stats_daily(&self) -> Result<Vec<DailyStatsRow>> {
        Err(Error::Pool("connection refused".to_string()))
    }

    async fn poi(&self) -> Result<Vec<PoiRow>> {
        Err(Error::Pool("connection refused".to_string()))
    }
}

/// A gateway served on an OS-assigned port, with a manual clock.
pub struct TestGateway {
    pub addr: SocketAddr,
    pub clock: Arc<ManualClock>,
    // Dropping the sender would read as a shutdown signal.
    _shutdown: Shutdown,
}

impl TestGateway {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// Client that never routes localhost traffic through a proxy.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .build()
        .expect("client build")
}

/// Start a gateway over the given query service.
///
/// The listener is bound before the server task is spawned, so requests
/// can be issued immediately; no startup sleep is needed.
pub async fn start_gateway(queries: Arc<dyn QueryService>) -> TestGateway {
    let config = GatewayConfig::default();
    let clock = Arc::new(ManualClock::new());

    let server = HttpServer::new(&config, queries, clock.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    TestGateway {
        addr,
        clock,
        _shutdown: shutdown,
    }
}
