//! Global fixed-window rate limiting middleware.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::config::RateLimitConfig;
use crate::observability::metrics;
use crate::security::clock::Clock;

/// Outcome of an admission check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allowed,
    Denied,
}

/// Counter state for the current window.
///
/// `count` is only meaningful relative to `window_start`; a stale window
/// is reset before it is consulted.
struct RateWindow {
    window_start: Instant,
    count: u32,
}

/// Read-only view of the live window, for the diagnostic endpoint.
#[derive(Debug, Clone, Copy)]
pub struct WindowSnapshot {
    pub count: u32,
    pub elapsed: Duration,
}

/// Fixed-window request counter shared by all in-flight requests.
///
/// One window covers the whole process; this is not a per-client limiter.
/// The window is fixed, not sliding: a burst that spans a rollover can
/// admit up to twice `max_requests` within one window duration of wall
/// clock. That is the documented contract, not an oversight.
pub struct RateLimiter {
    window: Mutex<RateWindow>,
    max_requests: u32,
    window_duration: Duration,
    clock: Arc<dyn Clock>,
}

impl RateLimiter {
    /// Create a limiter with its window starting at the clock's current
    /// instant and a count of zero.
    pub fn new(config: &RateLimitConfig, clock: Arc<dyn Clock>) -> Self {
        let window_start = clock.now();
        Self {
            window: Mutex::new(RateWindow {
                window_start,
                count: 0,
            }),
            max_requests: config.max_requests,
            window_duration: Duration::from_secs(config.window_secs),
            clock,
        }
    }

    /// Decide whether one request may proceed.
    ///
    /// Rollover check, count comparison, and increment happen under a
    /// single lock acquisition; the lock is never held across an await.
    /// Both comparisons are strict: a request landing at exactly one
    /// window duration after the window started is denied.
    pub fn admit(&self) -> Decision {
        let mut window = self.window.lock().expect("rate limiter mutex poisoned");
        let now = self.clock.now();

        if now.duration_since(window.window_start) > self.window_duration {
            window.window_start = now;
            window.count = 0;
        }

        if window.count < self.max_requests
            && now.duration_since(window.window_start) < self.window_duration
        {
            window.count += 1;
            Decision::Allowed
        } else {
            Decision::Denied
        }
    }

    /// Read the live window state without mutating it.
    pub fn snapshot(&self) -> WindowSnapshot {
        let window = self.window.lock().expect("rate limiter mutex poisoned");
        WindowSnapshot {
            count: window.count,
            elapsed: self.clock.now().duration_since(window.window_start),
        }
    }

    pub fn max_requests(&self) -> u32 {
        self.max_requests
    }

    pub fn window_duration(&self) -> Duration {
        self.window_duration
    }
}

/// Middleware applying the admission check ahead of every handler.
pub async fn rate_limit_middleware(
    State(limiter): State<Arc<RateLimiter>>,
    request: Request,
    next: Next,
) -> Response {
    match limiter.admit() {
        Decision::Allowed => next.run(request).await,
        Decision::Denied => {
            let snapshot = limiter.snapshot();
            tracing::warn!(
                count = snapshot.count,
                elapsed = ?snapshot.elapsed,
                "rate limit exceeded"
            );
            metrics::record_rate_limited();
            rejection(&limiter)
        }
    }
}

/// Structured rejection payload. The body shape is part of the external
/// contract.
fn rejection(limiter: &RateLimiter) -> Response {
    let body = Json(serde_json::json!({
        "success": false,
        "error": "rate limiting error",
        "message": format!(
            "You have exceeded your limit. You can only make {} per {}s",
            limiter.max_requests(),
            limiter.window_duration().as_secs()
        ),
    }));
    (StatusCode::TOO_MANY_REQUESTS, body).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::security::clock::ManualClock;

    fn limiter_with_clock(max_requests: u32, window_secs: u64) -> (RateLimiter, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new());
        let config = RateLimitConfig {
            max_requests,
            window_secs,
        };
        (RateLimiter::new(&config, clock.clone()), clock)
    }

    #[test]
    fn admits_up_to_max_within_window() {
        let (limiter, _clock) = limiter_with_clock(3, 10);
        for _ in 0..3 {
            assert_eq!(limiter.admit(), Decision::Allowed);
        }
    }

    #[test]
    fn denies_request_over_max() {
        let (limiter, _clock) = limiter_with_clock(3, 10);
        for _ in 0..3 {
            limiter.admit();
        }
        assert_eq!(limiter.admit(), Decision::Denied);
    }

    #[test]
    fn rollover_resets_count_and_admits() {
        let (limiter, clock) = limiter_with_clock(3, 10);
        for _ in 0..4 {
            limiter.admit();
        }

        clock.advance(Duration::from_secs(11));
        assert_eq!(limiter.admit(), Decision::Allowed);

        // Count restarts at 1 after the post-rollover admit.
        assert_eq!(limiter.snapshot().count, 1);
    }

    #[test]
    fn denies_at_exact_window_boundary() {
        let (limiter, clock) = limiter_with_clock(3, 10);
        assert_eq!(limiter.admit(), Decision::Allowed);

        // elapsed == window_duration: no rollover yet, and the strict
        // less-than admission check fails.
        clock.advance(Duration::from_secs(10));
        assert_eq!(limiter.admit(), Decision::Denied);

        // One tick past the boundary rolls the window over.
        clock.advance(Duration::from_millis(1));
        assert_eq!(limiter.admit(), Decision::Allowed);
    }

    #[test]
    fn first_request_of_fresh_window_is_admitted() {
        let (limiter, clock) = limiter_with_clock(3, 10);
        for _ in 0..4 {
            limiter.admit();
        }
        clock.advance(Duration::from_secs(25));
        assert_eq!(limiter.admit(), Decision::Allowed);
    }

    #[test]
    fn concurrent_admits_do_not_lose_updates() {
        use crate::security::clock::SystemClock;

        let config = RateLimitConfig {
            max_requests: 3,
            window_secs: 60,
        };
        let limiter = Arc::new(RateLimiter::new(&config, Arc::new(SystemClock)));

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let limiter = limiter.clone();
                std::thread::spawn(move || limiter.admit())
            })
            .collect();

        let allowed = handles
            .into_iter()
            .map(|h| h.join().expect("admit thread panicked"))
            .filter(|d| *d == Decision::Allowed)
            .count();

        assert_eq!(allowed, 3);
        assert_eq!(limiter.snapshot().count, 3);
    }
}
