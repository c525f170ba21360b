use actix_web::{
    Error, HttpResponse, Result,
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use chrono::{DateTime, Duration, Utc};
use futures_util::future::LocalBoxFuture;
use std::{
    collections::HashMap,
    net::IpAddr,
    rc::Rc,
    sync::{Arc, Mutex},
};

use crate::{config::Config, handlers::shared::ErrorResponse};

/// Rate limit configuration
#[derive(Clone, Debug)]
pub struct RateLimitConfig {
    /// Maximum requests per window
    pub max_requests: u32,
    /// Window duration in seconds
    pub window_seconds: i64,
    /// Message to return when rate limit is exceeded
    pub message: String,
}

impl RateLimitConfig {
    pub fn new(max_requests: u32, window_seconds: i64) -> Self {
        Self {
            max_requests,
            window_seconds,
            message: "Too many requests, please try again later.".to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.rate_limit_max_requests,
            config.rate_limit_window_seconds,
        )
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self::new(100, 15 * 60) // 100 requests per 15 minutes
    }
}

#[derive(Debug, Clone)]
struct RequestTracker {
    count: u32,
    window_start: DateTime<Utc>,
}

impl RequestTracker {
    fn new(now: DateTime<Utc>) -> Self {
        Self {
            count: 0,
            window_start: now,
        }
    }

    fn is_expired(&self, window_seconds: i64, now: DateTime<Utc>) -> bool {
        let window = Duration::try_seconds(window_seconds).unwrap_or(Duration::minutes(15));
        now >= self.window_start + window
    }
}

/// Per-IP request counters shared by every worker.
#[derive(Clone, Default)]
pub struct RateLimitStore {
    trackers: Arc<Mutex<HashMap<IpAddr, RequestTracker>>>,
}

impl RateLimitStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts the request and reports whether it is within the limit.
    pub fn check_and_update(&self, ip: IpAddr, config: &RateLimitConfig) -> bool {
        self.check_and_update_at(ip, config, Utc::now())
    }

    fn check_and_update_at(&self, ip: IpAddr, config: &RateLimitConfig, now: DateTime<Utc>) -> bool {
        let mut trackers = self.trackers.lock().unwrap_or_else(|e| e.into_inner());
        let tracker = trackers
            .entry(ip)
            .or_insert_with(|| RequestTracker::new(now));

        if tracker.is_expired(config.window_seconds, now) {
            *tracker = RequestTracker::new(now);
        }

        if tracker.count >= config.max_requests {
            false
        } else {
            tracker.count += 1;
            true
        }
    }

    /// Drop trackers whose window has passed
    pub fn cleanup_expired(&self, window_seconds: i64) {
        let now = Utc::now();
        let mut trackers = self.trackers.lock().unwrap_or_else(|e| e.into_inner());
        trackers.retain(|_, tracker| !tracker.is_expired(window_seconds, now));
    }

    pub fn tracked_clients(&self) -> usize {
        self.trackers.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

/// Rate limiting middleware keyed by client IP
pub struct RateLimitMiddleware {
    store: RateLimitStore,
    config: RateLimitConfig,
}

impl RateLimitMiddleware {
    pub fn with_store(config: RateLimitConfig, store: RateLimitStore) -> Self {
        Self { store, config }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimitMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = RateLimitService<S>;
    type InitError = ();
    type Future = futures_util::future::Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        futures_util::future::ready(Ok(RateLimitService {
            service: Rc::new(service),
            store: self.store.clone(),
            config: self.config.clone(),
        }))
    }
}

pub struct RateLimitService<S> {
    service: Rc<S>,
    store: RateLimitStore,
    config: RateLimitConfig,
}

impl<S, B> Service<ServiceRequest> for RateLimitService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let store = self.store.clone();
        let config = self.config.clone();

        Box::pin(async move {
            // Requests without a peer address (e.g. unix sockets) are not limited
            if let Some(ip) = req.peer_addr().map(|addr| addr.ip()) {
                if !store.check_and_update(ip, &config) {
                    log::warn!("Rate limit exceeded for IP: {}", ip);
                    let response =
                        HttpResponse::TooManyRequests().json(ErrorResponse::new(&config.message));
                    return Ok(req.into_response(response).map_into_right_body());
                }
            }

            let res = service.call(req).await?;
            Ok(res.map_into_left_body())
        })
    }
}

/// Background task to clean up expired rate limit entries
pub async fn cleanup_rate_limits(store: RateLimitStore, interval_seconds: u64, window_seconds: i64) {
    let mut interval = tokio::time::interval(std::time::Duration::from_secs(interval_seconds));

    loop {
        interval.tick().await;
        store.cleanup_expired(window_seconds);
        log::debug!("Cleaned up expired rate limit entries");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    const LOCALHOST: IpAddr = IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1));

    #[test]
    fn test_rate_limit_config() {
        let config = RateLimitConfig::default();
        assert_eq!(config.max_requests, 100);
        assert_eq!(config.window_seconds, 900);
        assert_eq!(config.message, "Too many requests, please try again later.");
    }

    #[test]
    fn test_rate_limit_store_blocks_after_max() {
        let store = RateLimitStore::new();
        let config = RateLimitConfig::new(2, 60);

        assert!(store.check_and_update(LOCALHOST, &config));
        assert!(store.check_and_update(LOCALHOST, &config));
        assert!(!store.check_and_update(LOCALHOST, &config));

        // Other clients have their own budget
        let other = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 7));
        assert!(store.check_and_update(other, &config));
    }

    #[test]
    fn test_rate_limit_window_resets() {
        let store = RateLimitStore::new();
        let config = RateLimitConfig::new(1, 60);
        let start = Utc::now();

        assert!(store.check_and_update_at(LOCALHOST, &config, start));
        assert!(!store.check_and_update_at(LOCALHOST, &config, start + Duration::seconds(59)));
        assert!(store.check_and_update_at(LOCALHOST, &config, start + Duration::seconds(60)));
    }

    #[test]
    fn test_cleanup_expired() {
        let store = RateLimitStore::new();
        let config = RateLimitConfig::new(1, 1);

        assert!(store.check_and_update(LOCALHOST, &config));
        assert_eq!(store.tracked_clients(), 1);

        // A zero-length window makes every tracker stale
        store.cleanup_expired(0);
        assert_eq!(store.tracked_clients(), 0);
    }
}
