//! Per-client request rate limiting.
//!
//! Each client IP gets a bucket of `max_requests` that refills evenly over
//! the configured window. Requests without connection info (in-process
//! tests) share one bucket.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::Next;
use axum::response::Response;
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};

use crate::error::AppError;

#[derive(Clone)]
pub struct RateLimit {
    limiter: Arc<DefaultKeyedRateLimiter<IpAddr>>,
}

impl RateLimit {
    /// Allow `max_requests` per `window` per client. `None` disables
    /// limiting (zero requests or a zero window).
    pub fn new(max_requests: u32, window: Duration) -> Option<Self> {
        let burst = NonZeroU32::new(max_requests)?;
        let period = window.checked_div(max_requests)?;
        let quota = Quota::with_period(period)?.allow_burst(burst);
        Some(Self {
            limiter: Arc::new(RateLimiter::keyed(quota)),
        })
    }

    /// Take one request from `client`'s bucket. `false` once it is empty.
    pub fn try_acquire(&self, client: IpAddr) -> bool {
        self.limiter.check_key(&client).is_ok()
    }
}

/// Middleware rejecting clients over their quota with 429.
pub async fn limit_by_client(
    State(limit): State<RateLimit>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let client = client_ip(&request);
    if !limit.try_acquire(client) {
        tracing::warn!(%client, "Rate limit exceeded");
        return Err(AppError::RateLimited);
    }
    Ok(next.run(request).await)
}

fn client_ip(request: &Request) -> IpAddr {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_quota_disables_limiting() {
        assert!(RateLimit::new(0, Duration::from_secs(600)).is_none());
        assert!(RateLimit::new(10, Duration::ZERO).is_none());
    }

    #[test]
    fn each_client_has_its_own_bucket() {
        let limit = RateLimit::new(2, Duration::from_secs(600)).unwrap();
        let a = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1));
        let b = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 2));

        assert!(limit.try_acquire(a));
        assert!(limit.try_acquire(a));
        assert!(!limit.try_acquire(a));
        assert!(limit.try_acquire(b));
    }
}
