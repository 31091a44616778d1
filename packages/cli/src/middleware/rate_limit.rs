// ABOUTME: Per-client-IP rate limiting backed by governor
// ABOUTME: One direct limiter per client, with a hard cap on tracked clients and periodic sweeping

use std::{
    collections::HashMap,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    num::NonZeroU32,
    sync::{Arc, Mutex, MutexGuard},
    time::{Duration, Instant},
};

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{header::HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use governor::{
    clock::{Clock, DefaultClock},
    middleware::NoOpMiddleware,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use pcbuilder_api::AppError;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

type DirectLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock, NoOpMiddleware>;

/// A client's quota refills completely after this long without requests
const IDLE_WINDOW: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub enabled: bool,
    pub requests_per_minute: u32,
    /// Upper bound on distinct clients tracked at once
    pub max_clients: usize,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            requests_per_minute: pcbuilder_config::DEFAULT_RATE_LIMIT_RPM,
            max_clients: pcbuilder_config::DEFAULT_RATE_LIMIT_MAX_CLIENTS,
        }
    }
}

struct ClientEntry {
    limiter: Arc<DirectLimiter>,
    last_seen: Instant,
}

/// Per-IP limiters
#[derive(Clone)]
pub struct ClientRateLimiter {
    config: RateLimitConfig,
    quota: Quota,
    clients: Arc<Mutex<HashMap<IpAddr, ClientEntry>>>,
}

impl ClientRateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        let rpm = NonZeroU32::new(config.requests_per_minute).unwrap_or(NonZeroU32::MIN);
        Self {
            quota: Quota::per_minute(rpm),
            config,
            clients: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<IpAddr, ClientEntry>> {
        // A panic while holding the lock cannot leave the map inconsistent
        self.clients.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn tracked_clients(&self) -> usize {
        self.lock().len()
    }

    /// Fetch the limiter for `ip`, making room when the client table is full
    fn limiter_for(&self, ip: IpAddr) -> Arc<DirectLimiter> {
        let now = Instant::now();
        let mut clients = self.lock();

        if let Some(entry) = clients.get_mut(&ip) {
            entry.last_seen = now;
            return entry.limiter.clone();
        }

        if clients.len() >= self.config.max_clients.max(1) {
            clients.retain(|_, entry| now.duration_since(entry.last_seen) < IDLE_WINDOW);
        }
        if clients.len() >= self.config.max_clients.max(1) {
            let oldest = clients
                .iter()
                .min_by_key(|(_, entry)| entry.last_seen)
                .map(|(ip, _)| *ip);
            if let Some(oldest) = oldest {
                debug!(evicted = %oldest, "Rate limiter full, evicting least recent client");
                clients.remove(&oldest);
            }
        }

        let limiter = Arc::new(RateLimiter::direct(self.quota));
        clients.insert(
            ip,
            ClientEntry {
                limiter: limiter.clone(),
                last_seen: now,
            },
        );
        limiter
    }

    /// `Err(seconds)` when the client must wait
    pub fn check(&self, ip: IpAddr) -> Result<(), u64> {
        let limiter = self.limiter_for(ip);
        limiter.check().map_err(|not_until| {
            let wait = not_until.wait_time_from(DefaultClock::default().now());
            wait.as_secs().max(1)
        })
    }

    /// Drop clients idle for longer than the refill window
    pub fn sweep(&self) -> usize {
        let now = Instant::now();
        let mut clients = self.lock();
        let before = clients.len();
        clients.retain(|_, entry| now.duration_since(entry.last_seen) < IDLE_WINDOW);
        before - clients.len()
    }

    pub fn spawn_sweeper(&self, every: Duration) -> JoinHandle<()> {
        let limiter = self.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            loop {
                interval.tick().await;
                let removed = limiter.sweep();
                if removed > 0 {
                    debug!(removed, "Swept idle rate limiter entries");
                }
            }
        })
    }
}

/// Client address from the connection; requests without one share a single bucket
fn client_ip(request: &Request) -> IpAddr {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
}

/// Per-IP rate limiting middleware
pub async fn rate_limit_middleware(
    State(limiter): State<ClientRateLimiter>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let ip = client_ip(&request);

    match limiter.check(ip) {
        Ok(()) => {
            let mut response = next.run(request).await;
            if let Ok(value) = HeaderValue::from_str(&limiter.config.requests_per_minute.to_string()) {
                response
                    .headers_mut()
                    .insert(HeaderName::from_static("x-ratelimit-limit"), value);
            }
            Ok(response)
        }
        Err(retry_after) => {
            warn!(ip = %ip, path = %request.uri().path(), "Rate limit exceeded");
            Err(AppError::RateLimited { retry_after })
        }
    }
}
