pub mod rate_limit;
pub mod request_id;

pub use rate_limit::{RateLimitConfig, RateLimitMiddleware, RateLimitStore, cleanup_rate_limits};
pub use request_id::{CorrelationId, RequestId, RequestIdExt};
