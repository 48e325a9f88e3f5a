/// Response header carrying a short machine-readable outcome.
pub const SEMDEDUP_STATUS_HEADER: &str = "x-semdedup-status";
/// Response header echoing the per-request id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

pub const STATUS_HEALTHY: &str = "healthy";
pub const STATUS_READY: &str = "ready";
pub const STATUS_MATCH: &str = "match";
pub const STATUS_NO_MATCH: &str = "no_match";
pub const STATUS_GROUPED: &str = "grouped";
pub const STATUS_NO_GROUPS: &str = "no_groups";
