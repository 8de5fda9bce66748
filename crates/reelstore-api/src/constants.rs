/// Prefix shared by all API routes.
pub const API_PREFIX: &str = "/api";

/// Slack on top of the file size limit for multipart boundaries and part headers.
pub const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Lifetime of tokens minted by `issue_access_token`.
pub const ACCESS_TOKEN_TTL_SECS: i64 = 60 * 60;
