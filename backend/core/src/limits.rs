//! Size and confidence limits shared by the client and the server.

/// Largest image either side accepts, in bytes.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Smallest image the client will submit, in bytes.
///
/// The server has no floor beyond "non-empty".
pub const MIN_CLIENT_IMAGE_BYTES: usize = 1024;

/// Classifier scores below this are treated as "nothing recognised".
pub const CONFIDENCE_FLOOR: f32 = 0.1;

/// How long the client waits for one recognition attempt, in milliseconds.
pub const CLIENT_ATTEMPT_TIMEOUT_MS: u64 = 30_000;

/// Wall-clock budget for all AI calls of one request, in milliseconds.
///
/// Kept below [`CLIENT_ATTEMPT_TIMEOUT_MS`] so the fallback answer reaches the
/// client before it gives up on the attempt.
pub const DEFAULT_REQUEST_BUDGET_MS: u64 = 25_000;
