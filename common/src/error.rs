use thiserror::Error;

/// Failure of a single fingerprint probe.
///
/// These never unwind past the probing unit that produced them: the
/// classification chain consumes them and treats every variant as
/// "no signal for this port".
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("probe timed out")]
    Timeout,

    #[error("connect failed: {0}")]
    Connect(String),

    #[error("http error status {status}")]
    Http { status: u16 },

    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Contract errors of the discovery engine itself.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScanError {
    /// A scan was requested while another one is still running.
    /// The engine rejects rather than serializes; the caller decides
    /// whether to retry once `is_scanning()` drops.
    #[error("a network scan is already in progress")]
    ScanInProgress,
}
