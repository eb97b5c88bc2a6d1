use thiserror::Error;

/// Environmental failures surfaced through the `Failed` transition and the
/// delegate notification path.
///
/// Caller misuse (preparing twice, appending before open, starting while
/// already recording) is never represented here — those are contract
/// violations and panic at the offending call site.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("provisioning failed: {0}")]
    ProvisioningFailed(String),

    #[error("append failed: {0}")]
    AppendFailed(String),

    #[error("finalize failed: {0}")]
    FinalizeFailed(String),

    #[error("storage error: {0}")]
    Storage(String),
}
