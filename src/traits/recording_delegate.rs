use std::path::PathBuf;

use crate::models::error::RecordError;

/// Lifecycle observer for the outer recording coordinator (the UI-facing
/// surface).
///
/// Delivered on the serial queue supplied at registration, in order.
pub trait RecordingDelegate: Send + Sync {
    /// Recording is live; incoming samples are being forwarded.
    fn did_begin_recording(&self);

    /// The attempt ended. On success `artifact` holds the finalized output
    /// location and `error` is `None`; on failure the location is `None`
    /// and nothing remains on disk.
    fn did_finish_recording(&self, artifact: Option<PathBuf>, error: Option<RecordError>);
}
