use std::path::Path;

use crate::models::error::RecordError;
use crate::models::media::{MediaTime, Sample, TrackDescriptor};

/// Result of a non-blocking append.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppendOutcome {
    /// The sink consumed the sample.
    Appended,
    /// The destination track cannot currently accept data; the sample is
    /// dropped as backpressure, not buffered.
    NotReady,
}

/// Completion signal for an asynchronous finalize. May be invoked inline.
pub type FinalizeCompletion = Box<dyn FnOnce(Result<(), RecordError>) + Send + 'static>;

/// The resource that durably accumulates tracked samples and produces one
/// finalized artifact.
///
/// The caller guarantees at most one in-flight mutating call at a time (the
/// writer coordinator satisfies this by confining the sink to its serialized
/// writer queue), so implementations need no internal locking.
pub trait SampleSink: Send {
    /// Register a track. Only valid before `open`.
    fn add_track(&mut self, descriptor: &TrackDescriptor) -> Result<(), RecordError>;

    /// Open the sink for writing.
    fn open(&mut self) -> Result<(), RecordError>;

    /// Establish the timeline origin. Called once, with the timestamp of the
    /// first video sample.
    fn start_timeline(&mut self, at: MediaTime) -> Result<(), RecordError>;

    /// Append one sample. Must return immediately: `NotReady` rejects the
    /// sample without blocking, `Err` is a hard write failure.
    fn append(&mut self, sample: Sample) -> Result<AppendOutcome, RecordError>;

    /// Finalize the artifact and signal `completion` when done. There is no
    /// timeout: a completion that never fires parks the owning coordinator
    /// in its draining state.
    fn finalize(&mut self, completion: FinalizeCompletion);
}

/// Creates one sink per recording attempt at a chosen output location.
pub trait SinkFactory: Send + Sync {
    fn create(&self, location: &Path) -> Result<Box<dyn SampleSink>, RecordError>;
}
