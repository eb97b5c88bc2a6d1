//! # video-capture-core
//!
//! Recording coordination core for a two-stream capture pipeline.
//!
//! Two independent producer threads deliver time-stamped video and audio
//! samples; this crate serializes them into a single muxed output artifact
//! while the producers keep running. Device capture, permissions, and UI are
//! external collaborators — the crate begins at "a sample arrived" and ends
//! at "here is the finalized artifact location".
//!
//! ## Architecture
//!
//! ```text
//! video-capture-core (this crate)
//! ├── traits/     ← SampleSink + SinkFactory, WriterDelegate, RecordingDelegate
//! ├── models/     ← Sample, MediaTime, TrackDescriptor, WriterState,
//! │                 SessionState, RecordError, RecordingMetadata
//! ├── dispatch/   ← SerialQueue (ordered task queue on a dedicated thread)
//! ├── session/    ← WriterCoordinator, RecordingCoordinator
//! └── storage/    ← FileSink container writer, temp paths, library import
//! ```
//!
//! `WriterCoordinator` owns one sink per attempt and funnels every sink
//! mutation through one serialized writer queue; `RecordingCoordinator`
//! sits above it, gating the live streams and exposing the simple
//! start/stop surface. Lifecycle milestones are delivered to delegates on
//! caller-supplied serial queues, in order.

pub mod dispatch;
pub mod models;
pub mod session;
pub mod storage;
pub mod traits;

// Re-export key types at crate root for convenience.
pub use dispatch::serial_queue::SerialQueue;
pub use models::error::RecordError;
pub use models::media::{
    EncodingSettings, FormatDescriptor, MediaTime, MediaType, Sample, TrackDescriptor,
};
pub use models::recording_result::RecordingMetadata;
pub use models::state::{SessionState, WriterState};
pub use session::recording::RecordingCoordinator;
pub use session::writer::WriterCoordinator;
pub use storage::file_sink::{read_artifact, ArtifactSummary, FileSink, FileSinkFactory};
pub use traits::recording_delegate::RecordingDelegate;
pub use traits::sample_sink::{AppendOutcome, FinalizeCompletion, SampleSink, SinkFactory};
pub use traits::writer_delegate::WriterDelegate;
