pub mod recording_delegate;
pub mod sample_sink;
pub mod writer_delegate;
