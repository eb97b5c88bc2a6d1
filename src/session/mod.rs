pub mod recording;
pub mod writer;
