pub mod file_sink;
pub mod library;
pub mod paths;
