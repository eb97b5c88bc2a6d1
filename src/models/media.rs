use serde::{Deserialize, Serialize};

/// Media type of a sample, track, or stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Video,
    Audio,
}

/// A presentation timestamp on a monotonic media clock.
///
/// Stored as signed nanoseconds so subtraction and ordering are cheap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MediaTime {
    nanos: i64,
}

impl MediaTime {
    pub const ZERO: MediaTime = MediaTime { nanos: 0 };

    pub fn from_nanos(nanos: i64) -> Self {
        Self { nanos }
    }

    pub fn from_millis(millis: i64) -> Self {
        Self { nanos: millis * 1_000_000 }
    }

    pub fn as_nanos(&self) -> i64 {
        self.nanos
    }

    pub fn as_millis(&self) -> i64 {
        self.nanos / 1_000_000
    }
}

/// Opaque source format token attached to samples and tracks.
///
/// The coordinator never interprets the contents beyond equality; it is a
/// hint handed through to the sink (the original carries a
/// `CMFormatDescription` the same way).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatDescriptor {
    pub codec: String,
    /// Pixel dimensions, video only.
    pub dimensions: Option<(u32, u32)>,
    /// Sample rate in Hz, audio only.
    pub sample_rate: Option<u32>,
    /// Channel count, audio only.
    pub channels: Option<u16>,
}

impl FormatDescriptor {
    pub fn video(codec: &str, width: u32, height: u32) -> Self {
        Self {
            codec: codec.to_string(),
            dimensions: Some((width, height)),
            sample_rate: None,
            channels: None,
        }
    }

    pub fn audio(codec: &str, sample_rate: u32, channels: u16) -> Self {
        Self {
            codec: codec.to_string(),
            dimensions: None,
            sample_rate: Some(sample_rate),
            channels: Some(channels),
        }
    }
}

/// Encoder settings mapping handed through to the sink, uninterpreted.
pub type EncodingSettings = serde_json::Map<String, serde_json::Value>;

/// A time-stamped, media-typed buffer produced by a capture stream.
///
/// Ownership transfers to the coordinator at append; the sink consumes it
/// once and it is not retained afterward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    pub media_type: MediaType,
    pub timestamp: MediaTime,
    pub format: FormatDescriptor,
    pub payload: Vec<u8>,
}

impl Sample {
    pub fn video(timestamp: MediaTime, format: FormatDescriptor, payload: Vec<u8>) -> Self {
        Self {
            media_type: MediaType::Video,
            timestamp,
            format,
            payload,
        }
    }

    pub fn audio(timestamp: MediaTime, format: FormatDescriptor, payload: Vec<u8>) -> Self {
        Self {
            media_type: MediaType::Audio,
            timestamp,
            format,
            payload,
        }
    }
}

/// One media-typed sub-stream within the sink.
///
/// Must be registered with the writer coordinator strictly while it is idle;
/// video is mandatory, audio optional.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackDescriptor {
    pub media_type: MediaType,
    pub format_hint: Option<FormatDescriptor>,
    pub settings: EncodingSettings,
}

impl TrackDescriptor {
    pub fn new(
        media_type: MediaType,
        format_hint: Option<FormatDescriptor>,
        settings: EncodingSettings,
    ) -> Self {
        Self {
            media_type,
            format_hint,
            settings,
        }
    }
}
