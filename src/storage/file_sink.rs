use std::fs::{self, File};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use crate::models::error::RecordError;
use crate::models::media::{MediaTime, MediaType, Sample, TrackDescriptor};
use crate::traits::sample_sink::{AppendOutcome, FinalizeCompletion, SampleSink, SinkFactory};

const MAGIC: &[u8; 4] = b"MUXR";
const VERSION: u16 = 1;
const HEADER_SIZE: u64 = 24;
const TIMELINE_UNSET: i64 = i64::MIN;

/// Default `SampleSink`: a streaming writer for a simple muxed container.
///
/// ## File format
///
/// ```text
/// [4  magic "MUXR"]
/// [2  version (LE)]
/// [1  has_video] [1 has_audio]
/// [8  timeline start, nanos (LE; i64::MIN until finalize)]
/// [4  video sample count (LE)] [4 audio sample count (LE)]
/// [records: 1-byte track tag | 8-byte pts nanos | 4-byte length | payload]
/// ```
///
/// Records stream to disk as they are appended; the header counts and
/// timeline start are patched in place on finalize, WAV-header style.
///
/// Readiness rules: a sample is `NotReady` (backpressure drop) until the
/// timeline has started, for a track that was never registered, and after
/// finalize. The caller drives this from a single thread, so there is no
/// internal locking.
pub struct FileSink {
    file: Option<File>,
    has_video: bool,
    has_audio: bool,
    is_open: bool,
    timeline_start: Option<MediaTime>,
    video_count: u32,
    audio_count: u32,
}

impl FileSink {
    /// Create the backing file. Fails immediately on an unwritable location.
    pub fn create(path: &Path) -> Result<Self, RecordError> {
        let file = File::create(path).map_err(|e| {
            RecordError::ProvisioningFailed(format!("cannot create {}: {}", path.display(), e))
        })?;
        Ok(Self {
            file: Some(file),
            has_video: false,
            has_audio: false,
            is_open: false,
            timeline_start: None,
            video_count: 0,
            audio_count: 0,
        })
    }

    fn file_mut(&mut self) -> Result<&mut File, RecordError> {
        self.file
            .as_mut()
            .ok_or_else(|| RecordError::Storage("sink file is closed".into()))
    }

    fn write_header(&mut self) -> Result<(), RecordError> {
        let has_video = self.has_video as u8;
        let has_audio = self.has_audio as u8;
        let timeline = self
            .timeline_start
            .map(|t| t.as_nanos())
            .unwrap_or(TIMELINE_UNSET);
        let video_count = self.video_count;
        let audio_count = self.audio_count;

        let file = self.file_mut()?;
        let mut header = Vec::with_capacity(HEADER_SIZE as usize);
        header.extend_from_slice(MAGIC);
        header.extend_from_slice(&VERSION.to_le_bytes());
        header.push(has_video);
        header.push(has_audio);
        header.extend_from_slice(&timeline.to_le_bytes());
        header.extend_from_slice(&video_count.to_le_bytes());
        header.extend_from_slice(&audio_count.to_le_bytes());
        file.write_all(&header)
            .map_err(|e| RecordError::Storage(format!("header write failed: {}", e)))
    }

    fn track_registered(&self, media_type: MediaType) -> bool {
        match media_type {
            MediaType::Video => self.has_video,
            MediaType::Audio => self.has_audio,
        }
    }
}

impl SampleSink for FileSink {
    fn add_track(&mut self, descriptor: &TrackDescriptor) -> Result<(), RecordError> {
        if self.is_open {
            return Err(RecordError::ProvisioningFailed(
                "cannot add tracks after open".into(),
            ));
        }
        match descriptor.media_type {
            MediaType::Video => self.has_video = true,
            MediaType::Audio => self.has_audio = true,
        }
        Ok(())
    }

    fn open(&mut self) -> Result<(), RecordError> {
        if self.is_open {
            return Err(RecordError::ProvisioningFailed("sink already open".into()));
        }
        if !self.has_video {
            return Err(RecordError::ProvisioningFailed(
                "a video track is required".into(),
            ));
        }
        self.write_header()?;
        self.is_open = true;
        Ok(())
    }

    fn start_timeline(&mut self, at: MediaTime) -> Result<(), RecordError> {
        if !self.is_open {
            return Err(RecordError::AppendFailed(
                "cannot start timeline before open".into(),
            ));
        }
        self.timeline_start = Some(at);
        Ok(())
    }

    fn append(&mut self, sample: Sample) -> Result<AppendOutcome, RecordError> {
        if !self.is_open {
            return Ok(AppendOutcome::NotReady);
        }
        if self.timeline_start.is_none() || !self.track_registered(sample.media_type) {
            return Ok(AppendOutcome::NotReady);
        }

        let tag: u8 = match sample.media_type {
            MediaType::Video => 0,
            MediaType::Audio => 1,
        };
        let file = self.file_mut()?;
        let mut record = Vec::with_capacity(13 + sample.payload.len());
        record.push(tag);
        record.extend_from_slice(&sample.timestamp.as_nanos().to_le_bytes());
        record.extend_from_slice(&(sample.payload.len() as u32).to_le_bytes());
        record.extend_from_slice(&sample.payload);
        file.write_all(&record)
            .map_err(|e| RecordError::AppendFailed(format!("record write failed: {}", e)))?;

        match sample.media_type {
            MediaType::Video => self.video_count += 1,
            MediaType::Audio => self.audio_count += 1,
        }
        Ok(AppendOutcome::Appended)
    }

    fn finalize(&mut self, completion: FinalizeCompletion) {
        let result = (|| {
            if !self.is_open {
                return Err(RecordError::FinalizeFailed("sink is not open".into()));
            }
            let file = self.file_mut()?;
            file.seek(SeekFrom::Start(0))
                .map_err(|e| RecordError::FinalizeFailed(e.to_string()))?;
            self.write_header()
                .map_err(|e| RecordError::FinalizeFailed(e.to_string()))?;
            let file = self.file_mut()?;
            file.flush()
                .map_err(|e| RecordError::FinalizeFailed(e.to_string()))?;
            self.file = None;
            self.is_open = false;
            Ok(())
        })();
        completion(result);
    }
}

/// `SinkFactory` producing a `FileSink` per attempt.
#[derive(Debug, Default)]
pub struct FileSinkFactory;

impl SinkFactory for FileSinkFactory {
    fn create(&self, location: &Path) -> Result<Box<dyn SampleSink>, RecordError> {
        Ok(Box::new(FileSink::create(location)?))
    }
}

/// Parsed view of a finalized container, for diagnostics and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactSummary {
    pub timeline_start: Option<MediaTime>,
    pub video_count: u32,
    pub audio_count: u32,
    /// `(track, pts)` per record, in file order.
    pub records: Vec<(MediaType, MediaTime)>,
}

/// Read back a finalized container written by `FileSink`.
pub fn read_artifact(path: &Path) -> Result<ArtifactSummary, RecordError> {
    let data = fs::read(path)
        .map_err(|e| RecordError::Storage(format!("cannot read {}: {}", path.display(), e)))?;
    let mut cursor = std::io::Cursor::new(&data);

    let mut magic = [0u8; 4];
    cursor
        .read_exact(&mut magic)
        .map_err(|e| RecordError::Storage(e.to_string()))?;
    if &magic != MAGIC {
        return Err(RecordError::Storage("not a MUXR container".into()));
    }

    let mut buf2 = [0u8; 2];
    cursor
        .read_exact(&mut buf2)
        .map_err(|e| RecordError::Storage(e.to_string()))?;
    let version = u16::from_le_bytes(buf2);
    if version != VERSION {
        return Err(RecordError::Storage(format!(
            "unsupported container version {}",
            version
        )));
    }

    let mut flags = [0u8; 2];
    cursor
        .read_exact(&mut flags)
        .map_err(|e| RecordError::Storage(e.to_string()))?;

    let mut buf8 = [0u8; 8];
    cursor
        .read_exact(&mut buf8)
        .map_err(|e| RecordError::Storage(e.to_string()))?;
    let timeline_raw = i64::from_le_bytes(buf8);
    let timeline_start = (timeline_raw != TIMELINE_UNSET).then(|| MediaTime::from_nanos(timeline_raw));

    let mut buf4 = [0u8; 4];
    cursor
        .read_exact(&mut buf4)
        .map_err(|e| RecordError::Storage(e.to_string()))?;
    let video_count = u32::from_le_bytes(buf4);
    cursor
        .read_exact(&mut buf4)
        .map_err(|e| RecordError::Storage(e.to_string()))?;
    let audio_count = u32::from_le_bytes(buf4);

    let mut records = Vec::new();
    loop {
        let mut tag = [0u8; 1];
        match cursor.read_exact(&mut tag) {
            Ok(()) => {}
            Err(_) => break, // end of file
        }
        let media_type = match tag[0] {
            0 => MediaType::Video,
            1 => MediaType::Audio,
            t => return Err(RecordError::Storage(format!("unknown track tag {}", t))),
        };
        cursor
            .read_exact(&mut buf8)
            .map_err(|e| RecordError::Storage(format!("truncated record: {}", e)))?;
        let pts = MediaTime::from_nanos(i64::from_le_bytes(buf8));
        cursor
            .read_exact(&mut buf4)
            .map_err(|e| RecordError::Storage(format!("truncated record: {}", e)))?;
        let len = u32::from_le_bytes(buf4);
        let payload_end = cursor.position() + u64::from(len);
        if payload_end > data.len() as u64 {
            return Err(RecordError::Storage("truncated record: payload".into()));
        }
        cursor.set_position(payload_end);
        records.push((media_type, pts));
    }

    Ok(ArtifactSummary {
        timeline_start,
        video_count,
        audio_count,
        records,
    })
}
