use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::dispatch::serial_queue::SerialQueue;
use crate::models::error::RecordError;
use crate::models::media::{EncodingSettings, FormatDescriptor, MediaType, Sample, TrackDescriptor};
use crate::models::state::SessionState;
use crate::session::writer::WriterCoordinator;
use crate::storage::paths;
use crate::traits::recording_delegate::RecordingDelegate;
use crate::traits::sample_sink::SinkFactory;
use crate::traits::writer_delegate::WriterDelegate;

const ARTIFACT_EXTENSION: &str = "muxr";

/// Maps "user wants to record" onto a fresh `WriterCoordinator` per attempt
/// and routes the two live producer streams into it.
///
/// The producer callbacks (`ingest_video_sample`, `ingest_audio_sample`) may
/// run concurrently with each other and with the control surface; they never
/// block. Samples arriving while the session is not active are silently
/// dropped — backpressure by design, never buffering.
///
/// One coordinator exists per capture pipeline, for its whole lifetime.
#[derive(Clone)]
pub struct RecordingCoordinator {
    shared: Arc<Shared>,
}

struct Shared {
    factory: Arc<dyn SinkFactory>,
    output_dir: PathBuf,
    state: Mutex<Inner>,
}

struct Inner {
    status: SessionState,
    writer: Option<WriterCoordinator>,
    recording_location: Option<PathBuf>,
    /// Format of the first observed video sample; its capture absorbs one
    /// frame interval of pipeline warm-up.
    baseline_video_format: Option<FormatDescriptor>,
    latest_audio_format: Option<FormatDescriptor>,
    video_settings: EncodingSettings,
    audio_settings: EncodingSettings,
    delegate: Option<DelegateHandle>,
}

#[derive(Clone)]
struct DelegateHandle {
    delegate: Arc<dyn RecordingDelegate>,
    queue: SerialQueue,
}

impl RecordingCoordinator {
    pub fn new(
        factory: Arc<dyn SinkFactory>,
        output_dir: PathBuf,
        video_settings: EncodingSettings,
        audio_settings: EncodingSettings,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                factory,
                output_dir,
                state: Mutex::new(Inner {
                    status: SessionState::Idle,
                    writer: None,
                    recording_location: None,
                    baseline_video_format: None,
                    latest_audio_format: None,
                    video_settings,
                    audio_settings,
                    delegate: None,
                }),
            }),
        }
    }

    pub fn status(&self) -> SessionState {
        self.shared.state.lock().status
    }

    /// Register the UI-facing observer and the serial queue its
    /// notifications are delivered on.
    pub fn set_delegate(&self, delegate: Arc<dyn RecordingDelegate>, callback_queue: SerialQueue) {
        let mut st = self.shared.state.lock();
        st.delegate = Some(DelegateHandle {
            delegate,
            queue: callback_queue,
        });
    }

    /// Begin a new recording attempt. Only valid while idle; anything else
    /// is a contract violation.
    ///
    /// Returns immediately. Completion is observed through
    /// `did_begin_recording` or `did_finish_recording(None, Some(error))`.
    pub fn start_recording(&self) {
        // `Starting` reserves the attempt; the lock is released before any
        // filesystem work. Producers see a non-active session and drop.
        let (baseline, audio_format, video_settings, audio_settings) = {
            let mut st = self.shared.state.lock();
            assert!(
                st.status.is_idle(),
                "start_recording() while already recording"
            );
            st.status = SessionState::Starting;
            (
                st.baseline_video_format.clone(),
                st.latest_audio_format.clone(),
                st.video_settings.clone(),
                st.audio_settings.clone(),
            )
        };

        let location = paths::temp_artifact_path(&self.shared.output_dir, ARTIFACT_EXTENSION);
        log::info!("starting recording to {}", location.display());

        let writer = WriterCoordinator::new(location.clone(), Arc::clone(&self.shared.factory));
        if let Some(format) = audio_format {
            writer.add_audio_track(TrackDescriptor::new(
                MediaType::Audio,
                Some(format),
                audio_settings,
            ));
        }
        writer.add_video_track(TrackDescriptor::new(
            MediaType::Video,
            baseline,
            video_settings,
        ));

        {
            let mut st = self.shared.state.lock();
            st.recording_location = Some(location);
            st.writer = Some(writer.clone());
        }

        // A serial callback queue guarantees in-order delivery of the
        // writer's notifications. Registration and prepare both submit to
        // queues, so they happen after the state lock is released.
        writer.set_delegate(
            Arc::clone(&self.shared) as Arc<dyn WriterDelegate>,
            SerialQueue::new("writer-callbacks"),
        );
        writer.prepare();
    }

    /// Stop the active attempt. A no-op from any state but `Active`,
    /// tolerating races where stop is requested before the attempt is live.
    pub fn stop_recording(&self) {
        let writer = {
            let mut st = self.shared.state.lock();
            if !st.status.is_active() {
                log::debug!("stop_recording() while {:?}, ignoring", st.status);
                return;
            }
            st.status = SessionState::Stopping;
            st.writer.clone()
        };
        if let Some(writer) = writer {
            writer.finish_recording();
        }
    }

    /// Producer callback for the video stream.
    ///
    /// The first video sample ever observed seeds the output format baseline
    /// and is dropped, absorbing one frame interval of warm-up latency.
    /// Later samples refresh the baseline and are forwarded only while the
    /// session is active.
    pub fn ingest_video_sample(&self, sample: Sample) {
        let writer = {
            let mut st = self.shared.state.lock();
            if st.baseline_video_format.is_none() {
                st.baseline_video_format = Some(sample.format.clone());
                log::debug!("captured baseline video format, dropping warm-up frame");
                return;
            }
            st.baseline_video_format = Some(sample.format.clone());
            if !st.status.is_active() {
                return;
            }
            st.writer.clone()
        };
        if let Some(writer) = writer {
            writer.append(sample);
        }
    }

    /// Producer callback for the audio stream. The latest audio format is
    /// always recorded (it decides whether the next attempt registers an
    /// audio track); the sample is forwarded only while active.
    pub fn ingest_audio_sample(&self, sample: Sample) {
        let writer = {
            let mut st = self.shared.state.lock();
            st.latest_audio_format = Some(sample.format.clone());
            if !st.status.is_active() {
                return;
            }
            st.writer.clone()
        };
        if let Some(writer) = writer {
            writer.append(sample);
        }
    }
}

impl Shared {
    fn notify(handle: Option<DelegateHandle>, f: impl FnOnce(&dyn RecordingDelegate) + Send + 'static) {
        if let Some(DelegateHandle { delegate, queue }) = handle {
            queue.enqueue(move || f(delegate.as_ref()));
        }
    }
}

impl WriterDelegate for Shared {
    fn writer_did_finish_preparing(&self) {
        let notify = {
            let mut st = self.state.lock();
            assert_eq!(
                st.status,
                SessionState::Starting,
                "writer finished preparing but the session is not starting"
            );
            st.status = SessionState::Active;
            st.delegate.clone()
        };
        log::info!("recording is live");
        Shared::notify(notify, |d| d.did_begin_recording());
    }

    fn writer_did_fail(&self, error: RecordError) {
        let notify = {
            let mut st = self.state.lock();
            st.writer = None;
            st.recording_location = None;
            st.status = SessionState::Idle;
            st.delegate.clone()
        };
        log::error!("recording attempt failed: {}", error);
        Shared::notify(notify, move |d| d.did_finish_recording(None, Some(error)));
    }

    fn writer_did_finish_recording(&self) {
        let (location, notify) = {
            let mut st = self.state.lock();
            assert_eq!(
                st.status,
                SessionState::Stopping,
                "writer finished recording but the session is not stopping"
            );
            st.writer = None;
            st.status = SessionState::Idle;
            (st.recording_location.take(), st.delegate.clone())
        };
        log::info!("recording finished: {:?}", location);
        Shared::notify(notify, move |d| d.did_finish_recording(location, None));
    }
}
