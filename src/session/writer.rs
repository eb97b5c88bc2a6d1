use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::dispatch::serial_queue::SerialQueue;
use crate::models::error::RecordError;
use crate::models::media::{MediaType, Sample, TrackDescriptor};
use crate::models::state::WriterState;
use crate::storage::paths;
use crate::traits::sample_sink::{AppendOutcome, FinalizeCompletion, SampleSink, SinkFactory};
use crate::traits::writer_delegate::WriterDelegate;

/// Owns one `SampleSink` per recording attempt and runs the
/// open/append/drain/finalize lifecycle over it.
///
/// Every sink mutation — provisioning, appends, the drain gate, finalize,
/// teardown — is enqueued on one serialized writer queue, which is the sole
/// mechanism enforcing the sink's single-writer contract. State
/// check-and-transitions happen under a short-held mutex that is never held
/// across a queue submission or a blocking call, so producer threads never
/// stall on sink I/O.
///
/// A coordinator is single-use: a new attempt always constructs a fresh
/// instance at a fresh output location.
#[derive(Clone)]
pub struct WriterCoordinator {
    shared: Arc<Shared>,
}

struct Shared {
    location: PathBuf,
    factory: Arc<dyn SinkFactory>,
    writing_queue: SerialQueue,
    state: Mutex<State>,
    /// The sink itself. Only writer-queue tasks touch it.
    slot: Mutex<SinkSlot>,
}

#[derive(Default)]
struct State {
    status: WriterState,
    error: Option<RecordError>,
    video_track: Option<TrackDescriptor>,
    audio_track: Option<TrackDescriptor>,
    delegate: Option<DelegateHandle>,
}

#[derive(Clone)]
struct DelegateHandle {
    delegate: Arc<dyn WriterDelegate>,
    queue: SerialQueue,
}

#[derive(Default)]
struct SinkSlot {
    sink: Option<Box<dyn SampleSink>>,
    timeline_started: bool,
}

impl WriterCoordinator {
    pub fn new(location: PathBuf, factory: Arc<dyn SinkFactory>) -> Self {
        Self {
            shared: Arc::new(Shared {
                location,
                factory,
                writing_queue: SerialQueue::new("writer-sink"),
                state: Mutex::new(State::default()),
                slot: Mutex::new(SinkSlot::default()),
            }),
        }
    }

    pub fn status(&self) -> WriterState {
        self.shared.state.lock().status
    }

    /// The failure that moved the writer to `Failed`, if any.
    pub fn error(&self) -> Option<RecordError> {
        self.shared.state.lock().error.clone()
    }

    pub fn location(&self) -> &Path {
        &self.shared.location
    }

    /// Register the mandatory video track. Only valid while idle.
    pub fn add_video_track(&self, descriptor: TrackDescriptor) {
        debug_assert_eq!(descriptor.media_type, MediaType::Video);
        let mut st = self.shared.state.lock();
        assert_eq!(
            st.status,
            WriterState::Idle,
            "cannot add tracks while not idle"
        );
        st.video_track = Some(descriptor);
    }

    /// Register the optional audio track. Only valid while idle.
    pub fn add_audio_track(&self, descriptor: TrackDescriptor) {
        debug_assert_eq!(descriptor.media_type, MediaType::Audio);
        let mut st = self.shared.state.lock();
        assert_eq!(
            st.status,
            WriterState::Idle,
            "cannot add tracks while not idle"
        );
        st.audio_track = Some(descriptor);
    }

    /// Register the lifecycle observer and the serial queue its
    /// notifications are delivered on.
    pub fn set_delegate(&self, delegate: Arc<dyn WriterDelegate>, callback_queue: SerialQueue) {
        let mut st = self.shared.state.lock();
        st.delegate = Some(DelegateHandle {
            delegate,
            queue: callback_queue,
        });
    }

    /// Provision the sink off the calling thread: delete any stale artifact,
    /// create the sink, add the registered tracks, open it.
    ///
    /// Returns immediately. Success is reported through
    /// `writer_did_finish_preparing`, failure through `writer_did_fail`.
    pub fn prepare(&self) {
        {
            let mut st = self.shared.state.lock();
            assert_eq!(
                st.status,
                WriterState::Idle,
                "already prepared, cannot prepare again"
            );
            assert!(
                st.video_track.is_some(),
                "cannot prepare without a video track"
            );
            st.status = WriterState::PreparingToOpen;
        }
        log::debug!("preparing writer for {}", self.shared.location.display());

        let shared = Arc::clone(&self.shared);
        self.shared
            .writing_queue
            .enqueue(move || Shared::provision(&shared));
    }

    /// Forward one sample toward the sink.
    ///
    /// Calling this before the writer has finished preparing is a contract
    /// violation. Once draining has begun or a terminal state has been
    /// reached the sample is silently dropped — an append may race a stop or
    /// an asynchronous failure, and that is not the producer's fault.
    pub fn append(&self, sample: Sample) {
        {
            let st = self.shared.state.lock();
            assert!(st.status.append_permitted(), "not ready to record yet");
            if !st.status.accepts_appends() {
                log::debug!(
                    "dropping {:?} sample, writer is {:?}",
                    sample.media_type,
                    st.status
                );
                return;
            }
        }

        let shared = Arc::clone(&self.shared);
        self.shared
            .writing_queue
            .enqueue(move || Shared::write_sample(&shared, sample));
    }

    /// Drain in-flight appends, then finalize the sink.
    ///
    /// Valid from `Open`. A writer that already failed asynchronously is a
    /// tolerated no-op — the caller is not required to have observed the
    /// failure yet. Any other state is a contract violation.
    ///
    /// There is no timeout on the sink's finalize completion; a sink that
    /// never signals parks the coordinator in `DrainingPart2` indefinitely.
    pub fn finish_recording(&self) {
        {
            let mut st = self.shared.state.lock();
            match st.status {
                WriterState::Open => st.status = WriterState::DrainingPart1,
                WriterState::Failed => {
                    log::info!("recording has already failed, nothing to finish");
                    return;
                }
                status => panic!("finish_recording() while {:?}, not recording", status),
            }
        }
        log::debug!("draining writer for {}", self.shared.location.display());

        let shared = Arc::clone(&self.shared);
        self.shared
            .writing_queue
            .enqueue(move || Shared::drain_and_finalize(&shared));
    }
}

impl Shared {
    fn provision(shared: &Arc<Shared>) {
        let (video, audio) = {
            let st = shared.state.lock();
            (st.video_track.clone(), st.audio_track.clone())
        };

        let provisioned = (|| {
            // The sink will not write over an existing artifact.
            paths::remove_artifact(&shared.location)?;
            let mut sink = shared.factory.create(&shared.location)?;
            if let Some(video) = &video {
                sink.add_track(video)?;
            }
            if let Some(audio) = &audio {
                sink.add_track(audio)?;
            }
            sink.open()?;
            Ok::<_, RecordError>(sink)
        })();

        match provisioned {
            Ok(sink) => {
                shared.slot.lock().sink = Some(sink);
                Shared::transition(shared, WriterState::Open, None);
            }
            Err(e) => {
                log::error!("sink provisioning failed: {}", e);
                let e = match e {
                    RecordError::ProvisioningFailed(_) => e,
                    other => RecordError::ProvisioningFailed(other.to_string()),
                };
                Shared::transition(shared, WriterState::Failed, Some(e));
            }
        }
    }

    /// Runs on the writer queue: start the timeline on the first video
    /// sample, then hand the sample to the sink.
    fn write_sample(shared: &Arc<Shared>, sample: Sample) {
        {
            let st = shared.state.lock();
            // A failure may have landed since the append gate was checked.
            if !matches!(
                st.status,
                WriterState::Open | WriterState::DrainingPart1
            ) {
                log::debug!(
                    "discarding in-flight {:?} sample, writer is {:?}",
                    sample.media_type,
                    st.status
                );
                return;
            }
        }

        let media_type = sample.media_type;
        let result = {
            let mut slot = shared.slot.lock();
            let SinkSlot {
                sink,
                timeline_started,
            } = &mut *slot;
            let Some(sink) = sink.as_mut() else {
                return;
            };
            // Audio never starts the timeline; until a video sample has,
            // the sink reports audio as a backpressure drop.
            if !*timeline_started && media_type == MediaType::Video {
                match sink.start_timeline(sample.timestamp) {
                    Ok(()) => *timeline_started = true,
                    Err(e) => {
                        drop(slot);
                        log::error!("failed to start sink timeline: {}", e);
                        Shared::transition(shared, WriterState::Failed, Some(e));
                        return;
                    }
                }
            }
            sink.append(sample)
        };

        match result {
            Ok(AppendOutcome::Appended) => {}
            Ok(AppendOutcome::NotReady) => {
                log::warn!(
                    "{:?} track not ready for more media data, dropping sample",
                    media_type
                );
            }
            Err(e) => {
                log::error!("{:?} append failed: {}", media_type, e);
                Shared::transition(shared, WriterState::Failed, Some(e));
            }
        }
    }

    /// Runs on the writer queue once every previously enqueued append has
    /// run, so finalize can never race an in-flight append.
    fn drain_and_finalize(shared: &Arc<Shared>) {
        {
            let mut st = shared.state.lock();
            // An in-flight append may have failed while we drained.
            if st.status != WriterState::DrainingPart1 {
                return;
            }
            st.status = WriterState::DrainingPart2;
        }

        let on_done = Arc::clone(shared);
        let completion: FinalizeCompletion = Box::new(move |result| match result {
            Ok(()) => Shared::transition(&on_done, WriterState::Finalized, None),
            Err(e) => {
                log::error!("sink finalize failed: {}", e);
                Shared::transition(&on_done, WriterState::Failed, Some(e));
            }
        });

        let mut slot = shared.slot.lock();
        match slot.sink.as_mut() {
            Some(sink) => sink.finalize(completion),
            None => completion(Err(RecordError::FinalizeFailed(
                "sink is no longer available".into(),
            ))),
        }
    }

    /// Perform a monotonic state transition and its side effects: terminal
    /// states schedule teardown on the writer queue, and the three
    /// observable milestones are dispatched to the delegate queue. Never
    /// called with the state lock held.
    fn transition(shared: &Arc<Shared>, new_status: WriterState, error: Option<RecordError>) {
        let notify = {
            let mut st = shared.state.lock();
            if st.status == new_status || st.status.is_terminal() {
                return;
            }
            st.status = new_status;
            if let Some(e) = &error {
                st.error = Some(e.clone());
            }
            st.delegate.clone()
        };
        log::info!("writer transitioned to {:?}", new_status);

        if new_status.is_terminal() {
            // Teardown shares the writer queue, so it cannot race an
            // in-flight append.
            let teardown = Arc::clone(shared);
            let delete_artifact = new_status == WriterState::Failed;
            shared
                .writing_queue
                .enqueue(move || Shared::teardown(&teardown, delete_artifact));
        }

        let Some(DelegateHandle { delegate, queue }) = notify else {
            return;
        };
        match new_status {
            WriterState::Open => queue.enqueue(move || delegate.writer_did_finish_preparing()),
            WriterState::Finalized => {
                queue.enqueue(move || delegate.writer_did_finish_recording())
            }
            WriterState::Failed => {
                let error = error
                    .unwrap_or_else(|| RecordError::Storage("unknown writer failure".into()));
                queue.enqueue(move || delegate.writer_did_fail(error));
            }
            _ => {}
        }
    }

    /// Release the sink; on failure also delete the partial artifact. Runs
    /// exactly once, on the writer queue, after the terminal transition.
    fn teardown(shared: &Arc<Shared>, delete_artifact: bool) {
        shared.slot.lock().sink = None;
        if delete_artifact {
            if let Err(e) = paths::remove_artifact(&shared.location) {
                log::warn!("failed to delete partial artifact: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::media::{FormatDescriptor, MediaTime};
    use std::fs;
    use std::sync::mpsc;
    use std::time::{Duration, Instant};

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum SinkEvent {
        TimelineStarted(MediaTime),
        Appended(MediaType, MediaTime),
        Finalized,
    }

    #[derive(Default)]
    struct SinkLog {
        events: Vec<SinkEvent>,
    }

    struct MockSink {
        log: Arc<Mutex<SinkLog>>,
        timeline_started: bool,
        appended: usize,
        fail_append_at: Option<usize>,
    }

    impl SampleSink for MockSink {
        fn add_track(&mut self, _descriptor: &TrackDescriptor) -> Result<(), RecordError> {
            Ok(())
        }

        fn open(&mut self) -> Result<(), RecordError> {
            Ok(())
        }

        fn start_timeline(&mut self, at: MediaTime) -> Result<(), RecordError> {
            self.timeline_started = true;
            self.log.lock().events.push(SinkEvent::TimelineStarted(at));
            Ok(())
        }

        fn append(&mut self, sample: Sample) -> Result<AppendOutcome, RecordError> {
            if !self.timeline_started {
                return Ok(AppendOutcome::NotReady);
            }
            if self.fail_append_at == Some(self.appended) {
                return Err(RecordError::AppendFailed("simulated write failure".into()));
            }
            self.appended += 1;
            self.log
                .lock()
                .events
                .push(SinkEvent::Appended(sample.media_type, sample.timestamp));
            Ok(AppendOutcome::Appended)
        }

        fn finalize(&mut self, completion: FinalizeCompletion) {
            self.log.lock().events.push(SinkEvent::Finalized);
            completion(Ok(()));
        }
    }

    struct MockFactory {
        log: Arc<Mutex<SinkLog>>,
        fail_create: bool,
        fail_append_at: Option<usize>,
    }

    impl MockFactory {
        fn new() -> (Arc<Self>, Arc<Mutex<SinkLog>>) {
            let log = Arc::new(Mutex::new(SinkLog::default()));
            (
                Arc::new(Self {
                    log: Arc::clone(&log),
                    fail_create: false,
                    fail_append_at: None,
                }),
                log,
            )
        }

        fn failing_create() -> Arc<Self> {
            Arc::new(Self {
                log: Arc::new(Mutex::new(SinkLog::default())),
                fail_create: true,
                fail_append_at: None,
            })
        }

        fn failing_append_at(n: usize) -> (Arc<Self>, Arc<Mutex<SinkLog>>) {
            let log = Arc::new(Mutex::new(SinkLog::default()));
            (
                Arc::new(Self {
                    log: Arc::clone(&log),
                    fail_create: false,
                    fail_append_at: Some(n),
                }),
                log,
            )
        }
    }

    impl SinkFactory for MockFactory {
        fn create(&self, location: &Path) -> Result<Box<dyn SampleSink>, RecordError> {
            if self.fail_create {
                return Err(RecordError::ProvisioningFailed(format!(
                    "cannot create sink at {}",
                    location.display()
                )));
            }
            Ok(Box::new(MockSink {
                log: Arc::clone(&self.log),
                timeline_started: false,
                appended: 0,
                fail_append_at: self.fail_append_at,
            }))
        }
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum DelegateEvent {
        Prepared,
        Failed(RecordError),
        Finished,
    }

    struct TestDelegate {
        tx: Mutex<mpsc::Sender<DelegateEvent>>,
    }

    impl TestDelegate {
        fn channel() -> (Arc<Self>, mpsc::Receiver<DelegateEvent>) {
            let (tx, rx) = mpsc::channel();
            (Arc::new(Self { tx: Mutex::new(tx) }), rx)
        }
    }

    impl WriterDelegate for TestDelegate {
        fn writer_did_finish_preparing(&self) {
            self.tx.lock().send(DelegateEvent::Prepared).unwrap();
        }

        fn writer_did_fail(&self, error: RecordError) {
            self.tx.lock().send(DelegateEvent::Failed(error)).unwrap();
        }

        fn writer_did_finish_recording(&self) {
            self.tx.lock().send(DelegateEvent::Finished).unwrap();
        }
    }

    fn scratch_location(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("video_capture_writer_{}.muxr", name))
    }

    fn video_track() -> TrackDescriptor {
        TrackDescriptor::new(MediaType::Video, None, Default::default())
    }

    fn audio_track() -> TrackDescriptor {
        TrackDescriptor::new(MediaType::Audio, None, Default::default())
    }

    fn video_sample(ms: i64) -> Sample {
        Sample::video(
            MediaTime::from_millis(ms),
            FormatDescriptor::video("h264", 640, 480),
            vec![0; 4],
        )
    }

    fn audio_sample(ms: i64) -> Sample {
        Sample::audio(
            MediaTime::from_millis(ms),
            FormatDescriptor::audio("aac", 48000, 2),
            vec![0; 2],
        )
    }

    fn recv(rx: &mpsc::Receiver<DelegateEvent>) -> DelegateEvent {
        rx.recv_timeout(Duration::from_secs(5))
            .expect("no delegate notification within 5s")
    }

    fn wait_until(what: &str, condition: impl Fn() -> bool) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while !condition() {
            assert!(Instant::now() < deadline, "timed out waiting: {}", what);
            std::thread::sleep(Duration::from_millis(10));
        }
    }

    fn prepared_writer(
        name: &str,
        factory: Arc<dyn SinkFactory>,
    ) -> (WriterCoordinator, mpsc::Receiver<DelegateEvent>) {
        let writer = WriterCoordinator::new(scratch_location(name), factory);
        writer.add_video_track(video_track());
        writer.add_audio_track(audio_track());
        let (delegate, rx) = TestDelegate::channel();
        writer.set_delegate(delegate, SerialQueue::new("writer-callbacks"));
        writer.prepare();
        assert_eq!(recv(&rx), DelegateEvent::Prepared);
        (writer, rx)
    }

    #[test]
    fn prepare_reports_success_and_opens() {
        let (factory, _log) = MockFactory::new();
        let (writer, _rx) = prepared_writer("prepare_ok", factory);
        assert_eq!(writer.status(), WriterState::Open);
        assert_eq!(writer.error(), None);
    }

    #[test]
    fn prepare_failure_deletes_stale_artifact_and_reports() {
        let location = scratch_location("prepare_fail");
        fs::write(&location, b"stale artifact").unwrap();

        let writer = WriterCoordinator::new(location.clone(), MockFactory::failing_create());
        writer.add_video_track(video_track());
        let (delegate, rx) = TestDelegate::channel();
        writer.set_delegate(delegate, SerialQueue::new("writer-callbacks"));
        writer.prepare();

        match recv(&rx) {
            DelegateEvent::Failed(RecordError::ProvisioningFailed(_)) => {}
            other => panic!("expected provisioning failure, got {:?}", other),
        }
        assert_eq!(writer.status(), WriterState::Failed);
        assert!(matches!(
            writer.error(),
            Some(RecordError::ProvisioningFailed(_))
        ));
        wait_until("artifact deleted", || !location.exists());
    }

    #[test]
    fn appends_preserve_order_and_drain_before_finalize() {
        let (factory, log) = MockFactory::new();
        let (writer, rx) = prepared_writer("drain_order", factory);

        for i in 0..50 {
            writer.append(video_sample(33 * (i + 1)));
        }
        // Enqueued behind all fifty appends: finalize can only observe a
        // fully drained queue.
        writer.finish_recording();
        assert_eq!(recv(&rx), DelegateEvent::Finished);
        assert_eq!(writer.status(), WriterState::Finalized);

        let events = log.lock().events.clone();
        assert_eq!(
            events[0],
            SinkEvent::TimelineStarted(MediaTime::from_millis(33))
        );
        assert_eq!(events.last(), Some(&SinkEvent::Finalized));

        let appended: Vec<i64> = events
            .iter()
            .filter_map(|e| match e {
                SinkEvent::Appended(MediaType::Video, pts) => Some(pts.as_millis()),
                _ => None,
            })
            .collect();
        assert_eq!(appended, (1..=50).map(|i| 33 * i).collect::<Vec<_>>());
    }

    #[test]
    fn audio_does_not_start_the_timeline() {
        let (factory, log) = MockFactory::new();
        let (writer, rx) = prepared_writer("audio_first", factory);

        writer.append(audio_sample(10)); // dropped: no timeline yet
        writer.append(video_sample(33)); // starts the timeline
        writer.append(audio_sample(40));
        writer.finish_recording();
        assert_eq!(recv(&rx), DelegateEvent::Finished);

        let events = log.lock().events.clone();
        assert_eq!(
            events,
            vec![
                SinkEvent::TimelineStarted(MediaTime::from_millis(33)),
                SinkEvent::Appended(MediaType::Video, MediaTime::from_millis(33)),
                SinkEvent::Appended(MediaType::Audio, MediaTime::from_millis(40)),
                SinkEvent::Finalized,
            ]
        );
    }

    #[test]
    fn append_failure_fails_the_attempt_and_deletes_artifact() {
        let location = scratch_location("append_fail");
        fs::write(&location, b"partial artifact").unwrap();

        let (factory, log) = MockFactory::failing_append_at(2);
        let writer = WriterCoordinator::new(location.clone(), factory);
        writer.add_video_track(video_track());
        let (delegate, rx) = TestDelegate::channel();
        writer.set_delegate(delegate, SerialQueue::new("writer-callbacks"));
        writer.prepare();
        assert_eq!(recv(&rx), DelegateEvent::Prepared);

        for i in 0..5 {
            writer.append(video_sample(33 * (i + 1)));
        }
        match recv(&rx) {
            DelegateEvent::Failed(RecordError::AppendFailed(_)) => {}
            other => panic!("expected append failure, got {:?}", other),
        }
        assert_eq!(writer.status(), WriterState::Failed);
        assert!(matches!(writer.error(), Some(RecordError::AppendFailed(_))));
        wait_until("artifact deleted", || !location.exists());

        // Only the appends before the failure landed.
        let appended = log
            .lock()
            .events
            .iter()
            .filter(|e| matches!(e, SinkEvent::Appended(..)))
            .count();
        assert_eq!(appended, 2);

        // The caller may not have observed the failure yet; stopping is a
        // tolerated no-op rather than a contract violation.
        writer.finish_recording();
    }

    #[test]
    fn append_after_finalized_is_silently_dropped() {
        let (factory, log) = MockFactory::new();
        let (writer, rx) = prepared_writer("late_append", factory);

        writer.append(video_sample(33));
        writer.finish_recording();
        assert_eq!(recv(&rx), DelegateEvent::Finished);

        let before = log.lock().events.len();
        writer.append(video_sample(66));
        std::thread::sleep(Duration::from_millis(50));
        assert_eq!(log.lock().events.len(), before);
    }

    #[test]
    fn concurrent_producers_keep_per_type_order() {
        let (factory, log) = MockFactory::new();
        let (writer, rx) = prepared_writer("concurrent", factory);

        writer.append(video_sample(1)); // establish the timeline first

        let v = {
            let writer = writer.clone();
            std::thread::spawn(move || {
                for i in 0..100 {
                    writer.append(video_sample(2 + i));
                }
            })
        };
        let a = {
            let writer = writer.clone();
            std::thread::spawn(move || {
                for i in 0..100 {
                    writer.append(audio_sample(2 + i));
                }
            })
        };
        v.join().unwrap();
        a.join().unwrap();

        writer.finish_recording();
        assert_eq!(recv(&rx), DelegateEvent::Finished);

        let events = log.lock().events.clone();
        let video_pts: Vec<i64> = events
            .iter()
            .filter_map(|e| match e {
                SinkEvent::Appended(MediaType::Video, pts) => Some(pts.as_millis()),
                _ => None,
            })
            .collect();
        let audio_pts: Vec<i64> = events
            .iter()
            .filter_map(|e| match e {
                SinkEvent::Appended(MediaType::Audio, pts) => Some(pts.as_millis()),
                _ => None,
            })
            .collect();
        assert_eq!(video_pts, (1..=101).collect::<Vec<_>>());
        assert_eq!(audio_pts, (2..=101).collect::<Vec<_>>());
    }

    #[test]
    #[should_panic(expected = "not ready to record yet")]
    fn append_before_prepare_is_a_contract_violation() {
        let (factory, _log) = MockFactory::new();
        let writer = WriterCoordinator::new(scratch_location("early_append"), factory);
        writer.append(video_sample(0));
    }

    #[test]
    #[should_panic(expected = "cannot prepare again")]
    fn preparing_twice_is_a_contract_violation() {
        let (factory, _log) = MockFactory::new();
        let writer = WriterCoordinator::new(scratch_location("prepare_twice"), factory);
        writer.add_video_track(video_track());
        writer.prepare();
        writer.prepare();
    }

    #[test]
    #[should_panic(expected = "cannot add tracks while not idle")]
    fn adding_tracks_after_prepare_is_a_contract_violation() {
        let (factory, _log) = MockFactory::new();
        let writer = WriterCoordinator::new(scratch_location("late_track"), factory);
        writer.add_video_track(video_track());
        writer.prepare();
        writer.add_audio_track(audio_track());
    }

    #[test]
    #[should_panic(expected = "not recording")]
    fn finishing_while_idle_is_a_contract_violation() {
        let (factory, _log) = MockFactory::new();
        let writer = WriterCoordinator::new(scratch_location("early_finish"), factory);
        writer.finish_recording();
    }
}
