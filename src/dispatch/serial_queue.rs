use std::sync::mpsc;
use std::sync::Arc;
use std::thread;

use parking_lot::Mutex;

type Job = Box<dyn FnOnce() + Send + 'static>;

/// An ordered task queue backed by one dedicated named thread.
///
/// Jobs run in submission order, one at a time. Submission never blocks.
/// Handles are cheap to clone; the worker thread shuts down once the last
/// handle is dropped and the backlog has run out.
///
/// This is the crate's rendition of a serial dispatch queue: the writer
/// coordinator uses one to serialize every sink mutation, and every delegate
/// registration supplies one as its ordered callback channel.
pub struct SerialQueue {
    tx: mpsc::Sender<Job>,
    worker: Arc<Worker>,
}

struct Worker {
    handle: Mutex<Option<thread::JoinHandle<()>>>,
}

impl SerialQueue {
    pub fn new(name: &str) -> Self {
        let (tx, rx) = mpsc::channel::<Job>();
        let handle = thread::Builder::new()
            .name(name.to_string())
            .spawn(move || {
                while let Ok(job) = rx.recv() {
                    job();
                }
            })
            .expect("failed to spawn serial queue thread");

        Self {
            tx,
            worker: Arc::new(Worker {
                handle: Mutex::new(Some(handle)),
            }),
        }
    }

    /// Enqueue a job behind everything submitted before it.
    pub fn enqueue(&self, job: impl FnOnce() + Send + 'static) {
        if self.tx.send(Box::new(job)).is_err() {
            // Only possible if the worker thread panicked.
            log::warn!("serial queue worker is gone, dropping task");
        }
    }
}

impl Clone for SerialQueue {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
            worker: Arc::clone(&self.worker),
        }
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        // All senders are gone by the time the last handle drops, so the
        // worker exits after draining the backlog. Joining from the worker
        // thread itself would deadlock; detach in that case.
        if let Some(handle) = self.handle.lock().take() {
            if handle.thread().id() != thread::current().id() {
                let _ = handle.join();
            }
        }
    }
}
