use crate::shared::EventLog;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

pub(crate) const CLEANUP_POLL_MS: u64 = 50;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanupStats {
    pub deleted: usize,
    pub failed: usize,
}

#[derive(Debug, Default)]
struct CleanupCounters {
    pending: AtomicUsize,
    deleted: AtomicUsize,
    failed: AtomicUsize,
}

impl CleanupCounters {
    fn snapshot(&self) -> CleanupStats {
        CleanupStats {
            deleted: self.deleted.load(Ordering::SeqCst),
            failed: self.failed.load(Ordering::SeqCst),
        }
    }
}

/// Producer side of the deferred-deletion queue. Cloneable; enqueueing never
/// blocks and the queue is unbounded.
#[derive(Debug, Clone)]
pub struct CleanupQueue {
    sender: Sender<PathBuf>,
    counters: Arc<CleanupCounters>,
}

impl CleanupQueue {
    /// Ownership of the path passes to the worker. Returns false once the
    /// worker has gone away.
    pub fn enqueue(&self, path: PathBuf) -> bool {
        self.counters.pending.fetch_add(1, Ordering::SeqCst);
        if self.sender.send(path).is_err() {
            self.counters.pending.fetch_sub(1, Ordering::SeqCst);
            return false;
        }
        true
    }

    pub fn pending(&self) -> usize {
        self.counters.pending.load(Ordering::SeqCst)
    }

    /// Polls until every enqueued path has been handled or `timeout` elapses.
    pub fn wait_until_drained(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.pending() > 0 {
            if Instant::now() >= deadline {
                return false;
            }
            thread::sleep(Duration::from_millis(5));
        }
        true
    }
}

/// Handle to the single background thread deleting queued directories.
#[derive(Debug)]
pub struct CleanupWorker {
    stop: Arc<AtomicBool>,
    counters: Arc<CleanupCounters>,
    handle: Option<JoinHandle<()>>,
}

impl CleanupWorker {
    pub fn spawn(log: EventLog) -> (CleanupQueue, CleanupWorker) {
        let (sender, receiver) = mpsc::channel::<PathBuf>();
        let stop = Arc::new(AtomicBool::new(false));
        let counters = Arc::new(CleanupCounters::default());

        let stop_flag = stop.clone();
        let worker_counters = counters.clone();
        let handle = thread::spawn(move || {
            run_cleanup_loop(receiver, &stop_flag, &worker_counters, &log);
        });

        (
            CleanupQueue {
                sender,
                counters: counters.clone(),
            },
            CleanupWorker {
                stop,
                counters,
                handle: Some(handle),
            },
        )
    }

    /// Signals the worker to stop after the item in hand; queued paths that
    /// were not reached are abandoned.
    pub fn stop(mut self) -> CleanupStats {
        self.stop.store(true, Ordering::Relaxed);
        self.join_thread();
        self.counters.snapshot()
    }

    /// Waits until every `CleanupQueue` handle is dropped, deleting all
    /// queued paths first.
    pub fn join(mut self) -> CleanupStats {
        self.join_thread();
        self.counters.snapshot()
    }

    fn join_thread(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for CleanupWorker {
    fn drop(&mut self) {
        if self.handle.is_some() {
            self.stop.store(true, Ordering::Relaxed);
            self.join_thread();
        }
    }
}

fn run_cleanup_loop(
    receiver: Receiver<PathBuf>,
    stop: &AtomicBool,
    counters: &CleanupCounters,
    log: &EventLog,
) {
    while !stop.load(Ordering::Relaxed) {
        match receiver.recv_timeout(Duration::from_millis(CLEANUP_POLL_MS)) {
            Ok(path) => {
                match delete_directory(&path) {
                    Ok(()) => {
                        counters.deleted.fetch_add(1, Ordering::SeqCst);
                        log.info("cleanup.delete", &format!("deleted {}", path.display()));
                    }
                    Err(err) => {
                        counters.failed.fetch_add(1, Ordering::SeqCst);
                        log.error(
                            "cleanup.delete.failed",
                            &format!("error while deleting {}: {err}", path.display()),
                        );
                    }
                }
                counters.pending.fetch_sub(1, Ordering::SeqCst);
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }
    log.info("cleanup.stopped", "cleanup worker stopped");
}

pub fn delete_directory(path: &Path) -> std::io::Result<()> {
    fs::remove_dir_all(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn stop_signal_ends_an_idle_worker() {
        let (queue, worker) = CleanupWorker::spawn(EventLog::disabled());
        let stats = worker.stop();
        assert_eq!(stats, CleanupStats::default());
        assert!(!queue.enqueue(PathBuf::from("/nonexistent")));
        assert_eq!(queue.pending(), 0);
    }

    #[test]
    fn join_drains_queue_after_producers_drop() {
        let dir = tempdir().expect("tempdir");
        let first = dir.path().join("first");
        let second = dir.path().join("second/nested");
        fs::create_dir_all(&first).expect("first");
        fs::create_dir_all(&second).expect("second");

        let (queue, worker) = CleanupWorker::spawn(EventLog::disabled());
        assert!(queue.enqueue(first.clone()));
        assert!(queue.enqueue(dir.path().join("second")));
        drop(queue);

        let stats = worker.join();
        assert_eq!(stats.deleted, 2);
        assert!(!first.exists());
        assert!(!second.exists());
    }
}
