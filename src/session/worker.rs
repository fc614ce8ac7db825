//! Snapshot worker thread
//!
//! Recomputes snapshots off the caller's thread. The caller submits
//! [`SnapshotRequest`]s through a [`SnapshotHandle`]; the worker blocks for the
//! next request, then drains everything else already queued and only builds
//! the newest one. Older requests are dropped without being computed.
//!
//! ```text
//! handle.submit(r1) ─┐
//! handle.submit(r2) ─┼─> [queue] ──> worker: recv r1, drain r2 r3, build r3
//! handle.submit(r3) ─┘                           │
//! handle.poll()  <─── Snapshot(rev 3) <──────────┘
//! ```
//!
//! Revisions only increase, so the handle discards anything older than what it
//! already holds.

use crate::error::{HierScopeError, Result};
use crate::pipeline::{FilterConfig, Snapshot};
use crate::types::RawRecord;
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

/// Inputs for one pipeline run
#[derive(Debug, Clone)]
pub struct SnapshotRequest {
    pub revision: u64,
    pub records: Arc<Vec<RawRecord>>,
    pub filter: FilterConfig,
}

/// Commands sent to the worker
#[derive(Debug, Clone)]
pub enum WorkerCommand {
    /// Build a snapshot for these inputs
    Rebuild(SnapshotRequest),
    /// Stop the worker once the newest queued request is built
    Shutdown,
}

/// Messages sent back by the worker
#[derive(Debug, Clone)]
pub enum WorkerMessage {
    /// A finished snapshot
    Snapshot(Arc<Snapshot>),
    /// The worker loop has exited
    Stopped,
}

/// The worker side: owns the command receiver and runs the build loop
pub struct SnapshotWorker {
    command_rx: Receiver<WorkerCommand>,
    message_tx: Sender<WorkerMessage>,
    /// Snapshots built so far
    built: usize,
    /// Requests dropped because a newer one was queued
    superseded: usize,
}

impl SnapshotWorker {
    /// Create a worker and the handle that talks to it. The worker does not
    /// run until [`SnapshotWorker::run`] is called.
    pub fn new() -> (Self, SnapshotHandle) {
        let (command_tx, command_rx) = crossbeam_channel::unbounded();
        let (message_tx, message_rx) = crossbeam_channel::unbounded();

        let worker = Self {
            command_rx,
            message_tx,
            built: 0,
            superseded: 0,
        };
        let handle = SnapshotHandle {
            command_tx,
            message_rx,
            next_revision: 1,
            latest: None,
        };
        (worker, handle)
    }

    /// Spawn the worker on its own thread. The join handle yields the number of
    /// snapshots built.
    pub fn spawn() -> Result<(SnapshotHandle, JoinHandle<usize>)> {
        let (worker, handle) = Self::new();
        let join = std::thread::Builder::new()
            .name("hierscope-snapshot".to_string())
            .spawn(move || worker.run())?;
        Ok((handle, join))
    }

    /// Run the build loop until shutdown or until the handle is dropped.
    pub fn run(mut self) -> usize {
        tracing::info!("Snapshot worker started");

        while let Ok(command) = self.command_rx.recv() {
            let (request, stop) = self.newest_request(command);
            let Some(request) = request else {
                break;
            };

            let snapshot = Snapshot::build(&request.records, &request.filter, request.revision);
            self.built += 1;
            if self
                .message_tx
                .send(WorkerMessage::Snapshot(Arc::new(snapshot)))
                .is_err()
                || stop
            {
                break;
            }
        }

        let _ = self.message_tx.send(WorkerMessage::Stopped);
        tracing::info!(
            built = self.built,
            superseded = self.superseded,
            "Snapshot worker stopped"
        );
        self.built
    }

    /// Drain the queue behind `first`. Returns the request to build and
    /// whether a shutdown was queued behind it.
    fn newest_request(&mut self, first: WorkerCommand) -> (Option<SnapshotRequest>, bool) {
        let mut newest = match first {
            WorkerCommand::Rebuild(request) => request,
            WorkerCommand::Shutdown => return (None, true),
        };

        loop {
            match self.command_rx.try_recv() {
                Ok(WorkerCommand::Rebuild(request)) => {
                    self.superseded += 1;
                    tracing::debug!(
                        "Request {} superseded by {}",
                        newest.revision,
                        request.revision
                    );
                    newest = request;
                }
                Ok(WorkerCommand::Shutdown) => return (Some(newest), true),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        (Some(newest), false)
    }
}

/// Caller-side handle for submitting requests and receiving snapshots
pub struct SnapshotHandle {
    command_tx: Sender<WorkerCommand>,
    message_rx: Receiver<WorkerMessage>,
    next_revision: u64,
    latest: Option<Arc<Snapshot>>,
}

impl SnapshotHandle {
    /// Queue a rebuild with the next revision number; returns that revision.
    pub fn request(&mut self, records: Arc<Vec<RawRecord>>, filter: FilterConfig) -> Result<u64> {
        let revision = self.next_revision;
        self.submit(SnapshotRequest {
            revision,
            records,
            filter,
        })?;
        Ok(revision)
    }

    /// Queue a prepared request. Later revisions must be larger.
    pub fn submit(&mut self, request: SnapshotRequest) -> Result<()> {
        self.next_revision = self.next_revision.max(request.revision + 1);
        self.command_tx
            .send(WorkerCommand::Rebuild(request))
            .map_err(|_| HierScopeError::Channel("snapshot worker has stopped".to_string()))
    }

    /// Take any finished snapshots; returns the newest one if it is newer than
    /// the last one seen.
    pub fn poll(&mut self) -> Option<Arc<Snapshot>> {
        let mut fresh = None;
        while let Ok(message) = self.message_rx.try_recv() {
            if let WorkerMessage::Snapshot(snapshot) = message {
                if self.accept(&snapshot) {
                    fresh = Some(snapshot);
                }
            }
        }
        fresh
    }

    /// Block until a snapshot with at least `revision` arrives.
    pub fn wait_for(&mut self, revision: u64, timeout: Duration) -> Result<Arc<Snapshot>> {
        if let Some(latest) = self.latest.as_ref().filter(|s| s.revision >= revision) {
            return Ok(Arc::clone(latest));
        }

        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.message_rx.recv_timeout(remaining) {
                Ok(WorkerMessage::Snapshot(snapshot)) => {
                    self.accept(&snapshot);
                    if snapshot.revision >= revision {
                        return Ok(snapshot);
                    }
                }
                Ok(WorkerMessage::Stopped) | Err(RecvTimeoutError::Disconnected) => {
                    return Err(HierScopeError::Channel(
                        "snapshot worker stopped before delivering".to_string(),
                    ));
                }
                Err(RecvTimeoutError::Timeout) => {
                    return Err(HierScopeError::Channel(format!(
                        "timed out waiting for snapshot revision {}",
                        revision
                    )));
                }
            }
        }
    }

    /// Newest snapshot received so far
    pub fn latest(&self) -> Option<&Arc<Snapshot>> {
        self.latest.as_ref()
    }

    /// Ask the worker to stop
    pub fn shutdown(&self) {
        let _ = self.command_tx.send(WorkerCommand::Shutdown);
    }

    fn accept(&mut self, snapshot: &Arc<Snapshot>) -> bool {
        let newer = self
            .latest
            .as_ref()
            .map_or(true, |current| snapshot.revision > current.revision);
        if newer {
            self.latest = Some(Arc::clone(snapshot));
        } else {
            tracing::debug!("Ignoring stale snapshot revision {}", snapshot.revision);
        }
        newer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records() -> Arc<Vec<RawRecord>> {
        Arc::new(vec![
            RawRecord::new("top/a", "top/b").with_connections(3).with_slack(-1.0, -2.0),
            RawRecord::new("top/a", "top/c").with_connections(1).with_slack(-4.0, -4.0),
        ])
    }

    #[test]
    fn test_only_newest_request_is_built() {
        let (worker, mut handle) = SnapshotWorker::new();
        let records = records();

        handle.request(Arc::clone(&records), FilterConfig::default()).unwrap();
        handle
            .request(Arc::clone(&records), FilterConfig::default().with_min_connections(2.0))
            .unwrap();
        let last = handle
            .request(Arc::clone(&records), FilterConfig::default().with_max_wns(-2.0))
            .unwrap();
        handle.shutdown();

        // Everything is queued before the loop starts
        let built = worker.run();
        assert_eq!(built, 1);

        let snapshot = handle.wait_for(last, Duration::from_secs(1)).unwrap();
        assert_eq!(snapshot.revision, 3);
        assert_eq!(snapshot.filtered_count, 1);
    }

    #[test]
    fn test_stale_snapshots_ignored() {
        let (_worker, mut handle) = SnapshotWorker::new();
        let newer = Arc::new(Snapshot::build(&records(), &FilterConfig::default(), 5));
        let older = Arc::new(Snapshot::build(&records(), &FilterConfig::default(), 4));

        assert!(handle.accept(&newer));
        assert!(!handle.accept(&older));
        assert_eq!(handle.latest().map(|s| s.revision), Some(5));
    }

    #[test]
    fn test_spawned_worker_round_trip() {
        let (mut handle, join) = SnapshotWorker::spawn().unwrap();
        let revision = handle.request(records(), FilterConfig::default()).unwrap();
        let snapshot = handle.wait_for(revision, Duration::from_secs(5)).unwrap();
        assert_eq!(snapshot.model.edge_count(), 2);

        handle.shutdown();
        assert!(join.join().unwrap() >= 1);
    }

    #[test]
    fn test_submit_after_stop_fails() {
        let (worker, mut handle) = SnapshotWorker::new();
        drop(worker);
        let err = handle.request(records(), FilterConfig::default()).unwrap_err();
        assert!(matches!(err, HierScopeError::Channel(_)));
    }
}
