//! Background year-rollover check.
//!
//! A thread that periodically asks a shared tracker to roll its goal over,
//! so a long-running process archives the old year without a restart.

use std::sync::mpsc::{channel, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::config::TrackerConfig;
use crate::persistence::SlotStore;
use crate::tracker::{SharedTracker, SharedTrackerExt};

/// Statistics from the rollover worker.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RolloverStats {
    pub polls: usize,
    pub rollovers: usize,
    pub failures: usize,
}

/// A background thread that checks for a new year every `poll_interval`.
///
/// The rollover runs under the tracker's write lock, so readers see either
/// the old goal or the new one.
///
/// ## Example
///
/// ```ignore
/// use book_tracker::{BookTracker, InMemorySlotStore, RolloverWorkerThread};
/// use std::time::Duration;
///
/// let tracker = BookTracker::open(InMemorySlotStore::new())?.into_shared();
/// let worker = RolloverWorkerThread::spawn(tracker.clone(), Duration::from_secs(86_400));
///
/// // ... use tracker ...
///
/// let stats = worker.stop();
/// println!("{} rollovers", stats.rollovers);
/// ```
pub struct RolloverWorkerThread {
    stop_tx: Sender<()>,
    handle: Option<JoinHandle<RolloverStats>>,
}

impl RolloverWorkerThread {
    /// Spawn the worker. The first check runs immediately.
    pub fn spawn<S>(tracker: SharedTracker<S>, poll_interval: Duration) -> Self
    where
        S: SlotStore + 'static,
    {
        Self::spawn_with_name(tracker, poll_interval, "rollover-worker")
    }

    /// Spawn the worker using the configured check interval.
    pub fn from_config<S>(tracker: SharedTracker<S>, config: &TrackerConfig) -> Self
    where
        S: SlotStore + 'static,
    {
        Self::spawn(tracker, config.rollover_interval())
    }

    /// Spawn the worker on a thread with a custom name.
    pub fn spawn_with_name<S>(tracker: SharedTracker<S>, poll_interval: Duration, name: &str) -> Self
    where
        S: SlotStore + 'static,
    {
        let (stop_tx, stop_rx) = channel();
        let name = name.to_string();

        let handle = thread::spawn(move || {
            let mut stats = RolloverStats::default();
            let interval_secs = poll_interval.as_secs_f64();
            debug!(worker = %name, interval_secs, "rollover worker started");

            loop {
                stats.polls += 1;

                match tracker.write_tracker() {
                    Ok(mut tracker) => match tracker.advance_year_if_needed() {
                        Ok(Some(archived)) => {
                            stats.rollovers += 1;
                            info!(worker = %name, year = archived.year, "rolled over reading goal");
                        }
                        Ok(None) => {}
                        Err(err) => {
                            stats.failures += 1;
                            warn!(worker = %name, error = %err, "rollover failed to persist");
                        }
                    },
                    Err(err) => {
                        stats.failures += 1;
                        warn!(worker = %name, error = %err, "stopping rollover worker");
                        break;
                    }
                }

                match stop_rx.recv_timeout(poll_interval) {
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    Err(RecvTimeoutError::Timeout) => {}
                }
            }

            debug!(worker = %name, polls = stats.polls, "rollover worker stopped");
            stats
        });

        Self {
            stop_tx,
            handle: Some(handle),
        }
    }

    /// Signal the worker to stop and wait for it to finish.
    /// Returns the worker statistics.
    pub fn stop(mut self) -> RolloverStats {
        let _ = self.stop_tx.send(());
        if let Some(handle) = self.handle.take() {
            handle.join().unwrap_or_default()
        } else {
            RolloverStats::default()
        }
    }

    /// Signal the worker to stop without waiting.
    pub fn signal_stop(&self) {
        let _ = self.stop_tx.send(());
    }
}

impl Drop for RolloverWorkerThread {
    fn drop(&mut self) {
        let _ = self.stop_tx.send(());
    }
}
