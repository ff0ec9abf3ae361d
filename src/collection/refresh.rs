//! Background refresh scheduling.
//!
//! Every collection with a refresh interval owns one [`Refresher`] thread.
//! The thread wakes once per interval and asks its collection to refresh if
//! writes are pending. It holds only a weak reference, so it never keeps a
//! dropped collection alive.

use std::sync::Weak;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{RecvTimeoutError, Sender, bounded};
use log::{debug, warn};

use crate::error::Result;

/// Something that can be refreshed from a background thread.
pub trait BackgroundRefresh: Send + Sync {
    /// Refresh if writes are pending and no refresh happened within
    /// `interval`. Returns the new generation when a refresh ran.
    fn refresh_if_due(&self, interval: Duration) -> Result<Option<u64>>;

    /// Name used for the thread and in log messages.
    fn name(&self) -> &str;
}

/// Handle to a running background refresh thread.
///
/// Dropping the handle stops the thread and waits for it to exit.
#[derive(Debug)]
pub struct Refresher {
    interval: Duration,
    shutdown: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl Refresher {
    /// Start a refresh thread for `target`.
    pub fn spawn(target: Weak<dyn BackgroundRefresh>, interval: Duration) -> Result<Self> {
        let name = match target.upgrade() {
            Some(target) => format!("pilum-refresh-{}", target.name()),
            None => "pilum-refresh".to_string(),
        };
        let (shutdown, shutdown_rx) = bounded::<()>(1);

        let handle = thread::Builder::new().name(name).spawn(move || {
            loop {
                match shutdown_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {}
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }

                let Some(target) = target.upgrade() else {
                    break;
                };
                match target.refresh_if_due(interval) {
                    Ok(Some(generation)) => {
                        debug!(
                            "background refresh of '{}' published generation {generation}",
                            target.name()
                        );
                    }
                    Ok(None) => {}
                    Err(e) => warn!("background refresh of '{}' failed: {e}", target.name()),
                }
            }
        })?;

        Ok(Refresher {
            interval,
            shutdown: Some(shutdown),
            handle: Some(handle),
        })
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Stop the thread and wait for it. Calling this twice is a no-op.
    pub fn stop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.try_send(());
        }
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("background refresh thread panicked");
            }
        }
    }
}

impl Drop for Refresher {
    fn drop(&mut self) {
        self.stop();
    }
}
