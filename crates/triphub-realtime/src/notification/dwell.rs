//! Auto-read dwell timer.
//!
//! When the unfiltered notification list stays on screen for the dwell
//! duration, everything unread is marked read: "the admin has seen
//! them". The timer is keyed off the view being active, not off list
//! mutation, so a re-render never re-arms it, and deactivating the view
//! before it fires cancels the pending mark.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::service::NotificationService;

/// A view-active scoped timer that marks all notifications read after a
/// sustained dwell.
#[derive(Debug)]
pub struct DwellTimer {
    dwell: Duration,
    /// Token for the currently armed timer, if any.
    armed: Mutex<Option<CancellationToken>>,
}

impl DwellTimer {
    /// Creates a timer with the given dwell duration.
    pub fn new(dwell: Duration) -> Self {
        Self {
            dwell,
            armed: Mutex::new(None),
        }
    }

    /// Arms the timer: the view showing the unfiltered list became
    /// active. Re-arming while already armed is a no-op, so repeated
    /// render passes cannot extend or restart the dwell.
    pub fn view_activated(&self, service: Arc<NotificationService>) {
        let mut armed = self.armed.lock().unwrap_or_else(|e| e.into_inner());
        if armed.is_some() {
            return;
        }

        let token = CancellationToken::new();
        *armed = Some(token.clone());
        let dwell = self.dwell;

        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {
                    debug!("Auto-read dwell cancelled before firing");
                }
                _ = tokio::time::sleep(dwell) => {
                    if let Err(e) = service.mark_all_read().await {
                        // The service already surfaced a toast; the list
                        // is untouched.
                        warn!(error = %e, "Auto-read mark-all failed");
                    } else {
                        debug!("Auto-read dwell fired");
                    }
                }
            }
        });
    }

    /// Disarms the timer: the view went inactive or unmounted. Nothing is
    /// marked read after this point.
    pub fn view_deactivated(&self) {
        if let Some(token) = self
            .armed
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take()
        {
            token.cancel();
        }
    }
}

impl Drop for DwellTimer {
    fn drop(&mut self) {
        self.view_deactivated();
    }
}
