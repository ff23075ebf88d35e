//! Progress reporting state machine
//!
//! Reports playback start/heartbeat/stop to the remote media service
//! and mirrors final progress into the local watch-state store. The
//! machine has two states: Idle (no bound item) and Active (bound to
//! exactly one item id). A 5 second heartbeat interval is armed only
//! while Active, so cancellation is tied to the state machine rather
//! than a free-running timer.
//!
//! Report ordering per item is guaranteed by the owning session's
//! serialized execution: start always precedes any heartbeat, and the
//! interval is disarmed strictly before the stop report is sent, so no
//! heartbeat can race past a stop.

use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};
use tracing::{debug, warn};
use vireo_core::ticks::ms_to_ticks;
use vireo_core::traits::{MediaServer, WatchStateStore};
use vireo_core::types::{ItemId, WatchProgress};

/// Fixed heartbeat period while Active
pub const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(5);

/// Played fraction at which an item is marked watched locally
pub const WATCHED_THRESHOLD: f64 = 0.90;

/// Start/heartbeat/stop reporting for one playback session.
///
/// The reporter continuously tracks the last known position, duration
/// and pause state through [`ProgressReporter::observe`]; heartbeats
/// and stop reports always use the most recently observed values, never
/// values captured when the binding was created.
pub struct ProgressReporter {
    server: Arc<dyn MediaServer>,
    watch_store: Arc<dyn WatchStateStore>,
    active: Option<ItemId>,
    heartbeat: Option<Interval>,
    last_position_ms: u64,
    last_duration_ms: u64,
    paused: bool,
}

impl ProgressReporter {
    /// Create an idle reporter
    pub fn new(server: Arc<dyn MediaServer>, watch_store: Arc<dyn WatchStateStore>) -> Self {
        Self {
            server,
            watch_store,
            active: None,
            heartbeat: None,
            last_position_ms: 0,
            last_duration_ms: 0,
            paused: true,
        }
    }

    /// The currently bound item, if Active
    pub fn active_item(&self) -> Option<&ItemId> {
        self.active.as_ref()
    }

    /// Whether the reporter is Active
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Record the latest playback observation.
    ///
    /// Called by the session for every snapshot it derives, independent
    /// of the heartbeat timer.
    pub fn observe(&mut self, position_ms: u64, duration_ms: u64, is_playing: bool) {
        self.last_position_ms = position_ms;
        self.last_duration_ms = duration_ms;
        self.paused = !is_playing;
    }

    /// Bind the reporter to an item, entering Active.
    ///
    /// Rebinding the item that is already Active is a no-op: no report
    /// is emitted and the heartbeat keeps its cadence. Binding a
    /// different item while Active runs the full stop sequence for the
    /// old item first.
    pub async fn bind(&mut self, item_id: ItemId) {
        if self.active.as_ref() == Some(&item_id) {
            return;
        }
        if self.active.is_some() {
            self.unbind().await;
        }

        debug!(item = %item_id, position_ms = self.last_position_ms, "playback session started");
        let ticks = ms_to_ticks(self.last_position_ms);
        if let Err(e) = self.server.report_playback_start(&item_id, ticks).await {
            warn!(item = %item_id, "failed to report playback start: {e}");
        }

        self.active = Some(item_id);
        let mut heartbeat = interval_at(Instant::now() + HEARTBEAT_INTERVAL, HEARTBEAT_INTERVAL);
        heartbeat.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.heartbeat = Some(heartbeat);
    }

    /// Unbind the current item, returning to Idle.
    ///
    /// In order: the heartbeat is disarmed, the stop report is sent
    /// with the last known position, and the local watch-state mirror
    /// is written in the background. A failed local write never
    /// prevents a new binding from starting.
    pub async fn unbind(&mut self) {
        let Some(item_id) = self.active.take() else {
            return;
        };

        // disarm before the stop report so no heartbeat can race past it
        self.heartbeat = None;

        let position_ms = self.last_position_ms;
        let duration_ms = self.last_duration_ms;

        debug!(item = %item_id, position_ms, "playback session stopped");
        if let Err(e) = self
            .server
            .report_playback_stopped(&item_id, ms_to_ticks(position_ms))
            .await
        {
            warn!(item = %item_id, "failed to report playback stop: {e}");
        }

        let store = Arc::clone(&self.watch_store);
        tokio::spawn(async move {
            let played =
                duration_ms > 0 && position_ms as f64 / duration_ms as f64 >= WATCHED_THRESHOLD;
            let progress = WatchProgress {
                item_id: item_id.clone(),
                position_ms,
                duration_ms,
                played,
            };
            if let Err(e) = store.upsert(&progress).await {
                warn!(item = %item_id, "failed to persist watch progress: {e}");
            }
        });
    }

    /// Emit one heartbeat with the latest observed position.
    ///
    /// No-op while Idle. Failures are logged and dropped; the same
    /// position is effectively retried on the next tick.
    pub async fn tick(&mut self) {
        let Some(item_id) = self.active.clone() else {
            return;
        };

        let ticks = ms_to_ticks(self.last_position_ms);
        if let Err(e) = self
            .server
            .report_playback_progress(&item_id, ticks, self.paused)
            .await
        {
            warn!(item = %item_id, "failed to report playback progress: {e}");
        }
    }

    /// Await the next heartbeat tick; pends forever while Idle.
    ///
    /// Intended as a `tokio::select!` arm in the session's actor loop.
    pub async fn heartbeat_tick(&mut self) {
        match self.heartbeat.as_mut() {
            Some(heartbeat) => {
                heartbeat.tick().await;
            }
            None => std::future::pending::<()>().await,
        }
    }
}

impl std::fmt::Debug for ProgressReporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressReporter")
            .field("active", &self.active)
            .field("last_position_ms", &self.last_position_ms)
            .field("paused", &self.paused)
            .finish()
    }
}
