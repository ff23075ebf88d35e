//! Playback session orchestration
//!
//! The session manager owns the playback engine for the lifetime of a
//! session and is the single writer of every published snapshot. It
//! runs as one actor task: engine events, presentation-layer commands
//! and completed background work all arrive over channels and are
//! folded into state sequentially, so no mutation can interleave with
//! another (in particular the clear-override → set-override → re-map
//! sequence of a track selection).
//!
//! Network side effects (progress reports, preference load/save,
//! next-up prefetch, resume lookup) run in spawned tasks and post their
//! results back onto the actor channel tagged with the listing
//! generation or item id they were computed for; results that arrive
//! after the world moved on are dropped, and once the session is
//! released the channel is gone and in-flight results simply evaporate.

use crate::engine::{PlayerEngine, TrackKind, TrackSelectionUpdate};
use crate::error::{PlaybackError, Result};
use crate::events::EngineEvent;
use crate::matcher::{find_best_audio_match, find_best_subtitle_match};
use crate::reporter::ProgressReporter;
use crate::tracks::{map_tracks, TrackOption, TrackSelectionState};
use crate::types::{
    MediaContext, NowPlayingMetadata, PlayableItem, PlaybackProgress, PlaybackStateSnapshot,
    QueueItem,
};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use vireo_core::traits::{MediaServer, PreferenceStore, WatchStateStore};
use vireo_core::types::{
    AudioTrackProperties, EpisodeSummary, ItemId, SubtitleTrackProperties, TrackPreferences,
};

/// A resolved resume position is only applied while playback is still
/// this close to the start; after that the user has already taken over.
const RESUME_APPLY_CUTOFF_MS: u64 = 5_000;

/// Configuration for a playback session
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Maximum number of upcoming items the next-up prefetch keeps
    /// queued behind the current one
    pub next_up_window: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { next_up_window: 3 }
    }
}

/// Commands accepted by the session actor
enum SessionCommand {
    Play { item: PlayableItem, context: MediaContext },
    AddToQueue(PlayableItem),
    TogglePlayPause,
    SeekTo(u64),
    SeekBy(i64),
    SeekToLiveEdge,
    Next,
    Previous,
    SelectTrack(TrackOption),
    PlayQueueItem(ItemId),
    Retry,
    ClearError,
    Release,
}

/// Everything that can wake the actor
enum SessionMsg {
    Command(SessionCommand),
    PreferencesLoaded {
        generation: u64,
        preferences: TrackPreferences,
    },
    ResumeResolved {
        item_id: ItemId,
        resume_ms: u64,
    },
    NextUpFetched {
        after: ItemId,
        items: Vec<PlayableItem>,
    },
}

/// Public handle to a running playback session.
///
/// Commands may be called from any task or thread; they are marshaled
/// onto the session's actor task and never block. Snapshots are
/// exposed as `watch` receivers the presentation layer subscribes to.
pub struct SessionManager {
    msg_tx: mpsc::UnboundedSender<SessionMsg>,
    playback_state: watch::Receiver<PlaybackStateSnapshot>,
    progress: watch::Receiver<PlaybackProgress>,
    metadata: watch::Receiver<NowPlayingMetadata>,
    track_state: watch::Receiver<TrackSelectionState>,
    queue: watch::Receiver<Vec<QueueItem>>,
    task: Option<JoinHandle<()>>,
}

impl SessionManager {
    /// Start a session over the given engine and collaborators.
    ///
    /// Claims the engine's event stream and spawns the actor task.
    pub fn new(
        mut engine: Box<dyn PlayerEngine>,
        server: Arc<dyn MediaServer>,
        preferences: Arc<dyn PreferenceStore>,
        watch_state: Arc<dyn WatchStateStore>,
        config: SessionConfig,
    ) -> Result<Self> {
        let engine_rx = engine
            .take_event_receiver()
            .ok_or(PlaybackError::EngineEventsClaimed)?;

        let (msg_tx, msg_rx) = mpsc::unbounded_channel();
        let (state_tx, playback_state) = watch::channel(PlaybackStateSnapshot::default());
        let (progress_tx, progress) = watch::channel(PlaybackProgress::default());
        let (metadata_tx, metadata) = watch::channel(NowPlayingMetadata::default());
        let (tracks_tx, track_state) = watch::channel(TrackSelectionState::default());
        let (queue_tx, queue) = watch::channel(Vec::new());

        let reporter = ProgressReporter::new(Arc::clone(&server), watch_state);
        let actor = SessionActor {
            engine,
            server,
            preferences,
            reporter,
            msg_tx: msg_tx.clone(),
            config,
            context: None,
            current_media: None,
            track_state: TrackSelectionState::default(),
            generation: 0,
            last_prefetched_for: None,
            state_tx,
            progress_tx,
            metadata_tx,
            tracks_tx,
            queue_tx,
        };
        let task = tokio::spawn(actor.run(msg_rx, engine_rx));

        Ok(Self {
            msg_tx,
            playback_state,
            progress,
            metadata,
            track_state,
            queue,
            task: Some(task),
        })
    }

    fn send(&self, command: SessionCommand) {
        if self.msg_tx.send(SessionMsg::Command(command)).is_err() {
            warn!("playback session is no longer running, command dropped");
        }
    }

    /// Bind a new media item and context and start playing it
    pub fn play(&self, item: PlayableItem, context: MediaContext) {
        self.send(SessionCommand::Play { item, context });
    }

    /// Append an item to the play queue
    pub fn add_to_queue(&self, item: PlayableItem) {
        self.send(SessionCommand::AddToQueue(item));
    }

    /// Toggle between playing and paused
    pub fn toggle_play_pause(&self) {
        self.send(SessionCommand::TogglePlayPause);
    }

    /// Seek to an absolute position in the current item
    pub fn seek_to(&self, position_ms: u64) {
        self.send(SessionCommand::SeekTo(position_ms));
    }

    /// Seek relative to the current position; the target is clamped to
    /// zero
    pub fn seek_by(&self, delta_ms: i64) {
        self.send(SessionCommand::SeekBy(delta_ms));
    }

    /// Jump to the live edge; no-op unless the current item is live
    pub fn seek_to_live_edge(&self) {
        self.send(SessionCommand::SeekToLiveEdge);
    }

    /// Advance to the next queue item; no-op when there is none
    pub fn next(&self) {
        self.send(SessionCommand::Next);
    }

    /// Return to the previous queue item; no-op when there is none
    pub fn previous(&self) {
        self.send(SessionCommand::Previous);
    }

    /// Select a track from the published selection state
    pub fn select_track(&self, option: TrackOption) {
        self.send(SessionCommand::SelectTrack(option));
    }

    /// Jump to a queue item by id; no-op when the id is not queued
    pub fn play_queue_item(&self, id: ItemId) {
        self.send(SessionCommand::PlayQueueItem(id));
    }

    /// Recover from a surfaced playback error: clear it, re-prepare
    /// the engine and resume play-on-ready
    pub fn retry(&self) {
        self.send(SessionCommand::Retry);
    }

    /// Clear the published error without touching engine state
    pub fn clear_error(&self) {
        self.send(SessionCommand::ClearError);
    }

    /// Stop reporting, release the engine and end the actor task
    pub async fn release(&mut self) {
        self.send(SessionCommand::Release);
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!("session task ended abnormally: {e}");
            }
        }
    }

    /// Subscribe to playback state snapshots
    pub fn playback_state(&self) -> watch::Receiver<PlaybackStateSnapshot> {
        self.playback_state.clone()
    }

    /// Subscribe to playback progress snapshots
    pub fn progress(&self) -> watch::Receiver<PlaybackProgress> {
        self.progress.clone()
    }

    /// Subscribe to now-playing metadata
    pub fn metadata(&self) -> watch::Receiver<NowPlayingMetadata> {
        self.metadata.clone()
    }

    /// Subscribe to the mapped track selection state
    pub fn track_state(&self) -> watch::Receiver<TrackSelectionState> {
        self.track_state.clone()
    }

    /// Subscribe to the queue snapshot
    pub fn queue(&self) -> watch::Receiver<Vec<QueueItem>> {
        self.queue.clone()
    }
}

impl Drop for SessionManager {
    fn drop(&mut self) {
        // best effort: let the actor run its stop sequence even when
        // the caller forgot an explicit release
        if self.task.is_some() {
            let _ = self.msg_tx.send(SessionMsg::Command(SessionCommand::Release));
        }
    }
}

enum Wake {
    Msg(Option<SessionMsg>),
    Engine(Option<EngineEvent>),
    Heartbeat,
}

/// Actor state; lives on the spawned session task
struct SessionActor {
    engine: Box<dyn PlayerEngine>,
    server: Arc<dyn MediaServer>,
    preferences: Arc<dyn PreferenceStore>,
    reporter: ProgressReporter,
    msg_tx: mpsc::UnboundedSender<SessionMsg>,
    config: SessionConfig,

    context: Option<MediaContext>,
    current_media: Option<ItemId>,
    track_state: TrackSelectionState,
    /// Bumped on every re-map; tags async preference loads so stale
    /// results are dropped
    generation: u64,
    last_prefetched_for: Option<ItemId>,

    state_tx: watch::Sender<PlaybackStateSnapshot>,
    progress_tx: watch::Sender<PlaybackProgress>,
    metadata_tx: watch::Sender<NowPlayingMetadata>,
    tracks_tx: watch::Sender<TrackSelectionState>,
    queue_tx: watch::Sender<Vec<QueueItem>>,
}

impl SessionActor {
    async fn run(
        mut self,
        mut msg_rx: mpsc::UnboundedReceiver<SessionMsg>,
        mut engine_rx: mpsc::Receiver<EngineEvent>,
    ) {
        let mut engine_open = true;
        loop {
            let wake = tokio::select! {
                msg = msg_rx.recv() => Wake::Msg(msg),
                event = engine_rx.recv(), if engine_open => Wake::Engine(event),
                () = self.reporter.heartbeat_tick() => Wake::Heartbeat,
            };

            match wake {
                Wake::Msg(Some(msg)) => {
                    if self.handle_msg(msg).await {
                        break;
                    }
                }
                Wake::Msg(None) => {
                    // every handle dropped: treat like an explicit release
                    self.shutdown().await;
                    break;
                }
                Wake::Engine(Some(event)) => self.handle_engine_event(event).await,
                Wake::Engine(None) => engine_open = false,
                Wake::Heartbeat => self.reporter.tick().await,
            }
        }
    }

    async fn handle_msg(&mut self, msg: SessionMsg) -> bool {
        match msg {
            SessionMsg::Command(command) => return self.handle_command(command).await,
            SessionMsg::PreferencesLoaded {
                generation,
                preferences,
            } => self.apply_preferences(generation, preferences).await,
            SessionMsg::ResumeResolved { item_id, resume_ms } => {
                self.apply_resume(&item_id, resume_ms);
            }
            SessionMsg::NextUpFetched { after, items } => self.append_next_up(&after, items),
        }
        false
    }

    async fn handle_command(&mut self, command: SessionCommand) -> bool {
        match command {
            SessionCommand::Play { item, context } => self.play(item, context).await,
            SessionCommand::AddToQueue(item) => {
                self.engine.add_item(item);
                self.publish_queue();
            }
            SessionCommand::TogglePlayPause => {
                let play = !self.engine.play_when_ready();
                self.engine.set_play_when_ready(play);
                self.refresh_playing();
            }
            SessionCommand::SeekTo(position_ms) => {
                self.engine.seek_to(position_ms);
                self.refresh_progress();
            }
            SessionCommand::SeekBy(delta_ms) => {
                let target = self.engine.position_ms().saturating_add_signed(delta_ms);
                self.engine.seek_to(target);
                self.refresh_progress();
            }
            SessionCommand::SeekToLiveEdge => {
                if self.engine.is_live() {
                    self.engine.seek_to_live_edge();
                    self.refresh_progress();
                }
            }
            SessionCommand::Next => {
                if self.engine.has_next() {
                    self.engine.seek_next();
                }
            }
            SessionCommand::Previous => {
                if self.engine.has_previous() {
                    self.engine.seek_previous();
                }
            }
            SessionCommand::SelectTrack(option) => self.select_track(option, true).await,
            SessionCommand::PlayQueueItem(id) => {
                if let Some(index) = self.engine.items().iter().position(|item| item.id == id) {
                    self.engine.seek_to_index(index);
                    self.engine.set_play_when_ready(true);
                } else {
                    debug!(item = %id, "ignoring jump to an id that is not queued");
                }
            }
            SessionCommand::Retry => {
                self.state_tx.send_modify(|state| {
                    state.error = None;
                    state.is_ended = false;
                });
                self.engine.prepare();
                self.engine.set_play_when_ready(true);
            }
            SessionCommand::ClearError => {
                self.state_tx.send_modify(|state| state.error = None);
            }
            SessionCommand::Release => {
                self.shutdown().await;
                return true;
            }
        }
        false
    }

    async fn handle_engine_event(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::PlayingChanged { is_playing } => {
                self.state_tx.send_modify(|state| state.is_playing = is_playing);
                self.observe_now();
            }
            EngineEvent::BufferingChanged { is_buffering } => {
                self.state_tx
                    .send_modify(|state| state.is_buffering = is_buffering);
            }
            EngineEvent::Ended => {
                self.state_tx.send_modify(|state| {
                    state.is_ended = true;
                    state.is_playing = false;
                });
                self.observe_now();
                self.reporter.unbind().await;
            }
            EngineEvent::ItemTransition => self.handle_item_transition().await,
            EngineEvent::TracksChanged => {
                self.remap_tracks();
                self.spawn_preference_load();
            }
            EngineEvent::PositionUpdate {
                position_ms,
                duration_ms,
                buffered_ms,
            } => {
                let is_live = self.engine.is_live();
                self.reporter
                    .observe(position_ms, duration_ms, self.engine.is_playing());
                self.progress_tx.send_replace(PlaybackProgress {
                    duration_ms,
                    position_ms,
                    buffered_ms,
                    is_live,
                });
            }
            EngineEvent::QueueChanged => self.publish_queue(),
            EngineEvent::Error { message } => {
                warn!(error = %message, "engine reported a playback error");
                self.state_tx
                    .send_modify(|state| state.error = Some(message));
            }
        }
    }

    async fn play(&mut self, item: PlayableItem, context: MediaContext) {
        if item.id.is_empty() || item.url.is_empty() {
            // data error: surfaced before any engine interaction
            warn!("refusing to play an item without an id or stream url");
            self.state_tx.send_modify(|state| {
                state.error = Some("Media item cannot be played".to_string());
            });
            return;
        }

        info!(item = %item.id, title = %item.title, "starting playback");

        // leaving the previous binding, if any, with its last observed
        // position
        self.reporter.unbind().await;

        self.state_tx.send_modify(|state| {
            state.is_ended = false;
            state.error = None;
        });
        self.context = Some(context);

        self.engine.set_item(item.clone());
        self.engine.prepare();
        self.engine.set_play_when_ready(true);

        self.current_media = Some(item.id.clone());
        self.metadata_tx.send_replace(NowPlayingMetadata {
            media_id: Some(item.id.clone()),
            title: item.title.clone(),
            subtitle: item.subtitle.clone().unwrap_or_default(),
        });

        self.refresh_progress();
        self.sync_reporter().await;
        self.publish_queue();
        self.maybe_prefetch_next_up();
        self.spawn_resume_lookup(item.id);
    }

    async fn handle_item_transition(&mut self) {
        let item = self.engine.current_item();
        let new_id = item.as_ref().map(|i| i.id.clone());

        if new_id != self.current_media {
            // a genuinely new binding: stop the old one with its last
            // observed position before the new item's progress
            // overwrites it
            self.reporter.unbind().await;
        }
        self.current_media = new_id;

        match item {
            Some(item) => {
                self.state_tx.send_modify(|state| {
                    state.is_ended = false;
                    state.error = None;
                });
                self.metadata_tx.send_replace(NowPlayingMetadata {
                    media_id: Some(item.id.clone()),
                    title: item.title,
                    subtitle: item.subtitle.unwrap_or_default(),
                });
            }
            None => {
                self.metadata_tx.send_replace(NowPlayingMetadata::default());
            }
        }

        self.refresh_progress();
        self.sync_reporter().await;
        self.publish_queue();
        self.maybe_prefetch_next_up();
    }

    /// Bind or unbind the reporter to match the published metadata
    async fn sync_reporter(&mut self) {
        let ended = self.state_tx.borrow().is_ended;
        match self.current_media.clone() {
            Some(id) if !ended && !id.is_empty() => self.reporter.bind(id).await,
            _ => self.reporter.unbind().await,
        }
    }

    /// Re-run the track mapper against the engine's current listing
    /// and replace the published state wholesale
    fn remap_tracks(&mut self) {
        self.generation += 1;
        let state = map_tracks(&self.engine.current_tracks());
        self.track_state = state.clone();
        self.tracks_tx.send_replace(state);
    }

    async fn select_track(&mut self, option: TrackOption, persist: bool) {
        // never trust caller-held indices: a listing regeneration since
        // the option was rendered would make them point at the wrong
        // track, so the id is re-derived from the live listing first
        let fresh = map_tracks(&self.engine.current_tracks());
        let Some(current) = fresh.find(&option.id).cloned() else {
            debug!(id = %option.id, "ignoring selection of a track missing from the current listing");
            return;
        };

        let update = if current.kind == TrackKind::Text && current.is_off {
            TrackSelectionUpdate::new()
                .set_kind_disabled(TrackKind::Text, true)
                .clear_overrides(TrackKind::Text)
        } else {
            let mut update = TrackSelectionUpdate::new();
            if current.kind == TrackKind::Text {
                update = update.set_kind_disabled(TrackKind::Text, false);
            }
            update.clear_overrides(current.kind).set_override(
                current.kind,
                current.group_index as usize,
                current.track_index as usize,
            )
        };

        self.engine.apply_selection(update);
        self.remap_tracks();

        if persist {
            self.persist_track_preference(&current);
        }
    }

    /// Store the manually selected track under the bound preference
    /// key. Video selections are not persisted; there is no stored
    /// preference shape for quality.
    fn persist_track_preference(&self, option: &TrackOption) {
        let Some(context) = self.context.clone() else {
            return;
        };
        let preferences = Arc::clone(&self.preferences);

        match option.kind {
            TrackKind::Audio => {
                let properties = AudioTrackProperties {
                    language: option.language.clone(),
                    channel_count: option.channel_count,
                    label: Some(option.label.clone()),
                };
                tokio::spawn(async move {
                    if let Err(e) = preferences
                        .save_audio(&context.preference_key, &properties)
                        .await
                    {
                        warn!(key = %context.preference_key, "failed to save audio preference: {e}");
                    }
                });
            }
            TrackKind::Text => {
                let properties = if option.is_off {
                    SubtitleTrackProperties::off()
                } else {
                    SubtitleTrackProperties {
                        language: option.language.clone(),
                        forced: option.forced,
                        label: Some(option.label.clone()),
                        is_off: false,
                    }
                };
                tokio::spawn(async move {
                    if let Err(e) = preferences
                        .save_subtitle(&context.preference_key, &properties)
                        .await
                    {
                        warn!(key = %context.preference_key, "failed to save subtitle preference: {e}");
                    }
                });
            }
            TrackKind::Video => {}
        }
    }

    /// Kick off the stored-preference load for the current listing
    /// generation
    fn spawn_preference_load(&self) {
        let Some(context) = self.context.clone() else {
            return;
        };
        let preferences = Arc::clone(&self.preferences);
        let tx = self.msg_tx.clone();
        let generation = self.generation;

        tokio::spawn(async move {
            match preferences.get(&context.preference_key).await {
                Ok(stored) if !stored.is_empty() => {
                    let _ = tx.send(SessionMsg::PreferencesLoaded {
                        generation,
                        preferences: stored,
                    });
                }
                Ok(_) => {}
                Err(e) => {
                    debug!(key = %context.preference_key, "preference load failed: {e}");
                }
            }
        });
    }

    /// Auto-apply stored preferences against the mapped options.
    ///
    /// Audio and subtitle matching run independently; either is
    /// skipped silently when nothing is stored or the matcher finds no
    /// candidate. A match that is already selected is left alone.
    async fn apply_preferences(&mut self, generation: u64, preferences: TrackPreferences) {
        if generation != self.generation {
            debug!("dropping preference result for a stale listing generation");
            return;
        }

        if let Some(audio) = preferences.audio {
            let matched =
                find_best_audio_match(&self.track_state.audio_tracks, &audio).cloned();
            if let Some(option) = matched {
                if self.track_state.selected_audio_track_id.as_deref() != Some(option.id.as_str())
                {
                    debug!(track = %option.id, "auto-applying stored audio preference");
                    self.select_track(option, false).await;
                }
            }
        }

        if let Some(subtitle) = preferences.subtitle {
            let matched =
                find_best_subtitle_match(&self.track_state.text_tracks, &subtitle).cloned();
            if let Some(option) = matched {
                if self.track_state.selected_text_track_id.as_deref() != Some(option.id.as_str()) {
                    debug!(track = %option.id, "auto-applying stored subtitle preference");
                    self.select_track(option, false).await;
                }
            }
        }
    }

    /// Resolve the resume position for a freshly bound item in the
    /// background
    fn spawn_resume_lookup(&self, item_id: ItemId) {
        let server = Arc::clone(&self.server);
        let tx = self.msg_tx.clone();

        tokio::spawn(async move {
            let info = match server.get_item_info(&item_id).await {
                Ok(info) => info,
                Err(e) => {
                    debug!(item = %item_id, "resume lookup failed: {e}");
                    return;
                }
            };
            let sources = server.get_media_sources(&item_id).await.unwrap_or_default();
            if let Some(resume_ms) = info.resume_position_ms(sources.first()) {
                let _ = tx.send(SessionMsg::ResumeResolved { item_id, resume_ms });
            }
        });
    }

    fn apply_resume(&mut self, item_id: &ItemId, resume_ms: u64) {
        if self.current_media.as_ref() != Some(item_id) {
            return; // resolved for an item that is no longer bound
        }
        if self.engine.position_ms() > RESUME_APPLY_CUTOFF_MS {
            return;
        }
        info!(item = %item_id, resume_ms, "resuming from stored position");
        self.engine.seek_to(resume_ms);
        self.refresh_progress();
    }

    /// Prefetch the next episodes once per media id
    fn maybe_prefetch_next_up(&mut self) {
        let Some(media_id) = self.current_media.clone() else {
            return;
        };
        if media_id.is_empty() || self.last_prefetched_for.as_ref() == Some(&media_id) {
            return;
        }
        self.last_prefetched_for = Some(media_id.clone());

        let server = Arc::clone(&self.server);
        let tx = self.msg_tx.clone();
        let count = self.config.next_up_window;

        debug!(item = %media_id, "prefetching next-up episodes");
        tokio::spawn(async move {
            match server.get_next_episodes(&media_id, count).await {
                Ok(episodes) => {
                    let mut items = Vec::new();
                    for episode in episodes {
                        if let Some(item) = resolve_episode(server.as_ref(), episode).await {
                            items.push(item);
                        }
                    }
                    let _ = tx.send(SessionMsg::NextUpFetched {
                        after: media_id,
                        items,
                    });
                }
                Err(e) => debug!(item = %media_id, "next-up prefetch failed: {e}"),
            }
        });
    }

    /// Append prefetched episodes, de-duplicating against the queue
    /// before the upcoming-window bound is applied
    fn append_next_up(&mut self, after: &ItemId, items: Vec<PlayableItem>) {
        if self.last_prefetched_for.as_ref() != Some(after) {
            return; // superseded by a newer prefetch
        }

        let queued: Vec<ItemId> = self
            .engine
            .items()
            .iter()
            .map(|item| item.id.clone())
            .collect();
        let upcoming = queued.len().saturating_sub(self.engine.current_index() + 1);
        let capacity = self.config.next_up_window.saturating_sub(upcoming);

        let mut appended = 0;
        for item in items
            .into_iter()
            .filter(|item| !queued.contains(&item.id))
            .take(capacity)
        {
            self.engine.add_item(item);
            appended += 1;
        }

        if appended > 0 {
            debug!(after = %after, appended, "appended next-up episodes to the queue");
            self.publish_queue();
        }
    }

    fn publish_queue(&mut self) {
        let current_index = self.engine.current_index();
        let queue: Vec<QueueItem> = self
            .engine
            .items()
            .into_iter()
            .enumerate()
            .map(|(index, item)| QueueItem {
                id: item.id,
                title: item.title,
                subtitle: item.subtitle,
                artwork_url: item.artwork_url,
                is_current: index == current_index,
            })
            .collect();
        self.queue_tx.send_replace(queue);
    }

    fn refresh_progress(&mut self) {
        let progress = PlaybackProgress {
            duration_ms: self.engine.duration_ms(),
            position_ms: self.engine.position_ms(),
            buffered_ms: self.engine.buffered_position_ms(),
            is_live: self.engine.is_live(),
        };
        self.reporter.observe(
            progress.position_ms,
            progress.duration_ms,
            self.engine.is_playing(),
        );
        self.progress_tx.send_replace(progress);
    }

    fn refresh_playing(&mut self) {
        let is_playing = self.engine.is_playing();
        self.state_tx
            .send_modify(|state| state.is_playing = is_playing);
        self.observe_now();
    }

    fn observe_now(&mut self) {
        self.reporter.observe(
            self.engine.position_ms(),
            self.engine.duration_ms(),
            self.engine.is_playing(),
        );
    }

    async fn shutdown(&mut self) {
        info!("releasing playback session");
        self.reporter.unbind().await;
        self.engine.release();
    }
}

async fn resolve_episode(server: &dyn MediaServer, episode: EpisodeSummary) -> Option<PlayableItem> {
    let sources = match server.get_media_sources(&episode.id).await {
        Ok(sources) => sources,
        Err(e) => {
            debug!(item = %episode.id, "skipping next-up episode without sources: {e}");
            return None;
        }
    };
    let source = sources.first()?;
    let url = server.playback_url(&episode.id, &source.id);

    Some(PlayableItem {
        id: episode.id,
        url,
        title: episode.title,
        subtitle: episode.subtitle,
        artwork_url: episode.artwork_url,
        is_live: false,
    })
}
