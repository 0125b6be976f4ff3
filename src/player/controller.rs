// The playback façade: owns the queue and the session (process + socket +
// monitor) and is the only writer of either. User intents come in from the
// REPL task; completion events come back in from the monitor via the same
// task's event loop, so all mutation stays on one task.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::ipc::{ControlChannel, MpvCommand};
use super::monitor::spawn_monitor;
use super::process::{LaunchSpec, ProcessSupervisor};
use super::queue::Queue;
use super::track::Track;
use super::{PlaybackState, PlayerError, PlayerEvent};

pub struct PlaybackController {
    queue: Queue,
    supervisor: Arc<ProcessSupervisor>,
    channel: ControlChannel,
    state: PlaybackState,
    current: Option<Track>,
    events: mpsc::UnboundedSender<PlayerEvent>,
    // Session bookkeeping: bumped on every play() so stale monitor events
    // can be recognized and dropped.
    generation: u64,
    cancel: Option<watch::Sender<bool>>,
    monitor: Option<JoinHandle<()>>,
}

impl PlaybackController {
    pub fn new(
        launch: LaunchSpec,
        socket_path: PathBuf,
        events: mpsc::UnboundedSender<PlayerEvent>,
    ) -> Self {
        let channel = ControlChannel::new(&socket_path);
        Self {
            queue: Queue::new(),
            supervisor: Arc::new(ProcessSupervisor::new(launch, socket_path)),
            channel,
            state: PlaybackState::Stopped,
            current: None,
            events,
            generation: 0,
            cancel: None,
            monitor: None,
        }
    }

    /// Start playing `track`, tearing down any prior session first so at
    /// most one player process is ever alive. On launch failure the state
    /// stays Stopped.
    pub async fn play(&mut self, track: Track) -> Result<(), PlayerError> {
        self.teardown_session().await;

        self.generation += 1;
        self.supervisor.start(&track)?;

        let (cancel_tx, cancel_rx) = watch::channel(false);
        self.monitor = Some(spawn_monitor(
            self.supervisor.clone(),
            cancel_rx,
            self.events.clone(),
            self.generation,
        ));
        self.cancel = Some(cancel_tx);
        self.state = PlaybackState::Playing;
        info!(title = %track.title, "now playing");
        self.current = Some(track);
        Ok(())
    }

    /// Play whatever the queue cursor points at.
    pub async fn play_current(&mut self) -> Result<Track, PlayerError> {
        let track = self.queue.current().cloned().ok_or(PlayerError::EndOfQueue)?;
        self.play(track.clone()).await?;
        Ok(track)
    }

    /// Idempotent: cancel the monitor, stop the process, drop the session.
    pub async fn stop(&mut self) {
        self.teardown_session().await;
    }

    /// Flip pause/resume. The local flag only changes when the command was
    /// actually delivered - a dead channel must not leave us claiming a
    /// pause that never happened.
    pub async fn toggle_pause(&mut self) -> Result<PlaybackState, PlayerError> {
        if self.state == PlaybackState::Stopped {
            return Err(PlayerError::NotPlaying);
        }
        self.channel.send(MpvCommand::CyclePause).await?;
        self.state = match self.state {
            PlaybackState::Playing => PlaybackState::Paused,
            _ => PlaybackState::Playing,
        };
        Ok(self.state)
    }

    pub async fn next(&mut self) -> Result<Track, PlayerError> {
        let track = self.queue.advance()?.clone();
        self.play(track.clone()).await?;
        Ok(track)
    }

    pub async fn previous(&mut self) -> Result<Track, PlayerError> {
        let track = self.queue.retreat()?.clone();
        self.play(track.clone()).await?;
        Ok(track)
    }

    /// Relative seek in seconds; no-op notice when stopped.
    pub async fn seek(&mut self, delta_secs: i64) -> Result<(), PlayerError> {
        if self.state == PlaybackState::Stopped {
            return Err(PlayerError::NotPlaying);
        }
        self.channel.send(MpvCommand::Seek(delta_secs)).await
    }

    /// Volume 0-100; the REPL clamps before calling.
    pub async fn set_volume(&mut self, volume: u8) -> Result<(), PlayerError> {
        if self.state == PlaybackState::Stopped {
            return Err(PlayerError::NotPlaying);
        }
        self.channel.send(MpvCommand::SetVolume(volume)).await
    }

    /// Handle a monitor-reported natural completion. Events from replaced
    /// sessions carry an old generation and are ignored. Returns the track
    /// that started, or `EndOfQueue` once when the queue ran out.
    pub async fn on_track_finished(
        &mut self,
        generation: u64,
    ) -> Result<Option<Track>, PlayerError> {
        if generation != self.generation || self.state == PlaybackState::Stopped {
            debug!(generation, current = self.generation, "ignoring stale completion event");
            return Ok(None);
        }
        match self.queue.advance() {
            Ok(track) => {
                let track = track.clone();
                self.play(track.clone()).await?;
                Ok(Some(track))
            }
            Err(e) => {
                // Queue exhausted: reap the dead process and clean up.
                self.teardown_session().await;
                Err(e)
            }
        }
    }

    pub fn enqueue(&mut self, track: Track) {
        self.queue.push(track);
    }

    pub fn replace_queue(&mut self, tracks: Vec<Track>) {
        self.queue.replace_all(tracks);
    }

    pub fn clear_queue(&mut self) {
        self.queue.clear();
    }

    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.current.as_ref()
    }

    pub fn is_alive(&self) -> bool {
        self.supervisor.is_alive()
    }

    async fn teardown_session(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            let _ = cancel.send(true);
        }
        if let Some(monitor) = self.monitor.take() {
            let _ = monitor.await;
        }
        self.supervisor.stop().await;
        self.state = PlaybackState::Stopped;
        self.current = None;
    }
}
