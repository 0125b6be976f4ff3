// Playback core - queue, mpv process lifecycle, IPC steering, auto-advance
// Everything that has real state lives under this module

pub mod controller;
pub mod ipc;
pub mod monitor;
pub mod process;
pub mod queue;
pub mod track;

pub use controller::PlaybackController;
pub use ipc::{ControlChannel, MpvCommand};
pub use process::{LaunchSpec, ProcessSupervisor};
pub use queue::Queue;
pub use track::Track;

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Stopped,
    Playing,
    Paused,
}

/// Everything that can go wrong at the playback boundary. All of these are
/// recovered at the REPL and turned into short notices; none are fatal to
/// the controller itself.
#[derive(Debug, Error)]
pub enum PlayerError {
    #[error("couldn't start the player: {0}")]
    LaunchFailed(String),
    #[error("player control channel unavailable")]
    ChannelUnavailable(#[source] std::io::Error),
    #[error("end of queue")]
    EndOfQueue,
    #[error("beginning of queue")]
    StartOfQueue,
    #[error("nothing is playing")]
    NotPlaying,
}

/// Sent by the monitor task when the player process exits on its own.
/// The generation tag lets the controller discard events from a session
/// that has already been replaced.
#[derive(Debug, Clone, Copy)]
pub enum PlayerEvent {
    TrackFinished { generation: u64 },
}

/// Build the per-session IPC socket path, keyed by our own pid so two
/// running instances never collide. The parent directory is created here,
/// once, at startup - this is the only fatal setup step.
pub fn session_socket_path() -> anyhow::Result<PathBuf> {
    let base = dirs::runtime_dir().unwrap_or_else(std::env::temp_dir);
    let dir = base.join("aulos");
    std::fs::create_dir_all(&dir).map_err(|e| {
        anyhow::anyhow!("cannot create session directory {}: {}", dir.display(), e)
    })?;
    Ok(dir.join(format!("mpv-{}.sock", std::process::id())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_socket_path_is_pid_keyed() {
        let path = session_socket_path().unwrap();
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.contains(&std::process::id().to_string()));
        assert!(name.ends_with(".sock"));
    }
}
