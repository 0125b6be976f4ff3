// Exclusive owner of the external player process for one track's playback.
// start/stop/is_alive only; interpreting WHY the process exited is the
// monitor's job.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Mutex;
use std::time::Duration;

use tokio::process::{Child, Command};
use tokio::time::timeout;
use tracing::{debug, info, warn};

use super::track::Track;
use super::PlayerError;

const STOP_GRACE_PERIOD: Duration = Duration::from_secs(2);

/// How to launch the player binary. The supervisor appends the IPC socket
/// argument and the track URL; everything else comes from config so tests
/// can substitute a harmless stand-in command.
#[derive(Debug, Clone)]
pub struct LaunchSpec {
    pub program: String,
    pub args: Vec<String>,
}

impl Default for LaunchSpec {
    fn default() -> Self {
        Self {
            program: "mpv".to_string(),
            args: vec![
                "--no-video".to_string(),
                "--really-quiet".to_string(),
                "--terminal=no".to_string(),
            ],
        }
    }
}

pub struct ProcessSupervisor {
    launch: LaunchSpec,
    socket_path: PathBuf,
    child: Mutex<Option<Child>>,
}

impl ProcessSupervisor {
    pub fn new(launch: LaunchSpec, socket_path: impl Into<PathBuf>) -> Self {
        Self {
            launch,
            socket_path: socket_path.into(),
            child: Mutex::new(None),
        }
    }

    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    /// Spawn the player for one track. Errors if a previous child is still
    /// alive - the controller must stop first. A missing binary is the most
    /// common user-facing failure and gets an actionable message.
    pub fn start(&self, track: &Track) -> Result<(), PlayerError> {
        if self.is_alive() {
            return Err(PlayerError::LaunchFailed(
                "a player process is already running".to_string(),
            ));
        }

        let url = track.watch_url();
        let child = Command::new(&self.launch.program)
            .args(&self.launch.args)
            .arg(format!("--input-ipc-server={}", self.socket_path.display()))
            .arg(&url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    PlayerError::LaunchFailed(format!(
                        "{} not found. Install it (e.g. `sudo apt install mpv`) and try again",
                        self.launch.program
                    ))
                } else {
                    PlayerError::LaunchFailed(format!(
                        "failed to spawn {}: {}",
                        self.launch.program, e
                    ))
                }
            })?;

        info!(pid = ?child.id(), title = %track.title, "player process started");
        *self.child.lock().unwrap() = Some(child);
        Ok(())
    }

    /// Non-blocking liveness check. False once the process has exited for
    /// any reason - natural end-of-stream, user stop, or crash.
    pub fn is_alive(&self) -> bool {
        let mut guard = self.child.lock().unwrap();
        match guard.as_mut() {
            Some(child) => matches!(child.try_wait(), Ok(None)),
            None => false,
        }
    }

    pub fn pid(&self) -> Option<u32> {
        self.child.lock().unwrap().as_ref().and_then(|c| c.id())
    }

    /// Idempotent teardown: SIGTERM, wait up to the grace period, then
    /// SIGKILL. Always tries to unlink the IPC socket afterwards - it may
    /// never have been created, so removal errors are swallowed.
    pub async fn stop(&self) {
        let child = self.child.lock().unwrap().take();
        if let Some(mut child) = child {
            if let Some(pid) = child.id() {
                debug!(pid, "terminating player process");
                unsafe {
                    libc::kill(pid as libc::pid_t, libc::SIGTERM);
                }
            }
            match timeout(STOP_GRACE_PERIOD, child.wait()).await {
                Ok(Ok(status)) => debug!(?status, "player process exited"),
                Ok(Err(e)) => warn!("error waiting for player process: {e}"),
                Err(_) => {
                    warn!("player ignored SIGTERM, killing it");
                    let _ = child.start_kill();
                    let _ = child.wait().await;
                }
            }
        }
        let _ = std::fs::remove_file(&self.socket_path);
    }
}
