// mpv JSON IPC client. We deliberately do NOT hold a connection open:
// every command is connect-send-disconnect, matching mpv's line-oriented
// --input-ipc-server protocol and keeping the caller free of read-side
// bookkeeping.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde_json::json;
use tokio::io::AsyncWriteExt;
use tokio::net::UnixStream;
use tokio::time::timeout;
use tracing::debug;

use super::PlayerError;

const CONNECT_TIMEOUT: Duration = Duration::from_millis(500);

/// Commands we steer mpv with. Each serializes to one
/// `{"command": [...]}` line.
#[derive(Debug, Clone, PartialEq)]
pub enum MpvCommand {
    CyclePause,
    /// Relative seek, in seconds (negative = backward).
    Seek(i64),
    /// Absolute volume, already clamped to 0-100 by the caller.
    SetVolume(u8),
}

impl MpvCommand {
    pub fn to_wire(&self) -> String {
        let command = match self {
            MpvCommand::CyclePause => json!(["cycle", "pause"]),
            // mpv accepts the seek offset as a string token
            MpvCommand::Seek(secs) => json!(["seek", secs.to_string()]),
            MpvCommand::SetVolume(vol) => json!(["set_property", "volume", vol]),
        };
        let mut line = json!({ "command": command }).to_string();
        line.push('\n');
        line
    }
}

/// Write end of the per-session control socket.
#[derive(Debug, Clone)]
pub struct ControlChannel {
    socket_path: PathBuf,
}

impl ControlChannel {
    pub fn new(socket_path: impl Into<PathBuf>) -> Self {
        Self {
            socket_path: socket_path.into(),
        }
    }

    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    /// Deliver one command to the running player. Any failure (socket
    /// missing, stale socket refusing the connection, write error) comes
    /// back as `ChannelUnavailable`; the connect timeout keeps a stale
    /// endpoint from hanging us.
    pub async fn send(&self, command: MpvCommand) -> Result<(), PlayerError> {
        let mut stream = timeout(CONNECT_TIMEOUT, UnixStream::connect(&self.socket_path))
            .await
            .map_err(|_| {
                PlayerError::ChannelUnavailable(std::io::Error::new(
                    std::io::ErrorKind::TimedOut,
                    "connect timed out",
                ))
            })?
            .map_err(PlayerError::ChannelUnavailable)?;

        debug!(command = ?command, "sending mpv command");
        stream
            .write_all(command.to_wire().as_bytes())
            .await
            .map_err(PlayerError::ChannelUnavailable)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncBufReadExt;

    #[test]
    fn test_wire_format_cycle_pause() {
        assert_eq!(
            MpvCommand::CyclePause.to_wire(),
            "{\"command\":[\"cycle\",\"pause\"]}\n"
        );
    }

    #[test]
    fn test_wire_format_seek_is_string_token() {
        assert_eq!(
            MpvCommand::Seek(-10).to_wire(),
            "{\"command\":[\"seek\",\"-10\"]}\n"
        );
    }

    #[test]
    fn test_wire_format_volume_is_integer() {
        assert_eq!(
            MpvCommand::SetVolume(85).to_wire(),
            "{\"command\":[\"set_property\",\"volume\",85]}\n"
        );
    }

    #[tokio::test]
    async fn test_send_delivers_one_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mpv.sock");
        let listener = tokio::net::UnixListener::bind(&path).unwrap();

        let channel = ControlChannel::new(&path);
        let accept = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut line = String::new();
            tokio::io::BufReader::new(stream)
                .read_line(&mut line)
                .await
                .unwrap();
            line
        });

        channel.send(MpvCommand::SetVolume(50)).await.unwrap();
        let line = accept.await.unwrap();
        assert_eq!(line, "{\"command\":[\"set_property\",\"volume\",50]}\n");
    }

    #[tokio::test]
    async fn test_send_fails_when_socket_absent() {
        let dir = tempfile::tempdir().unwrap();
        let channel = ControlChannel::new(dir.path().join("nothing-here.sock"));
        let err = channel.send(MpvCommand::CyclePause).await.unwrap_err();
        assert!(matches!(err, PlayerError::ChannelUnavailable(_)));
    }

    #[tokio::test]
    async fn test_send_fails_cleanly_on_stale_socket() {
        // A socket file whose listener is gone: connect must error out
        // promptly instead of hanging.
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stale.sock");
        drop(tokio::net::UnixListener::bind(&path).unwrap());
        assert!(path.exists());

        let channel = ControlChannel::new(&path);
        let started = std::time::Instant::now();
        let err = channel.send(MpvCommand::Seek(10)).await.unwrap_err();
        assert!(matches!(err, PlayerError::ChannelUnavailable(_)));
        assert!(started.elapsed() < Duration::from_secs(2));
    }
}
