// Background watcher for one track's playback. Polls process liveness and
// reports natural completion as an event; it never touches the queue or
// session state itself, so the controller stays the single writer.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::debug;

use super::process::ProcessSupervisor;
use super::PlayerEvent;

const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Spawn the monitor task for the session identified by `generation`.
/// It exits when the process dies or when `cancel` flips to true,
/// whichever comes first. A cancelled monitor exits silently - an explicit
/// stop is not a completion.
pub fn spawn_monitor(
    supervisor: Arc<ProcessSupervisor>,
    mut cancel: watch::Receiver<bool>,
    events: mpsc::UnboundedSender<PlayerEvent>,
    generation: u64,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            if *cancel.borrow() {
                debug!(generation, "monitor cancelled");
                return;
            }
            if !supervisor.is_alive() {
                // Re-check the flag: a stop may have landed between the
                // last sleep and the liveness probe.
                if !*cancel.borrow() {
                    debug!(generation, "player process finished naturally");
                    let _ = events.send(PlayerEvent::TrackFinished { generation });
                }
                return;
            }
            tokio::select! {
                changed = cancel.changed() => {
                    // Sender gone means the session owner is gone too.
                    if changed.is_err() {
                        return;
                    }
                }
                _ = tokio::time::sleep(POLL_INTERVAL) => {}
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::process::LaunchSpec;
    use crate::player::track::Track;
    use tokio::time::timeout;

    fn sleeper(secs: &str) -> LaunchSpec {
        LaunchSpec {
            program: "sh".to_string(),
            args: vec!["-c".to_string(), format!("sleep {secs}")],
        }
    }

    #[tokio::test]
    async fn test_reports_natural_completion() {
        let dir = tempfile::tempdir().unwrap();
        let sup = Arc::new(ProcessSupervisor::new(
            sleeper("0.1"),
            dir.path().join("a.sock"),
        ));
        sup.start(&Track::new("x", "X")).unwrap();

        let (cancel_tx, cancel_rx) = watch::channel(false);
        let (tx, mut rx) = mpsc::unbounded_channel();
        let handle = spawn_monitor(sup, cancel_rx, tx, 7);

        let event = timeout(Duration::from_secs(3), rx.recv())
            .await
            .expect("monitor never reported completion")
            .unwrap();
        let PlayerEvent::TrackFinished { generation } = event;
        assert_eq!(generation, 7);
        handle.await.unwrap();
        drop(cancel_tx);
    }

    #[tokio::test]
    async fn test_cancellation_suppresses_completion() {
        let dir = tempfile::tempdir().unwrap();
        let sup = Arc::new(ProcessSupervisor::new(
            sleeper("30"),
            dir.path().join("a.sock"),
        ));
        sup.start(&Track::new("x", "X")).unwrap();

        let (cancel_tx, cancel_rx) = watch::channel(false);
        let (tx, mut rx) = mpsc::unbounded_channel();
        let handle = spawn_monitor(sup.clone(), cancel_rx, tx, 1);

        // Explicit stop: flag first, then tear the process down.
        cancel_tx.send(true).unwrap();
        handle.await.unwrap();
        sup.stop().await;

        // No completion event may surface after a stop that preceded exit.
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_cancellation_is_prompt() {
        let dir = tempfile::tempdir().unwrap();
        let sup = Arc::new(ProcessSupervisor::new(
            sleeper("30"),
            dir.path().join("a.sock"),
        ));
        sup.start(&Track::new("x", "X")).unwrap();

        let (cancel_tx, cancel_rx) = watch::channel(false);
        let (tx, _rx) = mpsc::unbounded_channel();
        let handle = spawn_monitor(sup.clone(), cancel_rx, tx, 1);

        tokio::time::sleep(Duration::from_millis(50)).await;
        cancel_tx.send(true).unwrap();
        timeout(Duration::from_secs(1), handle)
            .await
            .expect("monitor did not exit promptly after cancel")
            .unwrap();
        sup.stop().await;
    }
}
