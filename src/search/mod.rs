// Catalog lookups, delegated to a yt-dlp subprocess. We never talk to the
// network ourselves: yt-dlp does the searching and hands back one JSON
// object per result line, which we fold into Tracks.

use std::process::Stdio;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::player::Track;

const SEARCH_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKind {
    Songs,
    Albums,
    Playlists,
}

impl SearchKind {
    pub fn label(&self) -> &'static str {
        match self {
            SearchKind::Songs => "songs",
            SearchKind::Albums => "albums",
            SearchKind::Playlists => "playlists",
        }
    }

    // yt-dlp's flat search has no kind filter, so shape the query instead.
    fn shape_query(&self, query: &str) -> String {
        match self {
            SearchKind::Songs => query.to_string(),
            SearchKind::Albums => format!("{query} full album"),
            SearchKind::Playlists => format!("{query} playlist"),
        }
    }
}

/// One result line of `yt-dlp --dump-json --flat-playlist`.
#[derive(Debug, Deserialize)]
struct RawEntry {
    id: Option<String>,
    title: Option<String>,
    #[serde(default)]
    uploader: Option<String>,
    #[serde(default)]
    channel: Option<String>,
    #[serde(default)]
    duration: Option<f64>,
}

impl RawEntry {
    fn into_track(self) -> Option<Track> {
        let id = self.id?;
        let title = self.title.unwrap_or_else(|| "Unknown".to_string());
        let artist = self.uploader.or(self.channel);
        Some(
            Track::new(id, title)
                .with_artists(artist.into_iter().collect())
                .with_duration(self.duration.map(format_duration)),
        )
    }
}

pub struct Catalog {
    binary: String,
    limit: usize,
}

impl Catalog {
    pub fn new(binary: impl Into<String>, limit: usize) -> Self {
        Self {
            binary: binary.into(),
            limit: limit.max(1),
        }
    }

    /// Run one search. yt-dlp failures surface as one short message; lines
    /// we can't parse are skipped with a warning rather than aborting the
    /// whole result set.
    pub async fn search(&self, query: &str, kind: SearchKind) -> Result<Vec<Track>> {
        let target = format!("ytsearch{}:{}", self.limit, kind.shape_query(query));
        debug!(%target, kind = kind.label(), "running catalog search");

        let run = Command::new(&self.binary)
            .args(["--dump-json", "--flat-playlist", "--no-warnings"])
            .arg(&target)
            .stdin(Stdio::null())
            .output();

        let output = timeout(SEARCH_TIMEOUT, run)
            .await
            .context("search timed out after 30 seconds")?
            .with_context(|| format!("failed to run {}", self.binary))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!(
                "search failed: {}",
                stderr.lines().next().unwrap_or("unknown error")
            );
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(parse_result_lines(&stdout))
    }
}

fn parse_result_lines(stdout: &str) -> Vec<Track> {
    let mut tracks = Vec::new();
    for line in stdout.lines().filter(|l| !l.trim().is_empty()) {
        match serde_json::from_str::<RawEntry>(line) {
            Ok(entry) => {
                if let Some(track) = entry.into_track() {
                    tracks.push(track);
                }
            }
            Err(e) => warn!("skipping unparseable search result line: {e}"),
        }
    }
    tracks
}

/// "185.0" seconds -> "3:05"; an hour or more -> "1:02:03".
fn format_duration(secs: f64) -> String {
    let total = secs.max(0.0) as u64;
    let (h, m, s) = (total / 3600, (total % 3600) / 60, total % 60);
    if h > 0 {
        format!("{h}:{m:02}:{s:02}")
    } else {
        format!("{m}:{s:02}")
    }
}

/// Startup check for the external tools we drive. Collects everything
/// missing into a single actionable message.
pub fn ensure_dependencies(player_binary: &str, search_binary: &str) -> Result<()> {
    let mut missing = Vec::new();
    for binary in [player_binary, search_binary] {
        let found = std::process::Command::new(binary)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false);
        if !found {
            missing.push(binary);
        }
    }

    if missing.is_empty() {
        return Ok(());
    }

    let mut msg = format!("missing dependencies: {}\n\nInstall with:\n", missing.join(", "));
    if missing.contains(&player_binary) {
        msg.push_str("  sudo apt install mpv\n");
    }
    if missing.contains(&search_binary) {
        msg.push_str("  pip install yt-dlp\n");
    }
    bail!(msg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flat_playlist_line() {
        let line = r#"{"id":"abc123","title":"Some Song","uploader":"Some Artist","duration":185.0,"url":"https://www.youtube.com/watch?v=abc123"}"#;
        let tracks = parse_result_lines(line);
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].video_id, "abc123");
        assert_eq!(tracks[0].title, "Some Song");
        assert_eq!(tracks[0].artist_line(), "Some Artist");
        assert_eq!(tracks[0].duration.as_deref(), Some("3:05"));
    }

    #[test]
    fn test_parse_falls_back_to_channel_and_skips_garbage() {
        let stdout = concat!(
            "{\"id\":\"x\",\"title\":\"T\",\"channel\":\"Chan\"}\n",
            "not json at all\n",
            "{\"title\":\"no id, dropped\"}\n",
        );
        let tracks = parse_result_lines(stdout);
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].artist_line(), "Chan");
        assert!(tracks[0].duration.is_none());
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0.0), "0:00");
        assert_eq!(format_duration(59.0), "0:59");
        assert_eq!(format_duration(185.0), "3:05");
        assert_eq!(format_duration(3723.0), "1:02:03");
    }

    #[test]
    fn test_kind_query_shaping() {
        assert_eq!(SearchKind::Songs.shape_query("abba"), "abba");
        assert_eq!(SearchKind::Albums.shape_query("abba"), "abba full album");
        assert_eq!(
            SearchKind::Playlists.shape_query("abba"),
            "abba playlist"
        );
    }
}
