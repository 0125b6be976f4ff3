use serde::{Deserialize, Serialize};

/// Metadata for one playable item, frozen at search time. The queue and the
/// active session each hold their own copy; nothing mutates a Track after
/// construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub video_id: String,
    pub title: String,
    pub artists: Vec<String>,
    pub duration: Option<String>,
}

impl Track {
    pub fn new(video_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            video_id: video_id.into(),
            title: title.into(),
            artists: Vec::new(),
            duration: None,
        }
    }

    pub fn with_artists(mut self, artists: Vec<String>) -> Self {
        self.artists = artists;
        self
    }

    pub fn with_duration(mut self, duration: Option<String>) -> Self {
        self.duration = duration;
        self
    }

    /// "Artist A, Artist B" or a placeholder when nothing is known.
    pub fn artist_line(&self) -> String {
        if self.artists.is_empty() {
            "Unknown Artist".to_string()
        } else {
            self.artists.join(", ")
        }
    }

    /// The URL handed to mpv as its sole positional target.
    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.video_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artist_line_joins_in_order() {
        let track = Track::new("abc123", "Song")
            .with_artists(vec!["First".into(), "Second".into()]);
        assert_eq!(track.artist_line(), "First, Second");
    }

    #[test]
    fn test_artist_line_placeholder() {
        let track = Track::new("abc123", "Song");
        assert_eq!(track.artist_line(), "Unknown Artist");
    }

    #[test]
    fn test_watch_url() {
        let track = Track::new("dQw4w9WgXcQ", "Song");
        assert_eq!(
            track.watch_url(),
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ"
        );
    }
}
