// aulos library - terminal YouTube Music player built on mpv + yt-dlp

pub mod config; // settings and preferences
pub mod player; // queue, mpv lifecycle, IPC, auto-advance
pub mod search; // yt-dlp catalog lookups + dependency checks
pub mod ui; // interactive prompt

// Export the stuff other modules actually use
pub use config::Config;
pub use player::{PlaybackController, PlaybackState, PlayerError, PlayerEvent, Queue, Track};
pub use search::{Catalog, SearchKind};
