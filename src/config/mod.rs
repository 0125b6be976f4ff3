// Configuration management for aulos
// Handles loading/saving settings, with sensible defaults when config is missing

use anyhow::Result;
use dirs::config_dir;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::player::LaunchSpec;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub player: PlayerConfig,
    pub search: SearchConfig,
    pub playback: PlaybackConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// The external player binary. Anything mpv-compatible works.
    pub binary: String,
    /// Flags passed before the IPC socket argument and the URL.
    pub extra_args: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    pub binary: String,
    pub result_limit: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Initial volume, 0-100, applied at launch.
    pub volume: u8,
    /// Seconds moved by the +/- seek commands.
    pub seek_step: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            player: PlayerConfig {
                binary: "mpv".to_string(),
                extra_args: vec![
                    "--no-video".to_string(),
                    "--really-quiet".to_string(),
                    "--terminal=no".to_string(),
                ],
            },
            search: SearchConfig {
                binary: "yt-dlp".to_string(),
                result_limit: 10,
            },
            playback: PlaybackConfig {
                volume: 100,
                seek_step: 10,
            },
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = fs::read_to_string(&config_path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save()?;
            Ok(config)
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(config_path, content)?;

        Ok(())
    }

    /// The launch template the process supervisor uses, including the
    /// configured starting volume.
    pub fn launch_spec(&self) -> LaunchSpec {
        let mut args = self.player.extra_args.clone();
        args.push(format!("--volume={}", self.playback.volume.min(100)));
        LaunchSpec {
            program: self.player.binary.clone(),
            args,
        }
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?
            .join("aulos");

        Ok(config_dir.join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_roundtrip_through_toml() {
        let config = Config::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let back: Config = toml::from_str(&text).unwrap();
        assert_eq!(back.player.binary, "mpv");
        assert_eq!(back.search.result_limit, 10);
        assert_eq!(back.playback.seek_step, 10);
    }

    #[test]
    fn test_launch_spec_includes_volume_and_clamps() {
        let mut config = Config::default();
        config.playback.volume = 200;
        let spec = config.launch_spec();
        assert_eq!(spec.program, "mpv");
        assert!(spec.args.iter().any(|a| a == "--volume=100"));
        assert!(spec.args.iter().any(|a| a == "--no-video"));
    }
}
