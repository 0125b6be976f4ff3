// Interactive terminal interface: command parsing here, the app loop in app.rs

pub mod app;

pub use app::App;

use crate::search::SearchKind;

/// One parsed user intent from the prompt. Numbers are 1-based as typed;
/// the app translates to indices.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Search(String, SearchKind),
    Play(usize),
    Add(usize),
    PlayAll,
    TogglePause,
    Next,
    Previous,
    Stop,
    ShowQueue,
    ClearQueue,
    SeekForward,
    SeekBackward,
    /// Already clamped to 0-100.
    SetVolume(u8),
    Help,
    ClearScreen,
    Exit,
    Usage(&'static str),
}

/// Parse one input line. Unrecognized input falls through to a song
/// search, matching how people actually use the prompt.
pub fn parse_command(input: &str) -> Option<Command> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    let (action, arg) = match input.split_once(char::is_whitespace) {
        Some((a, rest)) => (a, rest.trim()),
        None => (input, ""),
    };

    let cmd = match action.to_lowercase().as_str() {
        "x" | "exit" | "quit" => Command::Exit,
        "h" | "help" => Command::Help,
        "cls" => Command::ClearScreen,
        "s" | "search" => {
            if arg.is_empty() {
                Command::Usage("search <query>")
            } else {
                Command::Search(arg.to_string(), SearchKind::Songs)
            }
        }
        "sa" => {
            if arg.is_empty() {
                Command::Usage("sa <query>")
            } else {
                Command::Search(arg.to_string(), SearchKind::Albums)
            }
        }
        "sp" => {
            if arg.is_empty() {
                Command::Usage("sp <query>")
            } else {
                Command::Search(arg.to_string(), SearchKind::Playlists)
            }
        }
        "p" | "play" => match arg.parse::<usize>() {
            Ok(n) if n > 0 => Command::Play(n),
            _ => Command::Usage("play <number>"),
        },
        "a" | "add" => match arg.parse::<usize>() {
            Ok(n) if n > 0 => Command::Add(n),
            _ => Command::Usage("add <number>"),
        },
        "pa" | "playall" => Command::PlayAll,
        "space" | "pause" => Command::TogglePause,
        "n" | "next" => Command::Next,
        "b" | "prev" => Command::Previous,
        "stop" => Command::Stop,
        "q" | "queue" => Command::ShowQueue,
        "cq" | "clear" => Command::ClearQueue,
        "+" => Command::SeekForward,
        "-" => Command::SeekBackward,
        "v" => match arg.parse::<i64>() {
            Ok(v) => Command::SetVolume(v.clamp(0, 100) as u8),
            Err(_) => Command::Usage("v <0-100>"),
        },
        // No command matched: treat the whole line as a song search.
        _ => Command::Search(input.to_string(), SearchKind::Songs),
    };
    Some(cmd)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_aliases() {
        assert_eq!(parse_command("x"), Some(Command::Exit));
        assert_eq!(parse_command("pause"), Some(Command::TogglePause));
        assert_eq!(parse_command("n"), Some(Command::Next));
        assert_eq!(parse_command("b"), Some(Command::Previous));
        assert_eq!(parse_command("+"), Some(Command::SeekForward));
        assert_eq!(parse_command("-"), Some(Command::SeekBackward));
        assert_eq!(parse_command("  "), None);
    }

    #[test]
    fn test_search_kinds() {
        assert_eq!(
            parse_command("s dark side of the moon"),
            Some(Command::Search(
                "dark side of the moon".to_string(),
                SearchKind::Songs
            ))
        );
        assert_eq!(
            parse_command("sa abbey road"),
            Some(Command::Search("abbey road".to_string(), SearchKind::Albums))
        );
        assert_eq!(
            parse_command("sp focus"),
            Some(Command::Search("focus".to_string(), SearchKind::Playlists))
        );
        assert_eq!(parse_command("s"), Some(Command::Usage("search <query>")));
    }

    #[test]
    fn test_play_and_add_selection() {
        assert_eq!(parse_command("p 3"), Some(Command::Play(3)));
        assert_eq!(parse_command("play 12"), Some(Command::Play(12)));
        assert_eq!(parse_command("a 1"), Some(Command::Add(1)));
        assert_eq!(parse_command("p zero"), Some(Command::Usage("play <number>")));
        assert_eq!(parse_command("p 0"), Some(Command::Usage("play <number>")));
    }

    #[test]
    fn test_volume_is_clamped_before_the_player_sees_it() {
        assert_eq!(parse_command("v 150"), Some(Command::SetVolume(100)));
        assert_eq!(parse_command("v -5"), Some(Command::SetVolume(0)));
        assert_eq!(parse_command("v 42"), Some(Command::SetVolume(42)));
        assert_eq!(parse_command("v loud"), Some(Command::Usage("v <0-100>")));
    }

    #[test]
    fn test_free_text_falls_back_to_song_search() {
        assert_eq!(
            parse_command("bohemian rhapsody"),
            Some(Command::Search(
                "bohemian rhapsody".to_string(),
                SearchKind::Songs
            ))
        );
    }
}
