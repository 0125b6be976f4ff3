use std::io::{stdout, Write};

use anyhow::Result;
use crossterm::style::Stylize;
use crossterm::{cursor, execute, terminal};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::mpsc;
use tracing::{info, warn};

use super::{parse_command, Command};
use crate::config::Config;
use crate::player::{PlaybackController, PlaybackState, PlayerError, PlayerEvent, Track};
use crate::search::{Catalog, SearchKind};

enum Input {
    Line(Option<String>),
    Event(PlayerEvent),
    Interrupt,
}

/// The interactive loop. Owns the controller and is the only task that
/// mutates it; monitor completions and SIGINT arrive as events through the
/// same select, so playback state never races user input.
pub struct App {
    controller: PlaybackController,
    events: mpsc::UnboundedReceiver<PlayerEvent>,
    catalog: Catalog,
    seek_step: i64,
    results: Vec<Track>,
    results_kind: SearchKind,
    should_quit: bool,
}

impl App {
    pub fn new(config: &Config, socket_path: std::path::PathBuf) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let controller = PlaybackController::new(config.launch_spec(), socket_path, events_tx);
        let catalog = Catalog::new(&config.search.binary, config.search.result_limit);
        Self {
            controller,
            events: events_rx,
            catalog,
            seek_step: config.playback.seek_step as i64,
            results: Vec::new(),
            results_kind: SearchKind::Songs,
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut sigint = signal(SignalKind::interrupt())?;
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        clear_screen();
        print_banner();
        print_help();

        while !self.should_quit {
            self.print_now_playing();
            prompt()?;

            // Resolve the select into a plain value first so the handlers
            // below can borrow the whole App again.
            let input = tokio::select! {
                line = lines.next_line() => Input::Line(line?),
                Some(event) = self.events.recv() => Input::Event(event),
                _ = sigint.recv() => Input::Interrupt,
            };

            match input {
                Input::Line(Some(line)) => self.handle_line(&line).await,
                // EOF on stdin ends the session like an exit command.
                Input::Line(None) => self.shutdown().await,
                Input::Event(event) => {
                    println!();
                    self.handle_event(event).await;
                }
                Input::Interrupt => {
                    info!("interrupt received, shutting down");
                    self.shutdown().await;
                }
            }
        }
        Ok(())
    }

    async fn handle_line(&mut self, line: &str) {
        let Some(command) = parse_command(line) else {
            return;
        };
        match command {
            Command::Exit => self.shutdown().await,
            Command::Help => print_help(),
            Command::ClearScreen => {
                clear_screen();
                print_banner();
            }
            Command::Usage(usage) => notice(&format!("Usage: {usage}")),
            Command::Search(query, kind) => self.do_search(&query, kind).await,
            Command::Play(n) => self.do_play(n).await,
            Command::Add(n) => self.do_add(n),
            Command::PlayAll => self.do_play_all().await,
            Command::TogglePause => match self.controller.toggle_pause().await {
                Ok(PlaybackState::Paused) => success("Paused"),
                Ok(_) => success("Resumed"),
                Err(PlayerError::NotPlaying) => notice("Nothing playing."),
                Err(e) => report(&e),
            },
            Command::Next => match self.controller.next().await {
                Ok(track) => self.announce(&track),
                Err(e) => report(&e),
            },
            Command::Previous => match self.controller.previous().await {
                Ok(track) => self.announce(&track),
                Err(e) => report(&e),
            },
            Command::Stop => {
                self.controller.stop().await;
                notice("Playback stopped.");
            }
            Command::ShowQueue => self.print_queue(),
            Command::ClearQueue => {
                self.controller.stop().await;
                self.controller.clear_queue();
                notice("Queue cleared.");
            }
            Command::SeekForward => match self.controller.seek(self.seek_step).await {
                Ok(()) => dim(&format!(">> {}s", self.seek_step)),
                Err(PlayerError::NotPlaying) => notice("Nothing playing."),
                Err(e) => report(&e),
            },
            Command::SeekBackward => match self.controller.seek(-self.seek_step).await {
                Ok(()) => dim(&format!("<< {}s", self.seek_step)),
                Err(PlayerError::NotPlaying) => notice("Nothing playing."),
                Err(e) => report(&e),
            },
            Command::SetVolume(volume) => match self.controller.set_volume(volume).await {
                Ok(()) => dim(&format!("Volume: {volume}%")),
                Err(PlayerError::NotPlaying) => notice("Nothing playing."),
                Err(e) => report(&e),
            },
        }
    }

    async fn handle_event(&mut self, event: PlayerEvent) {
        let PlayerEvent::TrackFinished { generation } = event;
        match self.controller.on_track_finished(generation).await {
            Ok(Some(track)) => self.announce(&track),
            Ok(None) => {}
            Err(PlayerError::EndOfQueue) => notice("End of queue."),
            Err(e) => report(&e),
        }
    }

    async fn do_search(&mut self, query: &str, kind: SearchKind) {
        println!("\n{}", format!("  Searching for '{query}'...").cyan());
        match self.catalog.search(query, kind).await {
            Ok(results) => {
                self.results = results;
                self.results_kind = kind;
                self.print_results();
            }
            Err(e) => {
                warn!("search failed: {e:#}");
                error(&format!("Error searching: {e}"));
            }
        }
    }

    async fn do_play(&mut self, n: usize) {
        if self.results_kind != SearchKind::Songs {
            notice("Can only play songs directly. Use search first.");
            return;
        }
        let Some(track) = self.results.get(n - 1).cloned() else {
            error("Invalid selection.");
            return;
        };
        self.controller.replace_queue(vec![track]);
        match self.controller.play_current().await {
            Ok(track) => self.announce(&track),
            Err(e) => report(&e),
        }
    }

    fn do_add(&mut self, n: usize) {
        if self.results_kind != SearchKind::Songs {
            error("Invalid selection.");
            return;
        }
        let Some(track) = self.results.get(n - 1).cloned() else {
            error("Invalid selection.");
            return;
        };
        success(&format!("Added to queue: {}", track.title));
        self.controller.enqueue(track);
    }

    async fn do_play_all(&mut self) {
        if self.results.is_empty() || self.results_kind != SearchKind::Songs {
            notice("No songs to add.");
            return;
        }
        self.controller.replace_queue(self.results.clone());
        success(&format!("Added {} tracks to queue.", self.results.len()));
        match self.controller.play_current().await {
            Ok(track) => self.announce(&track),
            Err(e) => report(&e),
        }
    }

    async fn shutdown(&mut self) {
        self.controller.stop().await;
        println!("\n{}\n", "  Goodbye! 🎵".cyan());
        self.should_quit = true;
    }

    fn announce(&self, track: &Track) {
        println!(
            "\n  {} {}",
            "♪".yellow(),
            track.title.as_str().bold()
        );
        println!("    {}", format!("by {}", track.artist_line()).dim());
    }

    fn print_now_playing(&self) {
        if let Some(track) = self.controller.current_track() {
            let status = match self.controller.state() {
                PlaybackState::Playing => "▶ Playing".green(),
                PlaybackState::Paused => "⏸ Paused".yellow(),
                PlaybackState::Stopped => "⏹ Stopped".dim(),
            };
            println!("\n  {status}: {}", track.title);
            println!("    {}", format!("by {}", track.artist_line()).dim());
            if let Some(duration) = &track.duration {
                println!("    {}", format!("Duration: {duration}").dim());
            }
        }
        println!();
    }

    fn print_results(&self) {
        if self.results.is_empty() {
            notice("No results found.");
            return;
        }
        println!("\n  {}\n", "Search Results:".bold());
        for (i, track) in self.results.iter().enumerate() {
            let detail = match &track.duration {
                Some(d) => format!("{} • {}", track.artist_line(), d),
                None => track.artist_line(),
            };
            println!("  {} {}", format!("{:2}.", i + 1).cyan(), track.title);
            println!("      {}", detail.dim());
        }
        println!();
    }

    fn print_queue(&self) {
        let queue = self.controller.queue();
        if queue.is_empty() {
            notice("Queue is empty.");
            return;
        }
        println!("\n  {}\n", "Current Queue:".bold());
        let playing = self.controller.state() != PlaybackState::Stopped;
        for (i, track) in queue.items().iter().enumerate() {
            let here = i == queue.cursor();
            let marker = if here && playing { "▶ " } else { "  " };
            let line = format!("{marker}{}. {}", i + 1, track.title);
            if here {
                println!("  {}", line.green());
            } else {
                println!("  {line}");
            }
            println!("      {}", track.artist_line().dim());
        }
        println!();
    }
}

fn prompt() -> Result<()> {
    print!("{} ", "  >".bold());
    stdout().flush()?;
    Ok(())
}

fn clear_screen() {
    let _ = execute!(
        stdout(),
        terminal::Clear(terminal::ClearType::All),
        cursor::MoveTo(0, 0)
    );
}

fn print_banner() {
    println!("{}", "  ╔═══════════════════════════════════════════╗".cyan());
    println!("{}", "  ║       🎵  aulos - YouTube Music  🎵       ║".cyan());
    println!("{}", "  ╚═══════════════════════════════════════════╝".cyan());
}

fn print_help() {
    println!(
        "
  {}

  {}    - Search for songs
  {}           - Search for albums
  {}           - Search for playlists

  {}     - Play track from results
  {}      - Add track to queue
  {}          - Add all results to queue and play

  {}         - Toggle pause/play
  {}              - Next track
  {}              - Previous track
  {}                 - Stop playback

  {}             - Show queue
  {}            - Clear queue

  {}                 - Seek forward/backward
  {}            - Set volume

  {}              - Show this help
  {}              - Exit player
",
        "Commands:".bold(),
        "s, search <query>".cyan(),
        "sa <query>".cyan(),
        "sp <query>".cyan(),
        "p, play <number>".cyan(),
        "a, add <number>".cyan(),
        "pa, playall".cyan(),
        "space, pause".cyan(),
        "n, next".cyan(),
        "b, prev".cyan(),
        "stop".cyan(),
        "q, queue".cyan(),
        "cq, clear".cyan(),
        "+, -".cyan(),
        "v <0-100>".cyan(),
        "h, help".cyan(),
        "x, exit".cyan(),
    );
}

fn notice(msg: &str) {
    println!("  {}", msg.yellow());
}

fn success(msg: &str) {
    println!("  {}", msg.green());
}

fn error(msg: &str) {
    println!("  {}", msg.red());
}

fn dim(msg: &str) {
    println!("  {}", msg.dim());
}

fn report(err: &PlayerError) {
    match err {
        PlayerError::EndOfQueue => notice("End of queue."),
        PlayerError::StartOfQueue => notice("Beginning of queue."),
        PlayerError::NotPlaying => notice("Nothing playing."),
        PlayerError::LaunchFailed(msg) => error(&format!("Error: {msg}")),
        PlayerError::ChannelUnavailable(_) => error("Error: player control channel unavailable"),
    }
}
