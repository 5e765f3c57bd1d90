use colored::*;
use crossterm::{cursor::MoveTo, execute, terminal::{Clear, ClearType}};
use rpsroom_common::{Choice, Seat};
use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use tracing::debug;

use crate::commands::Command;

/// Rendering surface driven by the router. It never writes session state;
/// user intent comes back to the host as commands.
pub trait UiNotifier {
    fn show_message(&mut self, text: &str);
    /// Notice the user should not miss (server alerts, room closure)
    fn alert(&mut self, text: &str);
    /// `None` draws the neutral placeholder
    fn set_seat_choice_glyph(&mut self, seat: Seat, choice: Option<Choice>);
    fn set_scoreboard(&mut self, score_player1: u32, score_player2: u32);
    fn set_participant_names(&mut self, name1: &str, name2: &str);
    fn set_room_visible(&mut self, visible: bool);
    fn set_choice_affordances_visible(&mut self, visible: bool);
    fn confirm(&mut self, prompt: &str) -> bool;
}

/// Outcome of polling the console for input
#[derive(Debug, PartialEq, Eq)]
pub enum InputPoll {
    Line(String),
    Empty,
    Closed,
}

/// Full-screen terminal view, redrawn on every notification.
///
/// Stdin is read on a dedicated thread so that `confirm` and the host loop
/// share a single reader. Lines held back by [`TerminalUi::drain_typed_choices`]
/// are served before anything still in the channel.
pub struct TerminalUi {
    names: (String, String),
    glyphs: (Option<Choice>, Option<Choice>),
    scores: (u32, u32),
    message: String,
    notice: Option<String>,
    room_visible: bool,
    choices_visible: bool,
    lines: Receiver<String>,
    held: VecDeque<String>,
    modal: Arc<AtomicBool>,
}

impl TerminalUi {
    pub fn new() -> Self {
        let (tx, lines) = mpsc::channel();
        std::thread::spawn(move || {
            for line in io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                if tx.send(line).is_err() {
                    break;
                }
            }
            debug!("stdin closed");
        });

        Self::with_input(lines)
    }

    /// View fed by an arbitrary line source instead of stdin
    pub fn with_input(lines: Receiver<String>) -> Self {
        TerminalUi {
            names: ("player1".to_string(), "player2".to_string()),
            glyphs: (None, None),
            scores: (0, 0),
            message: "Connecting to your room...".to_string(),
            notice: None,
            room_visible: false,
            choices_visible: false,
            lines,
            held: VecDeque::new(),
            modal: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Set while a prompt holds the terminal and the host loop is parked
    pub fn modal_flag(&self) -> Arc<AtomicBool> {
        self.modal.clone()
    }

    /// Next line typed by the user, without blocking
    pub fn poll_line(&mut self) -> InputPoll {
        if let Some(line) = self.held.pop_front() {
            return InputPoll::Line(line);
        }

        match self.lines.try_recv() {
            Ok(line) => InputPoll::Line(line),
            Err(TryRecvError::Empty) => InputPoll::Empty,
            Err(TryRecvError::Disconnected) => InputPoll::Closed,
        }
    }

    /// Drops hands typed ahead while choosing was closed.
    /// Room commands (`leave`, `quit`) and anything unparsed stay queued.
    pub fn drain_typed_choices(&mut self) {
        while let Ok(line) = self.lines.try_recv() {
            match Command::parse(&line) {
                Some(Command::Choose(choice)) => debug!(?choice, "dropping choice typed ahead"),
                _ => self.held.push_back(line),
            }
        }
    }

    /// Blocks until the user presses Enter (or stdin closes)
    pub fn wait_for_enter(&mut self, prompt: &str) {
        println!("\n{}", prompt.dimmed());
        io::stdout().flush().ok();

        // Nothing typed before the prompt counts as the keypress
        self.held.clear();
        while self.lines.try_recv().is_ok() {}
        self.read_line_modal();
    }

    /// Next line in typed order, parking the caller until one arrives.
    /// `None` once stdin is closed.
    fn read_line_modal(&mut self) -> Option<String> {
        if let Some(line) = self.held.pop_front() {
            return Some(line);
        }

        self.modal.store(true, Ordering::SeqCst);
        let line = tokio::task::block_in_place(|| self.lines.recv()).ok();
        self.modal.store(false, Ordering::SeqCst);
        line
    }

    pub fn print_hint(&mut self, hint: &str) {
        println!("{}", hint.red());
        print!("  > ");
        io::stdout().flush().ok();
    }

    pub fn render(&self) {
        clear_screen().ok();

        println!("\n{}", "=".repeat(50));
        println!("{}", "  Rock-Paper-Scissors".bright_cyan().bold());
        println!("{}", "=".repeat(50));
        println!();

        if let Some(notice) = &self.notice {
            println!("  {}", format!("! {notice}").bright_yellow().bold());
            println!();
        }

        if self.room_visible {
            println!(
                "    {} {} - {}   {}",
                format!("{:<20}", self.names.0).bright_blue(),
                self.scores.0.to_string().bright_green(),
                self.scores.1.to_string().bright_green(),
                format!("{:>20}", self.names.1).bright_magenta()
            );
            println!(
                "    {:<20}         {:>20}",
                format_glyph(self.glyphs.0),
                format_glyph(self.glyphs.1)
            );
            println!();
        }

        println!("  {}", self.message.yellow());
        println!();

        if self.choices_visible {
            println!("{}", "  SELECT YOUR MOVE".bright_green().bold());
            println!(
                "{}",
                format!("  Enter your choice ({}), or 'leave':", hand_names()).dimmed()
            );
        } else {
            println!("{}", "  Commands: leave, quit".dimmed());
        }
        print!("  > ");
        io::stdout().flush().ok();
    }
}

impl UiNotifier for TerminalUi {
    fn show_message(&mut self, text: &str) {
        self.message = text.to_string();
        self.render();
    }

    fn alert(&mut self, text: &str) {
        self.notice = Some(text.to_string());
        self.render();
    }

    fn set_seat_choice_glyph(&mut self, seat: Seat, choice: Option<Choice>) {
        match seat {
            Seat::Player1 => self.glyphs.0 = choice,
            Seat::Player2 => self.glyphs.1 = choice,
        }
        self.render();
    }

    fn set_scoreboard(&mut self, score_player1: u32, score_player2: u32) {
        self.scores = (score_player1, score_player2);
        self.render();
    }

    fn set_participant_names(&mut self, name1: &str, name2: &str) {
        self.names = (name1.to_string(), name2.to_string());
        self.render();
    }

    fn set_room_visible(&mut self, visible: bool) {
        self.room_visible = visible;
        self.render();
    }

    fn set_choice_affordances_visible(&mut self, visible: bool) {
        self.choices_visible = visible;
        if visible {
            self.drain_typed_choices();
        }
        self.render();
    }

    fn confirm(&mut self, prompt: &str) -> bool {
        println!();
        print!("  {} {} ", prompt.bright_yellow(), "[y/N]".dimmed());
        io::stdout().flush().ok();

        // Modal: the host loop is parked until the user answers
        let answer = self.read_line_modal();
        let confirmed = matches!(answer.as_deref().map(str::trim), Some("y" | "Y" | "yes"));
        self.render();
        confirmed
    }
}

pub fn format_glyph(choice: Option<Choice>) -> String {
    match choice {
        Some(choice) => choice.to_string(),
        None => "---".to_string(),
    }
}

/// `rock/paper/scissors`, in the order hands are offered
pub fn hand_names() -> String {
    Choice::ALL
        .iter()
        .map(|choice| choice.to_string().to_lowercase())
        .collect::<Vec<_>>()
        .join("/")
}

pub fn clear_screen() -> io::Result<()> {
    let mut stdout = io::stdout();
    execute!(stdout, Clear(ClearType::All), MoveTo(0, 0))?;
    stdout.flush()
}
