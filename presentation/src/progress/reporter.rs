//! Progress reporting while agents take their turns

use crate::output::console::ConsoleFormatter;
use colored::Colorize;
use groupchat_application::{ChatProgressNotifier, GatewayError};
use groupchat_domain::{Message, ParticipantId, TerminationReason};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;
use std::sync::Mutex;
use std::time::Duration;

#[derive(Default)]
struct TurnState {
    spinner: Option<ProgressBar>,
    /// Whether part of the current reply has been printed
    streamed: bool,
    maximum_iterations: usize,
}

/// Shows a spinner while an agent is thinking, then streams its reply
pub struct ProgressReporter {
    state: Mutex<TurnState>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(TurnState::default()),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn turn_prefix(turn: usize, maximum_iterations: usize) -> String {
        if maximum_iterations > 0 {
            format!("Turn {}/{}", turn, maximum_iterations)
        } else {
            format!("Turn {}", turn)
        }
    }

    fn clear_spinner(state: &mut TurnState) {
        if let Some(spinner) = state.spinner.take() {
            spinner.finish_and_clear();
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatProgressNotifier for ProgressReporter {
    fn on_chat_start(&self, _participants: &[ParticipantId], maximum_iterations: usize) {
        if let Ok(mut state) = self.state.lock() {
            state.maximum_iterations = maximum_iterations;
        }
    }

    fn on_turn_start(&self, turn: usize, speaker: &ParticipantId) {
        let Ok(mut state) = self.state.lock() else {
            return;
        };
        Self::clear_spinner(&mut state);

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(Self::spinner_style());
        spinner.set_prefix(Self::turn_prefix(turn, state.maximum_iterations));
        spinner.set_message(format!("{} is thinking...", speaker));
        spinner.enable_steady_tick(Duration::from_millis(100));

        state.spinner = Some(spinner);
        state.streamed = false;
    }

    fn on_turn_chunk(&self, speaker: &ParticipantId, chunk: &str) {
        let Ok(mut state) = self.state.lock() else {
            return;
        };
        if !state.streamed {
            Self::clear_spinner(&mut state);
            println!("\n{}", ConsoleFormatter::speaker_heading(speaker.as_str()));
            state.streamed = true;
        }
        print!("{}", chunk);
        let _ = std::io::stdout().flush();
    }

    fn on_turn_complete(&self, _turn: usize, message: &Message) {
        let Ok(mut state) = self.state.lock() else {
            return;
        };
        Self::clear_spinner(&mut state);
        if state.streamed {
            println!();
        } else {
            print!("{}", ConsoleFormatter::format_message(message));
        }
        state.streamed = false;
    }

    fn on_turn_failed(&self, turn: usize, speaker: &ParticipantId, error: &GatewayError) {
        if let Ok(mut state) = self.state.lock() {
            Self::clear_spinner(&mut state);
            if state.streamed {
                println!();
            }
            state.streamed = false;
        }
        eprintln!(
            "{} {} failed on turn {} ({})",
            "x".red(),
            speaker,
            turn,
            error.category()
        );
    }

    fn on_chat_complete(&self, _reason: TerminationReason, _turns: usize) {
        if let Ok(mut state) = self.state.lock() {
            Self::clear_spinner(&mut state);
        }
    }
}

/// Simple text-based progress (no spinner, no streaming)
pub struct SimpleProgress;

impl ChatProgressNotifier for SimpleProgress {
    fn on_turn_start(&self, turn: usize, speaker: &ParticipantId) {
        println!("{} {} {}", "->".cyan(), format!("Turn {}:", turn).bold(), speaker);
    }

    fn on_turn_complete(&self, _turn: usize, message: &Message) {
        print!("{}", ConsoleFormatter::format_message(message));
    }

    fn on_turn_failed(&self, turn: usize, speaker: &ParticipantId, error: &GatewayError) {
        eprintln!("  {} {} failed on turn {}: {}", "x".red(), speaker, turn, error);
    }

    fn on_chat_complete(&self, _reason: TerminationReason, _turns: usize) {
        println!();
    }
}
