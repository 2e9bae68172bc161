//! REPL (Read-Eval-Print Loop) for single-agent questions about an image

use crate::{ConsoleFormatter, ProgressReporter};
use colored::Colorize;
use groupchat_application::{AskSession, NoProgress};
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RlResult};

/// What the user typed, classified
#[derive(Debug, PartialEq, Eq)]
pub enum ReplInput<'a> {
    Empty,
    Quit,
    Help,
    History,
    Question(&'a str),
    UnknownCommand(&'a str),
}

impl<'a> ReplInput<'a> {
    pub fn parse(line: &'a str) -> Self {
        let line = line.trim();
        if line.is_empty() {
            return ReplInput::Empty;
        }
        if line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("exit") {
            return ReplInput::Quit;
        }
        match line {
            "/quit" | "/exit" | "/q" => ReplInput::Quit,
            "/help" | "/h" | "/?" => ReplInput::Help,
            "/history" => ReplInput::History,
            cmd if cmd.starts_with('/') => ReplInput::UnknownCommand(cmd),
            question => ReplInput::Question(question),
        }
    }
}

/// Interactive question/answer loop over one image
pub struct AskRepl {
    session: AskSession,
    image_label: String,
    show_progress: bool,
}

impl AskRepl {
    pub fn new(session: AskSession, image_label: impl Into<String>) -> Self {
        Self {
            session,
            image_label: image_label.into(),
            show_progress: true,
        }
    }

    /// Set whether to show progress
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Run the interactive REPL, optionally answering `first_question` first
    pub async fn run(&mut self, first_question: Option<&str>) -> RlResult<()> {
        let mut rl = DefaultEditor::new()?;

        let history_path =
            dirs::data_dir().map(|p| p.join("vision-groupchat").join("ask_history.txt"));

        if let Some(ref path) = history_path {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let _ = rl.load_history(path);
        }

        self.print_welcome();

        if let Some(question) = first_question.filter(|q| !q.trim().is_empty()) {
            println!("{} {}", ">>>".dimmed(), question);
            self.process_question(question).await;
        }

        loop {
            let line = match rl.readline(">>> ") {
                Ok(line) => line,
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("Bye!");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    break;
                }
            };

            match ReplInput::parse(&line) {
                ReplInput::Empty => continue,
                ReplInput::Quit => {
                    println!("Bye!");
                    break;
                }
                ReplInput::Help => Self::print_help(),
                ReplInput::History => {
                    println!("{}", ConsoleFormatter::format_transcript(self.session.transcript()));
                }
                ReplInput::UnknownCommand(cmd) => {
                    println!("Unknown command: {}", cmd);
                    println!("Type /help for available commands");
                }
                ReplInput::Question(question) => {
                    let _ = rl.add_history_entry(question);
                    self.process_question(question).await;
                }
            }
        }

        if let Some(ref path) = history_path {
            let _ = rl.save_history(path);
        }

        Ok(())
    }

    fn print_welcome(&self) {
        println!();
        println!("╭─────────────────────────────────────────────╮");
        println!("│         Vision Groupchat - Ask Mode         │");
        println!("╰─────────────────────────────────────────────╯");
        println!();
        println!("Image: {}", self.image_label);
        println!();
        Self::print_help();
    }

    fn print_help() {
        println!("Commands:");
        println!("  /help, /h, /?      - Show this help");
        println!("  /history           - Show the conversation so far");
        println!("  quit, /quit, /q    - Exit");
        println!();
    }

    async fn process_question(&mut self, question: &str) {
        let result = if self.show_progress {
            let progress = ProgressReporter::new();
            self.session.ask_with_progress(question, &progress).await
        } else {
            self.session.ask_with_progress(question, &NoProgress).await
        };

        match result {
            Ok(answer) => {
                if !self.show_progress {
                    print!("{}", ConsoleFormatter::format_message(&answer));
                }
            }
            Err(e) => {
                eprintln!("{} {}", "Error:".red().bold(), e);
            }
        }
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quit_is_case_insensitive() {
        assert_eq!(ReplInput::parse("quit"), ReplInput::Quit);
        assert_eq!(ReplInput::parse("  QUIT "), ReplInput::Quit);
        assert_eq!(ReplInput::parse("Exit"), ReplInput::Quit);
        assert_eq!(ReplInput::parse("/quit"), ReplInput::Quit);
        assert_eq!(ReplInput::parse("/q"), ReplInput::Quit);
    }

    #[test]
    fn test_commands_and_questions() {
        assert_eq!(ReplInput::parse(""), ReplInput::Empty);
        assert_eq!(ReplInput::parse("   "), ReplInput::Empty);
        assert_eq!(ReplInput::parse("/help"), ReplInput::Help);
        assert_eq!(ReplInput::parse("/history"), ReplInput::History);
        assert_eq!(
            ReplInput::parse("/colors"),
            ReplInput::UnknownCommand("/colors")
        );
        assert_eq!(
            ReplInput::parse(" What colour is the start node? "),
            ReplInput::Question("What colour is the start node?")
        );
        // Only the exact word quits
        assert_eq!(
            ReplInput::parse("quit smoking?"),
            ReplInput::Question("quit smoking?")
        );
    }
}
