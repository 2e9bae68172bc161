//! CLI command definitions

use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for vision-groupchat
#[derive(Parser, Debug)]
#[command(name = "vision-groupchat")]
#[command(author, version, about = "Vision agent and review agent discuss an image until it is approved")]
#[command(long_about = r#"
Vision Groupchat puts two Azure OpenAI agents in a group chat about an image:

1. VisionAgent describes and analyses the image
2. ReviewAgent critiques the analysis and answers APPROVED when satisfied

The chat ends as soon as an authorized agent says the trigger phrase, or
after --max-iterations agent turns, whichever comes first.

With --ask, a single agent answers your questions about the image instead.

Configuration files are loaded from (in priority order):
1. GROUPCHAT_* environment variables (e.g. GROUPCHAT_AZURE_OPENAI__ENDPOINT)
2. --config <path>     Explicit config file
3. ./groupchat.toml    Project-level config
4. ~/.config/vision-groupchat/config.toml   Global config

Example:
  vision-groupchat flowchart.png
  vision-groupchat flowchart.png "Is the error path handled?"
  vision-groupchat --max-iterations 6 --trigger LGTM diagram.jpg
  vision-groupchat --ask screenshot.png
"#)]
pub struct Cli {
    /// Image to discuss
    #[arg(required_unless_present = "show_config")]
    pub image: Option<PathBuf>,

    /// Optional question to send along with the image
    pub question: Option<String>,

    /// Interactive single-agent question/answer mode
    #[arg(short, long)]
    pub ask: bool,

    /// Maximum number of agent turns
    #[arg(short = 'n', long, value_name = "N")]
    pub max_iterations: Option<usize>,

    /// Phrase that ends the chat when an authorized agent says it
    #[arg(short, long, value_name = "PHRASE")]
    pub trigger: Option<String>,

    /// Agent allowed to approve (can be specified multiple times)
    #[arg(long, value_name = "AGENT")]
    pub authorized: Vec<String>,

    /// Write the conversation as JSONL to this file
    #[arg(long, value_name = "PATH")]
    pub log_conversation: Option<PathBuf>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and the merged config, then exit
    #[arg(long)]
    pub show_config: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_group_chat_args() {
        let cli = Cli::try_parse_from([
            "vision-groupchat",
            "-n",
            "4",
            "--trigger",
            "LGTM",
            "--authorized",
            "ReviewAgent",
            "--authorized",
            "VisionAgent",
            "-vv",
            "flowchart.png",
            "What does it show?",
        ])
        .unwrap();

        assert_eq!(cli.image, Some(PathBuf::from("flowchart.png")));
        assert_eq!(cli.question.as_deref(), Some("What does it show?"));
        assert_eq!(cli.max_iterations, Some(4));
        assert_eq!(cli.trigger.as_deref(), Some("LGTM"));
        assert_eq!(cli.authorized, vec!["ReviewAgent", "VisionAgent"]);
        assert_eq!(cli.verbose, 2);
        assert!(!cli.ask);
    }

    #[test]
    fn test_image_required_unless_show_config() {
        assert!(Cli::try_parse_from(["vision-groupchat"]).is_err());

        let cli = Cli::try_parse_from(["vision-groupchat", "--show-config"]).unwrap();
        assert!(cli.show_config);
        assert!(cli.image.is_none());
    }

    #[test]
    fn test_rejects_non_numeric_iterations() {
        assert!(Cli::try_parse_from(["vision-groupchat", "-n", "many", "a.png"]).is_err());
    }
}
