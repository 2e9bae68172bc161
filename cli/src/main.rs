//! CLI entrypoint for vision-groupchat
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use groupchat_application::{
    AskSession, ChatParams, ChatProgressNotifier, ConversationLogger, GatewayError, GroupChat,
    LlmParticipant, NoConversationLogger, NoProgress, Participant, RunGroupChatError,
};
use groupchat_domain::{
    ApprovalTermination, DomainError, ImageData, Message, ParticipantId, PromptTemplate,
    REVIEW_AGENT_NAME, TerminationConfig, VISION_AGENT_NAME,
};
use groupchat_infrastructure::{
    AzureOpenAiGateway, ConfigLoader, FileConfig, ImageLoader, JsonlConversationLogger,
};
use groupchat_presentation::{AskRepl, Cli, ConsoleFormatter, ProgressReporter, SimpleProgress};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).context("Failed to load configuration")?
    };
    apply_cli_overrides(&mut config, &cli);

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        println!();
        println!("{}", config.to_toml_string()?);
        return Ok(());
    }

    let _log_guard = init_tracing(cli.verbose, config.logging.log_dir.as_deref());
    ConsoleFormatter::set_color(config.output.color);

    info!("Starting vision-groupchat");

    let issues = config.validate();
    if !issues.is_empty() {
        for issue in &issues {
            eprintln!("Configuration error: {}", issue);
        }
        if issues.iter().any(|i| i.is_setup_issue()) {
            eprintln!("{}", ConsoleFormatter::setup_checklist());
        }
        bail!("invalid configuration");
    }

    // Pre-flight: a bad image fails before any agent is called
    let image_path = cli
        .image
        .clone()
        .context("An image path is required")?;
    let image = ImageLoader::new().load(&image_path).await?;

    // === Dependency Injection ===
    let settings = config.azure_openai.to_settings()?;
    let credential = config.azure_openai.credential()?;
    let gateway = Arc::new(AzureOpenAiGateway::new(settings.clone(), credential)?);
    let logger = conversation_logger(config.logging.conversation_log.as_deref());

    let (turn_order, _) = config.chat.parse_turn_order();
    let params = ChatParams::default()
        .with_turn_order(turn_order)
        .with_turn_timeout_seconds(config.chat.turn_timeout_seconds);

    if cli.ask {
        let name = config.agents.vision.name_or(VISION_AGENT_NAME);
        let instructions = config
            .agents
            .vision
            .instructions()
            .unwrap_or(PromptTemplate::ask_instructions());
        let agent = LlmParticipant::new(ParticipantId::try_new(name)?, instructions, gateway);

        let session = AskSession::new(Arc::new(agent), image)
            .with_params(params)
            .with_logger(logger);
        let mut repl = AskRepl::new(session, image_path.display().to_string())
            .with_progress(config.output.show_progress);
        repl.run(cli.question.as_deref()).await?;
        return Ok(());
    }

    let chat = build_group_chat(&config, gateway, params)?.with_logger(logger);

    if !cli.quiet {
        println!(
            "{}",
            ConsoleFormatter::format_start(&image_path, &settings.endpoint, &settings.deployment)
        );
    }

    run_group_chat(chat, image, cli.question.as_deref(), &cli, &config).await
}

/// CLI flags take precedence over every config source
fn apply_cli_overrides(config: &mut FileConfig, cli: &Cli) {
    if let Some(max) = cli.max_iterations {
        config.chat.maximum_iterations = max;
    }
    if let Some(trigger) = &cli.trigger {
        config.chat.trigger_phrase = trigger.clone();
    }
    if !cli.authorized.is_empty() {
        config.chat.authorized = Some(cli.authorized.clone());
    }
    if let Some(path) = &cli.log_conversation {
        config.logging.conversation_log = Some(path.clone());
    }
    if cli.quiet {
        config.output.show_progress = false;
    }
}

fn init_tracing(verbose: u8, log_dir: Option<&Path>) -> Option<WorkerGuard> {
    // Initialize logging based on verbosity level
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };

    let (file_layer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "vision-groupchat.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(level))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(file_layer)
        .init();

    guard
}

fn conversation_logger(path: Option<&Path>) -> Arc<dyn ConversationLogger> {
    match path.and_then(JsonlConversationLogger::new) {
        Some(logger) => {
            info!("Logging conversation to {}", logger.path().display());
            Arc::new(logger)
        }
        None => Arc::new(NoConversationLogger),
    }
}

fn build_group_chat(
    config: &FileConfig,
    gateway: Arc<AzureOpenAiGateway>,
    params: ChatParams,
) -> Result<GroupChat> {
    let chat = &config.chat;

    let vision_name = config.agents.vision.name_or(VISION_AGENT_NAME);
    let vision_instructions = config
        .agents
        .vision
        .instructions()
        .map(str::to_string)
        .unwrap_or_else(|| PromptTemplate::vision_instructions().to_string());
    let vision = LlmParticipant::new(
        ParticipantId::try_new(vision_name)?,
        vision_instructions,
        Arc::clone(&gateway),
    );

    let review_name = config.agents.review.name_or(REVIEW_AGENT_NAME);
    let review_instructions = config
        .agents
        .review
        .instructions()
        .map(str::to_string)
        .unwrap_or_else(|| PromptTemplate::review_instructions(&chat.trigger_phrase));
    let review = LlmParticipant::new(
        ParticipantId::try_new(review_name)?,
        review_instructions,
        gateway,
    );

    let authorized = authorized_ids(chat.authorized.as_deref(), review.id())?;

    let policy = ApprovalTermination::new(
        TerminationConfig::new(authorized)
            .with_maximum_iterations(chat.maximum_iterations)
            .with_trigger_phrase(chat.trigger_phrase.clone()),
    )?;

    let participants: Vec<Arc<dyn Participant>> = vec![Arc::new(vision), Arc::new(review)];
    Ok(GroupChat::with_approval(participants, policy, params)?)
}

async fn run_group_chat(
    mut chat: GroupChat,
    image: ImageData,
    question: Option<&str>,
    cli: &Cli,
    config: &FileConfig,
) -> Result<()> {
    chat.add_message(Message::user_with_image(image, question));

    let progress: Box<dyn ChatProgressNotifier> = if cli.quiet {
        Box::new(NoProgress)
    } else if config.output.show_progress {
        Box::new(ProgressReporter::new())
    } else {
        Box::new(SimpleProgress)
    };

    match chat.run_with_progress(progress.as_ref()).await {
        Ok(outcome) => {
            if cli.quiet {
                println!("{}", ConsoleFormatter::format_transcript(&outcome.transcript));
            }
            println!("{}", ConsoleFormatter::format_outcome(&outcome));
            Ok(())
        }
        Err(e) => {
            if let Some(gateway_error) = e.generation_error()
                && needs_setup_help(gateway_error)
            {
                eprintln!("{}", ConsoleFormatter::setup_checklist());
            }
            if let RunGroupChatError::Generation { .. } = e {
                warn!("Group chat aborted: {}", e);
            }
            Err(e.into())
        }
    }
}

/// Participants allowed to end the chat; the review agent unless configured
fn authorized_ids(
    names: Option<&[String]>,
    fallback: &ParticipantId,
) -> std::result::Result<Vec<ParticipantId>, DomainError> {
    match names {
        Some(names) => names
            .iter()
            .filter(|n| !n.trim().is_empty())
            .map(|n| n.parse())
            .collect(),
        None => Ok(vec![fallback.clone()]),
    }
}

/// Errors that usually mean the resource or login isn't set up
fn needs_setup_help(error: &GatewayError) -> bool {
    matches!(
        error,
        GatewayError::Authentication(_) | GatewayError::NotFound(_) | GatewayError::ConnectionError(_)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("vision-groupchat").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn test_cli_overrides_config() {
        let cli = parse(&[
            "-n",
            "4",
            "--trigger",
            "LGTM",
            "--authorized",
            "VisionAgent",
            "--log-conversation",
            "out.jsonl",
            "-q",
            "a.png",
        ]);
        let mut config = FileConfig::default();
        apply_cli_overrides(&mut config, &cli);

        assert_eq!(config.chat.maximum_iterations, 4);
        assert_eq!(config.chat.trigger_phrase, "LGTM");
        assert_eq!(config.chat.authorized, Some(vec!["VisionAgent".to_string()]));
        assert_eq!(
            config.logging.conversation_log,
            Some(PathBuf::from("out.jsonl"))
        );
        assert!(!config.output.show_progress);
    }

    #[test]
    fn test_no_flags_keep_config() {
        let cli = parse(&["a.png"]);
        let mut config = FileConfig::default();
        config.chat.maximum_iterations = 9;
        apply_cli_overrides(&mut config, &cli);
        assert_eq!(config.chat.maximum_iterations, 9);
        assert!(config.chat.authorized.is_none());
        assert!(config.output.show_progress);
    }

    #[test]
    fn test_group_chat_defaults_to_review_agent_approval() {
        let mut config = FileConfig::default();
        config.azure_openai.endpoint = Some("https://res.openai.azure.com".to_string());
        config.azure_openai.deployment_name = Some("gpt-4o".to_string());
        config.azure_openai.api_key = Some("k".to_string());
        let gateway = Arc::new(
            AzureOpenAiGateway::new(
                config.azure_openai.to_settings().unwrap(),
                config.azure_openai.credential().unwrap(),
            )
            .unwrap(),
        );

        let chat = build_group_chat(&config, gateway, ChatParams::default()).unwrap();
        assert_eq!(
            chat.participant_ids(),
            vec![
                ParticipantId::new(VISION_AGENT_NAME),
                ParticipantId::new(REVIEW_AGENT_NAME)
            ]
        );
        assert_eq!(chat.maximum_iterations(), 3);
    }

    #[test]
    fn test_authorized_names_are_trimmed() {
        let review = ParticipantId::new(REVIEW_AGENT_NAME);
        let names = vec![
            " ReviewAgent".to_string(),
            "VisionAgent \t".to_string(),
            "  ".to_string(),
        ];
        let ids = authorized_ids(Some(&names), &review).unwrap();
        assert_eq!(
            ids,
            vec![
                ParticipantId::new(REVIEW_AGENT_NAME),
                ParticipantId::new(VISION_AGENT_NAME)
            ]
        );
    }

    #[test]
    fn test_authorized_defaults_to_review_agent() {
        let review = ParticipantId::new("Critic");
        assert_eq!(authorized_ids(None, &review).unwrap(), vec![review.clone()]);
    }

    #[test]
    fn test_setup_help_errors() {
        assert!(needs_setup_help(&GatewayError::Authentication("401".into())));
        assert!(needs_setup_help(&GatewayError::NotFound("404".into())));
        assert!(!needs_setup_help(&GatewayError::RateLimited("429".into())));
        assert!(!needs_setup_help(&GatewayError::Timeout));
    }
}
