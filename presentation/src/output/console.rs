//! Console output formatter for group chat results

use colored::Colorize;
use groupchat_application::GroupChatOutcome;
use groupchat_domain::{Content, ContentItem, ImageData, Message, Role, TerminationReason, Transcript};
use std::path::Path;

/// Formats chat messages and outcomes for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Turn colored output on or off for the whole process
    pub fn set_color(enabled: bool) {
        if !enabled {
            colored::control::set_override(false);
        }
    }

    /// Banner printed before the chat starts
    pub fn format_start(image: &Path, endpoint: &str, deployment: &str) -> String {
        let mut output = String::new();
        output.push_str(&Self::header("Vision Group Chat"));
        output.push('\n');
        output.push_str(&format!("{} {}\n", "Endpoint:".cyan().bold(), endpoint));
        output.push_str(&format!("{} {}\n", "Deployment:".cyan().bold(), deployment));
        output.push_str(&format!("{} {}\n", "Image:".cyan().bold(), image.display()));
        output
    }

    /// Heading line for one speaker
    pub fn speaker_heading(speaker: &str) -> String {
        format!("── {} ──", speaker).yellow().bold().to_string()
    }

    /// One message with its speaker heading
    pub fn format_message(message: &Message) -> String {
        let heading = match message.role() {
            Role::Assistant => Self::speaker_heading(&message.speaker_label()),
            _ => format!("── {} ──", message.speaker_label()).dimmed().to_string(),
        };
        format!("\n{}\n{}\n", heading, Self::format_content(message.content()))
    }

    /// Text content as-is; images as a short placeholder
    pub fn format_content(content: &Content) -> String {
        match content {
            Content::Text(text) => text.clone(),
            Content::Image(image) => Self::image_placeholder(image),
            Content::Mixed(items) => items
                .iter()
                .map(|item| match item {
                    ContentItem::Text(text) => text.clone(),
                    ContentItem::Image(image) => Self::image_placeholder(image),
                })
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }

    fn image_placeholder(image: &ImageData) -> String {
        format!("[image: {}, {}]", image.mime_type(), Self::human_size(image.len()))
            .dimmed()
            .to_string()
    }

    /// Every message of a transcript in order
    pub fn format_transcript(transcript: &Transcript) -> String {
        let mut output = Self::section_header("Conversation");
        for message in transcript {
            output.push_str(&Self::format_message(message));
        }
        output
    }

    /// Closing summary with the termination reason
    pub fn format_outcome(outcome: &GroupChatOutcome) -> String {
        let summary = format!(
            "Conversation complete: {} after {} turn{}",
            outcome.reason,
            outcome.turns,
            if outcome.turns == 1 { "" } else { "s" }
        );
        let summary = match outcome.reason {
            TerminationReason::Approved => summary.green().bold(),
            TerminationReason::TurnLimitReached => summary.yellow().bold(),
        };
        format!("{}\n{}\n", Self::footer(), summary)
    }

    /// Setup help shown when the Azure resource isn't configured or reachable
    pub fn setup_checklist() -> String {
        let mut output = String::new();
        output.push_str(&format!("\n{}\n", "Setup checklist:".cyan().bold()));
        output.push_str(
            "1. Configure Azure OpenAI in groupchat.toml (or GROUPCHAT_AZURE_OPENAI__* variables):\n",
        );
        output.push_str("   - azure_openai.endpoint: your Azure OpenAI endpoint URL\n");
        output.push_str("   - azure_openai.deployment_name: a vision-capable model deployment\n");
        output.push_str("2. Authenticate: az login (or set AZURE_OPENAI_API_KEY)\n");
        output.push_str("3. Ensure the deployment supports vision (e.g. gpt-4o)\n");
        output.push_str("4. Verify the Azure OpenAI resource is reachable from this machine\n");
        output.push_str(&format!("\n{}\n", "Example groupchat.toml:".cyan().bold()));
        output.push_str("[azure_openai]\n");
        output.push_str("endpoint = \"https://myresource.openai.azure.com/\"\n");
        output.push_str("deployment_name = \"gpt-4o\"\n");
        output
    }

    fn human_size(bytes: usize) -> String {
        const KB: f64 = 1024.0;
        let bytes = bytes as f64;
        if bytes < KB {
            format!("{} B", bytes)
        } else if bytes < KB * KB {
            format!("{:.1} KB", bytes / KB)
        } else {
            format!("{:.1} MB", bytes / (KB * KB))
        }
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use groupchat_domain::ParticipantId;

    fn outcome(reason: TerminationReason, turns: usize) -> GroupChatOutcome {
        GroupChatOutcome {
            reason,
            turns,
            transcript: Transcript::new(),
        }
    }

    #[test]
    fn test_message_shows_speaker_and_text() {
        let msg = Message::assistant(ParticipantId::new("VisionAgent"), "A flowchart.");
        let out = ConsoleFormatter::format_message(&msg);
        assert!(out.contains("VisionAgent"));
        assert!(out.contains("A flowchart."));
    }

    #[test]
    fn test_image_is_a_placeholder() {
        let msg = Message::user_with_image(
            ImageData::new(vec![0u8; 2048], "image/png"),
            Some("What is this?"),
        );
        let out = ConsoleFormatter::format_message(&msg);
        assert!(out.contains("image/png, 2.0 KB"));
        assert!(out.contains("What is this?"));
    }

    #[test]
    fn test_outcome_names_reason() {
        let out = ConsoleFormatter::format_outcome(&outcome(TerminationReason::Approved, 2));
        assert!(out.contains("approved after 2 turns"));

        let out = ConsoleFormatter::format_outcome(&outcome(TerminationReason::TurnLimitReached, 1));
        assert!(out.contains("turn_limit_reached after 1 turn"));
    }

    #[test]
    fn test_transcript_keeps_order() {
        let transcript: Transcript = vec![
            Message::user("describe it"),
            Message::assistant(ParticipantId::new("VisionAgent"), "first"),
            Message::assistant(ParticipantId::new("ReviewAgent"), "second"),
        ]
        .into_iter()
        .collect();
        let out = ConsoleFormatter::format_transcript(&transcript);
        let first = out.find("first").unwrap();
        let second = out.find("second").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_setup_checklist_mentions_required_keys() {
        let out = ConsoleFormatter::setup_checklist();
        assert!(out.contains("azure_openai.endpoint"));
        assert!(out.contains("azure_openai.deployment_name"));
        assert!(out.contains("az login"));
    }

    #[test]
    fn test_human_size() {
        assert_eq!(ConsoleFormatter::human_size(512), "512 B");
        assert_eq!(ConsoleFormatter::human_size(1536), "1.5 KB");
        assert_eq!(ConsoleFormatter::human_size(3 * 1024 * 1024), "3.0 MB");
    }

    #[test]
    fn test_indent() {
        assert_eq!(ConsoleFormatter::indent("a\nb", "  "), "  a\n  b");
    }
}
