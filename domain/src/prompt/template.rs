//! Prompt templates for the group chat personas

/// Default agent names, matching the two-agent review loop
pub const VISION_AGENT_NAME: &str = "VisionAgent";
pub const REVIEW_AGENT_NAME: &str = "ReviewAgent";

/// Templates for agent instructions and transcript rendering
pub struct PromptTemplate;

impl PromptTemplate {
    /// Instructions for the agent that analyses the image
    pub fn vision_instructions() -> &'static str {
        r#"You are a vision analysis expert.
Describe the image you are given accurately and completely: its structure, the elements it contains, and how they relate.
For diagrams and flowcharts, walk through every step and decision in order.
When a reviewer gives feedback, revise your description to address every point they raise."#
    }

    /// Instructions for the agent that reviews the description.
    ///
    /// The trigger phrase is embedded so the reviewer knows how to approve.
    pub fn review_instructions(trigger_phrase: &str) -> String {
        format!(
            r#"You are a meticulous reviewer.
Compare the latest image description against the image itself.
Point out anything missing, wrong, or unclear, and say concretely what should change.
If the description is accurate and complete, reply with the single word {} and nothing else.
Never say {} while you still have feedback."#,
            trigger_phrase, trigger_phrase
        )
    }

    /// Instructions for the single-agent question/answer mode
    pub fn ask_instructions() -> &'static str {
        r#"You are a helpful assistant that answers questions about images.
Answer using only what is visible in the image and the conversation so far.
If something cannot be determined from the image, say so."#
    }

    /// Default prompt when the user supplied an image without a question
    pub fn default_question() -> &'static str {
        "Describe this image in detail."
    }

    /// Render another participant's turn for a model that only knows
    /// user/assistant roles.
    pub fn attributed(speaker: &str, text: &str) -> String {
        format!("[{}]: {}", speaker, text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_review_instructions_embed_trigger() {
        let prompt = PromptTemplate::review_instructions("LGTM");
        assert!(prompt.contains("single word LGTM"));
        assert!(!prompt.contains("APPROVED"));
    }

    #[test]
    fn test_attributed() {
        assert_eq!(
            PromptTemplate::attributed("ReviewAgent", "Needs more detail"),
            "[ReviewAgent]: Needs more detail"
        );
    }
}
