//! Transcript entity

use super::message::Message;

/// Ordered, append-only history of one conversation run.
///
/// Insertion order is the conversation order. Messages can be appended
/// but never edited or removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a transcript from an initial message
    pub fn with_initial(message: Message) -> Self {
        Self {
            messages: vec![message],
        }
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Most recent message, `None` when nothing has been said yet
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.messages.iter()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }
}

impl<'a> IntoIterator for &'a Transcript {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}

impl FromIterator<Message> for Transcript {
    fn from_iter<I: IntoIterator<Item = Message>>(iter: I) -> Self {
        Self {
            messages: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::participant::ParticipantId;

    #[test]
    fn test_empty_transcript() {
        let t = Transcript::new();
        assert!(t.is_empty());
        assert!(t.last().is_none());
    }

    #[test]
    fn test_append_preserves_order() {
        let mut t = Transcript::with_initial(Message::user("describe"));
        t.push(Message::assistant(ParticipantId::new("VisionAgent"), "one"));
        t.push(Message::assistant(ParticipantId::new("ReviewAgent"), "two"));

        assert_eq!(t.len(), 3);
        let texts: Vec<_> = t.iter().filter_map(|m| m.text()).collect();
        assert_eq!(texts, vec!["describe", "one", "two"]);
        assert_eq!(t.last().and_then(|m| m.text()).as_deref(), Some("two"));
    }

    #[test]
    fn test_from_iterator() {
        let t: Transcript = vec![Message::user("a"), Message::user("b")]
            .into_iter()
            .collect();
        assert_eq!(t.len(), 2);
    }
}
