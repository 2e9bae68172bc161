//! Termination strategy seam

use crate::conversation::Transcript;

/// Decides, after each appended message, whether a conversation is over.
///
/// Implementations must be pure over the transcript: the driver may call
/// them any number of times and expects the same answer for the same
/// input. Any `Fn(&Transcript) -> bool` closure is a strategy, so ad-hoc
/// rules don't need a dedicated type:
///
/// ```
/// use groupchat_domain::conversation::{Message, Transcript};
/// use groupchat_domain::termination::TerminationStrategy;
///
/// let never = |_: &Transcript| false;
/// let t = Transcript::with_initial(Message::user("hi"));
/// assert!(!never.should_terminate(&t));
/// ```
pub trait TerminationStrategy: Send + Sync {
    fn should_terminate(&self, transcript: &Transcript) -> bool;
}

impl<F> TerminationStrategy for F
where
    F: Fn(&Transcript) -> bool + Send + Sync,
{
    fn should_terminate(&self, transcript: &Transcript) -> bool {
        self(transcript)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::Message;

    #[test]
    fn test_closure_strategy() {
        let long_enough = |t: &Transcript| t.len() >= 2;
        let mut t = Transcript::with_initial(Message::user("a"));
        assert!(!long_enough.should_terminate(&t));
        t.push(Message::user("b"));
        assert!(long_enough.should_terminate(&t));
    }

    #[test]
    fn test_boxed_strategy() {
        let strategy: Box<dyn TerminationStrategy> = Box::new(|_: &Transcript| true);
        assert!(strategy.should_terminate(&Transcript::new()));
    }
}
