//! Chat turn state machine.
//!
//! `idle → streaming → idle`, one model turn at a time. Every transition is
//! a pure function of the previous state and an event, so the machine is
//! tested without a model or a terminal.

use super::message::ChatMessage;

/// Shown as a fresh model message when a turn fails.
pub const CHAT_FAILURE_TEXT: &str =
    "Sorry, I ran into a problem while answering. Please try sending your message again.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEvent {
    /// The user submitted a message.
    UserSent(String),
    /// A reply fragment arrived for the streaming turn.
    Fragment(String),
    /// The model signalled the end of its turn.
    Completed,
    /// The turn could not be completed. The placeholder keeps its partial
    /// text but stops streaming, so no message is left marked as in flight.
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Accepted,
    /// The event did not apply in the current state; nothing changed.
    Ignored,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatState {
    messages: Vec<ChatMessage>,
    busy: bool,
}

impl ChatState {
    /// Idle state whose only message is a locally written welcome.
    pub fn with_welcome(text: impl Into<String>) -> Self {
        Self {
            messages: vec![ChatMessage::model(text)],
            busy: false,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// True while a model turn is streaming.
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn streaming_message(&self) -> Option<&ChatMessage> {
        self.messages.iter().rev().find(|message| message.streaming)
    }

    pub fn apply(mut self, event: ChatEvent) -> (Self, Transition) {
        let transition = match event {
            ChatEvent::UserSent(text) => {
                if self.busy || text.trim().is_empty() {
                    Transition::Ignored
                } else {
                    self.messages.push(ChatMessage::user(text));
                    self.messages.push(ChatMessage::placeholder());
                    self.busy = true;
                    Transition::Accepted
                }
            }
            ChatEvent::Fragment(text) => match self.streaming_mut() {
                Some(message) => {
                    message.text.push_str(&text);
                    Transition::Accepted
                }
                None => Transition::Ignored,
            },
            ChatEvent::Completed => match self.streaming_mut() {
                Some(message) => {
                    message.streaming = false;
                    self.busy = false;
                    Transition::Accepted
                }
                None => Transition::Ignored,
            },
            ChatEvent::Failed => {
                if self.busy {
                    // Partial text stays as received.
                    if let Some(message) = self.streaming_mut() {
                        message.streaming = false;
                    }
                    self.messages.push(ChatMessage::model(CHAT_FAILURE_TEXT));
                    self.busy = false;
                    Transition::Accepted
                } else {
                    Transition::Ignored
                }
            }
        };
        (self, transition)
    }

    fn streaming_mut(&mut self) -> Option<&mut ChatMessage> {
        if !self.busy {
            return None;
        }
        self.messages
            .iter_mut()
            .rev()
            .find(|message| message.streaming)
    }
}

#[cfg(test)]
mod tests {
    use super::super::message::ChatRole;
    use super::*;

    fn run(state: ChatState, events: impl IntoIterator<Item = ChatEvent>) -> ChatState {
        events
            .into_iter()
            .fold(state, |state, event| state.apply(event).0)
    }

    fn texts(state: &ChatState) -> Vec<(ChatRole, &str, bool)> {
        state
            .messages()
            .iter()
            .map(|m| (m.role, m.text.as_str(), m.streaming))
            .collect()
    }

    #[test]
    fn welcome_is_the_first_message() {
        let state = ChatState::with_welcome("Welcome!");
        assert_eq!(texts(&state), [(ChatRole::Model, "Welcome!", false)]);
        assert!(!state.is_busy());
    }

    #[test]
    fn full_turn_appends_fragments_in_order() {
        let state = run(
            ChatState::with_welcome("Welcome!"),
            [
                ChatEvent::UserSent("Why did views drop?".into()),
                ChatEvent::Fragment("Because ".into()),
                ChatEvent::Fragment("uploads slowed.".into()),
            ],
        );
        assert!(state.is_busy());
        assert_eq!(
            state.streaming_message().map(|m| m.text.as_str()),
            Some("Because uploads slowed.")
        );

        let (state, transition) = state.apply(ChatEvent::Completed);
        assert_eq!(transition, Transition::Accepted);
        assert!(!state.is_busy());
        assert_eq!(
            texts(&state),
            [
                (ChatRole::Model, "Welcome!", false),
                (ChatRole::User, "Why did views drop?", false),
                (ChatRole::Model, "Because uploads slowed.", false),
            ]
        );
    }

    #[test]
    fn send_while_streaming_changes_nothing() {
        let streaming = run(
            ChatState::with_welcome("Welcome!"),
            [
                ChatEvent::UserSent("first".into()),
                ChatEvent::Fragment("partial".into()),
            ],
        );
        let (after, transition) = streaming.clone().apply(ChatEvent::UserSent("second".into()));
        assert_eq!(transition, Transition::Ignored);
        assert_eq!(after, streaming);
        assert_eq!(after.messages().len(), 3);
    }

    #[test]
    fn failure_keeps_partial_text_and_appends_notice() {
        let state = run(
            ChatState::with_welcome("Welcome!"),
            [
                ChatEvent::UserSent("question".into()),
                ChatEvent::Fragment("half an ans".into()),
                ChatEvent::Failed,
            ],
        );
        assert!(!state.is_busy());
        assert_eq!(
            texts(&state)[2..],
            [
                (ChatRole::Model, "half an ans", false),
                (ChatRole::Model, CHAT_FAILURE_TEXT, false),
            ]
        );

        let (_, transition) = state.apply(ChatEvent::UserSent("retry".into()));
        assert_eq!(transition, Transition::Accepted);
    }

    #[test]
    fn events_outside_a_turn_are_ignored() {
        let idle = ChatState::with_welcome("Welcome!");
        for event in [
            ChatEvent::Fragment("stray".into()),
            ChatEvent::Completed,
            ChatEvent::Failed,
            ChatEvent::UserSent("   ".into()),
        ] {
            let (after, transition) = idle.clone().apply(event);
            assert_eq!(transition, Transition::Ignored);
            assert_eq!(after, idle);
        }
    }
}
