//! Follow-up conversation about an analysis result.

mod driver;
mod message;
mod seed;
mod turn;

pub use driver::{ChatDriver, TurnOutcome};
pub use message::{ChatMessage, ChatRole};
pub use seed::{CHAT_SYSTEM_INSTRUCTION, WELCOME_MESSAGE, build_seed_message};
pub use turn::{CHAT_FAILURE_TEXT, ChatEvent, ChatState, Transition};
