//! 记忆层：会话级问答历史

pub mod conversation;

pub use conversation::{ConversationMemory, Exchange, Message, Role};
