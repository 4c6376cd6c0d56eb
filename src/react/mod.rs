//! 认知层：誊本、prompt 渲染、Action 解析与 ReAct 主循环

pub mod events;
pub mod loop_;
pub mod parser;
pub mod prompt;
pub mod transcript;

pub use events::ReactEvent;
pub use loop_::{react_loop, AgentRun, RunStatus};
pub use parser::{leading_thought, parse, ParsedAction};
pub use prompt::PromptBuilder;
pub use transcript::{Transcript, TranscriptEntry};
