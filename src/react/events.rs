//! ReAct 过程事件：供控制台（或未来前端）展示思考、工具调用、观察与回复

use serde::Serialize;

/// 单步过程事件（可序列化为 JSON 供前端展示）
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReactEvent {
    /// ReAct 步数更新（当前第几步）
    StepUpdate { step: usize, max_steps: usize },
    /// 正在调用 LLM 思考
    Thinking,
    /// LLM 的推理文本（截断预览）
    ThoughtContent { text: String },
    /// 调用工具
    ToolCall { tool: String, input: String },
    /// 工具返回（预览，避免过长）
    Observation { tool: String, preview: String },
    /// 循环内恢复动作（未知工具 / 格式错误的纠正反馈）
    Recovery { detail: String },
    /// 最终回复的一小段（流式输出）
    MessageChunk { text: String },
    /// 最终回复结束
    MessageDone,
    /// 错误
    Error { text: String },
}
