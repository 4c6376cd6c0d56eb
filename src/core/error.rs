//! Agent 错误类型与恢复动作
//!
//! 与 RecoveryEngine 配合：循环内可恢复的错误（未知工具、格式错误）转为 Observation
//! 喂回推理；LLM 失败与取消才会中止当前 run。

use thiserror::Error;

/// Agent 运行过程中可能出现的错误（工具、解析、LLM、配置等）
#[derive(Error, Debug)]
pub enum AgentError {
    /// 工具执行过但失败（网络、解析、文件系统）
    #[error("Tool execution failed: {0}")]
    ToolExecutionFailed(String),

    #[error("Tool timeout: {0}")]
    ToolTimeout(String),

    /// 模型点名了注册表中不存在的工具
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// 模型输出中找不到 Action / Final Answer 标记
    #[error("Malformed action: {0}")]
    MalformedAction(String),

    /// 注册表构建时名称冲突（启动期配置错误）
    #[error("Duplicate tool name: {0}")]
    DuplicateTool(String),

    #[error("LLM error: {0}")]
    LlmError(String),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Cancelled by user")]
    Cancelled,
}

/// 恢复引擎根据错误类型给出的建议动作
#[derive(Debug, Clone)]
pub enum RecoveryAction {
    /// 将纠正性 Observation 追加到 transcript，留在循环内继续（消耗共享步数预算）
    FeedObservation(String),
    /// 终止当前 run，把错误文本交给上层（会话本身继续）
    Abort,
}
