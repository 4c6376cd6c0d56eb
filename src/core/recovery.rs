//! 错误恢复引擎
//!
//! 根据 AgentError 类型返回 RecoveryAction，供 ReAct 循环决定是喂回 Observation 还是中止。
//! 未知工具与格式错误始终在循环内恢复，与成功动作共享同一步数预算（无独立重试上限）。

use crate::core::{AgentError, RecoveryAction};

/// 语义化错误恢复：将循环内错误映射为纠正性 Observation 或中止
#[derive(Debug, Default)]
pub struct RecoveryEngine;

impl RecoveryEngine {
    pub fn new() -> Self {
        Self
    }

    /// 根据错误类型返回建议动作；valid_tools 用于在纠正文本中列出合法工具集
    pub fn handle(&self, err: &AgentError, valid_tools: &[String]) -> RecoveryAction {
        match err {
            AgentError::UnknownTool(name) => RecoveryAction::FeedObservation(format!(
                "Error: '{}' is not a valid tool. Valid tools are: {}.",
                name,
                valid_tools.join(", ")
            )),
            AgentError::MalformedAction(_) => RecoveryAction::FeedObservation(format!(
                "Your response did not include a valid Action. Respond with an \
                 'Action:' line naming one of [{}] followed by an 'Action Input:' \
                 line, or with 'Final Answer:' and your answer.",
                valid_tools.join(", ")
            )),
            // 工具层失败已由 ToolExecutor 归一化为 "Error: ..." Observation，
            // 走到这里说明是循环外的错误，一律中止
            _ => RecoveryAction::Abort,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tools() -> Vec<String> {
        vec!["Calculator".to_string(), "Weather".to_string()]
    }

    #[test]
    fn test_unknown_tool_feeds_observation() {
        let engine = RecoveryEngine::new();
        let err = AgentError::UnknownTool("NoSuchTool".to_string());
        match engine.handle(&err, &tools()) {
            RecoveryAction::FeedObservation(msg) => {
                assert!(msg.contains("NoSuchTool"));
                assert!(msg.contains("Calculator, Weather"));
            }
            _ => panic!("Expected FeedObservation"),
        }
    }

    #[test]
    fn test_malformed_action_feeds_observation() {
        let engine = RecoveryEngine::new();
        let err = AgentError::MalformedAction("free text".to_string());
        match engine.handle(&err, &tools()) {
            RecoveryAction::FeedObservation(msg) => {
                assert!(msg.contains("did not include a valid Action"));
                assert!(msg.contains("Calculator"));
            }
            _ => panic!("Expected FeedObservation"),
        }
    }

    #[test]
    fn test_llm_error_aborts() {
        let engine = RecoveryEngine::new();
        let err = AgentError::LlmError("connection refused".to_string());
        assert!(matches!(engine.handle(&err, &tools()), RecoveryAction::Abort));
    }

    #[test]
    fn test_cancelled_aborts() {
        let engine = RecoveryEngine::new();
        assert!(matches!(
            engine.handle(&AgentError::Cancelled, &tools()),
            RecoveryAction::Abort
        ));
    }
}
