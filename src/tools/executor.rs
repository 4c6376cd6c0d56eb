//! 工具执行器
//!
//! 持有 ToolRegistry 与全局超时。execute 永不向调用方冒错：工具 Err 与超时都被
//! 归一化为带 "Error: " 前缀的 Observation 字符串（与成功输出可区分，即使成功结果
//! 本身包含 "error" 字样）；每次调用输出结构化审计日志（JSON）。

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::time::timeout;

use crate::core::AgentError;
use crate::tools::{Tool, ToolRegistry};

/// 工具执行器：对每次调用施加超时，并把所有失败归一化为 Observation
pub struct ToolExecutor {
    registry: ToolRegistry,
    timeout: Duration,
}

impl ToolExecutor {
    pub fn new(registry: ToolRegistry, timeout_secs: u64) -> Self {
        Self {
            registry,
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    /// 按名查找（大小写敏感精确匹配）；未知名称由循环转为纠正性 Observation
    pub fn lookup(&self, name: &str) -> Result<Arc<dyn Tool>, AgentError> {
        self.registry.lookup(name)
    }

    pub fn tool_names(&self) -> Vec<String> {
        self.registry.tool_names()
    }

    pub fn catalog(&self) -> Vec<(String, String)> {
        self.registry.catalog()
    }

    /// 执行工具并返回 Observation；永远返回字符串，不冒错不 panic。
    /// 失败 -> "Error: <描述>"；超时 -> 超时专属的错误 Observation。
    pub async fn execute(&self, tool: &dyn Tool, raw_input: &str) -> String {
        let start = Instant::now();
        let result = timeout(self.timeout, tool.invoke(raw_input)).await;

        let (ok, outcome): (bool, &str) = match &result {
            Ok(Ok(_)) => (true, "ok"),
            Ok(Err(_)) => (false, "error"),
            Err(_) => (false, "timeout"),
        };
        let duration_ms = start.elapsed().as_millis() as u64;
        let audit = serde_json::json!({
            "event": "tool_audit",
            "tool": tool.name(),
            "ok": ok,
            "outcome": outcome,
            "duration_ms": duration_ms,
            "input_preview": input_preview(raw_input),
        });
        tracing::info!(audit = %audit.to_string(), "tool");

        match result {
            Ok(Ok(observation)) => observation,
            Ok(Err(e)) => format!("Error: {}", e),
            Err(_) => format!(
                "Error: tool '{}' timed out after {}s",
                tool.name(),
                self.timeout.as_secs()
            ),
        }
    }
}

fn input_preview(input: &str) -> String {
    if input.chars().count() > 200 {
        format!("{}...", input.chars().take(200).collect::<String>())
    } else {
        input.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct OkTool;

    #[async_trait]
    impl Tool for OkTool {
        fn name(&self) -> &str {
            "ok"
        }
        fn description(&self) -> &str {
            "always succeeds"
        }
        async fn invoke(&self, input: &str) -> Result<String, String> {
            Ok(format!("got: {}", input))
        }
    }

    struct FailTool;

    #[async_trait]
    impl Tool for FailTool {
        fn name(&self) -> &str {
            "fail"
        }
        fn description(&self) -> &str {
            "always fails"
        }
        async fn invoke(&self, _input: &str) -> Result<String, String> {
            Err("something broke".to_string())
        }
    }

    struct SlowTool;

    #[async_trait]
    impl Tool for SlowTool {
        fn name(&self) -> &str {
            "slow"
        }
        fn description(&self) -> &str {
            "sleeps past the timeout"
        }
        async fn invoke(&self, _input: &str) -> Result<String, String> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok("too late".to_string())
        }
    }

    fn executor() -> ToolExecutor {
        ToolExecutor::new(ToolRegistry::new(), 1)
    }

    #[tokio::test]
    async fn test_success_passes_through() {
        let obs = executor().execute(&OkTool, "hi").await;
        assert_eq!(obs, "got: hi");
    }

    #[tokio::test]
    async fn test_failure_becomes_error_observation() {
        let obs = executor().execute(&FailTool, "x").await;
        assert_eq!(obs, "Error: something broke");
    }

    #[tokio::test]
    async fn test_timeout_becomes_timeout_observation() {
        let obs = executor().execute(&SlowTool, "x").await;
        assert!(obs.contains("timed out after 1s"), "got: {}", obs);
        assert!(obs.starts_with("Error:"));
    }
}
