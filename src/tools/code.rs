//! PythonREPL 工具：子进程执行一段 Python 代码
//!
//! 通过 python3 -c 运行，捕获 stdout/stderr；超时由 ToolExecutor 统一施加，
//! kill_on_drop 保证超时被丢弃的子进程不会残留。

use async_trait::async_trait;
use tokio::process::Command;

use crate::tools::Tool;

/// PythonREPL 工具：执行 Python 代码片段
pub struct PythonReplTool;

impl PythonReplTool {
    fn interpreter() -> &'static str {
        if cfg!(target_os = "windows") {
            "python"
        } else {
            "python3"
        }
    }
}

#[async_trait]
impl Tool for PythonReplTool {
    fn name(&self) -> &str {
        "PythonREPL"
    }

    fn description(&self) -> &str {
        "Executes Python code. Input should be valid Python code. Use for complex computations."
    }

    async fn invoke(&self, input: &str) -> Result<String, String> {
        let code = input.trim();
        if code.is_empty() {
            return Err("missing code to execute".to_string());
        }
        tracing::info!(bytes = code.len(), "python repl execute");

        let output = Command::new(Self::interpreter())
            .arg("-c")
            .arg(code)
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| format!("failed to launch {}: {}", Self::interpreter(), e))?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        if !output.status.success() {
            return Err(format!(
                "python exited with {:?}\nstderr: {}",
                output.status.code(),
                stderr.trim()
            ));
        }
        if stdout.trim().is_empty() && stderr.trim().is_empty() {
            return Ok("(no output)".to_string());
        }
        Ok(if stderr.trim().is_empty() {
            stdout.trim_end().to_string()
        } else {
            format!("{}\nstderr: {}", stdout.trim_end(), stderr.trim())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_code_rejected() {
        let err = PythonReplTool.invoke("   ").await.unwrap_err();
        assert!(err.contains("missing code"));
    }
}
