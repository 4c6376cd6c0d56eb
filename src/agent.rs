//! Agent 装配与无界面运行时
//!
//! create_agent_components 从配置构建 LLM、固定工具目录（注册顺序即 prompt 目录顺序）、
//! 执行器与恢复引擎；process_query 对单条用户输入跑一次 ReAct run，
//! 成功后把 (query, answer) 写入会话记忆。

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::config::AppConfig;
use crate::core::{AgentError, RecoveryEngine};
use crate::llm::{create_llm_from_config, LlmClient};
use crate::memory::ConversationMemory;
use crate::react::{react_loop, AgentRun, PromptBuilder, ReactEvent, RunStatus};
use crate::tools::{
    CalculatorTool, FileReaderTool, FileWriterTool, PythonReplTool, ToolExecutor, ToolRegistry,
    WeatherTool, WebScraperTool, WebSearchTool, WikipediaTool,
};

/// 预构建的 Agent 组件：LLM、执行器、恢复引擎与 prompt 构建器，可跨多次 run 复用
pub struct AgentComponents {
    pub llm: Arc<dyn LlmClient>,
    pub executor: ToolExecutor,
    pub recovery: RecoveryEngine,
    pub prompt_builder: PromptBuilder,
    pub max_steps: usize,
}

impl AgentComponents {
    /// 启动时打印的工具目录（注册顺序）
    pub fn catalog(&self) -> Vec<(String, String)> {
        self.executor.catalog()
    }
}

/// 工作区根目录：配置优先，否则 ./workspace
fn workspace_root(cfg: &AppConfig) -> PathBuf {
    cfg.tools
        .workspace_root
        .clone()
        .unwrap_or_else(|| PathBuf::from("workspace"))
}

/// 创建 Agent 组件：固定工具集按原始目录顺序注册，名称冲突是启动期错误
pub fn create_agent_components(cfg: &AppConfig) -> Result<AgentComponents, AgentError> {
    let llm = create_llm_from_config(cfg);
    let workspace = workspace_root(cfg);
    let timeout = cfg.tools.timeout_secs;

    let mut registry = ToolRegistry::new();
    registry.register(CalculatorTool)?;
    registry.register(WikipediaTool::new(timeout, cfg.tools.search_max_chars))?;
    registry.register(WebSearchTool::new(timeout, cfg.tools.search_max_chars))?;
    registry.register(WeatherTool::new(timeout))?;
    registry.register(WebScraperTool::new(timeout, cfg.tools.scrape_max_chars))?;
    registry.register(PythonReplTool)?;
    registry.register(FileWriterTool::new(&workspace))?;
    registry.register(FileReaderTool::new(&workspace))?;

    let prompt_builder = PromptBuilder::new(&registry.catalog());

    Ok(AgentComponents {
        llm,
        executor: ToolExecutor::new(registry, timeout),
        recovery: RecoveryEngine::new(),
        prompt_builder,
        max_steps: cfg.agent.max_steps,
    })
}

/// 处理单条用户消息：跑 ReAct 循环并返回完整 run；成功时写入会话记忆
pub async fn process_query(
    components: &AgentComponents,
    memory: &mut ConversationMemory,
    query: &str,
    event_tx: Option<&mpsc::UnboundedSender<ReactEvent>>,
    cancel_token: CancellationToken,
) -> Result<AgentRun, AgentError> {
    let run = react_loop(
        &components.llm,
        &components.executor,
        &components.recovery,
        &components.prompt_builder,
        memory,
        query,
        components.max_steps,
        event_tx,
        cancel_token,
    )
    .await?;

    if let RunStatus::Succeeded(ref answer) = run.status {
        memory.push(query, answer.clone());
    }
    Ok(run)
}
