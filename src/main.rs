//! Scout - 控制台 ReAct 智能体
//!
//! 入口：初始化日志、加载配置、装配组件并运行控制台循环。

use anyhow::Context;
use scout::agent::create_agent_components;
use scout::config::{load_config, AppConfig};
use scout::memory::ConversationMemory;
use scout::ui::run_console;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 日志：默认 info，可通过 RUST_LOG 覆盖
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive("info".parse().unwrap()))
        .with(fmt::layer())
        .init();

    let cfg = load_config(None).unwrap_or_else(|e| {
        tracing::warn!("Config load failed ({}), using defaults", e);
        AppConfig::default()
    });

    let memory = ConversationMemory::new(cfg.agent.max_history_turns);
    let components = create_agent_components(&cfg).context("Failed to create agent")?;

    run_console(components, memory).await;

    Ok(())
}
