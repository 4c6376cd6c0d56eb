//! LLM 层：客户端抽象与实现（OpenAI 兼容 / Mock）

pub mod mock;
pub mod openai;
pub mod traits;

pub use mock::MockLlmClient;
pub use openai::{OpenAiClient, TokenUsage};
pub use traits::LlmClient;

use std::sync::Arc;

use crate::config::AppConfig;

/// 根据配置与环境变量选择 LLM 后端（Ollama / OpenAI 兼容 / Mock）
pub fn create_llm_from_config(cfg: &AppConfig) -> Arc<dyn LlmClient> {
    let provider = cfg.llm.provider.to_lowercase();
    match provider.as_str() {
        "ollama" => {
            let base = cfg
                .llm
                .base_url
                .clone()
                .unwrap_or_else(|| "http://localhost:11434/v1".to_string());
            tracing::info!("Using Ollama LLM ({}) at {}", cfg.llm.model, base);
            // Ollama 的 OpenAI 兼容端点不校验 Key，占位即可
            Arc::new(OpenAiClient::new(
                Some(&base),
                &cfg.llm.model,
                cfg.llm.temperature,
                Some("ollama"),
            ))
        }
        "openai" if std::env::var("OPENAI_API_KEY").is_ok() => {
            tracing::info!("Using OpenAI LLM ({})", cfg.llm.model);
            Arc::new(OpenAiClient::new(
                cfg.llm.base_url.as_deref(),
                &cfg.llm.model,
                cfg.llm.temperature,
                std::env::var("OPENAI_API_KEY").ok().as_deref(),
            ))
        }
        _ => {
            tracing::warn!("No usable LLM backend configured, using Mock LLM");
            Arc::new(MockLlmClient)
        }
    }
}
