//! 应用配置：从 config/default.toml 与环境变量加载
//!
//! 加载顺序：先读 TOML 文件，再用环境变量 `SCOUT__*` 覆盖（双下划线表示嵌套，
//! 如 `SCOUT__LLM__PROVIDER=openai`）。

use std::path::PathBuf;

use serde::Deserialize;

/// 应用配置根（对应 config/default.toml 的顶层）
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    #[serde(default)]
    pub llm: LlmSection,
    #[serde(default)]
    pub agent: AgentSection,
    #[serde(default)]
    pub tools: ToolsSection,
}

/// [llm] 段：后端选择
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmSection {
    /// 后端：ollama / openai；无可用后端时回退 Mock
    pub provider: String,
    pub model: String,
    /// OpenAI 兼容端点；provider=ollama 时默认 http://localhost:11434/v1
    pub base_url: Option<String>,
    /// 采样温度
    pub temperature: f32,
}

impl Default for LlmSection {
    fn default() -> Self {
        Self {
            provider: "ollama".to_string(),
            model: "llama2".to_string(),
            base_url: None,
            temperature: 0.7,
        }
    }
}

/// [agent] 段：循环步数上限与会话历史轮数
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AgentSection {
    /// 单次 run 最大 ReAct 步数
    pub max_steps: usize,
    /// 会话记忆保留的 (query, answer) 轮数
    pub max_history_turns: usize,
}

impl Default for AgentSection {
    fn default() -> Self {
        Self {
            max_steps: 5,
            max_history_turns: 10,
        }
    }
}

/// [tools] 段：文件沙箱根、超时、截断上限
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ToolsSection {
    /// FileWriter / FileReader 的沙箱根目录，未设置时用 ./workspace
    pub workspace_root: Option<PathBuf>,
    /// 单次工具调用超时（秒），网络类工具靠它兜底
    pub timeout_secs: u64,
    /// WebScraper 结果截断字符数
    pub scrape_max_chars: usize,
    /// WebSearch / Wikipedia 结果截断字符数
    pub search_max_chars: usize,
}

impl Default for ToolsSection {
    fn default() -> Self {
        Self {
            workspace_root: None,
            timeout_secs: 10,
            scrape_max_chars: 500,
            search_max_chars: 2000,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            llm: LlmSection::default(),
            agent: AgentSection::default(),
            tools: ToolsSection::default(),
        }
    }
}

/// 从 config 目录加载配置，环境变量 SCOUT__* 可覆盖
///
/// 1. 按顺序查找 config/default.toml、../config/default.toml、default.toml，找到则作为第一源
/// 2. 若传入 config_path 且文件存在，则追加该文件（可覆盖前面的键）
/// 3. 最后叠加环境变量 SCOUT__*（双下划线表示嵌套键）
pub fn load_config(config_path: Option<PathBuf>) -> Result<AppConfig, config::ConfigError> {
    let mut builder = config::Config::builder();

    let default_names = ["config/default", "../config/default", "default"];
    for name in default_names {
        let path = format!("{}.toml", name);
        if std::path::Path::new(&path).exists() {
            builder = builder.add_source(config::File::with_name(name).required(false));
            break;
        }
    }

    if let Some(ref path) = config_path {
        if path.exists() {
            builder = builder.add_source(config::File::from(path.clone()).required(false));
        }
    }

    builder = builder.add_source(
        config::Environment::with_prefix("SCOUT")
            .separator("__")
            .try_parsing(true),
    );

    let c = builder.build()?;
    c.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.agent.max_steps, 5);
        assert_eq!(cfg.tools.timeout_secs, 10);
        assert_eq!(cfg.llm.provider, "ollama");
    }
}
