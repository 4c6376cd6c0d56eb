//! Scout - 控制台 ReAct 智能体
//!
//! 模块划分：
//! - **agent**: 组件装配与单查询运行时（process_query）
//! - **config**: 应用配置加载（TOML + 环境变量）
//! - **core**: 错误分类与恢复策略
//! - **llm**: LLM 客户端抽象与实现（OpenAI 兼容 / Mock）
//! - **memory**: 会话级问答历史
//! - **react**: 誊本、prompt 渲染、Action 解析与主循环
//! - **tools**: 固定工具箱（Calculator、Wikipedia、WebSearch、Weather、
//!   WebScraper、PythonREPL、FileWriter、FileReader）与执行器
//! - **ui**: 控制台交互循环

pub mod agent;
pub mod config;
pub mod core;
pub mod llm;
pub mod memory;
pub mod react;
pub mod tools;
pub mod ui;
