//! 工具注册表
//!
//! 所有工具实现 Tool trait（name / description / invoke），由 ToolRegistry 按名注册与查找。
//! 注册顺序保留：目录段的渲染顺序就是注册顺序。名称唯一，查找为大小写敏感的精确匹配。

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::core::AgentError;

/// 工具 trait：名称、描述（逐字渲染进 prompt 目录）、异步执行
///
/// invoke 的入参是 Action Input 的原始字符串，各工具自行解析；
/// Err 携带纯描述文本，由 ToolExecutor 归一化为 "Error: ..." Observation。
#[async_trait]
pub trait Tool: Send + Sync {
    /// 工具名称（注册后不可变，与 Action 行精确匹配）
    fn name(&self) -> &str;

    /// 工具描述（供 LLM 理解功能）
    fn description(&self) -> &str;

    /// 执行工具
    async fn invoke(&self, input: &str) -> Result<String, String>;
}

/// 工具注册表：注册顺序保留的名称到工具映射
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册工具；名称已存在时返回 DuplicateTool（启动期配置错误）
    pub fn register(&mut self, tool: impl Tool + 'static) -> Result<(), AgentError> {
        let name = tool.name().to_string();
        if self.index.contains_key(&name) {
            return Err(AgentError::DuplicateTool(name));
        }
        self.index.insert(name, self.tools.len());
        self.tools.push(Arc::new(tool));
        Ok(())
    }

    /// 精确匹配查找；未注册的名称返回 UnknownTool
    pub fn lookup(&self, name: &str) -> Result<Arc<dyn Tool>, AgentError> {
        self.index
            .get(name)
            .map(|&i| self.tools[i].clone())
            .ok_or_else(|| AgentError::UnknownTool(name.to_string()))
    }

    /// 注册顺序的工具名列表
    pub fn tool_names(&self) -> Vec<String> {
        self.tools.iter().map(|t| t.name().to_string()).collect()
    }

    /// 注册顺序的 (name, description) 列表，用于渲染 prompt 目录段
    pub fn catalog(&self) -> Vec<(String, String)> {
        self.tools
            .iter()
            .map(|t| (t.name().to_string(), t.description().to_string()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
