//! Prompt 渲染
//!
//! 把固定前言、工具目录、格式说明、会话历史、问题与 scratchpad 拼为单个 prompt。
//! 相同输入必须产出逐字节相同的输出（可测性与可复现性依赖这一点）。

use crate::memory::ConversationMemory;
use crate::react::Transcript;

/// ReAct 模板的固定前言与格式说明之间的工具目录由运行时填充
const PREAMBLE: &str = "Answer the following questions as best you can. \
You have access to the following tools:";

/// Prompt 构建器：持有渲染好的目录段（工具集注册后不变）
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    /// 每行 "{name}: {description}"，注册顺序
    catalog_block: String,
    /// 逗号连接的工具名集合，约束模型的合法 Action
    tool_names: String,
}

impl PromptBuilder {
    /// catalog 为 (name, description) 列表，注册顺序即渲染顺序
    pub fn new(catalog: &[(String, String)]) -> Self {
        let catalog_block = catalog
            .iter()
            .map(|(name, desc)| format!("{}: {}", name, desc))
            .collect::<Vec<_>>()
            .join("\n");
        let tool_names = catalog
            .iter()
            .map(|(name, _)| name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        Self {
            catalog_block,
            tool_names,
        }
    }

    pub fn tool_names(&self) -> &str {
        &self.tool_names
    }

    /// 渲染完整 prompt：前言 + 目录 + 格式说明 + 历史 + 问题 + scratchpad 续写点
    pub fn render(
        &self,
        memory: &ConversationMemory,
        query: &str,
        transcript: &Transcript,
    ) -> String {
        format!(
            "{preamble}\n\n\
             {catalog}\n\n\
             Use the following format:\n\n\
             Question: the input question you must answer\n\
             Thought: you should always think about what to do\n\
             Action: the action to take, should be one of [{names}]\n\
             Action Input: the input to the action\n\
             Observation: the result of the action\n\
             ... (this Thought/Action/Action Input/Observation can repeat N times)\n\
             Thought: I now know the final answer\n\
             Final Answer: the final answer to the original input question\n\n\
             Begin!\n\n\
             {history}Question: {query}\n\
             Thought: {scratchpad}",
            preamble = PREAMBLE,
            catalog = self.catalog_block,
            names = self.tool_names,
            history = memory.to_prompt_section(),
            query = query,
            scratchpad = transcript.to_scratchpad(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::react::TranscriptEntry;

    fn catalog() -> Vec<(String, String)> {
        vec![
            ("Calculator".to_string(), "Does math.".to_string()),
            ("Weather".to_string(), "Gets weather.".to_string()),
        ]
    }

    #[test]
    fn test_catalog_rendered_in_registration_order() {
        let pb = PromptBuilder::new(&catalog());
        let prompt = pb.render(&ConversationMemory::new(5), "hi", &Transcript::new());
        let calc = prompt.find("Calculator: Does math.").unwrap();
        let weather = prompt.find("Weather: Gets weather.").unwrap();
        assert!(calc < weather);
    }

    #[test]
    fn test_tool_names_comma_joined() {
        let pb = PromptBuilder::new(&catalog());
        let prompt = pb.render(&ConversationMemory::new(5), "hi", &Transcript::new());
        assert!(prompt.contains("should be one of [Calculator, Weather]"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let pb = PromptBuilder::new(&catalog());
        let mut t = Transcript::new();
        t.push(TranscriptEntry::Action {
            tool: "Calculator".to_string(),
            input: "1+1".to_string(),
        });
        t.push(TranscriptEntry::Observation {
            text: "Result: 2".to_string(),
        });
        let mem = ConversationMemory::new(5);
        let a = pb.render(&mem, "what is 1+1?", &t);
        let b = pb.render(&mem, "what is 1+1?", &t);
        assert_eq!(a, b);
    }

    #[test]
    fn test_query_and_scratchpad_positions() {
        let pb = PromptBuilder::new(&catalog());
        let mut t = Transcript::new();
        t.push(TranscriptEntry::Observation {
            text: "Result: 2".to_string(),
        });
        let prompt = pb.render(&ConversationMemory::new(5), "q?", &t);
        assert!(prompt.contains("Begin!\n\nQuestion: q?\nThought: "));
        assert!(prompt.ends_with("Observation: Result: 2\nThought: "));
    }

    #[test]
    fn test_history_injected_before_question() {
        let pb = PromptBuilder::new(&catalog());
        let mut mem = ConversationMemory::new(5);
        mem.push("earlier question", "earlier answer");
        let prompt = pb.render(&mem, "now", &Transcript::new());
        let hist = prompt.find("Human: earlier question").unwrap();
        let q = prompt.find("Question: now").unwrap();
        assert!(hist < q);
    }
}
