//! 会话记忆：历史问答对
//!
//! 保留最近 N 轮 (query, answer)，超出时自动剪枝；由控制台会话持有并显式传入每次 run，
//! 只在 run 成功结束后追加，供后续 prompt 的 Previous conversation 段使用。

use serde::{Deserialize, Serialize};

/// 消息角色（与 LLM API 一致）
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    User,
    Assistant,
    System,
}

/// 单条消息（LLM 客户端的线格式）
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }
}

/// 一轮完整问答
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Exchange {
    pub query: String,
    pub answer: String,
}

/// 会话记忆：最近 max_turns 轮问答
#[derive(Clone, Debug)]
pub struct ConversationMemory {
    exchanges: Vec<Exchange>,
    max_turns: usize,
}

impl ConversationMemory {
    pub fn new(max_turns: usize) -> Self {
        Self {
            exchanges: Vec::new(),
            max_turns,
        }
    }

    pub fn push(&mut self, query: impl Into<String>, answer: impl Into<String>) {
        self.exchanges.push(Exchange {
            query: query.into(),
            answer: answer.into(),
        });
        self.prune();
    }

    pub fn exchanges(&self) -> &[Exchange] {
        &self.exchanges
    }

    pub fn clear(&mut self) {
        self.exchanges.clear();
    }

    /// 超出 max_turns 时丢弃最旧的轮次，保留最近部分
    fn prune(&mut self) {
        if self.exchanges.len() > self.max_turns {
            let drop = self.exchanges.len() - self.max_turns;
            self.exchanges.drain(..drop);
        }
    }

    /// 构建 prompt 的 Previous conversation 段；无历史时返回空串
    pub fn to_prompt_section(&self) -> String {
        if self.exchanges.is_empty() {
            return String::new();
        }
        let mut s = String::from("Previous conversation:\n");
        for ex in &self.exchanges {
            s.push_str(&format!("Human: {}\nAI: {}\n", ex.query, ex.answer));
        }
        s.push('\n');
        s
    }

    pub fn len(&self) -> usize {
        self.exchanges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exchanges.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prune_keeps_latest() {
        let mut mem = ConversationMemory::new(2);
        mem.push("q1", "a1");
        mem.push("q2", "a2");
        mem.push("q3", "a3");
        assert_eq!(mem.len(), 2);
        assert_eq!(mem.exchanges()[0].query, "q2");
        assert_eq!(mem.exchanges()[1].answer, "a3");
    }

    #[test]
    fn test_prompt_section_empty_when_no_history() {
        let mem = ConversationMemory::new(5);
        assert!(mem.to_prompt_section().is_empty());
    }

    #[test]
    fn test_prompt_section_lists_turns_in_order() {
        let mut mem = ConversationMemory::new(5);
        mem.push("hello", "hi there");
        mem.push("weather?", "sunny");
        let s = mem.to_prompt_section();
        let hello = s.find("Human: hello").unwrap();
        let weather = s.find("Human: weather?").unwrap();
        assert!(hello < weather);
        assert!(s.contains("AI: sunny"));
    }
}
