//! 推理誊本（scratchpad）
//!
//! Thought / Action / Observation / FinalAnswer 的只追加序列，
//! 序列化为 prompt 末尾的续写点，喂回下一轮推理。

use serde::Serialize;

/// 誊本条目：一次 run 内只追加，不修改
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TranscriptEntry {
    /// 模型的自由推理文本
    Thought { text: String },
    /// 模型选定的工具与原始输入串
    Action { tool: String, input: String },
    /// 工具结果（成功或失败都是一条 Observation）
    Observation { text: String },
    /// 终止信号与最终答案
    FinalAnswer { text: String },
}

/// 只追加的誊本
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: TranscriptEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 序列化为 scratchpad 文本：与 prompt 模板中的格式说明逐行对应。
    /// 同样的条目序列总是产出同样的字节。
    pub fn to_scratchpad(&self) -> String {
        let mut s = String::new();
        for entry in &self.entries {
            match entry {
                // 裸思考文本："Thought: " 前缀来自模板末行或上一条 Observation 的续写点
                TranscriptEntry::Thought { text } => {
                    s.push_str(text);
                    s.push('\n');
                }
                TranscriptEntry::Action { tool, input } => {
                    s.push_str(&format!("Action: {}\nAction Input: {}\n", tool, input));
                }
                TranscriptEntry::Observation { text } => {
                    s.push_str(&format!("Observation: {}\nThought: ", text));
                }
                TranscriptEntry::FinalAnswer { text } => {
                    s.push_str(&format!("Final Answer: {}\n", text));
                }
            }
        }
        s
    }

    /// 最近一条 Observation（步数耗尽时拼 best-effort 结果用）
    pub fn last_observation(&self) -> Option<&str> {
        self.entries.iter().rev().find_map(|e| match e {
            TranscriptEntry::Observation { text } => Some(text.as_str()),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_only_order() {
        let mut t = Transcript::new();
        t.push(TranscriptEntry::Thought {
            text: "I should calculate".to_string(),
        });
        t.push(TranscriptEntry::Action {
            tool: "Calculator".to_string(),
            input: "2+2".to_string(),
        });
        t.push(TranscriptEntry::Observation {
            text: "Result: 4".to_string(),
        });
        assert_eq!(t.len(), 3);
        assert!(matches!(t.entries()[0], TranscriptEntry::Thought { .. }));
        assert!(matches!(t.entries()[2], TranscriptEntry::Observation { .. }));
    }

    #[test]
    fn test_scratchpad_rendering() {
        let mut t = Transcript::new();
        t.push(TranscriptEntry::Thought {
            text: "need math".to_string(),
        });
        t.push(TranscriptEntry::Action {
            tool: "Calculator".to_string(),
            input: "2+2".to_string(),
        });
        t.push(TranscriptEntry::Observation {
            text: "Result: 4".to_string(),
        });
        let s = t.to_scratchpad();
        assert_eq!(
            s,
            "need math\nAction: Calculator\nAction Input: 2+2\nObservation: Result: 4\nThought: "
        );
    }

    #[test]
    fn test_scratchpad_deterministic() {
        let mut t = Transcript::new();
        t.push(TranscriptEntry::Observation {
            text: "Error: unknown tool".to_string(),
        });
        assert_eq!(t.to_scratchpad(), t.to_scratchpad());
    }

    #[test]
    fn test_last_observation() {
        let mut t = Transcript::new();
        assert!(t.last_observation().is_none());
        t.push(TranscriptEntry::Observation {
            text: "first".to_string(),
        });
        t.push(TranscriptEntry::Observation {
            text: "second".to_string(),
        });
        assert_eq!(t.last_observation(), Some("second"));
    }
}
