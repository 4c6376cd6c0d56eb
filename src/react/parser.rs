//! Action 解析：从模型自由文本中提取意图
//!
//! 纯函数，不碰模型也不碰注册表：工具名是否真的注册过由循环判定（可恢复，不是崩溃）。
//! 规则：先看 Final Answer 标记；若其前面没有成形的 Action/Action Input 对则为 Final，
//! 否则取 Action 行为工具名、Action Input 之后到下一个标记（或文本末尾）为原始参数；
//! 两类标记都找不到时为 Malformed。

use std::sync::LazyLock;

use regex::Regex;

/// 从单条模型输出解析出的意图
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedAction {
    /// 调用工具：名称（已 trim）与原始输入串
    Act { tool: String, input: String },
    /// 终止并给出最终答案
    Final(String),
    /// 找不到任何可识别标记，携带原文供纠正反馈
    Malformed(String),
}

static ACTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*Action\s*:\s*(.+)$").unwrap());
static INPUT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*Action\s+Input\s*:").unwrap());
static FINAL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"Final\s+Answer\s*:").unwrap());
/// Action Input 的取值终点：下一个任意已识别标记
static NEXT_MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*(Observation\s*:|Thought\s*:|Action\s*:|Action\s+Input\s*:|Final\s+Answer\s*:)")
        .unwrap()
});

/// 解析模型输出为 Act / Final / Malformed
pub fn parse(output: &str) -> ParsedAction {
    let final_m = FINAL_RE.find(output);
    let action_c = ACTION_RE.captures(output);
    let input_m = INPUT_RE.find(output);

    // 成形的对：Action 行存在，且其后跟着 Action Input 行
    let pair = match (&action_c, &input_m) {
        (Some(a), Some(i)) => {
            let a_start = a.get(0).unwrap().start();
            if i.start() > a_start {
                Some((a_start, a.get(1).unwrap().as_str(), i.end()))
            } else {
                None
            }
        }
        _ => None,
    };

    if let Some(f) = final_m {
        let preceded_by_pair = pair.map(|(a_start, _, _)| a_start < f.start()).unwrap_or(false);
        if !preceded_by_pair {
            return ParsedAction::Final(output[f.end()..].trim().to_string());
        }
    }

    if let Some((_, tool_raw, input_start)) = pair {
        let rest = &output[input_start..];
        let input_end = NEXT_MARKER_RE.find(rest).map(|m| m.start()).unwrap_or(rest.len());
        let input = trim_quoted(&rest[..input_end]);
        return ParsedAction::Act {
            tool: tool_raw.trim().to_string(),
            input,
        };
    }

    ParsedAction::Malformed(output.to_string())
}

/// 输出开头、第一个标记之前的推理文本（去掉可选的 "Thought:" 前缀）；为空则 None
pub fn leading_thought(output: &str) -> Option<String> {
    let end = ACTION_RE
        .find(output)
        .map(|m| m.start())
        .into_iter()
        .chain(FINAL_RE.find(output).map(|m| m.start()))
        .min()
        .unwrap_or(output.len());
    let head = output[..end].trim();
    let head = head.strip_prefix("Thought:").unwrap_or(head).trim();
    if head.is_empty() {
        None
    } else {
        Some(head.to_string())
    }
}

/// 去掉首尾空白与成对包裹的双引号（模型偶尔会给参数加引号）
fn trim_quoted(s: &str) -> String {
    let s = s.trim();
    if s.len() >= 2 && s.starts_with('"') && s.ends_with('"') {
        s[1..s.len() - 1].to_string()
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_action() {
        let out = "Action: Calculator\nAction Input: 2+2";
        assert_eq!(
            parse(out),
            ParsedAction::Act {
                tool: "Calculator".to_string(),
                input: "2+2".to_string()
            }
        );
    }

    #[test]
    fn test_action_with_thought() {
        let out = "Thought: I need to do math\nAction: Calculator\nAction Input: 3 * 7\n";
        assert_eq!(
            parse(out),
            ParsedAction::Act {
                tool: "Calculator".to_string(),
                input: "3 * 7".to_string()
            }
        );
        assert_eq!(leading_thought(out), Some("I need to do math".to_string()));
    }

    #[test]
    fn test_final_answer() {
        assert_eq!(parse("Final Answer: 42"), ParsedAction::Final("42".to_string()));
    }

    #[test]
    fn test_final_answer_with_thought() {
        let out = "Thought: I now know the final answer\nFinal Answer: Paris is the capital.";
        assert_eq!(
            parse(out),
            ParsedAction::Final("Paris is the capital.".to_string())
        );
        assert_eq!(
            leading_thought(out),
            Some("I now know the final answer".to_string())
        );
    }

    #[test]
    fn test_final_answer_spans_to_end() {
        let out = "Final Answer: line one\nline two\nline three";
        assert_eq!(
            parse(out),
            ParsedAction::Final("line one\nline two\nline three".to_string())
        );
    }

    #[test]
    fn test_action_pair_before_final_wins() {
        // 成形的 Action 对在前：按 Act 处理，Final 文本只是输入的一部分之外的噪音
        let out = "Action: Calculator\nAction Input: 1+1\nFinal Answer: 2";
        assert_eq!(
            parse(out),
            ParsedAction::Act {
                tool: "Calculator".to_string(),
                input: "1+1".to_string()
            }
        );
    }

    #[test]
    fn test_final_before_action_pair_wins() {
        let out = "Final Answer: done\nAction: Calculator\nAction Input: 1+1";
        assert_eq!(
            parse(out),
            ParsedAction::Final("done\nAction: Calculator\nAction Input: 1+1".to_string())
        );
    }

    #[test]
    fn test_input_stops_at_observation_marker() {
        // 模型有时会自己续写 Observation，不能把它吞进参数
        let out = "Action: Calculator\nAction Input: 2+2\nObservation: Result: 4\nThought: done";
        assert_eq!(
            parse(out),
            ParsedAction::Act {
                tool: "Calculator".to_string(),
                input: "2+2".to_string()
            }
        );
    }

    #[test]
    fn test_multiline_input_runs_to_marker() {
        let out = "Action: FileWriter\nAction Input: notes.txt|first line\nsecond line\nThought: saved";
        assert_eq!(
            parse(out),
            ParsedAction::Act {
                tool: "FileWriter".to_string(),
                input: "notes.txt|first line\nsecond line".to_string()
            }
        );
    }

    #[test]
    fn test_quoted_input_unwrapped() {
        let out = "Action: Wikipedia\nAction Input: \"Ada Lovelace\"";
        assert_eq!(
            parse(out),
            ParsedAction::Act {
                tool: "Wikipedia".to_string(),
                input: "Ada Lovelace".to_string()
            }
        );
    }

    #[test]
    fn test_tool_name_trimmed() {
        let out = "Action:   Weather  \nAction Input: London";
        assert_eq!(
            parse(out),
            ParsedAction::Act {
                tool: "Weather".to_string(),
                input: "London".to_string()
            }
        );
    }

    #[test]
    fn test_unregistered_name_still_parses() {
        // 名字是否注册过由循环判定，解析器只负责提取
        let out = "Action: NoSuchTool\nAction Input: x";
        assert_eq!(
            parse(out),
            ParsedAction::Act {
                tool: "NoSuchTool".to_string(),
                input: "x".to_string()
            }
        );
    }

    #[test]
    fn test_free_text_is_malformed() {
        let out = "I think the answer might be 4 but I'm not sure.";
        assert_eq!(parse(out), ParsedAction::Malformed(out.to_string()));
    }

    #[test]
    fn test_empty_output_is_malformed() {
        assert_eq!(parse(""), ParsedAction::Malformed(String::new()));
    }

    #[test]
    fn test_action_without_input_is_malformed() {
        let out = "Action: Calculator";
        assert_eq!(parse(out), ParsedAction::Malformed(out.to_string()));
    }

    #[test]
    fn test_input_without_action_is_malformed() {
        let out = "Action Input: 2+2";
        assert_eq!(parse(out), ParsedAction::Malformed(out.to_string()));
    }

    #[test]
    fn test_input_before_action_is_malformed() {
        let out = "Action Input: 2+2\nAction: Calculator";
        assert_eq!(parse(out), ParsedAction::Malformed(out.to_string()));
    }

    #[test]
    fn test_empty_input_allowed() {
        let out = "Action: FileReader\nAction Input:";
        // Action Input 行存在但为空：提取为空串，由工具自己报错
        match parse(out) {
            ParsedAction::Act { tool, input } => {
                assert_eq!(tool, "FileReader");
                assert_eq!(input, "");
            }
            other => panic!("Expected Act, got {:?}", other),
        }
    }

    #[test]
    fn test_final_answer_empty() {
        assert_eq!(parse("Final Answer:"), ParsedAction::Final(String::new()));
    }

    #[test]
    fn test_leading_thought_absent() {
        assert_eq!(leading_thought("Action: X\nAction Input: y"), None);
        assert_eq!(leading_thought(""), None);
    }
}
