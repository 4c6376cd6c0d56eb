//! ReAct 主循环
//!
//! 渲染 prompt -> LLM -> 解析 -> 执行工具 -> Observation 写回誊本 -> 下一轮；
//! 每轮固定消耗一步（成功动作、未知工具、格式错误共享同一预算），
//! 到达步数上限时以 StepLimitExceeded 收尾并带回已有誊本，不算硬失败。

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::core::{AgentError, RecoveryAction, RecoveryEngine};
use crate::llm::LlmClient;
use crate::memory::{ConversationMemory, Message};
use crate::react::parser::{leading_thought, parse, ParsedAction};
use crate::react::{PromptBuilder, ReactEvent, Transcript, TranscriptEntry};
use crate::tools::ToolExecutor;

/// 流式回复时每段字符数（模拟打字效果）
const CHUNK_CHARS: usize = 6;
/// Observation 事件预览最大字符数
const OBSERVATION_PREVIEW_CHARS: usize = 200;

/// 一次 run 的终态
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunStatus {
    Running,
    Succeeded(String),
    Failed(String),
    StepLimitExceeded,
}

/// 单个查询的完整运行状态：自包含，不依赖任何全局可变字段
#[derive(Debug)]
pub struct AgentRun {
    pub id: Uuid,
    pub query: String,
    pub transcript: Transcript,
    pub step_count: usize,
    pub status: RunStatus,
}

impl AgentRun {
    fn new(query: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            query: query.to_string(),
            transcript: Transcript::new(),
            step_count: 0,
            status: RunStatus::Running,
        }
    }

    /// 呈现给调用方的最终文本：成功时是答案，其余情况给 best-effort 内容
    pub fn final_text(&self) -> String {
        match &self.status {
            RunStatus::Succeeded(answer) => answer.clone(),
            RunStatus::StepLimitExceeded => {
                let partial = self
                    .transcript
                    .last_observation()
                    .unwrap_or("(no observations)");
                format!(
                    "Step limit reached after {} steps without a final answer. Last observation: {}",
                    self.step_count, partial
                )
            }
            RunStatus::Failed(reason) => format!("Run failed: {}", reason),
            RunStatus::Running => String::new(),
        }
    }
}

fn send_event(tx: &Option<&mpsc::UnboundedSender<ReactEvent>>, ev: ReactEvent) {
    if let Some(t) = tx {
        let _ = t.send(ev);
    }
}

fn preview(s: &str, limit: usize) -> String {
    if s.chars().count() > limit {
        format!("{}...", s.chars().take(limit).collect::<String>())
    } else {
        s.to_string()
    }
}

/// 执行 ReAct 循环
///
/// 每步：取消检查 -> 步数上限检查 -> 渲染 prompt -> LLM -> 解析 ->
/// Final 则成功返回；Act 则查注册表并执行，Observation 写回誊本；
/// 未知工具 / 格式错误经 RecoveryEngine 转为纠正性 Observation 后留在循环内。
/// 只有 LLM 失败会作为 Err 冒泡给调用方。
#[allow(clippy::too_many_arguments)]
pub async fn react_loop(
    llm: &Arc<dyn LlmClient>,
    executor: &ToolExecutor,
    recovery: &RecoveryEngine,
    prompt_builder: &PromptBuilder,
    memory: &ConversationMemory,
    query: &str,
    max_steps: usize,
    event_tx: Option<&mpsc::UnboundedSender<ReactEvent>>,
    cancel_token: CancellationToken,
) -> Result<AgentRun, AgentError> {
    let mut run = AgentRun::new(query);
    tracing::info!(run_id = %run.id, query = %preview(query, 80), "react run start");
    let valid_tools = executor.tool_names();

    loop {
        send_event(&event_tx, ReactEvent::StepUpdate {
            step: run.step_count,
            max_steps,
        });

        // 步边界取消检查：丢弃未开始的这一步，已累积的誊本原样保留
        if cancel_token.is_cancelled() {
            send_event(&event_tx, ReactEvent::Error {
                text: "Cancelled by user".to_string(),
            });
            run.status = RunStatus::Failed("cancelled by user".to_string());
            return Ok(run);
        }

        if run.step_count >= max_steps {
            tracing::info!(steps = run.step_count, "step limit reached");
            run.status = RunStatus::StepLimitExceeded;
            return Ok(run);
        }

        let prompt = prompt_builder.render(memory, query, &run.transcript);
        send_event(&event_tx, ReactEvent::Thinking);
        let output = llm
            .complete(&[Message::user(prompt)])
            .await
            .map_err(AgentError::LlmError)?;

        if let Some(thought) = leading_thought(&output) {
            send_event(&event_tx, ReactEvent::ThoughtContent {
                text: preview(&thought, OBSERVATION_PREVIEW_CHARS),
            });
            run.transcript.push(TranscriptEntry::Thought { text: thought });
        }

        match parse(&output) {
            ParsedAction::Final(answer) => {
                for chunk in answer.chars().collect::<Vec<char>>().chunks(CHUNK_CHARS) {
                    send_event(&event_tx, ReactEvent::MessageChunk {
                        text: chunk.iter().collect(),
                    });
                }
                send_event(&event_tx, ReactEvent::MessageDone);
                run.transcript
                    .push(TranscriptEntry::FinalAnswer { text: answer.clone() });
                run.status = RunStatus::Succeeded(answer);
                run.step_count += 1;
                return Ok(run);
            }
            ParsedAction::Act { tool, input } => {
                send_event(&event_tx, ReactEvent::ToolCall {
                    tool: tool.clone(),
                    input: input.clone(),
                });
                run.transcript.push(TranscriptEntry::Action {
                    tool: tool.clone(),
                    input: input.clone(),
                });
                let observation = match executor.lookup(&tool) {
                    Ok(t) => executor.execute(t.as_ref(), &input).await,
                    Err(err) => {
                        // 未知工具：可恢复，纠正文本占用这一条 Observation
                        match recovery.handle(&err, &valid_tools) {
                            RecoveryAction::FeedObservation(obs) => {
                                send_event(&event_tx, ReactEvent::Recovery { detail: obs.clone() });
                                obs
                            }
                            RecoveryAction::Abort => return Err(err),
                        }
                    }
                };
                send_event(&event_tx, ReactEvent::Observation {
                    tool: tool.clone(),
                    preview: preview(&observation, OBSERVATION_PREVIEW_CHARS),
                });
                run.transcript
                    .push(TranscriptEntry::Observation { text: observation });
            }
            ParsedAction::Malformed(raw) => {
                let err = AgentError::MalformedAction(preview(&raw, OBSERVATION_PREVIEW_CHARS));
                match recovery.handle(&err, &valid_tools) {
                    RecoveryAction::FeedObservation(obs) => {
                        send_event(&event_tx, ReactEvent::Recovery { detail: obs.clone() });
                        run.transcript
                            .push(TranscriptEntry::Observation { text: obs });
                    }
                    RecoveryAction::Abort => return Err(err),
                }
            }
        }

        // 无论哪个分支，这一轮都消耗一步
        run.step_count += 1;
    }
}
