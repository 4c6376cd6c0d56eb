//! 控制台界面
//!
//! 启动时打印工具目录；逐行读标准输入：quit/exit/q（不分大小写）退出，
//! 空行重新提示，其余输入作为一次 AgentRun。回答分段流式打印，
//! Ctrl-C 取消当前 run 而不杀会话，回合之间打印 80 个 '-' 分隔。

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::agent::{process_query, AgentComponents};
use crate::memory::ConversationMemory;
use crate::react::{ReactEvent, RunStatus};

const SEPARATOR_WIDTH: usize = 80;

fn print_banner(components: &AgentComponents) {
    println!("{}", "=".repeat(SEPARATOR_WIDTH));
    println!("Scout - ReAct Agent with Tools");
    println!("{}", "=".repeat(SEPARATOR_WIDTH));
    println!("\nAvailable Tools:");
    for (name, description) in components.catalog() {
        println!("  - {}: {}", name, description);
    }
    println!("\n{}", "=".repeat(SEPARATOR_WIDTH));
    println!("Agent ready! Type 'quit' to exit.\n");
}

/// 消费事件通道并写到控制台：工具调用与观察给出进度行，回答分段即时刷出
async fn render_events(mut rx: mpsc::UnboundedReceiver<ReactEvent>) {
    let mut stdout = tokio::io::stdout();
    while let Some(ev) = rx.recv().await {
        match ev {
            ReactEvent::ThoughtContent { text } => {
                let _ = stdout
                    .write_all(format!("[thought] {}\n", text).as_bytes())
                    .await;
            }
            ReactEvent::ToolCall { tool, input } => {
                let _ = stdout
                    .write_all(format!("[tool] {} <- {}\n", tool, input).as_bytes())
                    .await;
            }
            ReactEvent::Observation { tool, preview } => {
                let _ = stdout
                    .write_all(format!("[observation] {} -> {}\n", tool, preview).as_bytes())
                    .await;
            }
            ReactEvent::Recovery { detail } => {
                let _ = stdout
                    .write_all(format!("[recovery] {}\n", detail).as_bytes())
                    .await;
            }
            ReactEvent::MessageChunk { text } => {
                let _ = stdout.write_all(text.as_bytes()).await;
                let _ = stdout.flush().await;
            }
            ReactEvent::MessageDone => {
                let _ = stdout.write_all(b"\n").await;
            }
            _ => {}
        }
    }
    let _ = stdout.flush().await;
}

/// 运行控制台主循环，直到用户退出或标准输入关闭
pub async fn run_console(components: AgentComponents, mut memory: ConversationMemory) {
    print_banner(&components);

    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    loop {
        print!("You: ");
        use std::io::Write;
        let _ = std::io::stdout().flush();

        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            // EOF 或读取失败都按退出处理
            Ok(None) | Err(_) => break,
        };
        let query = line.trim().to_string();

        if query.is_empty() {
            continue;
        }
        if matches!(query.to_lowercase().as_str(), "quit" | "exit" | "q") {
            println!("Goodbye!");
            break;
        }

        println!("\nAgent: ");
        let (tx, rx) = mpsc::unbounded_channel();
        let renderer = tokio::spawn(render_events(rx));
        let cancel_token = CancellationToken::new();

        // Ctrl-C 只取消当前 run：置位取消令牌，循环在下一个步边界干净退出
        let result = {
            let run_fut =
                process_query(&components, &mut memory, &query, Some(&tx), cancel_token.clone());
            tokio::pin!(run_fut);
            loop {
                tokio::select! {
                    r = &mut run_fut => break r,
                    _ = tokio::signal::ctrl_c() => {
                        cancel_token.cancel();
                    }
                }
            }
        };
        drop(tx);
        let _ = renderer.await;

        match result {
            Ok(run) => match run.status {
                // 成功的回答已经流式打印过了
                RunStatus::Succeeded(_) => {}
                _ => println!("\n{}", run.final_text()),
            },
            // LLM 不可达等外层错误：打印后继续下一条查询
            Err(e) => println!("\nError: {}", e),
        }
        println!("\n{}", "-".repeat(SEPARATOR_WIDTH));
    }
}
