//! Mock LLM 客户端（无 API Key 时的回退，便于本地跑通流程）
//!
//! 直接以 Final Answer 回显最后一条用户输入的末行（即当前 Question），不调用任何工具。

use async_trait::async_trait;
use futures_util::stream;

use crate::llm::LlmClient;
use crate::memory::Message;

/// Mock 客户端：以 Final Answer 形式回显用户问题
#[derive(Debug, Default)]
pub struct MockLlmClient;

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, messages: &[Message]) -> Result<String, String> {
        let prompt = messages
            .last()
            .map(|m| m.content.as_str())
            .unwrap_or("(no input)");
        // ReAct prompt 的 Question 行携带原始问题
        let question = prompt
            .lines()
            .rev()
            .find_map(|l| l.strip_prefix("Question: "))
            .unwrap_or("(no question)");

        Ok(format!(
            "Thought: no language model is configured, so I can only echo.\n\
             Final Answer: [mock] you asked: {}",
            question
        ))
    }

    async fn complete_stream(
        &self,
        messages: &[Message],
    ) -> Result<std::pin::Pin<Box<dyn futures_util::Stream<Item = Result<String, String>> + Send>>, String>
    {
        let content = self.complete(messages).await?;
        Ok(Box::pin(stream::iter(vec![Ok(content)])))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_echoes_question() {
        let mock = MockLlmClient;
        let prompt = "Answer the following...\n\nQuestion: what is 2+2?\nThought: ";
        let out = mock.complete(&[Message::user(prompt)]).await.unwrap();
        assert!(out.contains("Final Answer:"));
        assert!(out.contains("what is 2+2?"));
    }
}
