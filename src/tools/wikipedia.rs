//! Wikipedia 工具：MediaWiki extracts API 查询条目简介
//!
//! action=query&prop=extracts 返回按 pageid 索引的松散 JSON，
//! 用 serde_json::Value 导航；找不到条目时给出明确的错误描述。

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use crate::tools::scraper::truncate_chars;
use crate::tools::Tool;

const API_ENDPOINT: &str = "https://en.wikipedia.org/w/api.php";

/// Wikipedia 工具：查询条目的纯文本简介
pub struct WikipediaTool {
    client: Client,
    endpoint: String,
    max_chars: usize,
}

impl WikipediaTool {
    pub fn new(timeout_secs: u64, max_chars: usize) -> Self {
        Self::with_endpoint(API_ENDPOINT, timeout_secs, max_chars)
    }

    /// 测试可注入替身端点
    pub fn with_endpoint(endpoint: impl Into<String>, timeout_secs: u64, max_chars: usize) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .user_agent("scout-agent/0.1 (console ReAct agent)")
            .build()
            .unwrap_or_default();
        Self {
            client,
            endpoint: endpoint.into(),
            max_chars,
        }
    }

    /// 从 query.pages.{pageid}.extract 取第一篇条目的简介
    fn extract_from_reply(reply: &Value, title: &str) -> Result<(String, String), String> {
        let pages = reply
            .get("query")
            .and_then(|q| q.get("pages"))
            .and_then(|p| p.as_object())
            .ok_or_else(|| "unexpected Wikipedia response shape".to_string())?;
        let page = pages
            .values()
            .next()
            .ok_or_else(|| format!("no Wikipedia article found for '{}'", title))?;
        // pageid 为 -1 表示条目不存在
        if page.get("missing").is_some() || page.get("pageid").is_none() {
            return Err(format!("no Wikipedia article found for '{}'", title));
        }
        let found_title = page
            .get("title")
            .and_then(|t| t.as_str())
            .unwrap_or(title)
            .to_string();
        let extract = page
            .get("extract")
            .and_then(|e| e.as_str())
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| format!("Wikipedia article '{}' has no extract", found_title))?;
        Ok((found_title, extract.to_string()))
    }

    async fn fetch(&self, title: &str) -> Result<String, String> {
        let url = format!(
            "{}?action=query&format=json&prop=extracts&exintro=1&explaintext=1&redirects=1&titles={}",
            self.endpoint,
            urlencoding::encode(title)
        );
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| format!("Wikipedia request failed: {}", e))?;
        if !resp.status().is_success() {
            return Err(format!("Wikipedia lookup failed: HTTP {}", resp.status()));
        }
        let reply: Value = resp
            .json()
            .await
            .map_err(|e| format!("unexpected Wikipedia response: {}", e))?;
        let (found_title, extract) = Self::extract_from_reply(&reply, title)?;
        Ok(format!(
            "{}: {}",
            found_title,
            truncate_chars(extract.trim(), self.max_chars)
        ))
    }
}

#[async_trait]
impl Tool for WikipediaTool {
    fn name(&self) -> &str {
        "Wikipedia"
    }

    fn description(&self) -> &str {
        "Useful for looking up factual information on Wikipedia. Input should be a search query."
    }

    async fn invoke(&self, input: &str) -> Result<String, String> {
        let title = input.trim();
        if title.is_empty() {
            return Err("missing search query".to_string());
        }
        tracing::info!(title = %title, "wikipedia tool fetch");
        self.fetch(title).await
    }
}
