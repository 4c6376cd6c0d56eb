//! WebSearch 工具：DuckDuckGo 文本检索
//!
//! 走 lite 版 HTML 端点（无需 API Key），query 经 urlencoding 编码，
//! 结果用 html2text 提取后截断。

use async_trait::async_trait;
use reqwest::Client;

use crate::tools::scraper::{html_to_text, truncate_chars};
use crate::tools::Tool;

const SEARCH_ENDPOINT: &str = "https://lite.duckduckgo.com/lite/";

/// WebSearch 工具：互联网检索
pub struct WebSearchTool {
    client: Client,
    endpoint: String,
    max_chars: usize,
}

impl WebSearchTool {
    pub fn new(timeout_secs: u64, max_chars: usize) -> Self {
        Self::with_endpoint(SEARCH_ENDPOINT, timeout_secs, max_chars)
    }

    /// 测试可注入替身端点
    pub fn with_endpoint(endpoint: impl Into<String>, timeout_secs: u64, max_chars: usize) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()
            .unwrap_or_default();
        Self {
            client,
            endpoint: endpoint.into(),
            max_chars,
        }
    }

    async fn search(&self, query: &str) -> Result<String, String> {
        let url = format!("{}?q={}", self.endpoint, urlencoding::encode(query));
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| format!("search request failed: {}", e))?;
        if !resp.status().is_success() {
            return Err(format!("search failed: HTTP {}", resp.status()));
        }
        let body = resp.text().await.map_err(|e| format!("reading search results: {}", e))?;
        let text = html_to_text(&body);
        if text.trim().is_empty() {
            return Err(format!("no results for '{}'", query));
        }
        Ok(truncate_chars(&text, self.max_chars))
    }
}

#[async_trait]
impl Tool for WebSearchTool {
    fn name(&self) -> &str {
        "WebSearch"
    }

    fn description(&self) -> &str {
        "Useful for searching the internet for current information. Input should be a search query."
    }

    async fn invoke(&self, input: &str) -> Result<String, String> {
        let query = input.trim();
        if query.is_empty() {
            return Err("missing search query".to_string());
        }
        tracing::info!(query = %query, "search tool query");
        self.search(query).await
    }
}
