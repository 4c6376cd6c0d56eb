//! WebScraper 工具：抓取网页并提取可读文本
//!
//! GET 带浏览器 UA 与超时；HTML 用 html2text 提取正文（失败时退回手工去标签），
//! 结果截断到配置的字符数并追加省略号。

use async_trait::async_trait;
use html2text::from_read;
use reqwest::Client;

use crate::tools::Tool;

/// 现代浏览器 UA，避免被站点当作爬虫拒绝
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// 简易去除 HTML 标签（html2text 失败时的回退）
pub(crate) fn strip_html_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    let mut prev_whitespace = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => {
                let is_whitespace = c.is_whitespace();
                if is_whitespace && prev_whitespace {
                    continue;
                }
                prev_whitespace = is_whitespace;
                out.push(if is_whitespace { ' ' } else { c });
            }
            _ => {}
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ").trim().to_string()
}

/// 判断内容是否像 HTML（需提取可读文本）
pub(crate) fn looks_like_html(s: &str) -> bool {
    let s = s.trim_start();
    s.starts_with("<!")
        || s.starts_with("<html")
        || s.starts_with("<HTML")
        || (s.len() > 20
            && s.contains('<')
            && (s.contains("</") || s.contains("<meta") || s.contains("<head") || s.contains("<title")))
}

/// 将 HTML 转为可读文本（去除 script/style 等），空白折叠为单个空格
pub(crate) fn html_to_text(html: &str) -> String {
    let text = match from_read(html.as_bytes(), 120) {
        Ok(text) if !text.trim().is_empty() => text,
        _ => strip_html_tags(html),
    };
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// 截断到 limit 个字符，超出时追加省略号
pub(crate) fn truncate_chars(s: &str, limit: usize) -> String {
    if s.chars().count() > limit {
        format!("{}...", s.chars().take(limit).collect::<String>())
    } else {
        s.to_string()
    }
}

/// WebScraper 工具：提取网页正文文本
pub struct WebScraperTool {
    client: Client,
    max_chars: usize,
}

impl WebScraperTool {
    pub fn new(timeout_secs: u64, max_chars: usize) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_default();
        Self { client, max_chars }
    }

    async fn fetch(&self, url: &str) -> Result<String, String> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| format!("scraping web page: {}", e))?;
        if !resp.status().is_success() {
            return Err(format!("failed to fetch URL: status code {}", resp.status().as_u16()));
        }
        let mut body = resp.text().await.map_err(|e| format!("reading body: {}", e))?;

        // 去除 BOM，避免 HTML 检测失败
        if body.starts_with('\u{FEFF}') {
            body = body[1..].to_string();
        }

        let text = if looks_like_html(&body) {
            html_to_text(&body)
        } else {
            body.split_whitespace().collect::<Vec<_>>().join(" ")
        };
        Ok(truncate_chars(&text, self.max_chars))
    }
}

#[async_trait]
impl Tool for WebScraperTool {
    fn name(&self) -> &str {
        "WebScraper"
    }

    fn description(&self) -> &str {
        "Extracts text from a webpage. Input should be a URL."
    }

    async fn invoke(&self, input: &str) -> Result<String, String> {
        let url = input.trim();
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(format!("invalid URL '{}'", url));
        }
        tracing::info!(url = %url, "scraper tool fetch");
        self.fetch(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_html_tags() {
        let html = "<html><body><p>Hello   <b>world</b></p></body></html>";
        assert_eq!(strip_html_tags(html), "Hello world");
    }

    #[test]
    fn test_looks_like_html() {
        assert!(looks_like_html("<!DOCTYPE html><html></html>"));
        assert!(looks_like_html("  <html><head></head></html>"));
        assert!(!looks_like_html("plain text, no markup here at all"));
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("short", 10), "short");
        assert_eq!(truncate_chars("0123456789abc", 10), "0123456789...");
    }

    #[test]
    fn test_html_to_text_collapses_whitespace() {
        let text = html_to_text("<p>line one</p>\n<p>line   two</p>");
        assert_eq!(text, "line one line two");
    }

    #[tokio::test]
    async fn test_invalid_url_rejected() {
        let tool = WebScraperTool::new(1, 500);
        let err = tool.invoke("not a url").await.unwrap_err();
        assert!(err.contains("invalid URL"));
    }
}
