//! Weather 工具：wttr.in 天气查询（免 API Key）
//!
//! GET https://wttr.in/{location}?format=j1，带超时与 UA；
//! 线格式用类型化 serde 结构接住，schema 偏差或非 200 一律转为错误描述。

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::tools::Tool;

/// wttr.in j1 响应中本工具关心的部分
#[derive(Debug, Deserialize)]
struct WttrReply {
    current_condition: Vec<CurrentCondition>,
}

#[derive(Debug, Deserialize)]
struct CurrentCondition {
    #[serde(rename = "temp_C")]
    temp_c: String,
    #[serde(rename = "temp_F")]
    temp_f: String,
    #[serde(rename = "weatherDesc")]
    weather_desc: Vec<DescValue>,
    humidity: String,
    #[serde(rename = "windspeedKmph")]
    windspeed_kmph: String,
}

#[derive(Debug, Deserialize)]
struct DescValue {
    value: String,
}

/// Weather 工具：按城市名查询当前天气
pub struct WeatherTool {
    client: Client,
    base_url: String,
}

impl WeatherTool {
    pub fn new(timeout_secs: u64) -> Self {
        Self::with_base_url("https://wttr.in", timeout_secs)
    }

    /// 测试可注入替身端点
    pub fn with_base_url(base_url: impl Into<String>, timeout_secs: u64) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .user_agent("curl/8.0")
            .build()
            .unwrap_or_default();
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn render(location: &str, current: &CurrentCondition) -> String {
        let condition = current
            .weather_desc
            .first()
            .map(|d| d.value.as_str())
            .unwrap_or("unknown");
        format!(
            "Weather for {}:\n\
             - Temperature: {}°C / {}°F\n\
             - Condition: {}\n\
             - Humidity: {}%\n\
             - Wind Speed: {} km/h",
            location, current.temp_c, current.temp_f, condition, current.humidity,
            current.windspeed_kmph
        )
    }

    async fn fetch(&self, location: &str) -> Result<String, String> {
        let url = format!(
            "{}/{}?format=j1",
            self.base_url,
            urlencoding::encode(location)
        );
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| format!("getting weather: {}", e))?;
        if !resp.status().is_success() {
            return Err(format!(
                "could not fetch weather for {} (HTTP {})",
                location,
                resp.status()
            ));
        }
        let reply: WttrReply = resp
            .json()
            .await
            .map_err(|e| format!("unexpected weather response: {}", e))?;
        let current = reply
            .current_condition
            .first()
            .ok_or_else(|| format!("no current conditions reported for {}", location))?;
        Ok(Self::render(location, current))
    }
}

#[async_trait]
impl Tool for WeatherTool {
    fn name(&self) -> &str {
        "Weather"
    }

    fn description(&self) -> &str {
        "Gets current weather for a location. Input should be a city name."
    }

    async fn invoke(&self, input: &str) -> Result<String, String> {
        let location = input.trim();
        if location.is_empty() {
            return Err("missing location".to_string());
        }
        tracing::info!(location = %location, "weather tool fetch");
        self.fetch(location).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "current_condition": [{
            "temp_C": "18",
            "temp_F": "64",
            "weatherDesc": [{"value": "Partly cloudy"}],
            "humidity": "72",
            "windspeedKmph": "13"
        }]
    }"#;

    #[test]
    fn test_wire_shape_deserializes() {
        let reply: WttrReply = serde_json::from_str(SAMPLE).unwrap();
        let current = &reply.current_condition[0];
        assert_eq!(current.temp_c, "18");
        assert_eq!(current.weather_desc[0].value, "Partly cloudy");
    }

    #[test]
    fn test_render_report() {
        let reply: WttrReply = serde_json::from_str(SAMPLE).unwrap();
        let report = WeatherTool::render("London", &reply.current_condition[0]);
        assert!(report.contains("Weather for London:"));
        assert!(report.contains("18°C / 64°F"));
        assert!(report.contains("Partly cloudy"));
        assert!(report.contains("13 km/h"));
    }

    #[test]
    fn test_schema_deviation_is_error() {
        let bad: Result<WttrReply, _> = serde_json::from_str(r#"{"nearest_area": []}"#);
        assert!(bad.is_err());
    }

    #[tokio::test]
    async fn test_empty_location_rejected() {
        let tool = WeatherTool::new(1);
        assert!(tool.invoke("  ").await.is_err());
    }
}
