//! PushPlus push-notification client

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::info;

use crate::error::{MonitorError, Result};

use super::Notifier;

pub const DEFAULT_PUSHPLUS_URL: &str = "http://www.pushplus.plus/send";
pub const DEFAULT_TITLE: &str = "ETF grid signal alert";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Serialize)]
struct PushRequest<'a> {
    token: &'a str,
    title: &'a str,
    content: &'a str,
    template: &'a str,
}

#[derive(Debug, Deserialize)]
struct PushResponse {
    code: i64,
    #[serde(default)]
    msg: Option<String>,
}

pub struct PushPlusNotifier {
    client: reqwest::Client,
    url: String,
    token: String,
    title: String,
}

impl PushPlusNotifier {
    pub fn new(token: String) -> Self {
        Self::with_client(DEFAULT_PUSHPLUS_URL.to_string(), token, reqwest::Client::new())
    }

    pub fn with_client(url: String, token: String, client: reqwest::Client) -> Self {
        Self {
            client,
            url,
            token,
            title: DEFAULT_TITLE.to_string(),
        }
    }
}

#[async_trait]
impl Notifier for PushPlusNotifier {
    async fn send(&self, text: &str) -> Result<()> {
        let request = PushRequest {
            token: &self.token,
            title: &self.title,
            content: text,
            template: "txt",
        };

        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| MonitorError::Notify(e.to_string()))?;

        let body: PushResponse = response
            .json()
            .await
            .map_err(|e| MonitorError::Notify(format!("unreadable PushPlus response: {}", e)))?;

        if body.code != 200 {
            return Err(MonitorError::Notify(format!(
                "PushPlus rejected message: code {} ({})",
                body.code,
                body.msg.unwrap_or_default()
            )));
        }

        info!("PushPlus: notification delivered");
        Ok(())
    }
}
