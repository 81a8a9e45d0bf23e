use crate::domain::model::RegionAddress;
use crate::domain::ports::{ConfigProvider, RegionLookup};
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

/// zipcloud 相容的郵遞區號查詢。只查一次、不重試，任何失敗都視為查無資料
#[derive(Debug, Clone)]
pub struct PostalCodeLookup {
    client: Client,
    endpoint: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    status: u16,
    message: Option<String>,
    results: Option<Vec<SearchResult>>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    address1: String,
    #[serde(default)]
    address2: String,
    #[serde(default)]
    address3: String,
}

impl PostalCodeLookup {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Result<Self> {
        Self::new(config.lookup_endpoint(), config.lookup_timeout())
    }

    async fn search(&self, code: &str) -> Result<Option<RegionAddress>> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("zipcode", code)])
            .send()
            .await?
            .error_for_status()?;
        let body: SearchResponse = serde_json::from_str(&response.text().await?)?;

        if body.status != 200 {
            tracing::warn!(
                "📮 Lookup service answered status {}: {}",
                body.status,
                body.message.unwrap_or_default()
            );
            return Ok(None);
        }

        Ok(body
            .results
            .and_then(|results| results.into_iter().next())
            .map(|result| RegionAddress {
                address: format!("{}{}{}", result.address1, result.address2, result.address3),
                prefecture: result.address1,
            }))
    }
}

#[async_trait]
impl RegionLookup for PostalCodeLookup {
    async fn lookup(&self, postal_code: &str) -> Option<RegionAddress> {
        let Some(code) = normalize_postal_code(postal_code) else {
            tracing::debug!("📮 '{}' is not a 7-digit postal code", postal_code);
            return None;
        };

        match self.search(&code).await {
            Ok(found) => found,
            Err(e) => {
                tracing::warn!("📮 Postal code lookup for {} failed: {}", code, e);
                None
            }
        }
    }
}

/// 去掉「〒」、連字號與空白後必須剛好是 7 位數字
pub fn normalize_postal_code(raw: &str) -> Option<String> {
    let code: String = raw
        .chars()
        .filter(|c| !matches!(c, '〒' | '-' | '－' | '‐' | '−') && !c.is_whitespace())
        .collect();

    if code.len() == 7 && code.chars().all(|c| c.is_ascii_digit()) {
        Some(code)
    } else {
        None
    }
}
