use crate::domain::model::{NewLogEntry, NewPlan, Plan, SavingsLogEntry};
use crate::domain::ports::{ConfigProvider, PlanStore};
use crate::utils::error::{PlannerError, Result};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// PostgREST 相容的遠端資料庫（例如 Supabase）客戶端
#[derive(Clone)]
pub struct RestPlanStore {
    client: Client,
    base_url: String,
    api_key: String,
    plans_table: String,
    logs_table: String,
}

impl RestPlanStore {
    pub fn new<C: ConfigProvider + ?Sized>(config: &C) -> Result<Self> {
        let client = Client::builder().timeout(config.store_timeout()).build()?;

        Ok(Self {
            client,
            base_url: config.store_endpoint().trim_end_matches('/').to_string(),
            api_key: config.store_api_key().to_string(),
            plans_table: config.plans_table().to_string(),
            logs_table: config.logs_table().to_string(),
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn request(&self, method: Method, table: &str) -> RequestBuilder {
        self.client
            .request(method, self.table_url(table))
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    /// 非 2xx 回應轉成 StoreError，保留回應內容方便除錯
    async fn ensure_success(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        tracing::error!("❌ Store request failed with {}: {}", status, body);
        Err(PlannerError::StoreError {
            status: status.as_u16(),
            message: if body.is_empty() {
                status.to_string()
            } else {
                body
            },
        })
    }

    async fn insert<T, R>(&self, table: &str, row: &T) -> Result<R>
    where
        T: Serialize + Sync,
        R: DeserializeOwned,
    {
        tracing::debug!("POST {}", self.table_url(table));
        let response = self
            .request(Method::POST, table)
            .header("Prefer", "return=representation")
            .json(row)
            .send()
            .await?;
        let response = Self::ensure_success(response).await?;
        let status = response.status().as_u16();

        // return=representation 會回傳含新資料列的陣列
        let rows: Vec<R> = serde_json::from_str(&response.text().await?)?;
        rows.into_iter().next().ok_or_else(|| PlannerError::StoreError {
            status,
            message: format!("insert into '{}' returned no row", table),
        })
    }

    async fn select<R: DeserializeOwned>(&self, table: &str, filters: &[(&str, String)]) -> Result<Vec<R>> {
        tracing::debug!("GET {} {:?}", self.table_url(table), filters);
        let response = self
            .request(Method::GET, table)
            .query(&[("select", "*"), ("order", "created_at.desc")])
            .query(filters)
            .send()
            .await?;
        let response = Self::ensure_success(response).await?;
        Ok(serde_json::from_str(&response.text().await?)?)
    }

    async fn delete(&self, table: &str, filters: &[(&str, String)]) -> Result<()> {
        tracing::debug!("DELETE {} {:?}", self.table_url(table), filters);
        let response = self
            .request(Method::DELETE, table)
            .query(filters)
            .send()
            .await?;
        Self::ensure_success(response).await?;
        Ok(())
    }
}

#[async_trait]
impl PlanStore for RestPlanStore {
    async fn create_plan(&self, plan: NewPlan) -> Result<Plan> {
        self.insert(&self.plans_table, &plan).await
    }

    async fn list_plans(&self) -> Result<Vec<Plan>> {
        self.select(&self.plans_table, &[]).await
    }

    /// 先刪除該計畫的貯金紀錄，再刪除計畫本身
    async fn delete_plan(&self, plan_id: i64) -> Result<()> {
        self.delete(&self.logs_table, &[("plan_id", format!("eq.{}", plan_id))])
            .await?;
        self.delete(&self.plans_table, &[("id", format!("eq.{}", plan_id))])
            .await
    }

    async fn append_log(&self, entry: NewLogEntry) -> Result<SavingsLogEntry> {
        self.insert(&self.logs_table, &entry).await
    }

    async fn list_logs(&self, plan_id: i64) -> Result<Vec<SavingsLogEntry>> {
        self.select(&self.logs_table, &[("plan_id", format!("eq.{}", plan_id))])
            .await
    }
}
