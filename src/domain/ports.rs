use crate::domain::model::{NewLogEntry, NewPlan, Plan, RegionAddress, SavingsLogEntry};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait ConfigProvider: Send + Sync {
    fn store_endpoint(&self) -> &str;
    fn store_api_key(&self) -> &str;
    fn plans_table(&self) -> &str;
    fn logs_table(&self) -> &str;
    fn store_timeout(&self) -> Duration;
    fn lookup_endpoint(&self) -> &str;
    fn lookup_timeout(&self) -> Duration;
}

/// 計畫與貯金紀錄的遠端儲存
#[async_trait]
pub trait PlanStore: Send + Sync {
    async fn create_plan(&self, plan: NewPlan) -> Result<Plan>;
    /// 依建立時間由新到舊
    async fn list_plans(&self) -> Result<Vec<Plan>>;
    async fn delete_plan(&self, plan_id: i64) -> Result<()>;
    async fn append_log(&self, entry: NewLogEntry) -> Result<SavingsLogEntry>;
    /// 依建立時間由新到舊
    async fn list_logs(&self, plan_id: i64) -> Result<Vec<SavingsLogEntry>>;
}

/// 郵遞區號 → 地區。查不到、逾時或回應格式不對一律回傳 None
#[async_trait]
pub trait RegionLookup: Send + Sync {
    async fn lookup(&self, postal_code: &str) -> Option<RegionAddress>;
}
