use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 已保存的貯金計畫（id 與 created_at 由遠端資料庫指定）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub id: i64,
    pub goal_name: String,
    pub target_amount: Decimal,
    pub monthly_savings: Decimal,
    /// None = 無法判定（每月可存金額為 0）
    pub months_needed: Option<u32>,
    pub region: String,
    pub memo: String,
    pub created_at: DateTime<Utc>,
}

/// 新增計畫用 payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPlan {
    pub goal_name: String,
    pub target_amount: Decimal,
    pub monthly_savings: Decimal,
    pub months_needed: Option<u32>,
    pub region: String,
    pub memo: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsLogEntry {
    pub id: i64,
    pub plan_id: i64,
    pub amount: Decimal,
    pub memo: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewLogEntry {
    pub plan_id: i64,
    pub amount: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
}

/// 郵遞區號查詢結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionAddress {
    /// 都道府県名，直接作為地區標籤
    pub prefecture: String,
    pub address: String,
}
