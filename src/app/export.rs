use crate::domain::model::Plan;
use crate::utils::error::Result;
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Serialize)]
struct PlanRow<'a> {
    id: i64,
    created_at: String,
    goal_name: &'a str,
    // 以字串輸出，避免浮點格式（500000.0）
    target_amount: String,
    monthly_savings: String,
    /// 無法判定時留空
    months_needed: Option<u32>,
    region: &'a str,
    memo: &'a str,
}

impl<'a> From<&'a Plan> for PlanRow<'a> {
    fn from(plan: &'a Plan) -> Self {
        Self {
            id: plan.id,
            created_at: plan.created_at.format("%Y-%m-%d").to_string(),
            goal_name: &plan.goal_name,
            target_amount: plan.target_amount.normalize().to_string(),
            monthly_savings: plan.monthly_savings.normalize().to_string(),
            months_needed: plan.months_needed,
            region: &plan.region,
            memo: &plan.memo,
        }
    }
}

pub fn write_plans_csv<W: std::io::Write>(writer: W, plans: &[Plan]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for plan in plans {
        csv_writer.serialize(PlanRow::from(plan))?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// 把計畫清單寫成 CSV 檔，回傳寫入筆數
pub fn export_plans_csv<P: AsRef<Path>>(path: P, plans: &[Plan]) -> Result<usize> {
    if let Some(parent) = path.as_ref().parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let file = std::fs::File::create(&path)?;
    write_plans_csv(file, plans)?;
    tracing::debug!("Exported {} plans to {}", plans.len(), path.as_ref().display());
    Ok(plans.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn plan(id: i64, months_needed: Option<u32>) -> Plan {
        Plan {
            id,
            goal_name: "海外旅行".to_string(),
            target_amount: dec!(500000),
            monthly_savings: dec!(68250),
            months_needed,
            region: "東京都".to_string(),
            memo: "✅ 無理のない積立ペースです。".to_string(),
            created_at: Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn writes_header_and_rows() {
        let mut buffer = Vec::new();
        write_plans_csv(&mut buffer, &[plan(1, Some(8)), plan(2, None)]).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines[0],
            "id,created_at,goal_name,target_amount,monthly_savings,months_needed,region,memo"
        );
        assert!(lines[1].starts_with("1,2026-10-18,海外旅行,500000,68250,8,東京都,"));
        assert!(lines[2].contains(",,東京都,"));
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn export_creates_parent_directories() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("reports").join("plans.csv");

        let written = export_plans_csv(&path, &[plan(1, Some(8))]).unwrap();

        assert_eq!(written, 1);
        assert!(std::fs::read_to_string(&path).unwrap().contains("海外旅行"));
    }
}
