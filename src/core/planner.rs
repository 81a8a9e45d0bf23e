use crate::core::calculator::{PlanInput, PlanOutcome, OTHER_REGION};
use crate::core::progress::SavingsProgress;
use crate::core::session::{Diagnosis, PlanSession};
use crate::domain::model::{NewLogEntry, Plan, RegionAddress, SavingsLogEntry};
use crate::domain::ports::{PlanStore, RegionLookup};
use crate::utils::error::{PlannerError, Result};
use rust_decimal::Decimal;
use std::num::NonZeroU32;

/// 表單送出的原始輸入
#[derive(Debug, Clone, PartialEq)]
pub struct PlanRequest {
    pub goal_name: String,
    pub income: Decimal,
    pub rent: Decimal,
    pub target_amount: Decimal,
    /// 使用者選擇的地區
    pub region: Option<String>,
    pub postal_code: Option<String>,
    /// 指定期間（月），None 則以剩餘資金推算
    pub duration_months: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRegion {
    pub label: String,
    pub address: Option<RegionAddress>,
}

pub struct Planner<S: PlanStore, L: RegionLookup> {
    store: S,
    lookup: L,
}

impl<S: PlanStore, L: RegionLookup> Planner<S, L> {
    pub fn new(store: S, lookup: L) -> Self {
        Self { store, lookup }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// 有郵遞區號且查得到時以查詢結果為準，否則使用選擇的地區（預設「その他」）
    pub async fn resolve_region(
        &self,
        selected: Option<&str>,
        postal_code: Option<&str>,
    ) -> ResolvedRegion {
        let fallback = selected
            .map(str::trim)
            .filter(|label| !label.is_empty())
            .unwrap_or(OTHER_REGION)
            .to_string();

        let Some(code) = postal_code.map(str::trim).filter(|code| !code.is_empty()) else {
            return ResolvedRegion {
                label: fallback,
                address: None,
            };
        };

        match self.lookup.lookup(code).await {
            Some(address) => {
                tracing::info!(
                    "📮 Postal code {} resolved to {} ({})",
                    code,
                    address.prefecture,
                    address.address
                );
                ResolvedRegion {
                    label: address.prefecture.clone(),
                    address: Some(address),
                }
            }
            None => {
                tracing::warn!(
                    "📮 No region found for postal code {}, using '{}'",
                    code,
                    fallback
                );
                ResolvedRegion {
                    label: fallback,
                    address: None,
                }
            }
        }
    }

    pub async fn lookup_postal_code(&self, postal_code: &str) -> Option<RegionAddress> {
        self.lookup.lookup(postal_code).await
    }

    /// 試算並把結果留在 session，等待保存
    pub async fn diagnose<'a>(
        &self,
        session: &'a mut PlanSession,
        request: PlanRequest,
    ) -> Result<&'a Diagnosis> {
        let goal_name = request.goal_name.trim().to_string();
        if goal_name.is_empty() {
            return Err(PlannerError::validation("goal name cannot be empty"));
        }

        let duration = match request.duration_months {
            Some(months) => Some(NonZeroU32::new(months).ok_or_else(|| {
                PlannerError::validation("duration must be at least 1 month")
            })?),
            None => None,
        };

        let region = self
            .resolve_region(request.region.as_deref(), request.postal_code.as_deref())
            .await;
        let input = PlanInput::new(
            request.income,
            request.rent,
            request.target_amount,
            region.label,
        )?;
        let outcome = PlanOutcome::calculate(&input, duration);

        tracing::debug!(
            "🧮 {:?} plan for '{}': monthly {}, months {:?}, feasible {}",
            outcome.mode(),
            goal_name,
            outcome.monthly_savings(),
            outcome.months_needed(),
            outcome.is_feasible()
        );

        Ok(session.submit(Diagnosis {
            goal_name,
            input,
            resolved_address: region.address,
            outcome,
        }))
    }

    /// 保存 session 中的試算結果；成功後清空 session，失敗時保留以便重試
    pub async fn save(&self, session: &mut PlanSession) -> Result<Plan> {
        let new_plan = match session.current() {
            None => return Err(PlannerError::validation("there is no diagnosis to save")),
            Some(diagnosis) if diagnosis.outcome.monthly_savings() <= Decimal::ZERO => {
                return Err(PlannerError::validation(
                    "現在の収支では貯金が難しいようです。固定費を見直してみましょう。",
                ))
            }
            Some(diagnosis) => diagnosis.to_new_plan(),
        };

        let plan = self.store.create_plan(new_plan).await?;
        session.reset();
        tracing::info!("💾 Saved plan #{} '{}'", plan.id, plan.goal_name);
        Ok(plan)
    }

    pub async fn list_plans(&self) -> Result<Vec<Plan>> {
        let plans = self.store.list_plans().await?;
        tracing::debug!("Loaded {} plans", plans.len());
        Ok(plans)
    }

    pub async fn delete_plan(&self, plan_id: i64) -> Result<()> {
        self.store.delete_plan(plan_id).await?;
        tracing::info!("🗑️ Deleted plan #{}", plan_id);
        Ok(())
    }

    pub async fn record_savings(
        &self,
        plan_id: i64,
        amount: Decimal,
        memo: Option<String>,
    ) -> Result<SavingsLogEntry> {
        if amount.is_zero() {
            return Err(PlannerError::validation("amount cannot be zero"));
        }
        let memo = memo
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty());

        let entry = self
            .store
            .append_log(NewLogEntry {
                plan_id,
                amount,
                memo,
            })
            .await?;
        tracing::info!("💰 Recorded {} for plan #{}", entry.amount, plan_id);
        Ok(entry)
    }

    pub async fn plan_history(&self, plan_id: i64) -> Result<Vec<SavingsLogEntry>> {
        self.store.list_logs(plan_id).await
    }

    pub async fn plan_progress(&self, plan: &Plan) -> Result<SavingsProgress> {
        let entries = self.store.list_logs(plan.id).await?;
        Ok(SavingsProgress::from_entries(plan.target_amount, &entries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::NewPlan;
    use async_trait::async_trait;
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Default)]
    struct MemoryState {
        plans: Vec<Plan>,
        logs: Vec<SavingsLogEntry>,
        next_id: i64,
    }

    #[derive(Clone, Default)]
    struct MemoryStore {
        state: Arc<Mutex<MemoryState>>,
        fail_writes: bool,
    }

    impl MemoryStore {
        fn failing() -> Self {
            Self {
                fail_writes: true,
                ..Self::default()
            }
        }
    }

    #[async_trait]
    impl PlanStore for MemoryStore {
        async fn create_plan(&self, plan: NewPlan) -> Result<Plan> {
            if self.fail_writes {
                return Err(PlannerError::StoreError {
                    status: 503,
                    message: "unavailable".to_string(),
                });
            }
            let mut state = self.state.lock().await;
            state.next_id += 1;
            let plan = Plan {
                id: state.next_id,
                goal_name: plan.goal_name,
                target_amount: plan.target_amount,
                monthly_savings: plan.monthly_savings,
                months_needed: plan.months_needed,
                region: plan.region,
                memo: plan.memo,
                created_at: Utc::now(),
            };
            state.plans.insert(0, plan.clone());
            Ok(plan)
        }

        async fn list_plans(&self) -> Result<Vec<Plan>> {
            Ok(self.state.lock().await.plans.clone())
        }

        async fn delete_plan(&self, plan_id: i64) -> Result<()> {
            let mut state = self.state.lock().await;
            state.plans.retain(|plan| plan.id != plan_id);
            state.logs.retain(|log| log.plan_id != plan_id);
            Ok(())
        }

        async fn append_log(&self, entry: NewLogEntry) -> Result<SavingsLogEntry> {
            let mut state = self.state.lock().await;
            state.next_id += 1;
            let entry = SavingsLogEntry {
                id: state.next_id,
                plan_id: entry.plan_id,
                amount: entry.amount,
                memo: entry.memo,
                created_at: Utc::now(),
            };
            state.logs.insert(0, entry.clone());
            Ok(entry)
        }

        async fn list_logs(&self, plan_id: i64) -> Result<Vec<SavingsLogEntry>> {
            let state = self.state.lock().await;
            Ok(state
                .logs
                .iter()
                .filter(|log| log.plan_id == plan_id)
                .cloned()
                .collect())
        }
    }

    struct StaticLookup {
        entries: HashMap<String, RegionAddress>,
    }

    impl StaticLookup {
        fn new() -> Self {
            let mut entries = HashMap::new();
            entries.insert(
                "1000001".to_string(),
                RegionAddress {
                    prefecture: "東京都".to_string(),
                    address: "東京都千代田区千代田".to_string(),
                },
            );
            Self { entries }
        }
    }

    #[async_trait]
    impl RegionLookup for StaticLookup {
        async fn lookup(&self, postal_code: &str) -> Option<RegionAddress> {
            self.entries.get(&postal_code.replace('-', "")).cloned()
        }
    }

    fn request() -> PlanRequest {
        PlanRequest {
            goal_name: "海外旅行".to_string(),
            income: dec!(250000),
            rent: dec!(70000),
            target_amount: dec!(500000),
            region: Some("北海道".to_string()),
            postal_code: None,
            duration_months: None,
        }
    }

    fn planner() -> Planner<MemoryStore, StaticLookup> {
        Planner::new(MemoryStore::default(), StaticLookup::new())
    }

    #[tokio::test]
    async fn postal_code_overrides_selected_region() {
        let planner = planner();
        let mut session = PlanSession::new();
        let request = PlanRequest {
            postal_code: Some("100-0001".to_string()),
            ..request()
        };

        let diagnosis = planner.diagnose(&mut session, request).await.unwrap();

        assert_eq!(diagnosis.input.region(), "東京都");
        assert_eq!(diagnosis.outcome.monthly_savings(), dec!(68250));
        assert_eq!(
            diagnosis.resolved_address.as_ref().unwrap().address,
            "東京都千代田区千代田"
        );
    }

    #[tokio::test]
    async fn unknown_postal_code_falls_back_to_selection() {
        let planner = planner();

        let region = planner.resolve_region(Some("北海道"), Some("9999999")).await;
        assert_eq!(region.label, "北海道");
        assert!(region.address.is_none());

        let region = planner.resolve_region(None, Some("9999999")).await;
        assert_eq!(region.label, OTHER_REGION);

        let region = planner.resolve_region(Some(" "), None).await;
        assert_eq!(region.label, OTHER_REGION);
    }

    #[tokio::test]
    async fn diagnose_rejects_invalid_requests() {
        let planner = planner();
        let mut session = PlanSession::new();

        let zero_duration = PlanRequest {
            duration_months: Some(0),
            ..request()
        };
        assert!(planner.diagnose(&mut session, zero_duration).await.is_err());

        let no_goal = PlanRequest {
            goal_name: "   ".to_string(),
            ..request()
        };
        assert!(planner.diagnose(&mut session, no_goal).await.is_err());

        let no_target = PlanRequest {
            target_amount: dec!(0),
            ..request()
        };
        assert!(planner.diagnose(&mut session, no_target).await.is_err());
        assert!(session.is_empty());
    }

    #[tokio::test]
    async fn save_persists_and_clears_session() {
        let planner = planner();
        let mut session = PlanSession::new();
        planner.diagnose(&mut session, request()).await.unwrap();

        let plan = planner.save(&mut session).await.unwrap();

        assert!(session.is_empty());
        assert_eq!(plan.goal_name, "海外旅行");
        assert_eq!(plan.region, "北海道");
        // 北海道：250000 * 0.285 = 71250; floor((250000 - 70000 - 71250) * 0.7) = 76125
        assert_eq!(plan.monthly_savings, dec!(76125));
        assert_eq!(plan.months_needed, Some(7));
        assert_eq!(planner.list_plans().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn save_refuses_infeasible_plan() {
        let planner = planner();
        let mut session = PlanSession::new();
        let request = PlanRequest {
            rent: dec!(200000),
            ..request()
        };
        planner.diagnose(&mut session, request).await.unwrap();

        let err = planner.save(&mut session).await.unwrap_err();
        assert!(matches!(err, PlannerError::ValidationError { .. }));
        assert!(planner.list_plans().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn save_keeps_month_count_for_tiny_surplus() {
        let planner = planner();
        let mut session = PlanSession::new();
        let request = PlanRequest {
            income: dec!(5),
            rent: dec!(0),
            target_amount: dec!(10000000000),
            region: None,
            ..request()
        };
        planner.diagnose(&mut session, request).await.unwrap();

        let plan = planner.save(&mut session).await.unwrap();
        assert_eq!(plan.monthly_savings, dec!(2));
        assert_eq!(plan.months_needed, Some(u32::MAX));
    }

    #[tokio::test]
    async fn save_without_diagnosis_fails() {
        let planner = planner();
        let mut session = PlanSession::new();
        assert!(planner.save(&mut session).await.is_err());
    }

    #[tokio::test]
    async fn failed_save_keeps_session() {
        let planner = Planner::new(MemoryStore::failing(), StaticLookup::new());
        let mut session = PlanSession::new();
        planner.diagnose(&mut session, request()).await.unwrap();

        let err = planner.save(&mut session).await.unwrap_err();
        assert!(matches!(err, PlannerError::StoreError { status: 503, .. }));
        assert!(!session.is_empty());
    }

    #[tokio::test]
    async fn savings_log_drives_progress() {
        let planner = planner();
        let mut session = PlanSession::new();
        planner.diagnose(&mut session, request()).await.unwrap();
        let plan = planner.save(&mut session).await.unwrap();

        planner
            .record_savings(plan.id, dec!(300000), Some("ボーナス".to_string()))
            .await
            .unwrap();
        planner
            .record_savings(plan.id, dec!(250000), Some("  ".to_string()))
            .await
            .unwrap();
        assert!(planner.record_savings(plan.id, dec!(0), None).await.is_err());

        let history = planner.plan_history(plan.id).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].amount, dec!(250000));
        assert_eq!(history[0].memo, None);
        assert_eq!(history[1].memo.as_deref(), Some("ボーナス"));

        let progress = planner.plan_progress(&plan).await.unwrap();
        assert_eq!(progress.total_saved, dec!(550000));
        assert!(progress.is_complete());
        assert_eq!(progress.remaining(), Decimal::ZERO);

        planner.delete_plan(plan.id).await.unwrap();
        assert!(planner.list_plans().await.unwrap().is_empty());
    }
}
