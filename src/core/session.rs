use crate::core::calculator::{PlanInput, PlanOutcome};
use crate::domain::model::{NewPlan, RegionAddress};

/// 一次試算的完整結果：輸入、地區解析與計算結果
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnosis {
    pub goal_name: String,
    pub input: PlanInput,
    /// 由郵遞區號查到的地址（有查到才有）
    pub resolved_address: Option<RegionAddress>,
    pub outcome: PlanOutcome,
}

impl Diagnosis {
    pub fn to_new_plan(&self) -> NewPlan {
        NewPlan {
            goal_name: self.goal_name.clone(),
            target_amount: self.input.target_amount(),
            monthly_savings: self.outcome.monthly_savings(),
            months_needed: self.outcome.months_needed(),
            region: self.input.region().to_string(),
            memo: self.outcome.advice().message(),
        }
    }
}

/// 表單狀態：保留最近一次試算，直到保存或重設為止。
/// 由呼叫端持有並傳入，不使用全域狀態。
#[derive(Debug, Clone, Default)]
pub struct PlanSession {
    pending: Option<Diagnosis>,
}

impl PlanSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// 新的試算會取代前一次的結果
    pub fn submit(&mut self, diagnosis: Diagnosis) -> &Diagnosis {
        self.pending.insert(diagnosis)
    }

    pub fn current(&self) -> Option<&Diagnosis> {
        self.pending.as_ref()
    }

    pub fn reset(&mut self) {
        self.pending = None;
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_none()
    }
}
