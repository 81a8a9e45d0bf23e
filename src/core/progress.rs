use crate::domain::model::SavingsLogEntry;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// 單一計畫的累計貯金狀況。累計金額不設上限，可以超過目標
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SavingsProgress {
    pub target_amount: Decimal,
    pub total_saved: Decimal,
    pub entry_count: usize,
}

impl SavingsProgress {
    pub fn from_entries(target_amount: Decimal, entries: &[SavingsLogEntry]) -> Self {
        Self {
            target_amount,
            total_saved: entries.iter().map(|entry| entry.amount).sum(),
            entry_count: entries.len(),
        }
    }

    pub fn remaining(&self) -> Decimal {
        (self.target_amount - self.total_saved).max(Decimal::ZERO)
    }

    /// 顯示用比例，限制在 0..=1
    pub fn ratio(&self) -> f64 {
        if self.target_amount <= Decimal::ZERO {
            return 0.0;
        }
        let ratio = (self.total_saved / self.target_amount)
            .to_f64()
            .unwrap_or(0.0);
        ratio.clamp(0.0, 1.0)
    }

    pub fn is_complete(&self) -> bool {
        self.total_saved >= self.target_amount
    }
}
