//! 貯金計畫試算：由收入、房租、目標金額與地區推算每月貯金額與所需月數。
//!
//! 兩種模式：
//! - 剩餘資金模式：不指定期間，以可支配所得的 70% 作為建議月額
//! - 期間模式：指定月數，目標金額 ÷ 月數（無條件進位）為必要月額
//!
//! 所有函式皆為純計算，不做 I/O，也不會回傳錯誤；輸入檢查在 [`PlanInput::new`] 完成。

use crate::utils::error::{PlannerError, Result};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::fmt;
use std::num::NonZeroU32;

pub const OTHER_REGION: &str = "その他";

/// 生活費係數 1.10 的高物價地區
pub const HIGH_COST_REGIONS: [&str; 3] = ["東京都", "神奈川県", "大阪府"];

/// 表單上可選的地區
pub const PRESET_REGIONS: [&str; 7] = [
    "北海道",
    "東京都",
    "神奈川県",
    "大阪府",
    "愛知県",
    "福岡県",
    OTHER_REGION,
];

const URBAN_MULTIPLIER: Decimal = dec!(1.10);
const SURPLUS_REGIONAL_MULTIPLIER: Decimal = dec!(0.95);
const DURATION_REGIONAL_MULTIPLIER: Decimal = dec!(0.90);

/// 房租以外生活費佔收入的比例
const LIVING_COST_SHARE: Decimal = dec!(0.30);
/// 可支配所得中建議存下的比例
const RECOMMENDED_SHARE: Decimal = dec!(0.70);
const RENT_BURDEN_LIMIT: Decimal = dec!(0.35);
const STRONG_SURPLUS_SHARE: Decimal = dec!(0.20);
const DEMANDING_RATIO: Decimal = dec!(0.40);

const TOKYO: &str = "東京都";
const TOKYO_LOW_RENT: Decimal = dec!(70000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanMode {
    /// 不指定期間，由剩餘資金推算
    Surplus,
    /// 指定期間（月數）
    Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CostTier {
    Urban,
    Regional,
}

impl CostTier {
    pub fn of(region: &str) -> Self {
        if HIGH_COST_REGIONS.contains(&region.trim()) {
            CostTier::Urban
        } else {
            CostTier::Regional
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CostTier::Urban => "都市部",
            CostTier::Regional => "地方・郊外",
        }
    }

    pub fn multiplier(&self, mode: PlanMode) -> Decimal {
        match (self, mode) {
            (CostTier::Urban, _) => URBAN_MULTIPLIER,
            (CostTier::Regional, PlanMode::Surplus) => SURPLUS_REGIONAL_MULTIPLIER,
            (CostTier::Regional, PlanMode::Duration) => DURATION_REGIONAL_MULTIPLIER,
        }
    }
}

pub fn region_multiplier(region: &str, mode: PlanMode) -> Decimal {
    CostTier::of(region).multiplier(mode)
}

/// 已檢查過的試算輸入
#[derive(Debug, Clone, PartialEq)]
pub struct PlanInput {
    income: Decimal,
    rent: Decimal,
    target_amount: Decimal,
    region: String,
}

impl PlanInput {
    pub fn new(
        income: Decimal,
        rent: Decimal,
        target_amount: Decimal,
        region: impl Into<String>,
    ) -> Result<Self> {
        if income.is_sign_negative() && !income.is_zero() {
            return Err(PlannerError::validation("income cannot be negative"));
        }
        if rent.is_sign_negative() && !rent.is_zero() {
            return Err(PlannerError::validation("rent cannot be negative"));
        }
        if target_amount <= Decimal::ZERO {
            return Err(PlannerError::validation(
                "target amount must be greater than zero",
            ));
        }

        let region = region.into();
        let region = match region.trim() {
            "" => OTHER_REGION.to_string(),
            trimmed => trimmed.to_string(),
        };

        Ok(Self {
            income,
            rent,
            target_amount,
            region,
        })
    }

    pub fn income(&self) -> Decimal {
        self.income
    }

    pub fn rent(&self) -> Decimal {
        self.rent
    }

    pub fn target_amount(&self) -> Decimal {
        self.target_amount
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    fn rent_is_burdensome(&self) -> bool {
        self.rent > self.income * RENT_BURDEN_LIMIT
    }

    fn is_low_rent_tokyo(&self) -> bool {
        self.region == TOKYO && self.rent < TOKYO_LOW_RENT
    }
}

/// 收支概算
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HouseholdBudget {
    pub multiplier: Decimal,
    pub estimated_living_cost: Decimal,
    pub disposable_income: Decimal,
}

pub fn household_budget(input: &PlanInput, mode: PlanMode) -> HouseholdBudget {
    let multiplier = region_multiplier(input.region(), mode);
    let estimated_living_cost = input.income * LIVING_COST_SHARE * multiplier;
    let disposable_income = input
        .income
        .checked_sub(input.rent)
        .and_then(|rest| rest.checked_sub(estimated_living_cost))
        .unwrap_or(Decimal::MIN);

    HouseholdBudget {
        multiplier,
        estimated_living_cost,
        disposable_income,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AdviceNote {
    RegionContext {
        region: String,
        tier: CostTier,
        multiplier: Decimal,
    },
    HighRent,
    StrongSurplus,
    DemandingPace,
    OnTrack,
    TokyoLowRent,
}

impl fmt::Display for AdviceNote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdviceNote::RegionContext {
                region,
                tier,
                multiplier,
            } => write!(
                f,
                "📍 {}（{}）の生活費係数 {} を適用しています。",
                region,
                tier.label(),
                multiplier
            ),
            AdviceNote::HighRent => {
                write!(f, "⚠️ 家賃が収入の35%を超えています。固定費の見直しが最優先です。")
            }
            AdviceNote::StrongSurplus => write!(
                f,
                "💪 収入の20%を超える積立ペースです。無理がないか確認しつつ、投資（NISA等）も検討しましょう。"
            ),
            AdviceNote::DemandingPace => write!(
                f,
                "⚠️ 必要な積立額が収入の40%を超えています。期間を延ばすことも検討しましょう。"
            ),
            AdviceNote::OnTrack => {
                write!(f, "✅ 無理のない積立ペースです。この調子で続けましょう。")
            }
            AdviceNote::TokyoLowRent => write!(f, "ℹ️ 都内としては家賃をよく抑えられています。"),
        }
    }
}

/// 依序排列的建議，`message()` 以換行串接
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Advice {
    notes: Vec<AdviceNote>,
}

impl Advice {
    pub fn notes(&self) -> &[AdviceNote] {
        &self.notes
    }

    pub fn contains(&self, note: &AdviceNote) -> bool {
        self.notes.contains(note)
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn message(&self) -> String {
        self.notes
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn push(&mut self, note: AdviceNote) {
        self.notes.push(note);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SurplusPlan {
    pub budget: HouseholdBudget,
    pub recommended_monthly: Decimal,
    /// None = 無法判定
    pub months_needed: Option<u32>,
    pub advice: Advice,
}

impl SurplusPlan {
    pub fn is_feasible(&self) -> bool {
        self.recommended_monthly > Decimal::ZERO
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DurationPlan {
    pub budget: HouseholdBudget,
    pub duration_months: u32,
    pub required_monthly: Decimal,
    pub feasible: bool,
    /// 必要月額 ÷ 收入；收入為 0 時為 0，溢位時為 `Decimal::MAX`
    pub savings_ratio: Decimal,
    pub advice: Advice,
}

/// 不指定期間：以剩餘資金推算建議月額與所需月數
pub fn plan_from_surplus(input: &PlanInput) -> SurplusPlan {
    let budget = household_budget(input, PlanMode::Surplus);
    let recommended_monthly = (budget.disposable_income * RECOMMENDED_SHARE)
        .floor()
        .max(Decimal::ZERO);
    let months_needed = months_to_reach(input.target_amount, recommended_monthly);

    let mut advice = Advice::default();
    if input.rent_is_burdensome() {
        advice.push(AdviceNote::HighRent);
    } else if recommended_monthly > input.income * STRONG_SURPLUS_SHARE {
        advice.push(AdviceNote::StrongSurplus);
    } else {
        advice.push(AdviceNote::OnTrack);
    }
    if input.is_low_rent_tokyo() {
        advice.push(AdviceNote::TokyoLowRent);
    }

    SurplusPlan {
        budget,
        recommended_monthly,
        months_needed,
        advice,
    }
}

/// 指定期間：目標金額 ÷ 月數（無條件進位）為必要月額
pub fn plan_for_duration(input: &PlanInput, duration: NonZeroU32) -> DurationPlan {
    let budget = household_budget(input, PlanMode::Duration);
    let required_monthly = (input.target_amount / Decimal::from(duration.get())).ceil();
    let feasible = required_monthly <= budget.disposable_income;
    // 收入極小時比例超出 Decimal 範圍，以 MAX 表示
    let savings_ratio = if input.income.is_zero() {
        Decimal::ZERO
    } else {
        required_monthly
            .checked_div(input.income)
            .unwrap_or(Decimal::MAX)
    };

    let tier = CostTier::of(input.region());
    let mut advice = Advice::default();
    advice.push(AdviceNote::RegionContext {
        region: input.region().to_string(),
        tier,
        multiplier: budget.multiplier,
    });
    if input.rent_is_burdensome() {
        advice.push(AdviceNote::HighRent);
    } else if savings_ratio > DEMANDING_RATIO {
        advice.push(AdviceNote::DemandingPace);
    } else {
        advice.push(AdviceNote::OnTrack);
    }
    if input.is_low_rent_tokyo() {
        advice.push(AdviceNote::TokyoLowRent);
    }

    DurationPlan {
        budget,
        duration_months: duration.get(),
        required_monthly,
        feasible,
        savings_ratio,
        advice,
    }
}

/// 月額 > 0 時一定有月數，超過 u32 範圍則停在 `u32::MAX`
fn months_to_reach(target: Decimal, monthly: Decimal) -> Option<u32> {
    if monthly <= Decimal::ZERO {
        return None;
    }
    let months = target
        .checked_div(monthly)
        .and_then(|months| months.ceil().to_u32())
        .unwrap_or(u32::MAX);
    Some(months)
}

/// 兩種模式的共同結果
#[derive(Debug, Clone, PartialEq)]
pub enum PlanOutcome {
    Surplus(SurplusPlan),
    Duration(DurationPlan),
}

impl PlanOutcome {
    pub fn calculate(input: &PlanInput, duration: Option<NonZeroU32>) -> Self {
        match duration {
            Some(months) => PlanOutcome::Duration(plan_for_duration(input, months)),
            None => PlanOutcome::Surplus(plan_from_surplus(input)),
        }
    }

    pub fn mode(&self) -> PlanMode {
        match self {
            PlanOutcome::Surplus(_) => PlanMode::Surplus,
            PlanOutcome::Duration(_) => PlanMode::Duration,
        }
    }

    pub fn monthly_savings(&self) -> Decimal {
        match self {
            PlanOutcome::Surplus(plan) => plan.recommended_monthly,
            PlanOutcome::Duration(plan) => plan.required_monthly,
        }
    }

    pub fn months_needed(&self) -> Option<u32> {
        match self {
            PlanOutcome::Surplus(plan) => plan.months_needed,
            PlanOutcome::Duration(plan) => Some(plan.duration_months),
        }
    }

    pub fn is_feasible(&self) -> bool {
        match self {
            PlanOutcome::Surplus(plan) => plan.is_feasible(),
            PlanOutcome::Duration(plan) => plan.feasible,
        }
    }

    pub fn budget(&self) -> &HouseholdBudget {
        match self {
            PlanOutcome::Surplus(plan) => &plan.budget,
            PlanOutcome::Duration(plan) => &plan.budget,
        }
    }

    pub fn advice(&self) -> &Advice {
        match self {
            PlanOutcome::Surplus(plan) => &plan.advice,
            PlanOutcome::Duration(plan) => &plan.advice,
        }
    }
}
