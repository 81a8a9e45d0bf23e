use crate::core::calculator::{CostTier, PlanMode, PlanOutcome, PRESET_REGIONS};
use crate::core::progress::SavingsProgress;
use crate::core::schedule::projected_completion;
use crate::core::session::Diagnosis;
use crate::domain::model::{Plan, RegionAddress, SavingsLogEntry};
use crate::utils::format::{
    format_month, format_months_needed, format_percent, format_yen, progress_bar,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;

const BAR_WIDTH: usize = 20;

/// 每行結尾補上換行後串接
fn join_lines(lines: Vec<String>) -> String {
    lines.into_iter().map(|line| line + "\n").collect()
}

/// 試算結果（對應表單的「診断結果」區塊）
pub fn render_diagnosis(diagnosis: &Diagnosis, today: NaiveDate) -> String {
    let outcome = &diagnosis.outcome;
    let mut lines = vec![format!("🔍 診断結果: {}", diagnosis.goal_name)];

    if let Some(address) = &diagnosis.resolved_address {
        lines.push(format!("   住所: {}", address.address));
    }
    lines.push(format!(
        "   地域: {}（{}）",
        diagnosis.input.region(),
        CostTier::of(diagnosis.input.region()).label()
    ));
    lines.push(format!(
        "   目標金額: {}",
        format_yen(diagnosis.input.target_amount())
    ));

    let amount_label = match outcome.mode() {
        PlanMode::Surplus => "推奨される月々の貯金額",
        PlanMode::Duration => "必要な月々の貯金額",
    };
    lines.push(format!(
        "   {}: {}",
        amount_label,
        format_yen(outcome.monthly_savings())
    ));
    lines.push(format!(
        "   目標達成までの期間: {}",
        format_months_needed(outcome.months_needed())
    ));
    let completion = projected_completion(today, outcome.months_needed())
        .map(format_month)
        .unwrap_or_else(|| "-".to_string());
    lines.push(format!("   達成予定時期: {}", completion));

    if let PlanOutcome::Duration(plan) = outcome {
        lines.push(format!(
            "   可処分所得: {} / 貯蓄率: {}",
            format_yen(plan.budget.disposable_income),
            format_percent(plan.savings_ratio)
        ));
        let verdict = if plan.feasible { "達成可能" } else { "収支が不足しています" };
        lines.push(format!("   判定: {}", verdict));
    }

    if !outcome.advice().is_empty() {
        lines.push("\n💡 アドバイス".to_string());
        lines.extend(outcome.advice().notes().iter().map(|note| format!("   {}", note)));
    }

    if outcome.monthly_savings() <= Decimal::ZERO {
        lines.push(
            "\n❌ 現在の収支では貯金が難しいようです。固定費を見直してみましょう。".to_string(),
        );
    }

    join_lines(lines)
}

/// 計畫一覧中的一筆（對應「プラン詳細」）
pub fn render_plan(plan: &Plan, progress: Option<&SavingsProgress>) -> String {
    let mut lines = vec![
        format!(
            "#{} {} (目標: {}) [{}]",
            plan.id,
            plan.goal_name,
            format_yen(plan.target_amount),
            plan.created_at.format("%Y-%m-%d")
        ),
        format!(
            "   月々の目標: {} / 期間: {} / エリア: {}",
            format_yen(plan.monthly_savings),
            format_months_needed(plan.months_needed),
            plan.region
        ),
    ];
    if let Some(progress) = progress {
        lines.push(format!(
            "   {} {} / 残り {}",
            progress_bar(progress.ratio(), BAR_WIDTH),
            format_yen(progress.total_saved),
            format_yen(progress.remaining())
        ));
    }

    join_lines(lines)
}

pub fn render_history(plan_id: i64, entries: &[SavingsLogEntry], progress: &SavingsProgress) -> String {
    let mut lines = vec![format!(
        "📒 Plan #{} savings log ({} entries)",
        plan_id,
        entries.len()
    )];
    lines.extend(entries.iter().map(|entry| {
        format!(
            "   {}  {:>14}  {}",
            entry.created_at.format("%Y-%m-%d %H:%M"),
            format_yen(entry.amount),
            entry.memo.as_deref().unwrap_or("")
        )
    }));
    lines.push(format!(
        "   合計: {} / 目標: {}",
        format_yen(progress.total_saved),
        format_yen(progress.target_amount)
    ));
    lines.push(format!("   {}", progress_bar(progress.ratio(), BAR_WIDTH)));
    if progress.is_complete() {
        lines.push("   🎉 目標達成！".to_string());
    }

    join_lines(lines)
}

pub fn render_lookup(postal_code: &str, found: Option<&RegionAddress>) -> String {
    match found {
        Some(address) => format!(
            "📮 {} → {}（{}）\n   {}\n",
            postal_code,
            address.prefecture,
            CostTier::of(&address.prefecture).label(),
            address.address
        ),
        None => format!("📮 {}: 該当する住所が見つかりませんでした\n", postal_code),
    }
}

pub fn render_regions() -> String {
    join_lines(
        PRESET_REGIONS
            .iter()
            .map(|region| format!("{}\t{}", region, CostTier::of(region).label()))
            .collect(),
    )
}
