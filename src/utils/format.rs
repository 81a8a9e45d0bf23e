use chrono::NaiveDate;
use rust_decimal::Decimal;

/// 金額顯示：千分位 + 「円」，小數部分四捨五入到整數
pub fn format_yen(amount: Decimal) -> String {
    let rounded = amount.round();
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let digits = rounded.abs().trunc().to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if negative {
        format!("-{} 円", grouped)
    } else {
        format!("{} 円", grouped)
    }
}

pub fn format_month(date: NaiveDate) -> String {
    date.format("%Y年%m月").to_string()
}

pub fn format_months_needed(months: Option<u32>) -> String {
    match months {
        Some(m) => format!("{} ヶ月", m),
        None => "判定不能".to_string(),
    }
}

/// 比例轉百分比（小數一位），超出 Decimal 範圍時顯示「計測不能」
pub fn format_percent(ratio: Decimal) -> String {
    match ratio.checked_mul(Decimal::ONE_HUNDRED) {
        Some(percent) => format!("{}%", percent.round_dp(1)),
        None => "計測不能".to_string(),
    }
}

/// 文字進度條，ratio 會被限制在 0..=1
pub fn progress_bar(ratio: f64, width: usize) -> String {
    let ratio = if ratio.is_finite() { ratio.clamp(0.0, 1.0) } else { 0.0 };
    let filled = (ratio * width as f64).round() as usize;
    format!(
        "[{}{}] {:>3.0}%",
        "#".repeat(filled),
        "-".repeat(width - filled),
        ratio * 100.0
    )
}
