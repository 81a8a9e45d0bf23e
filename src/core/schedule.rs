use chrono::{Months, NaiveDate};

/// 預計達成月份：起始日加上整月數（月底自動對齊），月數無法判定時為 None
pub fn projected_completion(start: NaiveDate, months_needed: Option<u32>) -> Option<NaiveDate> {
    start.checked_add_months(Months::new(months_needed?))
}
