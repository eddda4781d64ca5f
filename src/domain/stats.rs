use chrono::{DateTime, Duration, NaiveDate, Utc};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyStats {
    pub date: NaiveDate,
    pub created_count: i32,
    pub resolved_count: i32,
    pub comment_count: i32,
}

/// Half-open UTC window `[date 00:00, date+1 00:00)`.
pub fn day_bounds(date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = date.and_time(chrono::NaiveTime::MIN).and_utc();
    (start, start + Duration::days(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_bounds_cover_one_utc_day() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 9).unwrap();
        let (start, end) = day_bounds(date);
        assert_eq!(start.to_rfc3339(), "2025-03-09T00:00:00+00:00");
        assert_eq!(end.to_rfc3339(), "2025-03-10T00:00:00+00:00");
    }
}
