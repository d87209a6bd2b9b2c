use chrono::{DateTime, Datelike, Duration, NaiveTime, TimeZone};

/// Returns start of the next day.
pub fn next_day_start<Tz: TimeZone>(date: DateTime<Tz>) -> DateTime<Tz> {
    (date + Duration::days(1)).with_time(NaiveTime::MIN).unwrap()
}

/// Start of the week containing `date`. Weeks start on Sunday, which is how
/// the weekly insights are bucketed.
pub fn week_start<Tz: TimeZone>(date: DateTime<Tz>) -> DateTime<Tz> {
    let days_from_sunday = date.weekday().num_days_from_sunday() as i64;
    (date - Duration::days(days_from_sunday))
        .with_time(NaiveTime::MIN)
        .unwrap()
}
