use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// Monday-to-Sunday week containing `day`.
pub fn week_of(day: NaiveDate) -> Vec<NaiveDate> {
    let monday = day - Duration::days(i64::from(day.weekday().num_days_from_monday()));
    (0..7).map(|offset| monday + Duration::days(offset)).collect()
}

/// i18n key of the weekday name.
pub fn weekday_key(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "schedule.mon",
        Weekday::Tue => "schedule.tue",
        Weekday::Wed => "schedule.wed",
        Weekday::Thu => "schedule.thu",
        Weekday::Fri => "schedule.fri",
        Weekday::Sat => "schedule.sat",
        Weekday::Sun => "schedule.sun",
    }
}

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}
