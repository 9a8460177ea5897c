use time::macros::format_description;
use time::{Date, OffsetDateTime};

pub fn now_utc() -> OffsetDateTime {
    OffsetDateTime::now_utc()
}

pub fn today_utc() -> Date {
    OffsetDateTime::now_utc().date()
}

/// Formats a date the way it is printed on Italian documents (`dd/mm/yyyy`).
pub fn format_date_it(date: Date) -> String {
    date.format(format_description!("[day]/[month]/[year]"))
        .unwrap_or_else(|_| date.to_string())
}

/// Formats a timestamp as `dd/mm/yyyy HH:MM` (UTC).
pub fn format_datetime_it(datetime: OffsetDateTime) -> String {
    datetime
        .format(format_description!("[day]/[month]/[year] [hour]:[minute]"))
        .unwrap_or_else(|_| datetime.to_string())
}
