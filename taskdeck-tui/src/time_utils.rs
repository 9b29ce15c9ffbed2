use time::{Date, OffsetDateTime, UtcOffset};

/// The local offset, or UTC when it cannot be determined (e.g. once other
/// threads are running on some unix platforms).
pub fn local_offset() -> UtcOffset {
    UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC)
}

pub fn now_in(offset: UtcOffset) -> OffsetDateTime {
    OffsetDateTime::now_utc().to_offset(offset)
}

pub fn format_date(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        date.month() as u8,
        date.day()
    )
}

/// Due dates are entered as `YYYY-MM-DD` and stored as local midnight.
pub fn parse_due_date(input: &str, offset: UtcOffset) -> Option<OffsetDateTime> {
    let format = time::macros::format_description!("[year]-[month]-[day]");
    let date = Date::parse(input.trim(), &format).ok()?;
    Some(date.midnight().assume_offset(offset))
}

/// Calendar date of a due timestamp as seen in `offset`.
pub fn due_date_in(due: OffsetDateTime, offset: UtcOffset) -> Date {
    due.to_offset(offset).date()
}
