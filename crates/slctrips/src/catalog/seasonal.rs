use chrono::{Datelike, NaiveDate};

/// Tags that earn a boost while the seasonal window is open.
pub const BOOST_TAGS: [&str; 4] = ["haunted", "ghost", "halloween", "fall-colors"];

const BOOST_MONTH: u32 = 10;

/// Number of distinct boost tags on the destination when `date` falls in October,
/// otherwise zero. The caller decides which calendar `date` comes from.
pub fn seasonal_boost<S: AsRef<str>>(tags: &[S], date: NaiveDate) -> u32 {
    if date.month() != BOOST_MONTH {
        return 0;
    }

    BOOST_TAGS
        .iter()
        .filter(|boost| {
            tags.iter()
                .any(|tag| tag.as_ref().trim().eq_ignore_ascii_case(boost))
        })
        .count() as u32
}
