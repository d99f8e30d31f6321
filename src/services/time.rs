use std::fmt;

use chrono::{DateTime, Datelike, TimeZone};

use crate::i18n::tr;

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;
const WEEK: i64 = 7 * DAY;

/// Coarse "time ago" label for `timestamp` as seen at `now`, in the default
/// language.
pub fn relative_time<Tz>(timestamp: &DateTime<Tz>, now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    relative_time_for(None, timestamp, now)
}

/// Like [`relative_time`] with an explicit language.
///
/// Buckets include their lower bound: exactly 60s is "1m ago". Anything a
/// week or older is rendered as an absolute date in `timestamp`'s timezone;
/// timestamps in the future count as "Just now".
pub fn relative_time_for<Tz>(
    lang: Option<&str>,
    timestamp: &DateTime<Tz>,
    now: &DateTime<Tz>,
) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let delta = (now.clone() - timestamp.clone()).num_seconds();

    if delta < MINUTE {
        tr(lang, "time.just_now", None)
    } else if delta < HOUR {
        ago(lang, "time.minutes_ago", delta / MINUTE)
    } else if delta < DAY {
        ago(lang, "time.hours_ago", delta / HOUR)
    } else if delta < WEEK {
        ago(lang, "time.days_ago", delta / DAY)
    } else {
        absolute_date(lang, timestamp)
    }
}

/// "3 Mar 2026", with the month name taken from the language table.
fn absolute_date<Tz: TimeZone>(lang: Option<&str>, timestamp: &DateTime<Tz>) -> String {
    let day = timestamp.day().to_string();
    let month = tr(lang, &format!("month.{}", timestamp.month()), None);
    let year = timestamp.year().to_string();
    tr(
        lang,
        "time.date",
        Some(&[
            ("day", day.as_str()),
            ("month", month.as_str()),
            ("year", year.as_str()),
        ]),
    )
}

fn ago(lang: Option<&str>, key: &str, n: i64) -> String {
    let n = n.to_string();
    tr(lang, key, Some(&[("n", n.as_str())]))
}
