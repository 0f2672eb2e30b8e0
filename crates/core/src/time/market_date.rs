use crate::domain::market::Market;
use anyhow::Context;
use chrono::{DateTime, Datelike, Duration, NaiveDate, Timelike, Utc};
use std::collections::HashSet;

/// The calendar date a market snapshot describes. Before the local close
/// cutoff the previous session's data is still what is shown, so the date
/// rolls back a day, then past weekends and configured holidays.
pub fn resolve_snapshot_date(market: Market, now_utc: DateTime<Utc>) -> anyhow::Result<NaiveDate> {
    let (offset_secs, cutoff) = market_clock(market);
    let offset =
        chrono::FixedOffset::east_opt(offset_secs).context("invalid market utc offset")?;
    let now_local = now_utc.with_timezone(&offset);

    let cutoff_reached = (now_local.hour(), now_local.minute()) >= cutoff;
    let mut date = now_local.date_naive();
    if !cutoff_reached {
        date = date - Duration::days(1);
    }

    let holidays = configured_holidays();
    while is_weekend(date) || holidays.contains(&date) {
        date = date - Duration::days(1);
    }

    Ok(date)
}

/// UTC offset and close cutoff per market. KRX closes ~15:30 KST; NASDAQ
/// closes 16:00 ET, tracked here as a fixed UTC-5 with an extra hour of
/// settling buffer instead of a DST table. This feeds a display date, not
/// order routing.
fn market_clock(market: Market) -> (i32, (u32, u32)) {
    match market {
        Market::Kospi | Market::Kosdaq => (9 * 3600, (16, 0)),
        Market::Nasdaq => (-5 * 3600, (17, 0)),
    }
}

fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), chrono::Weekday::Sat | chrono::Weekday::Sun)
}

fn configured_holidays() -> HashSet<NaiveDate> {
    // Extend via MARKET_HOLIDAYS="YYYY-MM-DD,YYYY-MM-DD".
    let mut out = HashSet::new();
    let years = [2024, 2025, 2026, 2027, 2028, 2029, 2030];
    for y in years {
        if let Some(d) = NaiveDate::from_ymd_opt(y, 1, 1) {
            out.insert(d);
        }
        if let Some(d) = NaiveDate::from_ymd_opt(y, 12, 25) {
            out.insert(d);
        }
    }

    if let Ok(s) = std::env::var("MARKET_HOLIDAYS") {
        for part in s.split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            if let Ok(d) = NaiveDate::parse_from_str(part, "%Y-%m-%d") {
                out.insert(d);
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn kospi_uses_previous_day_before_cutoff() {
        // 2026-02-02 06:00 UTC = 15:00 KST (<16:00 cutoff), Monday.
        let now = Utc.with_ymd_and_hms(2026, 2, 2, 6, 0, 0).unwrap();
        let d = resolve_snapshot_date(Market::Kospi, now).unwrap();
        // Rolls back to Sunday, then to Friday.
        assert_eq!(d, NaiveDate::from_ymd_opt(2026, 1, 30).unwrap());
    }

    #[test]
    fn kospi_uses_same_day_after_cutoff() {
        // 2026-02-02 08:00 UTC = 17:00 KST (>=16:00 cutoff).
        let now = Utc.with_ymd_and_hms(2026, 2, 2, 8, 0, 0).unwrap();
        let d = resolve_snapshot_date(Market::Kospi, now).unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2026, 2, 2).unwrap());
    }

    #[test]
    fn nasdaq_clock_runs_behind_utc() {
        // 2026-02-03 03:00 UTC = 2026-02-02 22:00 UTC-5 (past the 17:00 cutoff).
        let now = Utc.with_ymd_and_hms(2026, 2, 3, 3, 0, 0).unwrap();
        let d = resolve_snapshot_date(Market::Nasdaq, now).unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2026, 2, 2).unwrap());
    }

    #[test]
    fn rolls_back_over_new_year_holiday() {
        // 2026-01-01 08:00 UTC = 17:00 KST on a fixed holiday (Thursday).
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 8, 0, 0).unwrap();
        let d = resolve_snapshot_date(Market::Kospi, now).unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2025, 12, 31).unwrap());
    }
}
