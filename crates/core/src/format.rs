use crate::domain::market::Market;

const DISPLAY_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Render a trade price for its market: KOSPI/KOSDAQ in won, NASDAQ in
/// dollars, both integer-rounded with grouped thousands. Unknown markets get
/// the bare grouped number. Missing or non-finite input renders nothing (the
/// caller shows a placeholder).
pub fn format_price(market_label: &str, price: Option<f64>) -> Option<String> {
    let price = price.filter(|p| p.is_finite())?;
    let grouped = group_thousands(price.round() as i64);

    let formatted = match Market::from_label(market_label) {
        Some(Market::Nasdaq) => format!("${grouped}"),
        Some(Market::Kospi) | Some(Market::Kosdaq) => format!("{grouped}원"),
        None => grouped,
    };
    Some(formatted)
}

fn group_thousands(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        out.push('-');
    }

    let first = digits.len() % 3;
    for (i, c) in digits.chars().enumerate() {
        if i != 0 && (i + 3 - first) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Render a timestamp as `YYYY-MM-DD HH:mm`.
///
/// Input that is already short and date-prefixed was formatted upstream and
/// passes through untouched. Unparseable input also passes through; a stale
/// string beats an empty cell.
pub fn format_datetime(s: &str) -> String {
    let trimmed = s.trim();
    if trimmed.len() <= 16 && has_date_prefix(trimmed) {
        return trimmed.to_string();
    }

    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(trimmed) {
        return dt.format(DISPLAY_DATETIME_FORMAT).to_string();
    }
    for layout in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(trimmed, layout) {
            return dt.format(DISPLAY_DATETIME_FORMAT).to_string();
        }
    }

    trimmed.to_string()
}

fn has_date_prefix(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() >= 10
        && b[..4].iter().all(|c| c.is_ascii_digit())
        && b[4] == b'-'
        && b[5..7].iter().all(|c| c.is_ascii_digit())
        && b[7] == b'-'
        && b[8..10].iter().all(|c| c.is_ascii_digit())
}
