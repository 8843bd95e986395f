// Utility helpers for parsing, the percentage policy and number formatting.
//
// Sheet cells arrive as display strings; everything here turns them into
// typed values so the rest of the code can assume clean counters and dates.
use chrono::{Days, NaiveDate};
use num_format::{Locale, ToFormattedString};

/// Parse a spreadsheet cell into a non-negative counter.
///
/// - Accepts `Option<&str>` so callers can pass through absent cells.
/// - Trims whitespace and strips thousands separators like `","`.
/// - Reads the leading integer part only, so `"12.7"` and `"12 cars"` are 12.
/// - Returns `None` for empty, negative or non-numeric input.
pub fn parse_count_safe(s: Option<&str>) -> Option<u32> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    let s = s.replace(",", "");
    let s = s.strip_prefix('+').unwrap_or(s.as_str());
    let digits: String = s.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse::<u32>().ok()
}

/// Parse a sheet date cell: either `YYYY-MM-DD` text or a spreadsheet
/// serial day number (days since 1899-12-30, fraction is the time of day).
pub fn parse_date_safe(s: Option<&str>) -> Option<NaiveDate> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok().or_else(|| serial_date(s))
}

fn serial_date(s: &str) -> Option<NaiveDate> {
    let whole = s.split('.').next()?;
    if whole.is_empty() || !whole.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let days: u64 = whole.parse().ok()?;
    if days == 0 {
        return None;
    }
    NaiveDate::from_ymd_opt(1899, 12, 30)?.checked_add_days(Days::new(days))
}

/// Percentage change from `previous` to `current`.
///
/// Defined as 0 when `previous` is 0. That is a reporting policy, not a
/// mathematical identity: a jump from 0 to 5 shows as "no change".
pub fn percent_change(current: u64, previous: u64) -> f64 {
    if previous == 0 {
        return 0.0;
    }
    (current as f64 - previous as f64) / previous as f64 * 100.0
}

/// `sum / count` rounded half up, with an empty set averaging to 0.
pub fn rounded_average(sum: u64, count: usize) -> u64 {
    let count = count.max(1) as u64;
    (2 * sum + count) / (2 * count)
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // Fixed decimals with locale-aware thousands separators (`1,234.5`).
    let s = format!("{:.*}", decimals, n.abs());
    let neg = n < 0.0 && s.chars().any(|c| c.is_ascii_digit() && c != '0');
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
    let int_val: i64 = int_part.parse().unwrap_or(0);
    let mut res = int_val.to_formatted_string(&Locale::en);
    if let Some(frac) = frac_part {
        res.push('.');
        res.push_str(frac);
    }
    if neg {
        format!("-{}", res)
    } else {
        res
    }
}

/// Signed percentage for comparison cards, e.g. `+12.5%` or `-40.0%`.
pub fn format_percent(pct: f64) -> String {
    let sign = if pct > 0.0 { "+" } else { "" };
    format!("{}{}%", sign, format_number(pct, 1))
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    n.to_formatted_string(&Locale::en)
}

/// Short day label used for "today"/"yesterday" headings, e.g. `4 Jan`.
pub fn format_day(date: Option<NaiveDate>) -> String {
    match date {
        Some(d) => d.format("%-d %b").to_string(),
        None => "previous".to_string(),
    }
}
