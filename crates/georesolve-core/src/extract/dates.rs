//! Date range extraction

use chrono::{Days, NaiveDate};
use lazy_static::lazy_static;
use regex::Regex;

/// Window used when the text names no date at all
pub const DEFAULT_WINDOW_DAYS: u64 = 30;

lazy_static! {
    static ref RANGE_RE: Regex = Regex::new(
        r"\b(?:from|between)\s+(\d{4}-\d{2}-\d{2})\s+(?:to|and|until|till|through)\s+(\d{4}-\d{2}-\d{2})\b"
    )
    .unwrap();
    static ref SINGLE_DATE_RE: Regex = Regex::new(r"\b(\d{4}-\d{2}-\d{2})\b").unwrap();
    static ref LAST_WEEK_RE: Regex = Regex::new(r"\b(?:last|past)\s+week\b").unwrap();
    static ref LAST_MONTH_RE: Regex = Regex::new(r"\b(?:last|past)\s+month\b").unwrap();
    static ref LAST_N_DAYS_RE: Regex = Regex::new(r"\b(?:last|past)\s+(\d+)\s+days?\b").unwrap();
    static ref YESTERDAY_RE: Regex = Regex::new(r"\byesterday\b").unwrap();
    static ref MONTH_YEAR_RE: Regex = Regex::new(
        r"\b(jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?|aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)\s+(\d{4})\b"
    )
    .unwrap();
    static ref YEAR_RE: Regex = Regex::new(r"\b((?:19|20)\d{2})\b").unwrap();
}

/// Resolved date window, inclusive on both ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Nothing in the text matched and the default window was used
    pub defaulted: bool,
}

impl DateRange {
    fn new(a: NaiveDate, b: NaiveDate) -> Self {
        let (start, end) = if a <= b { (a, b) } else { (b, a) };
        Self {
            start,
            end,
            defaulted: false,
        }
    }

    fn ending_today(today: NaiveDate, days: u64) -> Option<Self> {
        today
            .checked_sub_days(Days::new(days))
            .map(|start| Self::new(start, today))
    }
}

/// Extract a date range, trying each form in precedence order
pub fn extract_dates(text: &str, today: NaiveDate) -> DateRange {
    let text = text.to_lowercase();

    explicit_range(&text)
        .or_else(|| single_date(&text))
        .or_else(|| relative_range(&text, today))
        .or_else(|| month_year(&text))
        .or_else(|| bare_year(&text))
        .unwrap_or_else(|| {
            let mut range = DateRange::ending_today(today, DEFAULT_WINDOW_DAYS)
                .unwrap_or_else(|| DateRange::new(today, today));
            range.defaulted = true;
            range
        })
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

fn explicit_range(text: &str) -> Option<DateRange> {
    RANGE_RE.captures_iter(text).find_map(|caps| {
        let start = parse_date(&caps[1])?;
        let end = parse_date(&caps[2])?;
        Some(DateRange::new(start, end))
    })
}

fn single_date(text: &str) -> Option<DateRange> {
    SINGLE_DATE_RE
        .captures_iter(text)
        .find_map(|caps| parse_date(&caps[1]))
        .map(|date| DateRange::new(date, date))
}

fn relative_range(text: &str, today: NaiveDate) -> Option<DateRange> {
    if LAST_WEEK_RE.is_match(text) {
        return DateRange::ending_today(today, 7);
    }
    if LAST_MONTH_RE.is_match(text) {
        return DateRange::ending_today(today, 30);
    }
    if let Some(caps) = LAST_N_DAYS_RE.captures(text) {
        if let Ok(days) = caps[1].parse::<u64>() {
            if let Some(range) = DateRange::ending_today(today, days) {
                return Some(range);
            }
        }
    }
    if YESTERDAY_RE.is_match(text) {
        let yesterday = today.checked_sub_days(Days::new(1))?;
        return Some(DateRange::new(yesterday, yesterday));
    }
    None
}

fn month_number(name: &str) -> Option<u32> {
    let month = match name.get(..3)? {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(month)
}

/// First and last day of a calendar month
pub fn month_span(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let start = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    Some((start, next.pred_opt()?))
}

fn month_year(text: &str) -> Option<DateRange> {
    MONTH_YEAR_RE.captures_iter(text).find_map(|caps| {
        let month = month_number(&caps[1])?;
        let year: i32 = caps[2].parse().ok()?;
        let (start, end) = month_span(year, month)?;
        Some(DateRange::new(start, end))
    })
}

fn bare_year(text: &str) -> Option<DateRange> {
    let caps = YEAR_RE.captures(text)?;
    let year: i32 = caps[1].parse().ok()?;
    let start = NaiveDate::from_ymd_opt(year, 1, 1)?;
    let end = NaiveDate::from_ymd_opt(year, 12, 31)?;
    Some(DateRange::new(start, end))
}
