//! Validity analysis.
//!
//! Semantic checks chosen by field name: email and URL conformance, dates
//! that parse, and plausible years for year-like numeric fields.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

use crate::models::Record;
use crate::values::{is_blank, value_to_string};

use super::models::{ValidityIssue, ValidityIssueKind, ValidityResult};
use super::patterns::{Validator, matches};

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%d/%m/%Y",
    "%m/%d/%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%d %B %Y",
    "%d %b %Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%B %d %Y",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

/// Parses a date or timestamp leniently.
///
/// Accepts RFC 3339, common ISO and day/month layouts, written month names
/// and bare four-digit years.
pub fn parse_lenient_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.date_naive());
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt.date());
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Some(date);
        }
    }
    if value.len() == 4 && value.chars().all(|c| c.is_ascii_digit()) {
        return value
            .parse::<i32>()
            .ok()
            .and_then(|year| NaiveDate::from_ymd_opt(year, 1, 1));
    }
    None
}

fn is_email_field(name: &str) -> bool {
    name.contains("email")
}

fn is_url_field(name: &str) -> bool {
    name.contains("url") || name.contains("website")
}

fn is_date_field(name: &str) -> bool {
    name.contains("date") || name.contains("founded") || name.contains("updated")
}

fn is_year_field(name: &str) -> bool {
    name == "year" || name == "founded_year" || name.ends_with("_year")
}

/// Analyzes validity of each field.
///
/// The score is `max(0, 1 - penalty * issue_count)`.
pub fn analyze_validity(
    records: &[Record],
    fields: &[String],
    penalty: f64,
    min_year: i32,
    now: DateTime<Utc>,
) -> ValidityResult {
    let current_year = now.year();
    let mut issues = Vec::new();

    for field in fields {
        let name = field.to_lowercase();
        let values: Vec<&Value> = records
            .iter()
            .filter_map(|record| record.get(field))
            .filter(|value| !value.is_null())
            .collect();
        let texts: Vec<String> = values
            .iter()
            .filter(|v| !is_blank(v))
            .map(|v| value_to_string(v).trim().to_string())
            .collect();

        if is_email_field(&name) {
            let invalid = texts.iter().filter(|t| !matches(Validator::Email, t)).count();
            push_issue(&mut issues, field, ValidityIssueKind::InvalidEmailFormat, invalid);
        }

        if is_url_field(&name) {
            let invalid = texts.iter().filter(|t| !matches(Validator::Url, t)).count();
            push_issue(&mut issues, field, ValidityIssueKind::InvalidUrlFormat, invalid);
        }

        if is_date_field(&name) {
            let invalid = texts
                .iter()
                .filter(|t| parse_lenient_date(t).is_none())
                .count();
            push_issue(&mut issues, field, ValidityIssueKind::InvalidDateFormat, invalid);
        }

        if is_year_field(&name) && !values.is_empty() && values.iter().all(|v| v.is_number()) {
            let invalid = values
                .iter()
                .filter_map(|v| v.as_f64())
                .filter(|year| *year < f64::from(min_year) || *year > f64::from(current_year))
                .count();
            push_issue(&mut issues, field, ValidityIssueKind::InvalidYearRange, invalid);
        }
    }

    let score = (1.0 - penalty * issues.len() as f64).max(0.0);

    ValidityResult {
        validity_score: score,
        issues_count: issues.len(),
        validity_issues: issues,
    }
}

fn push_issue(issues: &mut Vec<ValidityIssue>, field: &str, issue: ValidityIssueKind, count: usize) {
    if count > 0 {
        issues.push(ValidityIssue {
            field: field.to_string(),
            issue,
            count: count as u64,
        });
    }
}
