//! Timeliness analysis based on the scrape timestamp.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use super::models::TimelinessResult;

/// Parses an ISO-8601 timestamp; values without an offset are read as UTC.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt.and_utc());
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// Analyzes timeliness of a dataset scraped at `scraped_at`.
///
/// Missing timestamps score 0.0; unparsable ones get `unparsable_score`.
/// Otherwise the score is `max(0, 1 - age_days / stale_after_days)`.
pub fn analyze_timeliness(
    scraped_at: Option<&str>,
    now: DateTime<Utc>,
    stale_after_days: i64,
    recent_within_days: i64,
    unparsable_score: f64,
) -> TimelinessResult {
    let Some(raw) = scraped_at.filter(|s| !s.trim().is_empty()) else {
        return TimelinessResult::default();
    };

    let Some(scraped) = parse_timestamp(raw) else {
        tracing::warn!("Could not parse scraped_at date: {}", raw);
        return TimelinessResult {
            timeliness_score: unparsable_score,
            age_days: None,
            is_recent: false,
            scraped_at: Some(raw.to_string()),
        };
    };

    // Timestamps in the future count as scraped now
    let age_days = now.signed_duration_since(scraped).num_days().max(0);
    let horizon = stale_after_days.max(1) as f64;

    TimelinessResult {
        timeliness_score: (1.0 - age_days as f64 / horizon).max(0.0),
        age_days: Some(age_days),
        is_recent: age_days <= recent_within_days,
        scraped_at: Some(raw.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 30, 12, 0, 0).unwrap()
    }

    fn analyze(scraped_at: Option<&str>) -> TimelinessResult {
        analyze_timeliness(scraped_at, now(), 30, 7, 0.5)
    }

    #[test]
    fn test_missing_timestamp_scores_zero() {
        let result = analyze(None);
        assert_eq!(result.timeliness_score, 0.0);
        assert!(result.age_days.is_none());
        assert!(!result.is_recent);
        assert_eq!(analyze(Some("")).timeliness_score, 0.0);
    }

    #[test]
    fn test_unparsable_timestamp_falls_back() {
        let result = analyze(Some("last tuesday"));
        assert_eq!(result.timeliness_score, 0.5);
        assert!(result.age_days.is_none());
    }

    #[test]
    fn test_age_based_score() {
        let scraped = (now() - Duration::days(15)).to_rfc3339();
        let result = analyze(Some(&scraped));
        assert_eq!(result.age_days, Some(15));
        assert!((result.timeliness_score - 0.5).abs() < 1e-9);
        assert!(!result.is_recent);

        let fresh = analyze(Some("2024-06-28T09:00:00"));
        assert_eq!(fresh.age_days, Some(2));
        assert!(fresh.is_recent);

        let stale = analyze(Some("2024-01-01"));
        assert_eq!(stale.timeliness_score, 0.0);
    }

    #[test]
    fn test_future_timestamp_clamped() {
        let result = analyze(Some("2024-07-10T00:00:00Z"));
        assert_eq!(result.age_days, Some(0));
        assert_eq!(result.timeliness_score, 1.0);
    }

    #[test]
    fn test_parse_timestamp_variants() {
        assert!(parse_timestamp("2024-01-15T10:30:00.123456").is_some());
        assert!(parse_timestamp("2024-01-15T10:30:00+01:00").is_some());
        assert!(parse_timestamp("2024-01-15 10:30:00").is_some());
        assert!(parse_timestamp("2024-01-15").is_some());
        assert!(parse_timestamp("15/01/2024").is_none());
    }
}
