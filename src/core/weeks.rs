//! Week-of-year derivation and the week-applicability filter.
//!
//! Weeks are year-relative buckets counted from January 1 00:00, not ISO-8601
//! weeks: week 1 is always the seven days starting on New Year's Day, whatever
//! weekday that is. Stored `week_of_year` values depend on this rule.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::core::skill::Skill;
use crate::error::{CstError, Result};

pub const MIN_WEEK: u32 = 1;
pub const MAX_WEEK: u32 = 53;

const WEEK_MS: i64 = 7 * 24 * 60 * 60 * 1000;

/// Stored date-time text for plan dates.
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Week bucket for a wall-clock date-time.
///
/// `floor(elapsed_ms / WEEK_MS) + 1`, where `elapsed_ms` runs from January 1
/// 00:00 of the same year. Jan 1 2024 is week 1 and Jan 8 2024 is week 2.
#[must_use]
pub fn week_of_year(date: NaiveDateTime) -> u32 {
    let start = NaiveDate::from_yo_opt(date.year(), 1)
        .map_or(date, |jan1| jan1.and_time(NaiveTime::MIN));
    let elapsed_ms = (date - start).num_milliseconds().max(0);
    let week = elapsed_ms / WEEK_MS + 1;
    u32::try_from(week).map_or(MAX_WEEK, |w| w.clamp(MIN_WEEK, MAX_WEEK))
}

/// Week bucket for a calendar date at midnight.
#[must_use]
pub fn week_of_date(date: NaiveDate) -> u32 {
    week_of_year(date.and_time(NaiveTime::MIN))
}

/// Parse a user-supplied date or date-time.
///
/// Accepts `YYYY-MM-DD`, `YYYY-MM-DDTHH:MM`, `YYYY-MM-DDTHH:MM:SS` and the
/// same with a space instead of `T`.
pub fn parse_date_time(raw: &str) -> Result<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN));
    }
    for format in [
        DATE_TIME_FORMAT,
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(value) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(value);
        }
    }
    Err(CstError::ValidationFailed(format!(
        "invalid date '{raw}' (expected YYYY-MM-DD or YYYY-MM-DDTHH:MM[:SS])"
    )))
}

/// A set of applicable weeks, kept sorted and de-duplicated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeekSet(BTreeSet<u32>);

impl WeekSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn contains(&self, week: u32) -> bool {
        self.0.contains(&week)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.0.iter().copied()
    }

    /// Canonical stored form: a sorted JSON array.
    #[must_use]
    pub fn to_json(&self) -> String {
        let weeks: Vec<u32> = self.iter().collect();
        serde_json::to_string(&weeks).unwrap_or_else(|_| "[]".to_string())
    }
}

impl FromIterator<u32> for WeekSet {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for WeekSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.iter().map(|w| w.to_string()).collect();
        f.write_str(&parts.join(","))
    }
}

/// Stored weeks that could not be decoded.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("malformed applicable weeks {raw:?}: {reason}")]
pub struct MalformedWeeks {
    pub raw: String,
    pub reason: String,
}

impl MalformedWeeks {
    fn new(raw: &str, reason: impl Into<String>) -> Self {
        Self {
            raw: raw.to_string(),
            reason: reason.into(),
        }
    }
}

/// Decode a stored weeks column.
///
/// Accepts NULL, a JSON array, or a JSON string whose content is an array.
/// Entries are judged one at a time: integral numbers in 1..=53 (`3` or `3.0`)
/// are kept, other numbers can never match a week and are dropped, and
/// non-numeric entries are skipped with a warning. Only a value that is not
/// JSON or not an array is malformed.
pub fn parse_applicable_weeks(raw: Option<&str>) -> std::result::Result<WeekSet, MalformedWeeks> {
    let Some(text) = raw else {
        return Ok(WeekSet::new());
    };
    let value: Value =
        serde_json::from_str(text).map_err(|err| MalformedWeeks::new(text, err.to_string()))?;
    let value = match value {
        Value::String(inner) => serde_json::from_str(&inner)
            .map_err(|err| MalformedWeeks::new(text, format!("inner value: {err}")))?,
        Value::Null => return Ok(WeekSet::new()),
        other => other,
    };
    let Value::Array(entries) = value else {
        return Err(MalformedWeeks::new(text, "not an array"));
    };

    Ok(entries
        .iter()
        .filter_map(|entry| {
            if !entry.is_number() {
                tracing::warn!(raw = text, %entry, "skipping non-numeric week entry");
            }
            week_entry(entry)
        })
        .collect())
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn week_entry(entry: &Value) -> Option<u32> {
    let week = match entry.as_u64() {
        Some(whole) => u32::try_from(whole).ok()?,
        None => {
            let number = entry.as_f64()?;
            if number.fract() != 0.0 || !(f64::from(MIN_WEEK)..=f64::from(MAX_WEEK)).contains(&number) {
                return None;
            }
            number as u32
        }
    };
    (MIN_WEEK..=MAX_WEEK).contains(&week).then_some(week)
}

/// Decode weeks for one skill, logging and returning the empty set on failure.
#[must_use]
pub fn applicable_weeks_or_empty(skill_id: &str, raw: Option<&str>) -> WeekSet {
    parse_applicable_weeks(raw).unwrap_or_else(|err| {
        tracing::warn!(skill_id, error = %err, "ignoring unparseable applicable weeks");
        WeekSet::new()
    })
}

/// Check caller-supplied weeks and build the set to store.
pub fn validate_weeks(weeks: &[u32]) -> Result<WeekSet> {
    if let Some(bad) = weeks
        .iter()
        .find(|week| !(MIN_WEEK..=MAX_WEEK).contains(*week))
    {
        return Err(CstError::ValidationFailed(format!(
            "week {bad} is outside {MIN_WEEK}..={MAX_WEEK}"
        )));
    }
    Ok(weeks.iter().copied().collect())
}

/// Check a target week for a suggestion query.
pub fn validate_week(week: u32) -> Result<u32> {
    if (MIN_WEEK..=MAX_WEEK).contains(&week) {
        Ok(week)
    } else {
        Err(CstError::ValidationFailed(format!(
            "week {week} is outside {MIN_WEEK}..={MAX_WEEK}"
        )))
    }
}

#[must_use]
pub fn is_applicable(skill: &Skill, week: u32) -> bool {
    skill.applicable_weeks.contains(week)
}

/// Keep the skills due in `week`, preserving input order.
#[must_use]
pub fn filter_for_week(skills: Vec<Skill>, week: u32) -> Vec<Skill> {
    skills
        .into_iter()
        .filter(|skill| is_applicable(skill, week))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::taxonomy::{Apparatus, Level};

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    fn skill(id: &str, weeks: &[u32]) -> Skill {
        Skill::new(id, id, Apparatus::Silks, Level::Beginner)
            .with_weeks(weeks.iter().copied().collect())
    }

    #[test]
    fn new_year_is_week_one() {
        assert_eq!(week_of_year(at(2024, 1, 1, 0, 0)), 1);
        assert_eq!(week_of_year(at(2024, 1, 7, 23, 59)), 1);
    }

    #[test]
    fn eighth_of_january_is_week_two() {
        assert_eq!(week_of_year(at(2024, 1, 8, 0, 0)), 2);
        assert_eq!(week_of_date(NaiveDate::from_ymd_opt(2024, 1, 8).unwrap()), 2);
    }

    #[test]
    fn week_ignores_weekday_alignment() {
        // 2024-08-05 is day 218 of a leap year: 217 elapsed days -> 31 full weeks.
        assert_eq!(week_of_date(NaiveDate::from_ymd_opt(2024, 8, 5).unwrap()), 32);
    }

    #[test]
    fn year_end_reaches_week_53() {
        assert_eq!(week_of_year(at(2024, 12, 31, 12, 0)), 53);
        assert_eq!(week_of_year(at(2023, 12, 31, 0, 0)), 53);
        assert_eq!(week_of_year(at(2025, 1, 1, 0, 0)), 1);
    }

    #[test]
    fn parses_date_forms() {
        assert_eq!(parse_date_time("2024-08-05").unwrap(), at(2024, 8, 5, 0, 0));
        assert_eq!(parse_date_time("2024-08-05T18:30").unwrap(), at(2024, 8, 5, 18, 30));
        assert_eq!(parse_date_time("2024-08-05 18:30:00").unwrap(), at(2024, 8, 5, 18, 30));
        assert!(parse_date_time("05/08/2024").is_err());
    }

    #[test]
    fn parse_accepts_native_and_string_encoded_arrays() {
        let native = parse_applicable_weeks(Some("[3,1,2,3]")).unwrap();
        assert_eq!(native.iter().collect::<Vec<_>>(), vec![1, 2, 3]);

        let encoded = parse_applicable_weeks(Some(r#""[4, 5]""#)).unwrap();
        assert_eq!(encoded.iter().collect::<Vec<_>>(), vec![4, 5]);

        assert!(parse_applicable_weeks(None).unwrap().is_empty());
        assert!(parse_applicable_weeks(Some("null")).unwrap().is_empty());
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(parse_applicable_weeks(Some("not json")).is_err());
        assert!(parse_applicable_weeks(Some(r#"{"weeks":[1]}"#)).is_err());
        assert!(parse_applicable_weeks(Some(r#""oops""#)).is_err());
        assert!(parse_applicable_weeks(Some("7")).is_err());
    }

    #[test]
    fn mixed_entries_keep_their_integer_weeks() {
        let weeks = parse_applicable_weeks(Some(r#"[1,"two",null,{"w":2}]"#)).unwrap();
        assert_eq!(weeks.iter().collect::<Vec<_>>(), vec![1]);

        let floats = parse_applicable_weeks(Some("[3.0,2.5]")).unwrap();
        assert_eq!(floats.iter().collect::<Vec<_>>(), vec![3]);

        let negative = parse_applicable_weeks(Some("[-1,3]")).unwrap();
        assert_eq!(negative.iter().collect::<Vec<_>>(), vec![3]);

        let stored = applicable_weeks_or_empty("s1", Some(r#"[1,"two"]"#));
        let due = filter_for_week(vec![skill("s1", &[]).with_weeks(stored)], 1);
        assert_eq!(due.len(), 1);
    }

    #[test]
    fn parse_drops_out_of_range_entries() {
        let weeks = parse_applicable_weeks(Some("[0,1,53,54]")).unwrap();
        assert_eq!(weeks.iter().collect::<Vec<_>>(), vec![1, 53]);
    }

    #[test]
    fn malformed_weeks_fall_back_to_empty() {
        assert!(applicable_weeks_or_empty("s1", Some("{broken")).is_empty());
    }

    #[test]
    fn canonical_encoding_is_sorted_json() {
        let weeks: WeekSet = [8, 2, 2, 5].into_iter().collect();
        assert_eq!(weeks.to_json(), "[2,5,8]");
        assert_eq!(weeks.to_string(), "2,5,8");
    }

    #[test]
    fn validate_weeks_bounds() {
        assert!(validate_weeks(&[1, 52, 53]).is_ok());
        assert!(validate_weeks(&[]).unwrap().is_empty());
        assert!(matches!(
            validate_weeks(&[0]),
            Err(CstError::ValidationFailed(_))
        ));
        assert!(validate_weeks(&[54]).is_err());
        assert!(validate_week(0).is_err());
        assert_eq!(validate_week(53).unwrap(), 53);
    }

    #[test]
    fn filter_keeps_order_and_membership() {
        let catalog = vec![skill("s1", &[1, 2, 3]), skill("s2", &[3, 4])];

        let week3: Vec<_> = filter_for_week(catalog.clone(), 3)
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(week3, vec!["s1", "s2"]);

        let week1: Vec<_> = filter_for_week(catalog, 1).into_iter().map(|s| s.id).collect();
        assert_eq!(week1, vec!["s1"]);
    }

    #[test]
    fn empty_weeks_never_match() {
        let catalog = vec![skill("empty", &[])];
        for week in MIN_WEEK..=MAX_WEEK {
            assert!(filter_for_week(catalog.clone(), week).is_empty());
        }
    }
}
