//! Property tests for the week filter and week derivation.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use proptest::prelude::*;

use cst::core::skill::Skill;
use cst::core::taxonomy::{Apparatus, Level};
use cst::core::weeks::{MAX_WEEK, MIN_WEEK, WeekSet, filter_for_week, week_of_year};

fn arb_weeks() -> impl Strategy<Value = Vec<u32>> {
    prop::collection::vec(MIN_WEEK..=MAX_WEEK, 0..10)
}

fn arb_catalog() -> impl Strategy<Value = Vec<Skill>> {
    prop::collection::vec(arb_weeks(), 0..20).prop_map(|all| {
        all.into_iter()
            .enumerate()
            .map(|(idx, weeks)| {
                Skill::new(format!("s{idx}"), format!("Skill {idx}"), Apparatus::Hammock, Level::Tech2)
                    .with_weeks(weeks.into_iter().collect::<WeekSet>())
            })
            .collect()
    })
}

fn arb_date_time() -> impl Strategy<Value = NaiveDateTime> {
    (1990i32..2100, 0u32..366, 0u32..86_400).prop_map(|(year, day, secs)| {
        let jan1 = NaiveDate::from_ymd_opt(year, 1, 1).unwrap();
        let last = NaiveDate::from_ymd_opt(year, 12, 31).unwrap().ordinal0();
        let date = jan1 + Duration::days(i64::from(day.min(last)));
        date.and_hms_opt(0, 0, 0).unwrap() + Duration::seconds(i64::from(secs))
    })
}

proptest! {
    #[test]
    fn filter_keeps_exactly_the_applicable_skills(catalog in arb_catalog(), week in MIN_WEEK..=MAX_WEEK) {
        let due = filter_for_week(catalog.clone(), week);
        for skill in &catalog {
            let kept = due.iter().any(|d| d.id == skill.id);
            prop_assert_eq!(kept, skill.applicable_weeks.contains(week));
        }
        // Catalog order survives filtering.
        let positions: Vec<usize> = due
            .iter()
            .map(|d| catalog.iter().position(|s| s.id == d.id).unwrap())
            .collect();
        prop_assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn week_is_in_range(date in arb_date_time()) {
        let week = week_of_year(date);
        prop_assert!((MIN_WEEK..=MAX_WEEK).contains(&week));
    }

    #[test]
    fn week_difference_tracks_elapsed_days(a in arb_date_time(), b in arb_date_time()) {
        let year = a.year();
        let b = b.with_year(year).unwrap_or(b);
        prop_assume!(b.year() == year);
        let (early, late) = if a <= b { (a, b) } else { (b, a) };

        let diff = i64::from(week_of_year(late)) - i64::from(week_of_year(early));
        let whole_weeks = (late - early).num_days() / 7;
        prop_assert!(diff == whole_weeks || diff == whole_weeks + 1,
            "diff {} vs {} whole weeks", diff, whole_weeks);
    }

    #[test]
    fn week_resets_on_new_year(year in 1990i32..2100) {
        let jan1 = NaiveDate::from_ymd_opt(year, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
        prop_assert_eq!(week_of_year(jan1), 1);
        prop_assert_eq!(week_of_year(jan1 + Duration::days(7)), 2);
        let dec31 = NaiveDate::from_ymd_opt(year, 12, 31).unwrap().and_hms_opt(23, 0, 0).unwrap();
        prop_assert_eq!(week_of_year(dec31), 53);
    }
}
