//! Closed vocabularies shared by skills, classes and progress rows.
//!
//! Every enum serializes as its SCREAMING_SNAKE_CASE name, which is also the
//! text stored in SQLite. Parsing (CLI, import files, serde) is
//! case-insensitive and accepts `-` or a space in place of `_`, so `tech-1`
//! and `TECH_1` are the same level.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, de};

/// Normalize user text to the stored spelling.
fn canonical(raw: &str) -> String {
    raw.trim().to_ascii_uppercase().replace(['-', ' '], "_")
}

macro_rules! taxonomy_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $label:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// Every variant in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Stored and serialized spelling.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(de::Error::custom)
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(raw: &str) -> Result<Self, Self::Err> {
                let wanted = canonical(raw);
                Self::ALL
                    .iter()
                    .copied()
                    .find(|variant| variant.as_str() == wanted)
                    .ok_or_else(|| {
                        let valid: Vec<_> = Self::ALL.iter().map(|v| v.as_str()).collect();
                        format!("unknown {} '{raw}' (expected one of {})", $label, valid.join(", "))
                    })
            }
        }
    };
}

taxonomy_enum! {
    /// Aerial equipment. Declared alphabetically so enum order matches text order.
    Apparatus, "apparatus" {
        CordeLisse => "CORDE_LISSE",
        Hammock => "HAMMOCK",
        Lyra => "LYRA",
        Silks => "SILKS",
        Trapeze => "TRAPEZE",
    }
}

taxonomy_enum! {
    /// Skill tiers, ordered from first lessons to elite.
    Level, "level" {
        Beginner => "BEGINNER",
        Tech1 => "TECH_1",
        Tech2 => "TECH_2",
        Tech3 => "TECH_3",
        Advanced => "ADVANCED",
        Elite => "ELITE",
    }
}

taxonomy_enum! {
    ClassType, "class type" {
        Adult => "ADULT",
        KidsTeens => "KIDS_TEENS",
        SchoolHolidayWorkshop => "SCHOOL_HOLIDAY_WORKSHOP",
        PrivateLessons => "PRIVATE_LESSONS",
        BirthdayParty => "BIRTHDAY_PARTY",
    }
}

taxonomy_enum! {
    /// Assessment of one student on one skill. Any status may follow any other.
    ProgressStatus, "progress status" {
        NotAttempted => "NOT_ATTEMPTED",
        Attempted => "ATTEMPTED",
        Competent => "COMPETENT",
        Mastered => "MASTERED",
        /// Student is excused from the skill; a reason is expected but not enforced.
        Excepted => "EXCEPTED",
    }
}

impl Default for ProgressStatus {
    fn default() -> Self {
        Self::NotAttempted
    }
}

/// Decode a comma-separated level list, skipping entries that do not parse.
///
/// Returns the parsed levels and the rejected fragments so callers can log them.
#[must_use]
pub fn parse_level_list(raw: &str) -> (Vec<Level>, Vec<String>) {
    let mut levels = Vec::new();
    let mut rejected = Vec::new();
    for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        match part.parse::<Level>() {
            Ok(level) if !levels.contains(&level) => levels.push(level),
            Ok(_) => {}
            Err(_) => rejected.push(part.to_string()),
        }
    }
    (levels, rejected)
}

/// Encode levels the way they are stored: comma-separated, no spaces.
#[must_use]
pub fn format_level_list(levels: &[Level]) -> String {
    levels
        .iter()
        .map(|level| level.as_str())
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_and_separator_insensitive() {
        assert_eq!("tech-1".parse::<Level>().unwrap(), Level::Tech1);
        assert_eq!("Tech 2".parse::<Level>().unwrap(), Level::Tech2);
        assert_eq!("corde_lisse".parse::<Apparatus>().unwrap(), Apparatus::CordeLisse);
        assert_eq!(
            "school-holiday-workshop".parse::<ClassType>().unwrap(),
            ClassType::SchoolHolidayWorkshop
        );
    }

    #[test]
    fn parse_error_lists_valid_values() {
        let err = "pole".parse::<Apparatus>().unwrap_err();
        assert!(err.contains("pole"));
        assert!(err.contains("SILKS"));
    }

    #[test]
    fn level_order_runs_beginner_to_elite() {
        let mut levels = vec![Level::Elite, Level::Beginner, Level::Tech3, Level::Tech1];
        levels.sort();
        assert_eq!(
            levels,
            vec![Level::Beginner, Level::Tech1, Level::Tech3, Level::Elite]
        );
    }

    #[test]
    fn apparatus_order_matches_text_order() {
        let mut by_text: Vec<_> = Apparatus::ALL.to_vec();
        by_text.sort_by_key(|a| a.as_str());
        assert_eq!(by_text, Apparatus::ALL.to_vec());
    }

    #[test]
    fn serde_uses_stored_spelling() {
        let json = serde_json::to_string(&ProgressStatus::NotAttempted).unwrap();
        assert_eq!(json, "\"NOT_ATTEMPTED\"");
        let level: Level = serde_json::from_str("\"TECH_3\"").unwrap();
        assert_eq!(level, Level::Tech3);
        let lenient: Apparatus = serde_yaml::from_str("corde-lisse").unwrap();
        assert_eq!(lenient, Apparatus::CordeLisse);
        assert!(serde_json::from_str::<Level>("\"LEVEL_9\"").is_err());
    }

    #[test]
    fn level_list_tolerates_noise() {
        let (levels, rejected) = parse_level_list(" BEGINNER,tech_1,,TECH_1, wizard ");
        assert_eq!(levels, vec![Level::Beginner, Level::Tech1]);
        assert_eq!(rejected, vec!["wizard".to_string()]);
        assert_eq!(format_level_list(&levels), "BEGINNER,TECH_1");
    }

    #[test]
    fn default_status_is_not_attempted() {
        assert_eq!(ProgressStatus::default(), ProgressStatus::NotAttempted);
    }
}
