//! Standardized error codes for machine-parseable output.
//!
//! Error codes follow a numeric taxonomy:
//! - 1xx: Skill catalog errors
//! - 2xx: Class and class plan errors
//! - 3xx: Config errors
//! - 4xx: Student and instructor errors
//! - 6xx: Storage errors
//! - 8xx: Validation errors
//! - 9xx: Internal errors

use serde::{Deserialize, Serialize};

/// Standardized error codes for robot mode output.
///
/// Each variant maps to a numeric code (e.g., `SkillNotFound` -> E101).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // ========================================
    // Skill errors (1xx)
    // ========================================
    /// E101: Requested skill does not exist
    SkillNotFound,
    /// E102: Setting a parent would close a loop in the prerequisite chain
    SkillCyclicParent,
    /// E103: Stored skill data could not be decoded
    SkillDataMalformed,

    // ========================================
    // Class / plan errors (2xx)
    // ========================================
    /// E201: Requested class does not exist
    ClassNotFound,
    /// E202: Requested class plan does not exist
    ClassPlanNotFound,

    // ========================================
    // Config errors (3xx)
    // ========================================
    /// E302: Config file has invalid syntax or values
    ConfigInvalid,
    /// E304: Required config value is missing
    ConfigMissingRequired,

    // ========================================
    // People errors (4xx)
    // ========================================
    /// E401: Requested student does not exist
    StudentNotFound,
    /// E402: Requested instructor does not exist
    InstructorNotFound,

    // ========================================
    // Storage errors (6xx)
    // ========================================
    /// E604: Database operation failed
    DatabaseError,
    /// E605: Serialization/deserialization failed
    SerializationError,
    /// E606: IO operation failed
    IoError,
    /// E607: Transaction could not be completed
    TransactionFailed,

    // ========================================
    // Validation errors (8xx)
    // ========================================
    /// E801: Input failed validation
    ValidationFailed,
    /// E802: A batch of referenced records was only partially found
    ReferencesMissing,
    /// E803: Catalog import failed
    ImportFailed,

    // ========================================
    // Internal errors (9xx)
    // ========================================
    /// E901: Unexpected internal error
    InternalError,
    /// E905: Generic not found (catch-all)
    NotFound,
}

impl ErrorCode {
    /// Get the numeric error code (e.g., `SkillNotFound` -> 101).
    #[must_use]
    pub const fn numeric(&self) -> u16 {
        match self {
            Self::SkillNotFound => 101,
            Self::SkillCyclicParent => 102,
            Self::SkillDataMalformed => 103,

            Self::ClassNotFound => 201,
            Self::ClassPlanNotFound => 202,

            Self::ConfigInvalid => 302,
            Self::ConfigMissingRequired => 304,

            Self::StudentNotFound => 401,
            Self::InstructorNotFound => 402,

            Self::DatabaseError => 604,
            Self::SerializationError => 605,
            Self::IoError => 606,
            Self::TransactionFailed => 607,

            Self::ValidationFailed => 801,
            Self::ReferencesMissing => 802,
            Self::ImportFailed => 803,

            Self::InternalError => 901,
            Self::NotFound => 905,
        }
    }

    /// Get the error code as a formatted string (e.g., "E101").
    #[must_use]
    pub fn code_string(&self) -> String {
        format!("E{}", self.numeric())
    }

    /// Get the default suggestion for this error code.
    #[must_use]
    pub const fn suggestion(&self) -> &'static str {
        match self {
            Self::SkillNotFound => "Run `cst skill list` to see the catalog, or `cst import <file>` to load one",
            Self::SkillCyclicParent => "Pick a parent that is not already a descendant of this skill",
            Self::SkillDataMalformed => "Rewrite the stored value, e.g. `cst skill weeks <id> <week>...`",

            Self::ClassNotFound => "Run `cst class list` to see known classes",
            Self::ClassPlanNotFound => "Run `cst plan list` to see existing class plans",

            Self::ConfigInvalid => "Run `cst config` to see current values. Check TOML syntax in config file",
            Self::ConfigMissingRequired => "Set the required value in config.toml or via its CST_* environment variable",

            Self::StudentNotFound => "Run `cst student list` to see enrolled students",
            Self::InstructorNotFound => "Run `cst instructor list` to see instructors",

            Self::DatabaseError => "Check that the database file is writable. `cst init` recreates a missing schema",
            Self::SerializationError => "The data format may be corrupted. Check input data for validity",
            Self::IoError => "File operation failed. Check path exists and permissions are correct",
            Self::TransactionFailed => "The operation was rolled back. Check error details and retry",

            Self::ValidationFailed => "Review the reported problem and correct the input",
            Self::ReferencesMissing => "One or more referenced ids do not exist. Check them with the matching `list` command",
            Self::ImportFailed => "Check the catalog file format (YAML or JSON list of skills)",

            Self::InternalError => "An unexpected error occurred. Please report this issue with full error output",
            Self::NotFound => "The requested record was not found. Check the identifier",
        }
    }

    /// Check if this error is potentially recoverable by the user.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        match self {
            Self::SkillNotFound
            | Self::SkillCyclicParent
            | Self::SkillDataMalformed
            | Self::ClassNotFound
            | Self::ClassPlanNotFound
            | Self::ConfigInvalid
            | Self::ConfigMissingRequired
            | Self::StudentNotFound
            | Self::InstructorNotFound
            | Self::IoError
            | Self::TransactionFailed
            | Self::ValidationFailed
            | Self::ReferencesMissing
            | Self::ImportFailed
            | Self::NotFound => true,

            Self::DatabaseError | Self::SerializationError | Self::InternalError => false,
        }
    }

    /// Get the error category name.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self.numeric() / 100 {
            1 => "skill",
            2 => "class",
            3 => "config",
            4 => "people",
            6 => "storage",
            8 => "validation",
            9 => "internal",
            _ => "unknown",
        }
    }

    /// Iterate over all error codes.
    pub fn all() -> impl Iterator<Item = Self> {
        [
            Self::SkillNotFound,
            Self::SkillCyclicParent,
            Self::SkillDataMalformed,
            Self::ClassNotFound,
            Self::ClassPlanNotFound,
            Self::ConfigInvalid,
            Self::ConfigMissingRequired,
            Self::StudentNotFound,
            Self::InstructorNotFound,
            Self::DatabaseError,
            Self::SerializationError,
            Self::IoError,
            Self::TransactionFailed,
            Self::ValidationFailed,
            Self::ReferencesMissing,
            Self::ImportFailed,
            Self::InternalError,
            Self::NotFound,
        ]
        .into_iter()
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code_string())
    }
}
