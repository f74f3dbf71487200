//! Error handling for cst.
//!
//! This module provides:
//! - [`CstError`]: The main error enum for all cst operations
//! - [`ErrorCode`]: Standardized error codes for machine parsing
//! - [`StructuredError`]: Rich error type with suggestions and context

mod codes;
mod suggestions;

use std::io;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub use codes::ErrorCode;
pub use suggestions::suggest_for_error;

/// Main error type for cst operations.
#[derive(Error, Debug)]
pub enum CstError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Skill not found: {0}")]
    SkillNotFound(String),

    #[error("Class not found: {0}")]
    ClassNotFound(String),

    #[error("Class plan not found: {0}")]
    ClassPlanNotFound(String),

    #[error("Student not found: {0}")]
    StudentNotFound(String),

    #[error("Instructor not found: {0}")]
    InstructorNotFound(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    /// A batch lookup returned fewer rows than were requested.
    #[error("One or more {entity} not found")]
    MissingReferences { entity: String, missing: Vec<String> },

    #[error("Cyclic parent link for skill '{skill_id}': {}", .cycle.join(" -> "))]
    CyclicParent { skill_id: String, cycle: Vec<String> },

    #[error("Malformed stored data: {0}")]
    MalformedData(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Missing required config: {0}")]
    MissingConfig(String),

    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    #[error("Import error: {0}")]
    Import(String),
}

impl CstError {
    /// Get the error code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Database(_) => ErrorCode::DatabaseError,
            Self::Io(_) => ErrorCode::IoError,
            Self::Json(_) | Self::Yaml(_) => ErrorCode::SerializationError,
            Self::SkillNotFound(_) => ErrorCode::SkillNotFound,
            Self::ClassNotFound(_) => ErrorCode::ClassNotFound,
            Self::ClassPlanNotFound(_) => ErrorCode::ClassPlanNotFound,
            Self::StudentNotFound(_) => ErrorCode::StudentNotFound,
            Self::InstructorNotFound(_) => ErrorCode::InstructorNotFound,
            Self::NotFound(_) => ErrorCode::NotFound,
            Self::ValidationFailed(_) => ErrorCode::ValidationFailed,
            Self::MissingReferences { .. } => ErrorCode::ReferencesMissing,
            Self::CyclicParent { .. } => ErrorCode::SkillCyclicParent,
            Self::MalformedData(_) => ErrorCode::SkillDataMalformed,
            Self::Config(_) => ErrorCode::ConfigInvalid,
            Self::MissingConfig(_) => ErrorCode::ConfigMissingRequired,
            Self::TransactionFailed(_) => ErrorCode::TransactionFailed,
            Self::Import(_) => ErrorCode::ImportFailed,
        }
    }

    /// True for the "referenced record does not exist" family.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::SkillNotFound(_)
                | Self::ClassNotFound(_)
                | Self::ClassPlanNotFound(_)
                | Self::StudentNotFound(_)
                | Self::InstructorNotFound(_)
                | Self::NotFound(_)
        )
    }

    /// True for caller-input problems where the primary entity did exist.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationFailed(_) | Self::MissingReferences { .. } | Self::CyclicParent { .. }
        )
    }

    /// Get context information for this error as JSON.
    #[must_use]
    pub fn context(&self) -> Option<Value> {
        match self {
            Self::SkillNotFound(id) => Some(serde_json::json!({ "skill_id": id })),
            Self::ClassNotFound(id) => Some(serde_json::json!({ "class_id": id })),
            Self::ClassPlanNotFound(id) => Some(serde_json::json!({ "class_plan_id": id })),
            Self::StudentNotFound(id) => Some(serde_json::json!({ "student_id": id })),
            Self::InstructorNotFound(id) => Some(serde_json::json!({ "instructor_id": id })),
            Self::MissingReferences { entity, missing } => {
                Some(serde_json::json!({ "entity": entity, "missing": missing }))
            }
            Self::CyclicParent { skill_id, cycle } => {
                Some(serde_json::json!({ "skill_id": skill_id, "cycle": cycle }))
            }
            Self::MissingConfig(key) => Some(serde_json::json!({ "config_key": key })),
            _ => None,
        }
    }

    /// Convert this error to a structured error.
    #[must_use]
    pub fn to_structured(&self) -> StructuredError {
        StructuredError::from_cst_error(self)
    }
}

/// A structured error with machine-readable code, suggestion, and context.
///
/// Emitted on stdout in robot mode so scripts can branch on `code`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredError {
    /// The error code (e.g., "SKILL_NOT_FOUND")
    pub code: ErrorCode,

    /// The numeric error code (e.g., 101)
    pub numeric_code: u16,

    /// Human-readable error message
    pub message: String,

    /// Actionable suggestion for recovery
    pub suggestion: String,

    /// Additional context for debugging
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,

    /// Whether this error is potentially recoverable by the user
    pub recoverable: bool,

    /// Error category (e.g., "skill", "class", "validation")
    pub category: String,
}

impl StructuredError {
    /// Create a new structured error.
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            numeric_code: code.numeric(),
            suggestion: code.suggestion().to_string(),
            context: None,
            recoverable: code.is_recoverable(),
            category: code.category().to_string(),
            code,
            message: message.into(),
        }
    }

    /// Create a structured error from a `CstError`.
    #[must_use]
    pub fn from_cst_error(err: &CstError) -> Self {
        let code = err.code();
        let context = err.context();
        let suggestion = suggest_for_error(code, context.as_ref());

        Self {
            code,
            numeric_code: code.numeric(),
            message: err.to_string(),
            suggestion,
            context,
            recoverable: code.is_recoverable(),
            category: code.category().to_string(),
        }
    }

    /// Add context to this error.
    #[must_use]
    pub fn with_context(mut self, context: Value) -> Self {
        self.context = Some(context);
        self.suggestion = suggest_for_error(self.code, self.context.as_ref());
        self
    }
}

impl std::fmt::Display for StructuredError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl From<CstError> for StructuredError {
    fn from(err: CstError) -> Self {
        Self::from_cst_error(&err)
    }
}

impl From<&CstError> for StructuredError {
    fn from(err: &CstError) -> Self {
        Self::from_cst_error(err)
    }
}

/// Result type alias using `CstError`.
pub type Result<T> = std::result::Result<T, CstError>;
