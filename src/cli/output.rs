use chrono::{DateTime, Utc};
use clap::ValueEnum;
use colored::Colorize;
use serde::Serialize;

use crate::config::RobotConfig;
use crate::error::{CstError, ErrorCode, Result};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable formatted output with colors (default)
    #[default]
    Human,
    /// Pretty-printed JSON
    Json,
    /// Single-line JSON
    Jsonl,
    /// Plain text without colors
    Plain,
}

impl OutputFormat {
    /// Check if this format should use colors
    #[must_use]
    pub const fn use_colors(&self) -> bool {
        matches!(self, Self::Human)
    }

    /// Check if this format is machine-readable
    #[must_use]
    pub const fn is_machine_readable(&self) -> bool {
        matches!(self, Self::Json | Self::Jsonl)
    }
}

#[derive(Serialize)]
pub struct RobotResponse<T> {
    pub status: RobotStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub data: T,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RobotStatus {
    Ok,
    /// Rich error with structured information
    #[serde(rename = "error")]
    StructuredError {
        code: ErrorCode,
        numeric_code: u16,
        message: String,
        suggestion: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        context: Option<serde_json::Value>,
        recoverable: bool,
        category: String,
    },
}

impl From<&CstError> for RobotStatus {
    fn from(err: &CstError) -> Self {
        let structured = err.to_structured();
        Self::StructuredError {
            code: structured.code,
            numeric_code: structured.numeric_code,
            message: structured.message,
            suggestion: structured.suggestion,
            context: structured.context,
            recoverable: structured.recoverable,
            category: structured.category,
        }
    }
}

pub fn robot_ok<T: Serialize>(data: T) -> RobotResponse<T> {
    RobotResponse {
        status: RobotStatus::Ok,
        timestamp: Some(Utc::now()),
        version: Some(env!("CARGO_PKG_VERSION").to_string()),
        data,
        warnings: Vec::new(),
    }
}

/// Create a robot error response from a `CstError` with structured information.
pub fn robot_error_structured(err: &CstError) -> RobotResponse<serde_json::Value> {
    RobotResponse {
        status: RobotStatus::from(err),
        timestamp: Some(Utc::now()),
        version: Some(env!("CARGO_PKG_VERSION").to_string()),
        data: serde_json::Value::Null,
        warnings: Vec::new(),
    }
}

impl<T> RobotResponse<T> {
    #[must_use]
    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings = warnings;
        self
    }

    /// Drop timestamp and version when metadata is switched off.
    #[must_use]
    pub fn configured(mut self, robot: &RobotConfig) -> Self {
        if !robot.include_metadata {
            self.timestamp = None;
            self.version = None;
        }
        self
    }
}

/// Print a robot response in the configured shape (`json` pretty, `jsonl` one line).
pub fn emit_robot<T: Serialize>(response: &RobotResponse<T>, robot: &RobotConfig) -> Result<()> {
    if robot.format.eq_ignore_ascii_case("jsonl") {
        emit_json_line(response)
    } else {
        emit_json(response)
    }
}

pub fn emit_json<T: Serialize>(value: &T) -> Result<()> {
    let payload = serde_json::to_string_pretty(value)?;
    println!("{payload}");
    Ok(())
}

pub fn emit_json_line<T: Serialize>(value: &T) -> Result<()> {
    let payload = serde_json::to_string(value)?;
    println!("{payload}");
    Ok(())
}

pub struct HumanLayout {
    lines: Vec<String>,
    key_width: usize,
}

impl Default for HumanLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl HumanLayout {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            lines: Vec::new(),
            key_width: 14,
        }
    }

    pub fn title(&mut self, text: &str) -> &mut Self {
        self.lines.push(text.bold().to_string());
        self.lines.push(String::new());
        self
    }

    pub fn section(&mut self, text: &str) -> &mut Self {
        self.lines.push(text.bold().to_string());
        self.lines.push("-".repeat(text.len().max(3)));
        self
    }

    pub fn kv(&mut self, key: &str, value: &str) -> &mut Self {
        let padded = format!("{key:width$}", width = self.key_width);
        self.lines.push(format!("{} {value}", padded.dimmed()));
        self
    }

    pub fn bullet(&mut self, text: &str) -> &mut Self {
        self.lines.push(format!("- {text}"));
        self
    }

    pub fn blank(&mut self) -> &mut Self {
        self.lines.push(String::new());
        self
    }

    pub fn push_line(&mut self, line: impl Into<String>) -> &mut Self {
        self.lines.push(line.into());
        self
    }

    #[must_use]
    pub fn build(&self) -> String {
        self.lines.join("\n")
    }
}

pub fn emit_human(layout: &HumanLayout) {
    println!("{}", layout.build());
}

/// `-` for absent optional text.
#[must_use]
pub fn or_dash(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn robot_ok_serializes_status_and_data() {
        let json = serde_json::to_value(robot_ok(serde_json::json!({"count": 2}))).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["data"]["count"], 2);
        assert!(json.get("warnings").is_none());
    }

    #[test]
    fn metadata_can_be_switched_off() {
        let robot = RobotConfig {
            format: "json".to_string(),
            include_metadata: false,
        };
        let json = serde_json::to_value(robot_ok(1).configured(&robot)).unwrap();
        assert!(json.get("timestamp").is_none());
        assert!(json.get("version").is_none());
    }

    #[test]
    fn structured_error_carries_code_and_context() {
        let err = CstError::MissingReferences {
            entity: "skills".into(),
            missing: vec!["ghost".into()],
        };
        let json = serde_json::to_value(robot_error_structured(&err)).unwrap();
        assert_eq!(json["status"]["error"]["code"], "REFERENCES_MISSING");
        assert_eq!(json["status"]["error"]["context"]["missing"][0], "ghost");
    }

    #[test]
    fn human_layout_lines() {
        colored::control::set_override(false);
        let mut layout = HumanLayout::new();
        layout.kv("Week", "32").bullet("s1");
        assert_eq!(layout.build(), format!("{:14} 32\n- s1", "Week"));
    }
}
