//! Inline snapshots of user-facing error text.

use insta::assert_snapshot;

use cst::error::{CstError, ErrorCode, StructuredError};

#[test]
fn test_error_missing_references() {
    let err = CstError::MissingReferences {
        entity: "skills".to_string(),
        missing: vec!["doesNotExist".to_string()],
    };
    assert_snapshot!(err.to_string(), @"One or more skills not found");
}

#[test]
fn test_error_cyclic_parent() {
    let err = CstError::CyclicParent {
        skill_id: "a".to_string(),
        cycle: vec!["a".to_string(), "b".to_string(), "a".to_string()],
    };
    assert_snapshot!(err.to_string(), @"Cyclic parent link for skill 'a': a -> b -> a");
}

#[test]
fn test_error_plan_not_found() {
    let err = CstError::ClassPlanNotFound("plan-9".to_string());
    assert_snapshot!(err.to_string(), @"Class plan not found: plan-9");
}

#[test]
fn test_error_validation_failed() {
    let err = CstError::ValidationFailed("week 60 is outside 1..=53".to_string());
    assert_snapshot!(err.to_string(), @"Validation failed: week 60 is outside 1..=53");
}

#[test]
fn test_structured_error_display() {
    let err = StructuredError::new(ErrorCode::StudentNotFound, "Student not found: st9");
    assert_snapshot!(err.to_string(), @"[E401] Student not found: st9");
}

#[test]
fn test_missing_references_context() {
    let err = CstError::MissingReferences {
        entity: "skills".to_string(),
        missing: vec!["s9".to_string(), "s7".to_string()],
    };
    let structured = err.to_structured();
    assert_snapshot!(structured.code.to_string(), @"E802");
    let context = serde_json::to_string(&structured.context).unwrap();
    assert_snapshot!(context, @r#"{"entity":"skills","missing":["s9","s7"]}"#);
}
