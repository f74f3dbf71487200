//! Context-aware error suggestions.
//!
//! Complements the static suggestions in the `codes` module with hints
//! that name the offending ids.

use serde_json::Value;

use super::codes::ErrorCode;

/// Generate a context-aware suggestion for an error.
pub fn suggest_for_error(code: ErrorCode, context: Option<&Value>) -> String {
    match code {
        ErrorCode::SkillNotFound => suggest_skill_not_found(context),
        ErrorCode::SkillCyclicParent => suggest_cyclic_parent(context),
        ErrorCode::ReferencesMissing => suggest_references_missing(context),
        ErrorCode::ClassPlanNotFound => suggest_plan_not_found(context),
        _ => code.suggestion().to_string(),
    }
}

fn suggest_skill_not_found(context: Option<&Value>) -> String {
    let Some(skill_id) = context
        .and_then(|c| c.get("skill_id"))
        .and_then(Value::as_str)
    else {
        return ErrorCode::SkillNotFound.suggestion().to_string();
    };

    format!(
        "Skill '{skill_id}' not found. Try:\n  - `cst skill list` to see the catalog\n  - `cst import <file>` if the catalog has not been loaded yet"
    )
}

fn suggest_cyclic_parent(context: Option<&Value>) -> String {
    let cycle = context
        .and_then(|c| c.get("cycle"))
        .and_then(Value::as_array);

    match cycle {
        Some(chain) if !chain.is_empty() => {
            let chain_str: Vec<_> = chain.iter().filter_map(Value::as_str).collect();
            format!(
                "Prerequisite loop: {}\nChoose a parent outside this chain, or clear one link with `cst skill unlink-parent`",
                chain_str.join(" -> ")
            )
        }
        _ => ErrorCode::SkillCyclicParent.suggestion().to_string(),
    }
}

fn suggest_references_missing(context: Option<&Value>) -> String {
    let entity = context
        .and_then(|c| c.get("entity"))
        .and_then(Value::as_str);
    let missing = context
        .and_then(|c| c.get("missing"))
        .and_then(Value::as_array);

    match (entity, missing) {
        (Some(entity), Some(ids)) if !ids.is_empty() => {
            let ids: Vec<_> = ids.iter().filter_map(Value::as_str).take(5).collect();
            format!(
                "Unknown {entity}: {}\nRun `cst {} list` to see valid ids",
                ids.join(", "),
                entity.trim_end_matches('s')
            )
        }
        _ => ErrorCode::ReferencesMissing.suggestion().to_string(),
    }
}

fn suggest_plan_not_found(context: Option<&Value>) -> String {
    match context
        .and_then(|c| c.get("class_plan_id"))
        .and_then(Value::as_str)
    {
        Some(id) => format!("Class plan '{id}' does not exist. Run `cst plan list` to see plans"),
        None => ErrorCode::ClassPlanNotFound.suggestion().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn skill_not_found_names_the_skill() {
        let ctx = json!({ "skill_id": "skill-7" });
        let s = suggest_for_error(ErrorCode::SkillNotFound, Some(&ctx));
        assert!(s.contains("skill-7"));
    }

    #[test]
    fn cyclic_parent_renders_chain() {
        let ctx = json!({ "cycle": ["a", "b", "a"] });
        let s = suggest_for_error(ErrorCode::SkillCyclicParent, Some(&ctx));
        assert!(s.contains("a -> b -> a"));
    }

    #[test]
    fn references_missing_lists_ids() {
        let ctx = json!({ "entity": "skills", "missing": ["x", "y"] });
        let s = suggest_for_error(ErrorCode::ReferencesMissing, Some(&ctx));
        assert!(s.contains("x, y"));
        assert!(s.contains("cst skill list"));
    }

    #[test]
    fn falls_back_to_static_suggestion() {
        let s = suggest_for_error(ErrorCode::ConfigInvalid, None);
        assert_eq!(s, ErrorCode::ConfigInvalid.suggestion());
    }
}
