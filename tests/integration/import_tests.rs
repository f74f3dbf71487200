use cst::catalog::{SkillCatalog, import_catalog};
use cst::config::CatalogConfig;
use cst::core::skill::SkillFilter;
use cst::storage::Database;
use tempfile::TempDir;

const CATALOG: &str = r#"{
  "skills": [
    {"id": "mermaid", "name": "Mermaid", "apparatus": "LYRA", "level": "TECH_1",
     "parentId": "hip-key", "siblings": ["gazelle"], "applicableWeeks": [5, 6]},
    {"id": "gazelle", "name": "Gazelle", "apparatus": "LYRA", "level": "TECH_1",
     "parentId": "hip-key"},
    {"id": "hip-key", "name": "Hip key", "apparatus": "LYRA", "level": "BEGINNER", "core": true}
  ]
}"#;

fn import(symmetric: bool) -> (TempDir, Database) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("lyra.json");
    std::fs::write(&path, CATALOG).unwrap();
    let db = Database::open(dir.path().join("cst.db")).unwrap();
    let config = CatalogConfig {
        symmetric_siblings: symmetric,
        ..CatalogConfig::default()
    };
    import_catalog(&db, &path, &config).unwrap();
    (dir, db)
}

#[test]
fn directed_siblings_by_default() {
    let (_dir, db) = import(false);
    let catalog = SkillCatalog::new(&db);
    assert_eq!(catalog.siblings("mermaid").unwrap().len(), 1);
    assert!(catalog.siblings("gazelle").unwrap().is_empty());

    let children: Vec<_> = catalog
        .children("hip-key")
        .unwrap()
        .into_iter()
        .map(|s| s.id)
        .collect();
    assert_eq!(children, vec!["gazelle", "mermaid"]);
}

#[test]
fn symmetric_config_writes_both_directions() {
    let (_dir, db) = import(true);
    let catalog = SkillCatalog::new(&db);
    assert_eq!(catalog.siblings("gazelle").unwrap()[0].id, "mermaid");
}

#[test]
fn imported_catalog_is_ordered_by_level() {
    let (_dir, db) = import(false);
    let ids: Vec<_> = SkillCatalog::new(&db)
        .list_skills(SkillFilter::default())
        .unwrap()
        .into_iter()
        .map(|s| s.id)
        .collect();
    assert_eq!(ids, vec!["hip-key", "gazelle", "mermaid"]);

    let week5: Vec<_> = SkillCatalog::new(&db)
        .suggest_for_week(5, SkillFilter::default())
        .unwrap()
        .into_iter()
        .map(|s| s.id)
        .collect();
    // Gazelle and Hip key got the default 1..=8.
    assert_eq!(week5, vec!["hip-key", "gazelle", "mermaid"]);
}
