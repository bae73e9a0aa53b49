mod helpers;

use jot::error::JournalError;
use jot::journal::templates::{template_count, TemplateSlotAllocator};
use jot::journal::transfer::{export_json, import_json, parse_document};
use jot::journal::types::MAX_TEMPLATES;

#[test]
fn import_merges_only_new_ids() {
    let mut source = helpers::test_store();
    let shared = helpers::save_text(&mut source, "An entry both journals have");
    helpers::save_text(&mut source, "Only the export has this one");
    let json = export_json(&source).unwrap();

    let mut target = helpers::test_store();
    let mut draft = jot::journal::draft::Draft::new();
    draft.edit("unrelated local entry");
    target.save(&mut draft).unwrap();
    // give the target its own copy of the shared id with different content
    let mut doc = parse_document(&json).unwrap();
    doc.entries.retain(|e| e.id() == shared);
    import_json(&mut target, &serde_json::to_string(&doc).unwrap()).unwrap();
    target.set_title(&shared, "Local title").unwrap();

    let report = import_json(&mut target, &json).unwrap();
    assert_eq!(report.imported, 1);
    assert_eq!(report.skipped, 1);
    assert_eq!(target.len(), 3);
    assert_eq!(target.get(&shared).unwrap().title(), Some("Local title"));
}

#[test]
fn malformed_file_leaves_store_untouched() {
    let (mut store, _) = helpers::store_with_entries(2);
    let before = store.revision();

    let err = import_json(&mut store, r#"{"version":"1.0","entries":[{"id":"x"}]}"#).unwrap_err();
    assert!(matches!(err, JournalError::MalformedImport(_)));
    assert!(import_json(&mut store, "not json at all").is_err());

    assert_eq!(store.len(), 2);
    assert_eq!(store.revision(), before);
}

#[test]
fn imported_entries_are_sorted_newest_first() {
    let json = r#"{
        "version": "1.0",
        "exportDate": "2024-07-01T00:00:00Z",
        "entries": [
            {"id": "a", "content": "old", "date": "2023-01-01T10:00:00Z", "wordCount": 1},
            {"id": "b", "content": "newest", "date": "2024-06-30T10:00:00Z", "wordCount": 1},
            {"id": "c", "content": "middle", "date": "2024-01-15T10:00:00Z"}
        ]
    }"#;
    let mut store = helpers::test_store();
    import_json(&mut store, json).unwrap();

    let ids: Vec<&str> = store.entries().iter().map(|e| e.id()).collect();
    assert_eq!(ids, vec!["b", "c", "a"]);
    assert_eq!(store.get("c").unwrap().word_count(), 1);
}

#[test]
fn imported_templates_respect_capacity() {
    let (mut store, ids) = helpers::store_with_entries(4);
    {
        let mut alloc = TemplateSlotAllocator::new(&mut store);
        for id in &ids {
            alloc.mark_as_template(id).unwrap();
        }
    }

    let json = r#"{
        "version": "1.0",
        "exportDate": "2024-07-01T00:00:00Z",
        "entries": [
            {"id": "t1", "content": "first template", "date": "2024-01-01T10:00:00Z", "isTemplate": true, "templateOrder": 1},
            {"id": "t2", "content": "second template", "date": "2024-01-02T10:00:00Z", "isTemplate": true, "templateOrder": 0}
        ]
    }"#;
    let report = import_json(&mut store, json).unwrap();
    assert_eq!(report.imported, 2);
    assert_eq!(report.templates_reseated, 1);
    assert_eq!(report.templates_demoted, 1);
    assert_eq!(template_count(store.entries()), MAX_TEMPLATES);

    // the claim with the lower old slot wins the free slot
    assert_eq!(store.get("t2").unwrap().template_order(), Some(4));
    assert!(!store.get("t1").unwrap().is_template());
}
