mod helpers;

use jot::error::JournalError;
use jot::journal::templates::{
    available_templates, create_entry_from_template, template_count, TemplateSlotAllocator,
};
use jot::journal::types::{TemplateSource, BUILTIN_TEMPLATES, MAX_TEMPLATES};
use std::collections::HashSet;

fn assert_slots_unique(store: &jot::journal::store::EntryStore) {
    let slots: Vec<usize> = store
        .entries()
        .iter()
        .filter_map(|e| e.template_order())
        .collect();
    let unique: HashSet<usize> = slots.iter().copied().collect();
    assert_eq!(slots.len(), unique.len(), "duplicate slots: {slots:?}");
    assert!(slots.iter().all(|s| *s < MAX_TEMPLATES));
    for entry in store.entries() {
        assert_eq!(entry.is_template(), entry.template_order().is_some());
    }
}

#[test]
fn five_marks_fill_slots_in_order_and_sixth_fails() {
    let (mut store, ids) = helpers::store_with_entries(6);

    let mut alloc = TemplateSlotAllocator::new(&mut store);
    for (expected, id) in ids.iter().take(5).enumerate() {
        assert_eq!(alloc.mark_as_template(id).unwrap(), expected);
    }
    let err = alloc.mark_as_template(&ids[5]).unwrap_err();
    assert!(matches!(err, JournalError::TemplateCapacity { max: 5 }));

    assert_eq!(template_count(store.entries()), 5);
    assert!(!store.get(&ids[5]).unwrap().is_template());
    assert_slots_unique(&store);
}

#[test]
fn freed_middle_slot_is_reused() {
    let (mut store, ids) = helpers::store_with_entries(6);
    let mut alloc = TemplateSlotAllocator::new(&mut store);
    for id in ids.iter().take(5) {
        alloc.mark_as_template(id).unwrap();
    }

    alloc.unmark_as_template(&ids[2]).unwrap();
    assert!(alloc.can_add_more());
    assert_eq!(alloc.mark_as_template(&ids[5]).unwrap(), 2);
    assert_slots_unique(&store);
}

#[test]
fn deleting_a_template_frees_its_slot() {
    let (mut store, ids) = helpers::store_with_entries(3);
    {
        let mut alloc = TemplateSlotAllocator::new(&mut store);
        alloc.mark_as_template(&ids[0]).unwrap();
        alloc.mark_as_template(&ids[1]).unwrap();
    }
    store.delete(&ids[0]).unwrap();

    let slot = TemplateSlotAllocator::new(&mut store)
        .mark_as_template(&ids[2])
        .unwrap();
    assert_eq!(slot, 0);
    assert_slots_unique(&store);
}

#[test]
fn merged_list_is_capped_and_ordered() {
    let (mut store, ids) = helpers::store_with_entries(5);

    assert_eq!(available_templates(store.entries()).len(), BUILTIN_TEMPLATES.len());

    let mut alloc = TemplateSlotAllocator::new(&mut store);
    // mark in reverse so slot order differs from entry order
    for id in ids.iter().rev().take(4) {
        alloc.mark_as_template(id).unwrap();
    }

    let views = available_templates(store.entries());
    assert_eq!(views.len(), MAX_TEMPLATES);
    let orders: Vec<usize> = views
        .iter()
        .filter_map(|v| match v.source {
            TemplateSource::Custom { order } => Some(order),
            TemplateSource::Builtin => None,
        })
        .collect();
    assert_eq!(orders, vec![0, 1, 2, 3]);
    assert_eq!(views[4].id, BUILTIN_TEMPLATES[0].id);
}

#[test]
fn template_marks_survive_reload() {
    let (mut store, ids) = helpers::store_with_entries(2);
    TemplateSlotAllocator::new(&mut store)
        .mark_as_template(&ids[1])
        .unwrap();

    let kv = store.kv().clone();
    let reloaded = jot::journal::store::EntryStore::load(kv).unwrap();
    assert_eq!(reloaded.get(&ids[1]).unwrap().template_order(), Some(0));
}

#[test]
fn unknown_template_id_changes_nothing() {
    let (store, _) = helpers::store_with_entries(2);
    let before = store.revision();

    let err = create_entry_from_template(store.entries(), "no-such-template").unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(store.revision(), before);
    assert_eq!(store.len(), 2);
}

#[test]
fn unedited_template_draft_is_not_persisted() {
    let mut store = helpers::test_store();
    let mut draft = create_entry_from_template(store.entries(), "weekly-review").unwrap();
    assert!(draft.is_template_origin());

    store.save(&mut draft).unwrap();
    assert!(store.is_empty());

    draft.push_str("Shipped the release.");
    store.save(&mut draft).unwrap();
    assert_eq!(store.len(), 1);
}
