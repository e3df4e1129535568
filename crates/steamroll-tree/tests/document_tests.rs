/*
 * document_tests.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Export, store and replay a document through the public API
 */

use serde_json::json;
use steamroll_tree::{
    DefaultRules, LinkRule, Node, Path, TreeError, WalkOptions, json, link, merge, strip_defaults,
    walk, yaml,
};

fn exported() -> Node {
    Node::from(json!({
        "event": {"name": {"en": "Conf"}, "slug": "conf", "has_subevents": false},
        "categories": [{"id": 3, "name": {"en": "Tickets"}}],
        "items": [
            {"id": 5, "category": 3, "active": true, "variations": []},
            {"id": 6, "category": null, "active": false, "variations": [{"id": 60}]},
        ],
        "quotas": [{"id": 9, "size": 100, "items": [5, 6], "variations": [60]}],
    }))
}

fn rules() -> Vec<LinkRule> {
    vec![
        LinkRule::new(".items.*.category", ".categories.*", ".id").unwrap(),
        LinkRule::new(".quotas.*.items.*", ".items.*", ".id").unwrap(),
        LinkRule::new(".quotas.*.variations.*", ".items.*.variations.*", ".id").unwrap(),
    ]
}

#[test]
fn quota_reference_follows_recreated_item() {
    let mut doc = exported();
    for rule in &rules() {
        link(&mut doc, rule).unwrap();
    }

    let stored = yaml::dump(&doc).unwrap();
    let mut doc = yaml::load(&stored).unwrap();

    // the item is recreated and the server hands out a new id
    let item = walk(&mut doc, &Path::parse(".items.0").unwrap(), WalkOptions::new())
        .unwrap()
        .remove(0)
        .value;
    merge(item, Node::from(json!({"id": 42, "position": 0}))).unwrap();

    let quota = doc.get("quotas").and_then(|q| q.get("0")).unwrap();
    let body = json::to_json(quota, &doc).unwrap();
    assert_eq!(body["items"], json!([42, 6]));
    assert_eq!(body["variations"], json!([60]));
}

#[test]
fn stored_document_is_stable() {
    let mut doc = exported();
    for rule in &rules() {
        link(&mut doc, rule).unwrap();
    }
    let first = yaml::dump(&doc).unwrap();
    let second = yaml::dump(&yaml::load(&first).unwrap()).unwrap();
    assert_eq!(first, second);

    // unlinked null category stays a plain null
    assert!(first.contains("category: null"));
}

#[test]
fn first_category_wins_on_duplicate_ids() {
    let mut doc = Node::from(json!({
        "categories": [{"id": 3, "name": "first"}, {"id": 3, "name": "second"}],
        "items": [{"category": 3}],
    }));
    let report = link(&mut doc, &rules()[0]).unwrap();
    assert_eq!(report.ambiguous, 1);

    doc.get_mut("categories")
        .and_then(|c| c.get_mut("0"))
        .map(|c| c.set("id", 30))
        .unwrap();
    let item = doc.get("items").and_then(|i| i.get("0")).unwrap();
    assert_eq!(json::to_json(item, &doc).unwrap(), json!({"category": 30}));
}

#[test]
fn defaults_are_stripped_after_linking() {
    let mut doc = exported();
    for rule in &rules() {
        link(&mut doc, rule).unwrap();
    }
    let defaults = DefaultRules::from_yaml_str(
        ".items.*:\n  active: true\n  variations: []\n.event:\n  has_subevents: false\n",
    )
    .unwrap();
    let removed = strip_defaults(&mut doc, &defaults).unwrap();
    assert_eq!(removed, 3);

    let first = doc.get("items").and_then(|i| i.get("0")).unwrap();
    let keys: Vec<_> = first.as_mapping().unwrap().keys().cloned().collect();
    assert_eq!(keys, vec!["id", "category"]);
}

#[test]
fn dangling_reference_is_reported() {
    let mut doc = exported();
    link(&mut doc, &rules()[1]).unwrap();
    walk(&mut doc, &Path::parse(".items.*").unwrap(), WalkOptions::new().delete()).unwrap();

    let quota = doc.get("quotas").and_then(|q| q.get("0")).cloned().unwrap();
    let err = json::to_json(&quota, &doc).unwrap_err();
    assert!(matches!(err, TreeError::DanglingReference { .. }));
    assert!(err.is_missing());
}
