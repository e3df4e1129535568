/*
 * import.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Event creation and update
 */

//! Replaying a document against the API.
//!
//! Sections are created in dependency order. After each POST the response
//! is merged into the entity it was built from, so the new id (and the new
//! ids of nested objects such as item variations) is in place before any
//! reference pointing at it is resolved.

use crate::error::{EventError, Result};
use serde_json::Value;
use steamroll_api::{Api, Resource};
use steamroll_tree::json::to_json;
use steamroll_tree::{ConcretePath, Node, Seg, merge};

/// How a created entity is folded back into the document.
#[derive(Debug, Clone, Copy)]
enum Mode {
    /// Merge the whole response.
    Merge,

    /// Post without `omit` and copy only the new id. The omitted fields may
    /// point at entities of the same section and are patched afterwards.
    AssignId { omit: &'static [&'static str] },
}

const CATEGORY_DEFERRED: &[&str] = &["cross_selling_match_products"];
const QUESTION_DEFERRED: &[&str] = &[
    "dependency_question",
    "dependency_value",
    "dependency_values",
];

/// Creation order.
const CREATE_ORDER: &[(&str, Mode)] = &[
    ("item_meta_properties", Mode::Merge),
    ("taxrules", Mode::Merge),
    ("categories", Mode::AssignId { omit: CATEGORY_DEFERRED }),
    ("items", Mode::Merge),
    ("subevents", Mode::Merge),
    ("quotas", Mode::Merge),
    ("vouchers", Mode::Merge),
    ("discounts", Mode::Merge),
    ("questions", Mode::AssignId { omit: QUESTION_DEFERRED }),
];

/// Options for [`create_event`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CreateOptions {
    /// Delete an existing event with the same slug first.
    pub force: bool,
}

/// Create the event described by `document` as `organizer`/`slug`.
///
/// `document` is updated with every server response on the way. Returns the
/// server's representation of the new event (which carries `public_url`).
pub fn create_event(
    api: &dyn Api,
    organizer: &str,
    slug: &str,
    document: &mut Node,
    options: CreateOptions,
) -> Result<Value> {
    let events = Resource::events(organizer);
    let event = events.join(slug);

    if options.force {
        match api.delete(&event) {
            Ok(()) => tracing::info!(%event, "Deleted existing event"),
            Err(err) if err.status() == Some(404) => {
                tracing::info!(%event, "No existing event to delete")
            }
            Err(err) => tracing::warn!(%event, error = %err, "Could not delete existing event"),
        }
    }

    let root = document
        .get_mut("event")
        .ok_or_else(|| EventError::MissingField("event".to_string()))?;
    if !root.set("slug", slug) {
        return Err(invalid("event", "mapping"));
    }

    let mut body = to_json(section(document, "event")?, document)?;
    if let Value::Object(fields) = &mut body {
        fields.insert("live".to_string(), Value::Bool(false));
    }
    tracing::info!(%event, "Creating event");
    let created = api.post(&events, &body)?;

    if let Some(settings) = document.get("settings") {
        api.patch(&event.join("settings"), &to_json(settings, document)?)?;
    }

    for (name, mode) in CREATE_ORDER {
        create_section(api, &event, document, name, *mode)?;
    }

    link_categories(api, &event, document)?;
    link_questions(api, &event, document)?;

    Ok(created)
}

/// Patch the root fields (except the slug) and the settings of an existing
/// event. Sub-resources are left alone.
pub fn update_event(api: &dyn Api, event: &Resource, document: &Node) -> Result<Value> {
    let mut body = to_json(section(document, "event")?, document)?;
    if let Value::Object(fields) = &mut body {
        fields.remove("slug");
    }
    tracing::info!(%event, "Updating event");
    let updated = api.patch(event, &body)?;

    if let Some(settings) = document.get("settings") {
        api.patch(&event.join("settings"), &to_json(settings, document)?)?;
    }
    Ok(updated)
}

fn create_section(
    api: &dyn Api,
    event: &Resource,
    document: &mut Node,
    name: &str,
    mode: Mode,
) -> Result<()> {
    let count = match document.get(name) {
        None => return Ok(()),
        Some(Node::Sequence(entries)) => entries.len(),
        Some(node) if node.is_null() => return Ok(()),
        Some(_) => return Err(invalid(name, "sequence")),
    };
    if count == 0 {
        return Ok(());
    }
    tracing::info!(section = name, count, "Creating section");

    let resource = event.join(name);
    for index in 0..count {
        let path = entry_path(name, index);
        let entry = lookup(document, &path)?;
        let mut body = to_json(entry, document)?;

        match mode {
            Mode::Merge => {
                let response = api.post(&resource, &body)?;
                merge(lookup_mut(document, &path)?, Node::from(response))?;
            }
            Mode::AssignId { omit } => {
                if let Value::Object(fields) = &mut body {
                    for key in omit {
                        fields.remove(*key);
                    }
                }
                let response = api.post(&resource, &body)?;
                let id = response.get("id").cloned().ok_or_else(|| EventError::MissingId {
                    resource: resource.to_string(),
                })?;
                lookup_mut(document, &path)?.set("id", Node::from(id));
            }
        }
        tracing::debug!(section = name, index, "Created entry");
    }
    Ok(())
}

/// Second pass for categories: cross-selling lists name items, which did not
/// exist when the categories were created.
fn link_categories(api: &dyn Api, event: &Resource, document: &Node) -> Result<()> {
    let Some(Node::Sequence(categories)) = document.get("categories") else {
        return Ok(());
    };
    for category in categories {
        let Some(products) = category
            .get("cross_selling_match_products")
            .filter(|p| p.is_truthy())
        else {
            continue;
        };
        let mut body = serde_json::Map::new();
        body.insert("cross_selling_match_products".to_string(), to_json(products, document)?);

        let resource = entity(event, "categories", category, document)?;
        api.patch(&resource, &Value::Object(body))?;
    }
    Ok(())
}

/// Second pass for questions: a dependency names another question.
fn link_questions(api: &dyn Api, event: &Resource, document: &mut Node) -> Result<()> {
    let count = match document.get("questions") {
        Some(Node::Sequence(questions)) => questions.len(),
        _ => return Ok(()),
    };
    for index in 0..count {
        let path = entry_path("questions", index);
        let question = lookup(document, &path)?;
        if !question.get("dependency_question").is_some_and(Node::is_truthy) {
            continue;
        }

        let mut body = serde_json::Map::new();
        for key in QUESTION_DEFERRED {
            if let Some(value) = question.get(key) {
                body.insert(key.to_string(), to_json(value, document)?);
            }
        }
        let resource = entity(event, "questions", question, document)?;
        let response = api.patch(&resource, &Value::Object(body))?;
        merge(lookup_mut(document, &path)?, Node::from(response))?;
    }
    Ok(())
}

/// `<event>/<section>/<id>` for an entity that has been created.
fn entity(event: &Resource, section: &str, entry: &Node, document: &Node) -> Result<Resource> {
    let missing = || EventError::MissingId {
        resource: event.join(section).to_string(),
    };
    let id = entry.get("id").ok_or_else(missing)?;
    match to_json(id, document)? {
        Value::Number(n) => Ok(event.join(section).join(n)),
        Value::String(s) if !s.is_empty() => Ok(event.join(section).join(s)),
        _ => Err(missing()),
    }
}

fn section<'a>(document: &'a Node, name: &str) -> Result<&'a Node> {
    document
        .get(name)
        .ok_or_else(|| EventError::MissingField(name.to_string()))
}

fn entry_path(section: &str, index: usize) -> ConcretePath {
    ConcretePath::from_segments(vec![Seg::key(section), Seg::Index(index)])
}

fn lookup<'a>(document: &'a Node, path: &ConcretePath) -> Result<&'a Node> {
    document
        .lookup(path)
        .ok_or_else(|| EventError::MissingField(path.to_string()))
}

fn lookup_mut<'a>(document: &'a mut Node, path: &ConcretePath) -> Result<&'a mut Node> {
    document
        .lookup_mut(path)
        .ok_or_else(|| EventError::MissingField(path.to_string()))
}

fn invalid(section: &str, expected: &'static str) -> EventError {
    EventError::InvalidSection {
        section: section.to_string(),
        expected,
    }
}
