/*
 * export.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Event export
 */

use crate::error::Result;
use crate::links::link_all;
use steamroll_api::{Api, Resource};
use steamroll_tree::{DefaultRules, Mapping, Node, Path, WalkOptions, strip_defaults, walk};

/// Sub-resource lists of an event, in export order. `subevents` follows
/// when the event has them.
pub(crate) const LIST_SECTIONS: &[&str] = &[
    "taxrules",
    "categories",
    "items",
    "quotas",
    "item_meta_properties",
    "questions",
    "vouchers",
    "discounts",
];

/// What [`fetch_event`] does after downloading.
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    /// Remove fields that still hold these defaults.
    pub defaults: Option<DefaultRules>,

    /// Remove entity ids after linking.
    pub strip_ids: bool,
}

/// Download `event` (an `organizers/<org>/events/<slug>` resource) with its
/// settings and sub-resources and link its foreign keys.
pub fn fetch_event(api: &dyn Api, event: &Resource, options: &ExportOptions) -> Result<Node> {
    tracing::info!(%event, "Fetching event");

    let mut document = Mapping::new();
    let root = Node::from(api.fetch_single(event)?);
    let has_subevents = root.get("has_subevents").is_some_and(Node::is_truthy);
    document.insert("event".to_string(), root);
    document.insert(
        "settings".to_string(),
        Node::from(api.fetch_single(&event.join("settings"))?),
    );

    let mut sections: Vec<&str> = LIST_SECTIONS.to_vec();
    if has_subevents {
        sections.push("subevents");
    }
    for section in sections {
        let entries = api.fetch_all(&event.join(section))?;
        tracing::debug!(section, count = entries.len(), "Fetched section");
        document.insert(
            section.to_string(),
            Node::Sequence(entries.into_iter().map(Node::from).collect()),
        );
    }

    let mut document = Node::Mapping(document);
    link_all(&mut document)?;

    if let Some(defaults) = &options.defaults {
        let removed = strip_defaults(&mut document, defaults)?;
        tracing::info!(removed, "Removed default values");
    }
    if options.strip_ids {
        strip_ids(&mut document)?;
    }
    Ok(document)
}

/// Delete the `id` of every entity in the list sections and of every item
/// variation. References that pointed at an id resolve again once the import
/// has merged the new id in.
pub fn strip_ids(document: &mut Node) -> Result<()> {
    let mut paths = vec![".items?.*.variations?.*.id?".to_string()];
    paths.extend(
        LIST_SECTIONS
            .iter()
            .chain(std::iter::once(&"subevents"))
            .map(|section| format!(".{}?.*.id?", section)),
    );
    for text in paths {
        walk(document, &Path::parse(&text)?, WalkOptions::new().delete())?;
    }
    Ok(())
}
