/*
 * links.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Foreign keys of an exported event
 */

use crate::error::{EventError, Result};
use steamroll_tree::{LinkReport, LinkRule, Node, link};

/// Every foreign key of an event document as `(source, target, key)`.
///
/// Segments marked `?` may be absent (sections that depend on server
/// features, fields older servers do not send). Any other missing segment
/// fails the export.
///
/// Targets are always created before the sources that point at them, except
/// for category cross-selling lists and question dependencies, which the
/// import patches in a second pass.
pub const LINKS: &[(&str, &str, &str)] = &[
    (".items.*.category", ".categories.*", ".id"),
    (".items.*.tax_rule", ".taxrules?.*", ".id"),
    (".items.*.addons?.*.addon_category", ".categories.*", ".id"),
    (".quotas.*.items.*", ".items.*", ".id"),
    (".quotas.*.variations.*", ".items.*.variations?.*", ".id"),
    (".quotas.*.subevent?", ".subevents?.*", ".id"),
    (".vouchers.*.item", ".items.*", ".id"),
    (".vouchers.*.variation", ".items.*.variations?.*", ".id"),
    (".vouchers.*.quota", ".quotas.*", ".id"),
    (".vouchers.*.subevent?", ".subevents?.*", ".id"),
    (".questions.*.items.*", ".items.*", ".id"),
    (".questions.*.dependency_question", ".questions.*", ".id"),
    (".categories.*.cross_selling_match_products?.*", ".items.*", ".id"),
    (".discounts?.*.condition_limit_products?.*", ".items.*", ".id"),
    (".discounts?.*.benefit_limit_products?.*", ".items.*", ".id"),
    (".subevents?.*.item_price_overrides?.*.item", ".items.*", ".id"),
    (".subevents?.*.variation_price_overrides?.*.variation", ".items.*.variations?.*", ".id"),
];

/// Parse [`LINKS`].
pub fn link_rules() -> Result<Vec<LinkRule>> {
    LINKS
        .iter()
        .map(|(source, target, key)| LinkRule::new(source, target, key).map_err(EventError::from))
        .collect()
}

/// Apply every rule of [`LINKS`] to `document`.
pub fn link_all(document: &mut Node) -> Result<LinkReport> {
    let mut total = LinkReport::default();
    for rule in link_rules()? {
        let report = link(document, &rule)?;
        total.linked += report.linked;
        total.unmatched += report.unmatched;
        total.ambiguous += report.ambiguous;
    }
    tracing::info!(
        linked = total.linked,
        unmatched = total.unmatched,
        ambiguous = total.ambiguous,
        "Linked foreign keys"
    );
    Ok(total)
}
