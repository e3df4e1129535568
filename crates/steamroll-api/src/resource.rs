/*
 * resource.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * API resource paths
 */

use std::fmt;

/// Path of a resource below `/api/v1/`, e.g.
/// `organizers/acme/events/conf/items`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Resource {
    components: Vec<String>,
}

impl Resource {
    /// The API root.
    pub fn new() -> Self {
        Self::default()
    }

    /// `organizers/<organizer>/events`
    pub fn events(organizer: &str) -> Self {
        Self::new().join("organizers").join(organizer).join("events")
    }

    /// `organizers/<organizer>/events/<event>`
    pub fn event(organizer: &str, event: &str) -> Self {
        Self::events(organizer).join(event)
    }

    /// Return a copy with one more component.
    pub fn join(&self, component: impl fmt::Display) -> Self {
        let mut components = self.components.clone();
        components.push(component.to_string());
        Self { components }
    }

    pub fn components(&self) -> &[String] {
        &self.components
    }

    /// Components joined with `_`, used as the default export file name.
    pub fn file_stem(&self) -> String {
        self.components.join("_")
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.components.join("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_resource() {
        let event = Resource::event("acme", "conf");
        assert_eq!(event.to_string(), "organizers/acme/events/conf");
        assert_eq!(
            event.join("items").join(42).to_string(),
            "organizers/acme/events/conf/items/42"
        );
        assert_eq!(event.components().len(), 4);
    }

    #[test]
    fn test_file_stem() {
        assert_eq!(Resource::event("acme", "conf").file_stem(), "organizers_acme_events_conf");
    }

    #[test]
    fn test_root_is_empty() {
        assert_eq!(Resource::new().to_string(), "");
        assert_eq!(Resource::events("acme").to_string(), "organizers/acme/events");
    }
}
