//! Template registry: lookup-and-clone of step exemplars.
//!
//! The registry is an explicit value the caller constructs and populates
//! during an initialization phase of its own choosing; there is no static
//! self-registration, so registration order is deterministic and all
//! `register` calls happen before the first lookup.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use tracing::{debug, instrument};

use crate::element::{Element, ElementTag};
use crate::errors::{PlanError, PlanResult};

/// Process-lifetime mapping from an element tag to one exemplar.
#[derive(Debug, Default)]
pub struct TemplateRegistry {
    templates: HashMap<ElementTag, Element>,
}

impl TemplateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores one exemplar for its own tag.
    ///
    /// The tag is taken from the exemplar itself, a tag/exemplar mismatch
    /// cannot be expressed. A second registration for the same tag is
    /// rejected and leaves the first exemplar in place.
    #[instrument(level = "debug", skip(self, exemplar))]
    pub fn register(&mut self, exemplar: Element) -> PlanResult<()> {
        let tag = exemplar.tag();
        match self.templates.entry(tag) {
            Entry::Occupied(_) => Err(PlanError::DuplicateTemplate(tag)),
            Entry::Vacant(slot) => {
                debug!(%tag, "registering template");
                slot.insert(exemplar);
                Ok(())
            }
        }
    }

    /// Returns an independently-owned copy of the exemplar registered for
    /// `tag`, or `None` when no exemplar is registered.
    ///
    /// The copy's `tag()` always equals the requested tag; an unknown tag
    /// never yields a default-constructed stand-in.
    #[instrument(level = "debug", skip(self))]
    pub fn find_and_clone(&self, tag: ElementTag) -> Option<Element> {
        self.templates.get(&tag).cloned()
    }

    pub fn is_registered(&self, tag: ElementTag) -> bool {
        self.templates.contains_key(&tag)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

/// Builds a registry pre-populated with one neutral exemplar per leaf step
/// kind. All code paths that need stock templates share this single
/// construction routine.
pub fn default_templates() -> TemplateRegistry {
    let mut registry = TemplateRegistry::new();
    // Fresh registry, these cannot collide.
    let _ = registry.register(Element::command("true", 1));
    let _ = registry.register(Element::fetch("https://example.invalid/artifact", 1));
    let _ = registry.register(Element::notify("#ops", 1));
    registry
}
