//! # Manifest
//!
//! Read-only index of a design's pages and components, built from the
//! interchange metadata.
//!
//! The format is permissive: a page may list a component id that the
//! component table does not contain. Such dangling references are skipped by
//! every query and never reported as errors.
//!
//! A `Manifest` is an immutable snapshot. When the document structure changes
//! a new one is built; nothing here mutates in place.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("Malformed manifest: {0}")]
    Json(#[from] serde_json::Error),
}

/// Reference from a page to one of its components
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildRef {
    pub id: String,

    /// `ARTBOARD`, `COMPONENT`, ... as declared by the source format
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

impl ChildRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: None,
        }
    }
}

/// A page and the ids of its components in declaration order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestPage {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub children: Vec<ChildRef>,
}

impl ManifestPage {
    pub fn new(id: impl Into<String>, name: impl Into<String>, children: &[&str]) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            children: children.iter().map(|id| ChildRef::new(*id)).collect(),
        }
    }
}

/// Component metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestComponent {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl ManifestComponent {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            role: None,
        }
    }
}

/// One entry of a component picker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionOption {
    pub component_id: String,
    /// Page the component was listed under, `None` for orphans
    pub page_id: Option<String>,
    pub label: String,
}

#[derive(Serialize, Deserialize)]
struct ManifestData {
    #[serde(default)]
    pages: Vec<ManifestPage>,
    #[serde(default)]
    components: Vec<ManifestComponent>,
}

/// Immutable page/component index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ManifestData", into = "ManifestData")]
pub struct Manifest {
    pages: Vec<ManifestPage>,
    components: Vec<ManifestComponent>,
    index: HashMap<String, usize>,
}

impl From<ManifestData> for Manifest {
    fn from(data: ManifestData) -> Self {
        Manifest::new(data.pages, data.components)
    }
}

impl From<Manifest> for ManifestData {
    fn from(manifest: Manifest) -> Self {
        ManifestData {
            pages: manifest.pages,
            components: manifest.components,
        }
    }
}

impl Manifest {
    pub fn new(pages: Vec<ManifestPage>, components: Vec<ManifestComponent>) -> Self {
        let mut index = HashMap::with_capacity(components.len());
        for (position, component) in components.iter().enumerate() {
            // first declaration wins
            index.entry(component.id.clone()).or_insert(position);
        }
        Self {
            pages,
            components,
            index,
        }
    }

    pub fn from_json(source: &str) -> Result<Self, ManifestError> {
        Ok(serde_json::from_str(source)?)
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self, ManifestError> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn to_json(&self) -> Result<String, ManifestError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn pages(&self) -> &[ManifestPage] {
        &self.pages
    }

    pub fn components(&self) -> &[ManifestComponent] {
        &self.components
    }

    pub fn page(&self, page_id: &str) -> Option<&ManifestPage> {
        self.pages.iter().find(|page| page.id == page_id)
    }

    pub fn component(&self, component_id: &str) -> Option<&ManifestComponent> {
        self.index.get(component_id).map(|&i| &self.components[i])
    }

    pub fn contains_component(&self, component_id: &str) -> bool {
        self.index.contains_key(component_id)
    }

    /// Page that lists `component_id` first, if any
    pub fn page_of(&self, component_id: &str) -> Option<&ManifestPage> {
        self.pages
            .iter()
            .find(|page| page.children.iter().any(|child| child.id == component_id))
    }

    /// Components listed by a page, in declaration order.
    ///
    /// Dangling ids are dropped and an id listed twice is returned once.
    /// Unknown pages yield an empty list. When several pages share `page_id`
    /// only the first is consulted; walk [`Manifest::pages`] with
    /// [`Manifest::page_components`] to see them all.
    pub fn components_for_page(&self, page_id: &str) -> Vec<&ManifestComponent> {
        match self.page(page_id) {
            Some(page) => self.page_components(page),
            None => Vec::new(),
        }
    }

    /// Resolve the children of one page entry
    pub fn page_components(&self, page: &ManifestPage) -> Vec<&ManifestComponent> {
        let mut shown = HashSet::new();
        let mut resolved = Vec::new();
        for child in &page.children {
            match self.component(&child.id) {
                Some(component) => {
                    if shown.insert(component.id.as_str()) {
                        resolved.push(component);
                    }
                }
                None => debug!(page_id = %page.id, component_id = %child.id, "Skipping dangling component reference"),
            }
        }
        resolved
    }

    /// Components not listed by any page, in declaration order
    pub fn orphaned_components(&self) -> Vec<&ManifestComponent> {
        let listed: HashSet<&str> = self
            .pages
            .iter()
            .flat_map(|page| page.children.iter().map(|child| child.id.as_str()))
            .collect();

        self.components
            .iter()
            .filter(|component| !listed.contains(component.id.as_str()))
            .collect()
    }

    /// Entries for a component picker.
    ///
    /// Pages are walked in order against a fresh copy of the component table;
    /// each component is offered under the first page that lists it, labelled
    /// `"<page> / <component>"`, and removed from the copy. Whatever is left
    /// afterwards is appended under its own name.
    pub fn selection_options(&self) -> Vec<SelectionOption> {
        // same first-wins rule as the index
        let mut remaining: HashMap<&str, &ManifestComponent> = HashMap::with_capacity(self.components.len());
        for component in &self.components {
            remaining.entry(component.id.as_str()).or_insert(component);
        }

        let mut options = Vec::new();
        for page in &self.pages {
            for child in &page.children {
                let Some(component) = remaining.remove(child.id.as_str()) else {
                    continue;
                };
                options.push(SelectionOption {
                    component_id: component.id.clone(),
                    page_id: Some(page.id.clone()),
                    label: format!("{} / {}", page.name, component.name),
                });
            }
        }

        for component in &self.components {
            if remaining.remove(component.id.as_str()).is_some() {
                options.push(SelectionOption {
                    component_id: component.id.clone(),
                    page_id: None,
                    label: component.name.clone(),
                });
            }
        }
        options
    }
}
