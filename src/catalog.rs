//! The bodies to query and how to draw them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Display properties of a body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BodyInfo {
    /// Legend label.
    pub name: String,
    /// Plot color, a matplotlib/CSS color name.
    pub color: String,
}

/// Bodies keyed by the identifier of the ephemeris provider.
///
/// Iteration follows insertion order, which is also the order of the chart legend.
///
/// The JSON form is a list of entries:
/// ```json
/// [{"id": "499", "name": "Mars", "color": "red"}]
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct BodyCatalog {
    order: Vec<String>,
    bodies: BTreeMap<String, BodyInfo>,
}

#[derive(Serialize, Deserialize)]
struct Entry {
    id: String,
    name: String,
    color: String,
}

impl BodyCatalog {
    /// An empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a body. A replaced body keeps its position.
    pub fn insert(&mut self, id: impl Into<String>, name: impl Into<String>, color: impl Into<String>) {
        let id = id.into();
        let info = BodyInfo {
            name: name.into(),
            color: color.into(),
        };
        if self.bodies.insert(id.clone(), info).is_none() {
            self.order.push(id);
        }
    }

    /// Add a body, builder style.
    pub fn with_body(mut self, id: impl Into<String>, name: impl Into<String>, color: impl Into<String>) -> Self {
        self.insert(id, name, color);
        self
    }

    /// Look up a body.
    pub fn get(&self, id: &str) -> Option<&BodyInfo> {
        self.bodies.get(id)
    }

    /// Number of bodies.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether there are no bodies.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Bodies in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BodyInfo)> {
        self.order
            .iter()
            .filter_map(|id| self.bodies.get(id).map(|info| (id.as_str(), info)))
    }

    /// Parse the JSON form.
    pub fn from_json(json: &str) -> Result<Self> {
        let entries: Vec<Entry> = serde_json::from_str(json)?;
        Ok(entries
            .into_iter()
            .fold(Self::new(), |catalog, e| catalog.with_body(e.id, e.name, e.color)))
    }

    /// Serialize to the JSON form.
    pub fn to_json(&self) -> Result<String> {
        let entries: Vec<Entry> = self
            .iter()
            .map(|(id, info)| Entry {
                id: id.to_owned(),
                name: info.name.clone(),
                color: info.color.clone(),
            })
            .collect();
        Ok(serde_json::to_string_pretty(&entries)?)
    }

    /// The planets, Pluto and the Moon with their JPL Horizons identifiers.
    pub fn solar_system() -> Self {
        Self::new()
            .with_body("199", "Mercury", "olive")
            .with_body("299", "Venus", "darkorange")
            .with_body("499", "Mars", "red")
            .with_body("599", "Jupiter", "salmon")
            .with_body("699", "Saturn", "sandybrown")
            .with_body("799", "Uranus", "purple")
            .with_body("899", "Neptune", "blue")
            .with_body("999", "Pluto", "skyblue")
            .with_body("301", "Moon", "gray")
    }
}
