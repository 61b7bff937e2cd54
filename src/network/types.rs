use serde::{Deserialize, Serialize};

/// A top-left anchor in layout space.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Education {
    pub degree: String,
    pub school: String,
    #[serde(default)]
    pub year: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    pub role: String,
    pub company: String,
    #[serde(default)]
    pub duration: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    /// "email", "phone", "linkedin", ...
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
}

/// Person attributes carried by a node. Layout never looks inside.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonData {
    pub id: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub headshot: Option<String>,
    pub education: Vec<Education>,
    pub experience: Vec<Experience>,
    pub skills: Vec<String>,
    pub contacts: Vec<Contact>,
    pub tags: Vec<String>,
    pub notes: Option<String>,
    pub label: Option<String>,
    /// Person this one was connected to when created.
    pub parent_id: Option<String>,
}

impl PersonData {
    pub fn named(first_name: &str, last_name: &str) -> Self {
        Self {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            ..Self::default()
        }
    }

    /// "First Last", falling back to the label and then to "Unnamed".
    pub fn full_name(&self) -> String {
        let name = format!("{} {}", self.first_name, self.last_name);
        let name = name.trim();
        if !name.is_empty() {
            return name.to_string();
        }
        match self.label.as_deref() {
            Some(label) if !label.is_empty() => label.to_string(),
            _ => "Unnamed".to_string(),
        }
    }

    pub fn initials(&self) -> String {
        let first = self.first_name.trim().chars().next();
        let last = self.last_name.trim().chars().next();
        let initials: String = first.into_iter().chain(last).collect::<String>().to_uppercase();
        if initials.is_empty() {
            "•".to_string()
        } else {
            initials
        }
    }
}

/// A person in the network.
///
/// `distance` and `max_distance` are derived by the layout engine and are
/// `None` until the first pass has run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: String,
    #[serde(default)]
    pub position: Point,
    #[serde(default)]
    pub data: PersonData,
    #[serde(default)]
    pub distance: Option<u32>,
    #[serde(default)]
    pub max_distance: Option<u32>,
}

impl Node {
    pub fn new(id: impl Into<String>, data: PersonData) -> Self {
        Self {
            id: id.into(),
            position: Point::default(),
            data,
            distance: None,
            max_distance: None,
        }
    }

    pub fn at(mut self, position: Point) -> Self {
        self.position = position;
        self
    }
}

/// An undirected connection between two people. `id` is only meaningful to
/// the host; layout reads `source` and `target` symmetrically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    #[serde(default)]
    pub id: String,
    pub source: String,
    pub target: String,
}

impl Edge {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        let source = source.into();
        let target = target.into();
        Self {
            id: format!("e-{source}-{target}"),
            source,
            target,
        }
    }

    pub fn touches(&self, id: &str) -> bool {
        self.source == id || self.target == id
    }
}
