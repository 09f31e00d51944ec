use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// Identifier of an SD Elements project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ProjectId(pub i64);

impl std::fmt::Display for ProjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

// Agents send project ids as numbers or numeric strings; accept both.
impl<'de> Deserialize<'de> for ProjectId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Int(i64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Int(n) => Ok(Self(n)),
            Raw::Text(s) => s
                .trim()
                .parse()
                .map(Self)
                .map_err(|_| de::Error::custom(format!("invalid project id: {s:?}"))),
        }
    }
}

/// A countermeasure within a project.
///
/// The backend addresses countermeasures by the composite string
/// `"{project}-{local}"`. The pair is kept structured here and only rendered
/// to that form via `Display`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CountermeasureId {
    pub project: ProjectId,
    pub local: String,
}

impl CountermeasureId {
    #[must_use]
    pub fn new(project: ProjectId, local: impl Into<String>) -> Self {
        Self {
            project,
            local: local.into(),
        }
    }

    /// Resolve a caller-supplied id that may be either bare (`"42"`) or
    /// already qualified with the project prefix (`"5-42"`).
    #[must_use]
    pub fn resolve(project: ProjectId, raw: &str) -> Self {
        let prefix = format!("{project}-");
        let local = raw.strip_prefix(prefix.as_str()).unwrap_or(raw);
        Self::new(project, local)
    }
}

impl std::fmt::Display for CountermeasureId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.project, self.local)
    }
}

impl Serialize for CountermeasureId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Query parameters for listing a project's countermeasures.
///
/// Unset fields are left out of the query entirely. `risk_relevant` is always
/// sent, as the literal `"true"` or `"false"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountermeasureFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    #[serde(serialize_with = "lowercase_bool")]
    pub risk_relevant: bool,
}

impl Default for CountermeasureFilter {
    fn default() -> Self {
        Self {
            status: None,
            page_size: None,
            risk_relevant: true,
        }
    }
}

/// Partial update of a countermeasure. Only the fields that are set are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CountermeasureUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Note attached to the status change. The backend calls this `status_note`.
    #[serde(rename = "status_note", skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl CountermeasureUpdate {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.notes.is_none()
    }
}

/// Query parameters for listing projects.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProjectFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn lowercase_bool<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(if *value { "true" } else { "false" })
}
