use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Placeholder served whenever no real artwork can be resolved.
pub const FALLBACK_IMAGE: &str = "/static/fallback.jpg";

/// Public prefix under which cached image files are served.
pub const IMAGES_PREFIX: &str = "/images/";

/// Catalog release identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReleaseId(pub u64);

impl ReleaseId {
    /// Accepts a positive JSON number or a numeric string. Zero and anything
    /// else count as "no identifier".
    pub fn from_json(value: &Value) -> Option<Self> {
        let id = match value {
            Value::Number(number) => number.as_u64(),
            Value::String(text) => text.trim().parse::<u64>().ok(),
            _ => None,
        }?;
        (id > 0).then_some(Self(id))
    }
}

impl fmt::Display for ReleaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageKind {
    Cover,
    Back,
}

impl ImageKind {
    fn prefix(self) -> &'static str {
        match self {
            ImageKind::Cover => "cover",
            ImageKind::Back => "back",
        }
    }

    /// Cache file stem, e.g. `cover_42`.
    pub fn stem(self, id: ReleaseId) -> String {
        format!("{}_{}", self.prefix(), id)
    }

    /// Self-healing endpoint, e.g. `/cover/42`.
    pub fn endpoint(self, id: ReleaseId) -> String {
        format!("/{}/{}", self.prefix(), id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageType {
    Primary,
    Secondary,
    Unknown,
}

impl ImageType {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(|kind| kind.trim().to_ascii_lowercase()).as_deref() {
            Some("primary") => ImageType::Primary,
            Some("secondary") => ImageType::Secondary,
            _ => ImageType::Unknown,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageCandidate {
    pub url: String,
    pub kind: ImageType,
}

impl ImageCandidate {
    pub fn new(kind: ImageType, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            kind,
        }
    }
}

/// Public paths for a release's artwork. `cover` is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedImages {
    pub cover: String,
    pub back: Option<String>,
}

impl ResolvedImages {
    pub fn is_fallback(&self) -> bool {
        self.cover == FALLBACK_IMAGE
    }
}

pub fn public_image_path(file_name: &str) -> String {
    format!("{}{}", IMAGES_PREFIX, file_name)
}

/// One record of the collection document. Fields the cache layer does not
/// touch are kept as raw JSON and unknown keys survive a load/save cycle.
/// Image fields that are not strings are read as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Album {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<Value>,
    #[serde(
        default,
        deserialize_with = "string_or_absent",
        skip_serializing_if = "Option::is_none"
    )]
    pub cover_image: Option<String>,
    #[serde(
        default,
        deserialize_with = "string_or_absent",
        skip_serializing_if = "Option::is_none"
    )]
    pub thumb: Option<String>,
    #[serde(
        default,
        deserialize_with = "string_or_absent",
        skip_serializing_if = "Option::is_none"
    )]
    pub back_image: Option<String>,
    #[serde(
        default,
        deserialize_with = "string_or_absent",
        skip_serializing_if = "Option::is_none"
    )]
    pub back_thumb: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tracklist: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_added: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Album {
    pub fn release_id(&self) -> Option<ReleaseId> {
        self.id.as_ref().and_then(ReleaseId::from_json)
    }

    pub fn display_name(&self) -> String {
        format!(
            "{} – {}",
            display_text(self.artist.as_ref()),
            display_text(self.title.as_ref())
        )
    }

    pub fn has_tracklist(&self) -> bool {
        self.tracklist.as_ref().is_some_and(|tracks| !tracks.is_empty())
    }
}

fn display_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}

fn string_or_absent<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => Some(text),
        _ => None,
    })
}
