use std::fmt;

use chrono::Utc;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::registry;

/// Opaque version token observed on a fetched row.
///
/// Backends populate it from their `updated_at` column. The client never
/// parses it; it is handed back verbatim on the next guarded write and two
/// tokens only ever compare for equality.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionToken(String);

impl VersionToken {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VersionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Section types the admin console can place on the page.
///
/// `Other` keeps documents containing unrecognized kinds loadable: the raw
/// name round-trips unchanged and consumers render a placeholder for it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SectionKind {
    Hero,
    About,
    Services,
    Consultation,
    Testimonials,
    WriteSuccessStory,
    IntakeForm,
    Contact,
    Video,
    #[serde(untagged)]
    Other(String),
}

impl SectionKind {
    /// Wire name of this kind (`"writeSuccessStory"`, `"hero"`, ...).
    pub fn as_str(&self) -> &str {
        match self {
            Self::Hero => "hero",
            Self::About => "about",
            Self::Services => "services",
            Self::Consultation => "consultation",
            Self::Testimonials => "testimonials",
            Self::WriteSuccessStory => "writeSuccessStory",
            Self::IntakeForm => "intakeForm",
            Self::Contact => "contact",
            Self::Video => "video",
            Self::Other(name) => name,
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One orderable block of the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Stable identity, assigned at creation and never reused.
    pub id: String,
    #[serde(rename = "type")]
    pub kind: SectionKind,
    /// Kind-specific payload. Opaque to the save protocol.
    pub content: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavLink {
    pub text: String,
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderContent {
    pub site_name: String,
    /// Older rows were written without this list; fall back rather than fail.
    #[serde(default = "registry::default_nav_links")]
    pub nav_links: Vec<NavLink>,
    pub cta_button: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FooterLinks {
    pub title: String,
    pub get_started: String,
    pub admin: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FooterServices {
    pub title: String,
    pub list: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FooterContact {
    pub title: String,
    pub hours_title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FooterContent {
    pub tagline: String,
    pub quick_links: FooterLinks,
    pub services: FooterServices,
    pub contact: FooterContact,
    pub copyright: String,
}

// Hand-edited and pre-migration rows hold anything: a missing block takes
// the field default, a present-but-wrong-shaped one degrades to the same
// default instead of failing the whole load.
fn header_or_default<'de, D>(deserializer: D) -> Result<HeaderContent, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(raw).unwrap_or_else(|e| {
        warn!("Malformed header block ({}); using defaults", e);
        registry::default_header()
    }))
}

fn sections_or_default<'de, D>(deserializer: D) -> Result<Vec<Section>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(raw).unwrap_or_else(|e| {
        warn!("Malformed sections block ({}); using defaults", e);
        registry::default_sections()
    }))
}

fn footer_or_default<'de, D>(deserializer: D) -> Result<FooterContent, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(raw).unwrap_or_else(|e| {
        warn!("Malformed footer block ({}); using defaults", e);
        registry::default_footer()
    }))
}

/// The whole site content, stored as one JSON value in the backing row.
///
/// Hand-edited or pre-migration rows may lack top-level blocks or hold the
/// wrong shape in one; each block independently falls back to the built-in
/// default so a partial or damaged document still loads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentDocument {
    #[serde(default = "registry::default_header", deserialize_with = "header_or_default")]
    pub header: HeaderContent,
    #[serde(default = "registry::default_sections", deserialize_with = "sections_or_default")]
    pub sections: Vec<Section>,
    #[serde(default = "registry::default_footer", deserialize_with = "footer_or_default")]
    pub footer: FooterContent,
}

impl ContentDocument {
    pub fn section(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }

    pub fn section_mut(&mut self, id: &str) -> Option<&mut Section> {
        self.sections.iter_mut().find(|s| s.id == id)
    }

    pub fn has_section(&self, id: &str) -> bool {
        self.sections.iter().any(|s| s.id == id)
    }

    pub fn section_ids(&self) -> Vec<&str> {
        self.sections.iter().map(|s| s.id.as_str()).collect()
    }

    /// Allocates an id for a new section: `{kind}-{unix millis}`, with a
    /// numeric suffix when the same millisecond already produced one.
    pub fn fresh_section_id(&self, kind: &SectionKind) -> String {
        let base = format!("{}-{}", kind.as_str(), Utc::now().timestamp_millis());
        if !self.has_section(&base) {
            return base;
        }
        let mut n = 2u32;
        loop {
            let candidate = format!("{base}-{n}");
            if !self.has_section(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }
}

/// A fetched row: the document plus whatever version token the store reported.
///
/// `version` is `None` on stores without a version column and on rows written
/// before the column existed.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentRow {
    pub content: ContentDocument,
    pub version: Option<VersionToken>,
}
