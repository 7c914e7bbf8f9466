//! Entity and property identifier grammars

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static ENTITY_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^Q\d+$").expect("invalid entity id regex"));
static ENTITY_TITLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(Q\d+)(?::.*)?$").expect("invalid entity title regex"));
static PROPERTY_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^P\d+$").expect("invalid property id regex"));
static PROPERTY_TITLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:Property:)?(P\d+)$").expect("invalid property title regex"));

/// Identifier of a knowledge-base subject record, e.g. `Q42`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    /// Parse a bare id. Anything beyond the strict `Q<digits>` grammar is
    /// rejected, including leading or trailing garbage.
    pub fn parse(raw: &str) -> Option<Self> {
        ENTITY_ID.is_match(raw).then(|| Self(raw.to_owned()))
    }

    /// Parse the `title` attribute of a rendered entity link, which may carry
    /// a `": label"` suffix after the bare id (`"Q42: Douglas Adams"` → `Q42`).
    pub fn from_link_title(title: &str) -> Option<Self> {
        ENTITY_TITLE
            .captures(title)
            .map(|caps| Self(caps[1].to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a knowledge-base predicate, e.g. `P106`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyId(String);

impl PropertyId {
    /// Parse a bare id against the strict `P<digits>` grammar.
    pub fn parse(raw: &str) -> Option<Self> {
        PROPERTY_ID.is_match(raw).then(|| Self(raw.to_owned()))
    }

    /// Parse the `title` attribute of a rendered property link, which uses
    /// the `"Property:P22"` page-title form.
    pub fn from_link_title(title: &str) -> Option<Self> {
        PROPERTY_TITLE
            .captures(title)
            .map(|caps| Self(caps[1].to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
