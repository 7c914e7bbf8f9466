//! Common types used across wikilens

use serde::Serialize;

use crate::ids::{EntityId, PropertyId};

/// A knowledge-base subject: the page's own entity, or the target of an
/// entity-valued snak.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntityRef {
    pub id: EntityId,
    pub label: String,
}

impl EntityRef {
    pub fn new(id: EntityId, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
        }
    }
}

/// A knowledge-base predicate together with its rendered label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyRef {
    pub id: PropertyId,
    pub label: String,
}

impl PropertyRef {
    pub fn new(id: PropertyId, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
        }
    }
}

/// Semantic identity of one rendered statement value.
///
/// Exactly one variant applies; `Unresolved` only when every extraction
/// strategy failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractedValue {
    /// The markup links to another entity.
    Entity { id: EntityId, label: String },
    /// Free text with no entity identity. `term` is the quoted form usable
    /// in query position when the value came from a plain-text fallback;
    /// monolingual text carries none.
    StringLiteral {
        label: String,
        term: Option<String>,
    },
    /// Well-typed literal recovered from the structured record.
    TypedLiteral {
        kind: LiteralKind,
        raw: String,
        label: String,
    },
    /// No extraction strategy succeeded.
    Unresolved,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    Time,
    Quantity,
}

impl ExtractedValue {
    /// The query-ready term for this value, if it has one: the bare id for
    /// entities, a typed literal for time (`"…"^^xsd:dateTime`), the raw
    /// amount for quantities, the quoted text for plain literals.
    pub fn query_term(&self) -> Option<String> {
        match self {
            ExtractedValue::Entity { id, .. } => Some(id.as_str().to_owned()),
            ExtractedValue::StringLiteral { term, .. } => term.clone(),
            ExtractedValue::TypedLiteral {
                kind: LiteralKind::Time,
                raw,
                ..
            } => Some(format!("\"{raw}\"^^xsd:dateTime")),
            ExtractedValue::TypedLiteral {
                kind: LiteralKind::Quantity,
                raw,
                ..
            } => Some(raw.clone()),
            ExtractedValue::Unresolved => None,
        }
    }

    /// The target entity id, when the value resolved to one.
    pub fn entity_id(&self) -> Option<&EntityId> {
        match self {
            ExtractedValue::Entity { id, .. } => Some(id),
            _ => None,
        }
    }

    /// The human-readable label, when one was rendered.
    pub fn label(&self) -> Option<&str> {
        match self {
            ExtractedValue::Entity { label, .. }
            | ExtractedValue::StringLiteral { label, .. }
            | ExtractedValue::TypedLiteral { label, .. } => Some(label),
            ExtractedValue::Unresolved => None,
        }
    }
}

/// One affordance for the page decoration layer: everything the UI needs to
/// render a link or popup, and nothing rendered here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Affordance {
    pub action: AffordanceAction,
    /// OOUI icon name.
    pub icon: String,
    pub tooltip: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AffordanceAction {
    /// Plain hyperlink to an external service.
    Link { href: String },
    /// Popup embedding a query-service view: `href` opens the query in the
    /// full service, `embed` is the iframe source, `title` heads the popup.
    Popup {
        href: String,
        embed: String,
        title: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_term_is_the_bare_id() {
        let value = ExtractedValue::Entity {
            id: EntityId::parse("Q95").unwrap(),
            label: "Google".to_owned(),
        };
        assert_eq!(value.query_term().as_deref(), Some("Q95"));
        assert_eq!(value.entity_id().unwrap().as_str(), "Q95");
    }

    #[test]
    fn time_term_is_a_datetime_literal() {
        let value = ExtractedValue::TypedLiteral {
            kind: LiteralKind::Time,
            raw: "+1990-01-01T00:00:00Z".to_owned(),
            label: "1 January 1990".to_owned(),
        };
        assert_eq!(
            value.query_term().as_deref(),
            Some("\"+1990-01-01T00:00:00Z\"^^xsd:dateTime")
        );
    }

    #[test]
    fn quantity_term_is_unquoted() {
        let value = ExtractedValue::TypedLiteral {
            kind: LiteralKind::Quantity,
            raw: "42".to_owned(),
            label: "42".to_owned(),
        };
        assert_eq!(value.query_term().as_deref(), Some("42"));
    }

    #[test]
    fn monolingual_text_has_no_term() {
        let value = ExtractedValue::StringLiteral {
            label: "Hello".to_owned(),
            term: None,
        };
        assert_eq!(value.query_term(), None);
        assert_eq!(ExtractedValue::Unresolved.query_term(), None);
    }
}
