//! Structured entity record lookup
//!
//! The page delivers the full entity data as one JSON payload per load. The
//! extractor only ever needs the main datavalue of a property's first
//! statement, so the record stays an untyped `serde_json::Value` walked on
//! demand, with every shape violation reported as a typed error instead of
//! a panic.

use serde_json::Value as JsonValue;
use thiserror::Error;

use crate::ids::PropertyId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("no claims recorded for {0}")]
    MissingProperty(PropertyId),
    #[error("first statement for {0} carries no datavalue")]
    MissingDatavalue(PropertyId),
    #[error("datavalue for {pid} has unexpected shape: missing {field}")]
    MalformedDatavalue {
        pid: PropertyId,
        field: &'static str,
    },
}

/// Main-snak datavalue of a statement, reduced to what extraction needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Datavalue {
    /// Signed ISO timestamp as the record carries it, e.g.
    /// `+1990-01-01T00:00:00Z`.
    Time(String),
    /// Numeric amount kept as a string, usable directly as a query term.
    Quantity(String),
    /// Any other datatype; the rendered markup is authoritative.
    Other,
}

/// The structured entity record behind a rendered page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityRecord {
    data: JsonValue,
}

impl EntityRecord {
    pub fn new(data: JsonValue) -> Self {
        Self { data }
    }

    pub fn from_str(raw: &str) -> serde_json::Result<Self> {
        Ok(Self::new(serde_json::from_str(raw)?))
    }

    /// Datavalue of the first statement recorded for `pid`.
    ///
    /// Wikibase datatypes are uniform per property, so the first statement
    /// answers for the whole group.
    pub fn main_datavalue(&self, pid: &PropertyId) -> Result<Datavalue, RecordError> {
        let statement = self
            .data
            .get("claims")
            .and_then(|claims| claims.get(pid.as_str()))
            .and_then(|statements| statements.get(0))
            .ok_or_else(|| RecordError::MissingProperty(pid.clone()))?;

        let datavalue = statement
            .get("mainsnak")
            .and_then(|snak| snak.get("datavalue"))
            .ok_or_else(|| RecordError::MissingDatavalue(pid.clone()))?;

        let malformed = |field| RecordError::MalformedDatavalue {
            pid: pid.clone(),
            field,
        };

        match datavalue.get("type").and_then(JsonValue::as_str) {
            Some("time") => datavalue
                .get("value")
                .and_then(|value| value.get("time"))
                .and_then(JsonValue::as_str)
                .map(|time| Datavalue::Time(time.to_owned()))
                .ok_or_else(|| malformed("value.time")),
            Some("quantity") => datavalue
                .get("value")
                .and_then(|value| value.get("amount"))
                .and_then(JsonValue::as_str)
                .map(|amount| Datavalue::Quantity(amount.to_owned()))
                .ok_or_else(|| malformed("value.amount")),
            Some(_) => Ok(Datavalue::Other),
            None => Err(malformed("type")),
        }
    }
}
