//! # wikilens-core
//!
//! Rule-driven contextual query generation for Wikibase entity pages.
//!
//! This library provides:
//! - strict entity/property identifier parsing
//! - value extraction from rendered statement markup, with the structured
//!   entity record as a fallback oracle
//! - a declarative rule table mapping (property, value) pairs to query
//!   templates and presentation metadata
//! - template rendering and transport encoding of the final query string
//!
//! Everything is synchronous and pure apart from diagnostics logging. The
//! output of a firing rule is an [`Affordance`]: data describing the link or
//! query popup a page decoration layer should attach, never UI itself.
//!
//! ## Example
//!
//! ```
//! use wikilens_core::{
//!     Dispatcher, EntityId, EntityRef, ExtractedValue, RuleTable, WikibaseConfig,
//! };
//!
//! let config = WikibaseConfig::default();
//! let rules = RuleTable::builtin(&config);
//! let dispatcher = Dispatcher::new(&config, &rules);
//!
//! let subject = EntityRef::new(EntityId::parse("Q5").unwrap(), "human");
//! let value = ExtractedValue::Entity {
//!     id: EntityId::parse("Q95").unwrap(),
//!     label: "Google".to_owned(),
//! };
//! let affordances = dispatcher.for_value(&subject, &config.properties.employer, &value);
//! assert_eq!(affordances.len(), 1);
//! ```

pub mod config;
pub mod extract;
pub mod ids;
pub mod record;
pub mod rules;
pub mod template;
pub mod types;

// Re-export the types a consumer needs for the whole pipeline
pub use config::{ConfigError, WikibaseConfig};
pub use extract::extract;
pub use ids::{EntityId, PropertyId};
pub use record::{Datavalue, EntityRecord, RecordError};
pub use rules::{Dispatcher, Presentation, QueryRule, RuleAction, RuleScope, RuleTable};
pub use template::{Bindings, encode_for_transport, render};
pub use types::{
    Affordance, AffordanceAction, EntityRef, ExtractedValue, LiteralKind, PropertyRef,
};

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // The pipeline end to end: markup + record → extraction → dispatch →
    // rendered, encoded query string.
    #[test]
    fn employer_statement_end_to_end() {
        let config = WikibaseConfig::default();
        let rules = RuleTable::builtin(&config);
        let dispatcher = Dispatcher::new(&config, &rules);

        let subject = EntityRef::new(EntityId::parse("Q5").unwrap(), "Example Human");
        let record = EntityRecord::new(json!({ "claims": {} }));

        let value = extract(
            r#"<a title="Q95: Google" href="/wiki/Q95">Google</a>"#,
            &record,
            &config.properties.employer,
        );
        assert_eq!(value.entity_id().unwrap().as_str(), "Q95");

        let affordances = dispatcher.for_value(&subject, &config.properties.employer, &value);
        assert_eq!(affordances.len(), 1);

        let AffordanceAction::Popup { href, embed, title } = &affordances[0].action else {
            panic!("expected a popup");
        };

        assert!(href.starts_with("https://query.wikidata.org/#"));
        assert!(embed.starts_with("https://query.wikidata.org/embed.html#"));
        assert_eq!(title, "100 other employees of Google");

        let encoded = href.split('#').nth(1).unwrap();
        let query = urlencoding::decode(encoded).unwrap();
        assert_eq!(query.matches("wd:Q95").count(), 1);
        assert!(!query.contains('{'), "unresolved placeholder in {query}");
    }

    #[test]
    fn time_statement_end_to_end() {
        let config = WikibaseConfig::default();
        let record = EntityRecord::new(json!({
            "claims": {
                "P585": [{
                    "mainsnak": {
                        "datavalue": {
                            "type": "time",
                            "value": { "time": "+1990-01-01T00:00:00Z" }
                        }
                    }
                }]
            }
        }));

        let value = extract("1 January 1990", &record, &config.properties.point_in_time);
        assert_eq!(
            value.query_term().as_deref(),
            Some("\"+1990-01-01T00:00:00Z\"^^xsd:dateTime")
        );
    }
}
