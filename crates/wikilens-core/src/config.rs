//! Wikibase instance configuration
//!
//! One immutable value constructed at startup and passed by reference into
//! the template engine and the rule table. Nothing here mutates at runtime;
//! pointing the pipeline at another Wikibase means constructing a different
//! value. `Default` targets Wikidata.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::ids::{EntityId, PropertyId};
use crate::template::Bindings;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WikibaseConfig {
    /// Query service the full result view opens in.
    pub query_service_url: String,
    /// Embeddable result view used as the popup iframe source.
    pub query_embed_url: String,
    /// Term prefix for entities, e.g. `wd:`.
    pub entity_prefix: String,
    /// Term prefix for direct-claim properties, e.g. `wdt:`.
    pub property_prefix: String,
    pub properties: KnownProperties,
    pub entities: KnownEntities,
    pub external_services: ExternalServices,
}

/// Property ids the built-in rules and templates refer to by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnownProperties {
    pub students_count: PropertyId,
    pub members_count: PropertyId,
    pub father: PropertyId,
    pub mother: PropertyId,
    pub sibling: PropertyId,
    pub spouse: PropertyId,
    pub occupation: PropertyId,
    pub employer: PropertyId,
    pub creator: PropertyId,
    pub image: PropertyId,
    pub logo: PropertyId,
    pub point_in_time: PropertyId,
}

/// Entity ids the value-level rules match against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnownEntities {
    pub painter: EntityId,
    pub researcher: EntityId,
}

/// Base URLs of external services the rules link out to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalServices {
    pub entitree: String,
    pub scholia: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field} URL {value:?}: {source}")]
    InvalidUrl {
        field: &'static str,
        value: String,
        source: url::ParseError,
    },
}

impl Default for WikibaseConfig {
    fn default() -> Self {
        let property = |raw: &str| PropertyId::parse(raw).expect("invalid builtin property id");
        let entity = |raw: &str| EntityId::parse(raw).expect("invalid builtin entity id");

        Self {
            query_service_url: "https://query.wikidata.org/".to_owned(),
            query_embed_url: "https://query.wikidata.org/embed.html".to_owned(),
            entity_prefix: "wd:".to_owned(),
            property_prefix: "wdt:".to_owned(),
            properties: KnownProperties {
                students_count: property("P2196"),
                members_count: property("P2124"),
                father: property("P22"),
                mother: property("P25"),
                sibling: property("P3373"),
                spouse: property("P26"),
                occupation: property("P106"),
                employer: property("P108"),
                creator: property("P170"),
                image: property("P18"),
                logo: property("P154"),
                point_in_time: property("P585"),
            },
            entities: KnownEntities {
                painter: entity("Q1028181"),
                researcher: entity("Q1650915"),
            },
            external_services: ExternalServices {
                entitree: "https://www.entitree.com/en/family_tree/".to_owned(),
                scholia: "https://scholia.toolforge.org/author/".to_owned(),
            },
        }
    }
}

impl WikibaseConfig {
    /// Check that every configured base URL actually parses, so broken
    /// configuration fails at startup instead of producing dead links.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let urls = [
            ("query service", &self.query_service_url),
            ("query embed", &self.query_embed_url),
            ("entitree", &self.external_services.entitree),
            ("scholia", &self.external_services.scholia),
        ];
        for (field, value) in urls {
            Url::parse(value).map_err(|source| ConfigError::InvalidUrl {
                field,
                value: value.clone(),
                source,
            })?;
        }
        Ok(())
    }

    /// The whole configuration surface as the first substitution layer:
    /// prefixes, the named property and entity constants, and the external
    /// service bases, keyed the way the query templates spell them.
    pub fn bindings(&self) -> Bindings {
        let p = &self.properties;
        let e = &self.entities;
        Bindings::new()
            .with("entityPrefix", &self.entity_prefix)
            .with("propertyPrefix", &self.property_prefix)
            .with("studentsCount", p.students_count.as_str())
            .with("membersCount", p.members_count.as_str())
            .with("father", p.father.as_str())
            .with("mother", p.mother.as_str())
            .with("sibling", p.sibling.as_str())
            .with("spouse", p.spouse.as_str())
            .with("occupation", p.occupation.as_str())
            .with("employer", p.employer.as_str())
            .with("creator", p.creator.as_str())
            .with("image", p.image.as_str())
            .with("logo", p.logo.as_str())
            .with("pointInTime", p.point_in_time.as_str())
            .with("painter", e.painter.as_str())
            .with("researcher", e.researcher.as_str())
            .with("entitree", &self.external_services.entitree)
            .with("scholia", &self.external_services.scholia)
    }
}
