//! The rule table and dispatcher
//!
//! A static mapping from (property, value) pairs to query templates and
//! presentation metadata, built once from the configuration and never
//! mutated. Absence from the table is ordinary control flow: a statement no
//! rule matches simply gets no affordance.

use crate::config::WikibaseConfig;
use crate::ids::{EntityId, PropertyId};
use crate::template::{self, Bindings};
use crate::types::{Affordance, AffordanceAction, EntityRef, ExtractedValue};

const STUDENTS_COUNT_QUERY: &str = r#"#defaultView:LineChart
SELECT ?pit ?s_count WHERE {
  {entityPrefix}{entityQid} p:{studentsCount} ?statement.
  ?statement ps:{studentsCount} ?s_count.
  OPTIONAL { ?statement pq:{pointInTime} ?pit. }
}"#;

const MEMBERS_COUNT_QUERY: &str = r#"#defaultView:LineChart
SELECT ?pit ?s_count WHERE {
  {entityPrefix}{entityQid} p:{membersCount} ?statement.
  ?statement ps:{membersCount} ?s_count.
  OPTIONAL { ?statement pq:{pointInTime} ?pit. }
}"#;

const ARTWORKS_QUERY: &str = r#"#defaultView:ImageGrid
SELECT ?item ?creator ?creatorLabel ?image WHERE {
  SERVICE wikibase:label { bd:serviceParam wikibase:language "[AUTO_LANGUAGE],en". }
  ?item {propertyPrefix}{creator} {entityPrefix}{entityQid}.
  OPTIONAL { ?item {propertyPrefix}{image} ?image. }
}
LIMIT 100"#;

const EMPLOYER_QUERY: &str = r#"#defaultView:Graph
SELECT DISTINCT ?employee ?employeeLabel ?imageEmp ?org ?orgLabel ?imageOrg WHERE {
  SERVICE wikibase:label { bd:serviceParam wikibase:language "[AUTO_LANGUAGE],en". }
  VALUES ?org {
    {entityPrefix}{targetEntityQid}
  }
  ?employee {propertyPrefix}{employer} ?org.
  OPTIONAL { ?employee {propertyPrefix}{image} ?imageEmp. }
  OPTIONAL { ?org {propertyPrefix}{logo} ?imageOrg. }
}
LIMIT 100"#;

const ENTITY_GRAPH_QUERY: &str = r#"#defaultView:Graph
SELECT ?node ?nodeLabel ?nodeImage ?childNode ?childNodeLabel ?childNodeImage ?rgb WHERE {
  {
    BIND({entityPrefix}{entityQid} AS ?node)
    ?node ?p ?i.
    OPTIONAL { ?node {propertyPrefix}{image} ?nodeImage. }
    ?childNode ?x ?p.
    ?childNode rdf:type wikibase:Property.
    FILTER(STRSTARTS(STR(?i), "http://www.wikidata.org/entity/Q"))
    FILTER(STRSTARTS(STR(?childNode), "http://www.wikidata.org/entity/P"))
  }
  UNION
  {
    BIND("EFFBD8" AS ?rgb)
    {entityPrefix}{entityQid} ?p ?childNode.
    OPTIONAL { ?childNode {propertyPrefix}{image} ?childNodeImage. }
    ?node ?x ?p.
    ?node rdf:type wikibase:Property.
    FILTER(STRSTARTS(STR(?childNode), "http://www.wikidata.org/entity/Q"))
  }
  OPTIONAL {
    ?node {propertyPrefix}{image} ?nodeImage.
    ?childNode {propertyPrefix}{image} ?childNodeImage.
  }
  SERVICE wikibase:label { bd:serviceParam wikibase:language "{userLanguage}". }
}"#;

const ENTITREE_LINK: &str = "{entitree}{entityQid}?0u0=u&0u1=u";
const SCHOLIA_LINK: &str = "{scholia}{entityQid}";

/// Where a rule fires relative to a statement group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleScope {
    /// Once per statement group, anchored at the property label, independent
    /// of how many values the group renders.
    Property,
    /// Once per qualifying snak. `Some(id)` requires the resolved value to
    /// be that entity; `None` matches any snak that produced a query term.
    Value { entity: Option<EntityId> },
}

/// What a firing rule produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleAction {
    /// Embedded query-service view rendered from a query template; the popup
    /// title is itself a template.
    Popup {
        template: &'static str,
        title: &'static str,
    },
    /// Direct hyperlink to an external service; the URL is a template too.
    Link { url: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presentation {
    /// OOUI icon name.
    pub icon: &'static str,
    pub tooltip: &'static str,
}

/// One entry of the rule table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRule {
    pub property: PropertyId,
    pub scope: RuleScope,
    pub action: RuleAction,
    pub presentation: Presentation,
}

/// Read-only rule set, keyed first by property, optionally refined by value.
#[derive(Debug, Clone)]
pub struct RuleTable {
    rules: Vec<QueryRule>,
}

impl RuleTable {
    /// The built-in rules, wired to the configured property and entity ids.
    pub fn builtin(config: &WikibaseConfig) -> Self {
        let p = &config.properties;
        let e = &config.entities;
        let mut rules = Vec::new();

        rules.push(QueryRule {
            property: p.students_count.clone(),
            scope: RuleScope::Property,
            action: RuleAction::Popup {
                template: STUDENTS_COUNT_QUERY,
                title: r#"Students count of "{entityLabel}" over time:"#,
            },
            presentation: Presentation {
                icon: "ellipsis",
                tooltip: "Students count over time",
            },
        });

        rules.push(QueryRule {
            property: p.members_count.clone(),
            scope: RuleScope::Property,
            action: RuleAction::Popup {
                template: MEMBERS_COUNT_QUERY,
                title: "Members count of {entityLabel} over time:",
            },
            presentation: Presentation {
                icon: "ellipsis",
                tooltip: "Members count over time",
            },
        });

        for family in [&p.father, &p.mother, &p.sibling, &p.spouse] {
            rules.push(QueryRule {
                property: (*family).clone(),
                scope: RuleScope::Property,
                action: RuleAction::Link { url: ENTITREE_LINK },
                presentation: Presentation {
                    icon: "articleDisambiguation",
                    tooltip: "Familytree on Entitree",
                },
            });
        }

        rules.push(QueryRule {
            property: p.occupation.clone(),
            scope: RuleScope::Value {
                entity: Some(e.painter.clone()),
            },
            action: RuleAction::Popup {
                template: ARTWORKS_QUERY,
                title: "Artworks by {entityLabel}",
            },
            presentation: Presentation {
                icon: "ellipsis",
                tooltip: "Artworks by this painter in Wikimedia Commons",
            },
        });

        rules.push(QueryRule {
            property: p.occupation.clone(),
            scope: RuleScope::Value {
                entity: Some(e.researcher.clone()),
            },
            action: RuleAction::Link { url: SCHOLIA_LINK },
            presentation: Presentation {
                icon: "articleSearch",
                tooltip: "Page on Scholia",
            },
        });

        rules.push(QueryRule {
            property: p.employer.clone(),
            scope: RuleScope::Value { entity: None },
            action: RuleAction::Popup {
                template: EMPLOYER_QUERY,
                title: "100 other employees of {targetLabel}",
            },
            presentation: Presentation {
                icon: "ellipsis",
                tooltip: "Other employees of this organization as graph",
            },
        });

        Self { rules }
    }

    pub fn rules(&self) -> &[QueryRule] {
        &self.rules
    }
}

/// Resolves statements against the rule table, harvests the bindings from
/// the statement context and renders the resulting affordances.
pub struct Dispatcher<'a> {
    config: &'a WikibaseConfig,
    rules: &'a RuleTable,
    base: Bindings,
}

impl<'a> Dispatcher<'a> {
    pub fn new(config: &'a WikibaseConfig, rules: &'a RuleTable) -> Self {
        let base = config.bindings();
        Self {
            config,
            rules,
            base,
        }
    }

    /// Rules attached to the property label itself, fired once per
    /// statement group regardless of value count.
    pub fn for_property(&self, subject: &EntityRef, pid: &PropertyId) -> Vec<Affordance> {
        let local = subject_bindings(subject);
        self.rules
            .rules()
            .iter()
            .filter(|rule| rule.scope == RuleScope::Property && rule.property == *pid)
            .map(|rule| self.fire(rule, &local, &Bindings::new()))
            .collect()
    }

    /// Rules keyed by (property, resolved value), fired once per qualifying
    /// snak. Values without a query term never qualify.
    pub fn for_value(
        &self,
        subject: &EntityRef,
        pid: &PropertyId,
        value: &ExtractedValue,
    ) -> Vec<Affordance> {
        let Some(term) = value.query_term() else {
            return Vec::new();
        };

        let mut local = subject_bindings(subject);
        local.set("targetEntityQid", term);
        if let Some(label) = value.label() {
            local.set("targetLabel", label);
        }

        self.rules
            .rules()
            .iter()
            .filter(|rule| {
                rule.property == *pid
                    && match &rule.scope {
                        RuleScope::Property => false,
                        RuleScope::Value { entity: None } => true,
                        RuleScope::Value { entity: Some(id) } => value.entity_id() == Some(id),
                    }
            })
            .map(|rule| self.fire(rule, &local, &Bindings::new()))
            .collect()
    }

    /// Graph popup for the page subject itself. `overrides` supplies runtime
    /// bindings the configuration cannot know, such as `userLanguage`.
    pub fn entity_graph(&self, subject: &EntityRef, overrides: &Bindings) -> Affordance {
        let local = subject_bindings(subject);
        self.build(
            &RuleAction::Popup {
                template: ENTITY_GRAPH_QUERY,
                title: "Entity Graph of {entityLabel}",
            },
            &Presentation {
                icon: "ellipsis",
                tooltip: "Click to see entity graph",
            },
            &[&self.base, &local, overrides],
        )
    }

    fn fire(&self, rule: &QueryRule, local: &Bindings, overrides: &Bindings) -> Affordance {
        self.build(
            &rule.action,
            &rule.presentation,
            &[&self.base, local, overrides],
        )
    }

    fn build(
        &self,
        action: &RuleAction,
        presentation: &Presentation,
        layers: &[&Bindings],
    ) -> Affordance {
        let action = match action {
            RuleAction::Popup { template, title } => {
                let querystring =
                    template::encode_for_transport(&template::render(template, layers));
                AffordanceAction::Popup {
                    href: format!("{}{}", self.config.query_service_url, querystring),
                    embed: format!("{}{}", self.config.query_embed_url, querystring),
                    title: template::render(title, layers),
                }
            }
            RuleAction::Link { url } => AffordanceAction::Link {
                href: template::render(url, layers),
            },
        };
        Affordance {
            action,
            icon: presentation.icon.to_owned(),
            tooltip: presentation.tooltip.to_owned(),
        }
    }
}

fn subject_bindings(subject: &EntityRef) -> Bindings {
    Bindings::new()
        .with("entityQid", subject.id.as_str())
        .with("entityLabel", subject.label.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LiteralKind;

    fn setup() -> (WikibaseConfig, RuleTable) {
        let config = WikibaseConfig::default();
        let rules = RuleTable::builtin(&config);
        (config, rules)
    }

    fn subject() -> EntityRef {
        EntityRef::new(EntityId::parse("Q5").unwrap(), "Example Human")
    }

    fn entity_value(id: &str, label: &str) -> ExtractedValue {
        ExtractedValue::Entity {
            id: EntityId::parse(id).unwrap(),
            label: label.to_owned(),
        }
    }

    fn decoded_query(affordance: &Affordance) -> String {
        match &affordance.action {
            AffordanceAction::Popup { href, .. } => {
                let fragment = href.split('#').nth(1).expect("no fragment");
                urlencoding::decode(fragment).unwrap().into_owned()
            }
            AffordanceAction::Link { .. } => panic!("expected popup"),
        }
    }

    #[test]
    fn students_count_fires_at_property_level() {
        let (config, rules) = setup();
        let dispatcher = Dispatcher::new(&config, &rules);
        let pid = config.properties.students_count.clone();

        let affordances = dispatcher.for_property(&subject(), &pid);
        assert_eq!(affordances.len(), 1);

        let query = decoded_query(&affordances[0]);
        assert!(query.contains("wd:Q5 p:P2196 ?statement."));
        assert!(query.contains("pq:P585"));
        match &affordances[0].action {
            AffordanceAction::Popup { title, .. } => {
                assert_eq!(title, "Students count of \"Example Human\" over time:");
            }
            _ => panic!("expected popup"),
        }
    }

    #[test]
    fn family_properties_link_to_entitree() {
        let (config, rules) = setup();
        let dispatcher = Dispatcher::new(&config, &rules);

        for pid in [
            &config.properties.father,
            &config.properties.mother,
            &config.properties.sibling,
            &config.properties.spouse,
        ] {
            let affordances = dispatcher.for_property(&subject(), pid);
            assert_eq!(affordances.len(), 1, "no rule for {pid}");
            assert_eq!(
                affordances[0].action,
                AffordanceAction::Link {
                    href: "https://www.entitree.com/en/family_tree/Q5?0u0=u&0u1=u".to_owned()
                }
            );
        }
    }

    #[test]
    fn unknown_property_fires_nothing() {
        let (config, rules) = setup();
        let dispatcher = Dispatcher::new(&config, &rules);
        let pid = PropertyId::parse("P31").unwrap();
        assert!(dispatcher.for_property(&subject(), &pid).is_empty());
        assert!(
            dispatcher
                .for_value(&subject(), &pid, &entity_value("Q5", "human"))
                .is_empty()
        );
    }

    #[test]
    fn painter_occupation_fires_the_painter_rule_only() {
        let (config, rules) = setup();
        let dispatcher = Dispatcher::new(&config, &rules);
        let occupation = config.properties.occupation.clone();

        let affordances =
            dispatcher.for_value(&subject(), &occupation, &entity_value("Q1028181", "painter"));
        assert_eq!(affordances.len(), 1);
        assert_eq!(
            affordances[0].tooltip,
            "Artworks by this painter in Wikimedia Commons"
        );
        let query = decoded_query(&affordances[0]);
        assert!(query.contains("?item wdt:P170 wd:Q5."));
    }

    #[test]
    fn researcher_occupation_links_to_scholia() {
        let (config, rules) = setup();
        let dispatcher = Dispatcher::new(&config, &rules);
        let occupation = config.properties.occupation.clone();

        let affordances = dispatcher.for_value(
            &subject(),
            &occupation,
            &entity_value("Q1650915", "researcher"),
        );
        assert_eq!(affordances.len(), 1);
        assert_eq!(
            affordances[0].action,
            AffordanceAction::Link {
                href: "https://scholia.toolforge.org/author/Q5".to_owned()
            }
        );
    }

    #[test]
    fn unrecognized_occupation_fires_no_rule() {
        let (config, rules) = setup();
        let dispatcher = Dispatcher::new(&config, &rules);
        let occupation = config.properties.occupation.clone();

        let affordances =
            dispatcher.for_value(&subject(), &occupation, &entity_value("Q937", "physicist"));
        assert!(affordances.is_empty());
    }

    #[test]
    fn employer_fires_for_any_entity_value() {
        let (config, rules) = setup();
        let dispatcher = Dispatcher::new(&config, &rules);
        let employer = config.properties.employer.clone();

        let affordances =
            dispatcher.for_value(&subject(), &employer, &entity_value("Q95", "Google"));
        assert_eq!(affordances.len(), 1);

        let query = decoded_query(&affordances[0]);
        assert_eq!(query.matches("wd:Q95").count(), 1);
        assert!(query.contains("?employee wdt:P108 ?org."));
        match &affordances[0].action {
            AffordanceAction::Popup { title, href, .. } => {
                assert_eq!(title, "100 other employees of Google");
                assert!(href.starts_with("https://query.wikidata.org/#"));
            }
            _ => panic!("expected popup"),
        }
    }

    #[test]
    fn value_rules_skip_values_without_a_term() {
        let (config, rules) = setup();
        let dispatcher = Dispatcher::new(&config, &rules);
        let employer = config.properties.employer.clone();

        let monolingual = ExtractedValue::StringLiteral {
            label: "text".to_owned(),
            term: None,
        };
        assert!(
            dispatcher
                .for_value(&subject(), &employer, &monolingual)
                .is_empty()
        );
        assert!(
            dispatcher
                .for_value(&subject(), &employer, &ExtractedValue::Unresolved)
                .is_empty()
        );
    }

    #[test]
    fn typed_literal_terms_pass_through_value_rules() {
        let (config, rules) = setup();
        let dispatcher = Dispatcher::new(&config, &rules);
        let employer = config.properties.employer.clone();

        let quantity = ExtractedValue::TypedLiteral {
            kind: LiteralKind::Quantity,
            raw: "42".to_owned(),
            label: "42".to_owned(),
        };
        let affordances = dispatcher.for_value(&subject(), &employer, &quantity);
        assert_eq!(affordances.len(), 1);
        assert!(decoded_query(&affordances[0]).contains("wd:42"));
    }

    #[test]
    fn entity_graph_popup_takes_the_user_language_override() {
        let (config, rules) = setup();
        let dispatcher = Dispatcher::new(&config, &rules);

        let overrides = Bindings::new().with("userLanguage", "de");
        let affordance = dispatcher.entity_graph(&subject(), &overrides);
        let query = decoded_query(&affordance);
        assert!(query.contains("wikibase:language \"de\""));
        assert!(query.contains("BIND(wd:Q5 AS ?node)"));
        match &affordance.action {
            AffordanceAction::Popup { title, embed, .. } => {
                assert_eq!(title, "Entity Graph of Example Human");
                assert!(embed.starts_with("https://query.wikidata.org/embed.html#"));
            }
            _ => panic!("expected popup"),
        }
    }

    #[test]
    fn overrides_never_shadow_configuration() {
        let (config, rules) = setup();
        let dispatcher = Dispatcher::new(&config, &rules);

        let overrides = Bindings::new()
            .with("entityPrefix", "evil:")
            .with("userLanguage", "en");
        let query = decoded_query(&dispatcher.entity_graph(&subject(), &overrides));
        assert!(query.contains("wd:Q5"));
        assert!(!query.contains("evil:"));
    }
}
