//! Two-stage page binding
//!
//! The original page is decorated in two ordered stages: the title
//! affordance needs only the rendered page, while statement processing is
//! gated on the structured record arriving. [`PageBinder`] makes that
//! dependency explicit: construct it from a parsed snapshot, call
//! [`title_attachments`](PageBinder::title_attachments) immediately, and
//! [`statement_attachments`](PageBinder::statement_attachments) once the
//! record is available.

use serde::Serialize;

use wikilens_core::{
    Affordance, Bindings, Dispatcher, EntityRecord, EntityRef, RuleTable, WikibaseConfig, extract,
};

use crate::page::EntityPage;

/// Where the UI layer should attach an affordance. Indexes address the
/// snapshot's groups and values, which are in page order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "at", rename_all = "snake_case")]
pub enum Anchor {
    /// The entity id next to the page title.
    EntityTitle,
    /// The property label of a statement group.
    PropertyLabel { group: usize },
    /// The snak indicator area of a single value.
    ValueIndicator { group: usize, value: usize },
}

/// One affordance bound to its place on the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attachment {
    pub anchor: Anchor,
    pub affordance: Affordance,
}

pub struct PageBinder<'a> {
    dispatcher: Dispatcher<'a>,
    page: &'a EntityPage,
}

impl<'a> PageBinder<'a> {
    pub fn new(config: &'a WikibaseConfig, rules: &'a RuleTable, page: &'a EntityPage) -> Self {
        Self {
            dispatcher: Dispatcher::new(config, rules),
            page,
        }
    }

    pub fn entity(&self) -> &EntityRef {
        &self.page.entity
    }

    /// Stage one: affordances derivable from the rendered page alone, i.e.
    /// the entity-graph popup at the title. `overrides` supplies runtime
    /// bindings such as `userLanguage`.
    pub fn title_attachments(&self, overrides: &Bindings) -> Vec<Attachment> {
        vec![Attachment {
            anchor: Anchor::EntityTitle,
            affordance: self.dispatcher.entity_graph(&self.page.entity, overrides),
        }]
    }

    /// Stage two: statement affordances, gated on the structured record.
    ///
    /// Groups are visited in page order and values in rendered order, so
    /// attaching the output sequentially keeps the UI deterministic. A value
    /// that fails extraction degrades to no affordance; it never stops the
    /// walk.
    pub fn statement_attachments(&self, record: &EntityRecord) -> Vec<Attachment> {
        let subject = &self.page.entity;
        let mut attachments = Vec::new();

        for (group_index, group) in self.page.groups.iter().enumerate() {
            for affordance in self.dispatcher.for_property(subject, &group.property.id) {
                attachments.push(Attachment {
                    anchor: Anchor::PropertyLabel { group: group_index },
                    affordance,
                });
            }

            for (value_index, value) in group.values.iter().enumerate() {
                // The snak's own property refines the datatype lookup; rule
                // dispatch stays keyed by the group's property.
                let lookup_pid = value.property.as_ref().unwrap_or(&group.property.id);
                let extracted = extract(&value.html, record, lookup_pid);

                for affordance in
                    self.dispatcher
                        .for_value(subject, &group.property.id, &extracted)
                {
                    attachments.push(Attachment {
                        anchor: Anchor::ValueIndicator {
                            group: group_index,
                            value: value_index,
                        },
                        affordance,
                    });
                }
            }
        }

        attachments
    }
}
