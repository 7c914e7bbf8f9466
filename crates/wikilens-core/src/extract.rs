//! Value extraction from rendered statement markup
//!
//! The rendered markup is the primary signal: it is already there and
//! carries the entity link for the common case. It is lossy for non-entity
//! datatypes, so the structured record is a fallback oracle consulted only
//! when the markup is ambiguous. A failed record lookup degrades the one
//! value to [`ExtractedValue::Unresolved`]; it never aborts the page.

use once_cell::sync::Lazy;
use scraper::{Html, Selector};

use crate::ids::{EntityId, PropertyId};
use crate::record::{Datavalue, EntityRecord};
use crate::types::{ExtractedValue, LiteralKind};

static ANCHOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a").expect("invalid anchor selector"));
static MONOLINGUAL: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(".wb-monolingualtext-value").expect("invalid monolingual selector")
});

/// Determine the semantic identity of one rendered statement value.
///
/// Strict priority, first match wins:
/// 1. a hyperlink whose `title` matches the entity grammar (label suffix
///    stripped);
/// 2. with no hyperlink, a monolingual-text sub-element;
/// 3. the record's datatype at `pid`: time and quantity become typed
///    literals, anything else falls back to the plain text in quotes.
pub fn extract(value_html: &str, record: &EntityRecord, pid: &PropertyId) -> ExtractedValue {
    let fragment = Html::parse_fragment(value_html);

    if let Some(link) = fragment.select(&ANCHOR).next() {
        if let Some(id) = link
            .value()
            .attr("title")
            .and_then(EntityId::from_link_title)
        {
            let label = link.text().collect::<String>().trim().to_owned();
            return ExtractedValue::Entity { id, label };
        }
        // A link the entity grammar rejects (media files, sitelinks) tells
        // us nothing; the record decides like any other non-entity value.
        return from_record(&fragment, record, pid);
    }

    if let Some(mono) = fragment.select(&MONOLINGUAL).next() {
        return ExtractedValue::StringLiteral {
            label: mono.inner_html(),
            term: None,
        };
    }

    from_record(&fragment, record, pid)
}

fn from_record(fragment: &Html, record: &EntityRecord, pid: &PropertyId) -> ExtractedValue {
    match record.main_datavalue(pid) {
        Ok(Datavalue::Time(time)) => ExtractedValue::TypedLiteral {
            kind: LiteralKind::Time,
            raw: time,
            label: fragment.root_element().inner_html(),
        },
        Ok(Datavalue::Quantity(amount)) => ExtractedValue::TypedLiteral {
            kind: LiteralKind::Quantity,
            raw: amount,
            label: fragment.root_element().inner_html(),
        },
        Ok(Datavalue::Other) => {
            let text = fragment
                .root_element()
                .text()
                .collect::<String>()
                .trim()
                .to_owned();
            ExtractedValue::StringLiteral {
                term: Some(format!("\"{text}\"")),
                label: text,
            }
        }
        Err(err) => {
            log::warn!("could not resolve datavalue for {pid}: {err}");
            ExtractedValue::Unresolved
        }
    }
}
