//! Entity-page snapshot parsing
//!
//! Materializes a rendered entity page once into plain data: the subject
//! reference from the title header, then every statement group with its
//! rendered values, in page order. The snapshot is read-only input for the
//! binding stage; nothing here touches the rule table.

use anyhow::{Context, Result, anyhow};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

use wikilens_core::{EntityId, EntityRef, PropertyId, PropertyRef};

static TITLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".wikibase-title").expect("invalid title selector"));
static TITLE_ID: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".wikibase-title-id").expect("invalid title id selector"));
static TITLE_LABEL: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".wikibase-title-label").expect("invalid title label selector"));
static GROUP: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".wikibase-statementgroupview").expect("invalid group selector"));
static GROUP_LABEL: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(".wikibase-statementgroupview-property-label")
        .expect("invalid group label selector")
});
static MAIN_SNAK: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(".wikibase-statementview-mainsnak-container .wikibase-snakview")
        .expect("invalid snak selector")
});
static SNAK_PROPERTY_LINK: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(".wikibase-snakview-property a").expect("invalid snak property selector")
});
static SNAK_VALUE: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".wikibase-snakview-value").expect("invalid snak value selector"));

/// One rendered statement value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedValue {
    /// Inner markup of the snak value element.
    pub html: String,
    /// Property rendered on the snak itself, when present; the group's
    /// property applies otherwise.
    pub property: Option<PropertyId>,
}

/// One statement group: a property plus its rendered values, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedGroup {
    pub property: PropertyRef,
    pub values: Vec<RenderedValue>,
}

/// Read-only snapshot of a rendered entity page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityPage {
    pub entity: EntityRef,
    pub groups: Vec<RenderedGroup>,
}

impl EntityPage {
    /// Parse the rendered page once. The only fatal case is a document that
    /// is not an entity page at all (no title header, or a title id the
    /// entity grammar rejects); a malformed statement group is skipped, not
    /// an error.
    pub fn parse(html: &str) -> Result<Self> {
        let document = Html::parse_document(html);

        let title = document
            .select(&TITLE)
            .next()
            .context("document has no wikibase title header")?;

        let raw_id: String = title
            .select(&TITLE_ID)
            .next()
            .map(|el| el.text().collect())
            .unwrap_or_default();
        // The title renders the id in parentheses, e.g. "(Q42)"
        let cleaned: String = raw_id
            .trim()
            .chars()
            .filter(|c| !matches!(c, '(' | ')'))
            .collect();
        let id = EntityId::parse(&cleaned)
            .ok_or_else(|| anyhow!("title id {raw_id:?} does not match the entity grammar"))?;

        let label: String = title
            .select(&TITLE_LABEL)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_owned())
            .unwrap_or_default();

        let groups = document
            .select(&GROUP)
            .filter_map(parse_group)
            .collect::<Vec<_>>();

        Ok(Self {
            entity: EntityRef::new(id, label),
            groups,
        })
    }
}

fn parse_group(group: ElementRef<'_>) -> Option<RenderedGroup> {
    let raw_id = group.value().attr("id").unwrap_or_default();
    let Some(pid) = PropertyId::parse(raw_id) else {
        log::debug!("skipping statement group with id {raw_id:?}");
        return None;
    };

    let label: String = group
        .select(&GROUP_LABEL)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_owned())
        .unwrap_or_default();

    let values = group
        .select(&MAIN_SNAK)
        .filter_map(|snak| {
            let value = snak.select(&SNAK_VALUE).next()?;
            let property = snak
                .select(&SNAK_PROPERTY_LINK)
                .next()
                .and_then(|link| link.value().attr("title"))
                .and_then(PropertyId::from_link_title);
            Some(RenderedValue {
                html: value.inner_html(),
                property,
            })
        })
        .collect();

    Some(RenderedGroup {
        property: PropertyRef::new(pid, label),
        values,
    })
}
