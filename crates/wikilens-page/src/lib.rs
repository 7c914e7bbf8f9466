//! # wikilens-page
//!
//! The page binder: consumes a rendered Wikibase entity page plus its
//! structured record and produces [`Attachment`] descriptors saying which
//! link or popup to attach, and where. Rendering the actual widgets is the
//! caller's business.
//!
//! ## Example
//!
//! ```
//! use wikilens_core::{Bindings, EntityRecord, RuleTable, WikibaseConfig};
//! use wikilens_page::{EntityPage, PageBinder};
//!
//! # fn main() -> anyhow::Result<()> {
//! let html = r#"
//!     <div class="wikibase-title">
//!         <span class="wikibase-title-label">Douglas Adams</span>
//!         <span class="wikibase-title-id">(Q42)</span>
//!     </div>
//! "#;
//!
//! let config = WikibaseConfig::default();
//! let rules = RuleTable::builtin(&config);
//!
//! // Stage one: the page is rendered
//! let page = EntityPage::parse(html)?;
//! let binder = PageBinder::new(&config, &rules, &page);
//! let title = binder.title_attachments(&Bindings::new().with("userLanguage", "en"));
//! assert_eq!(title.len(), 1);
//!
//! // Stage two: the structured record arrived
//! let record = EntityRecord::from_str(r#"{ "claims": {} }"#)?;
//! let statements = binder.statement_attachments(&record);
//! assert!(statements.is_empty());
//! # Ok(())
//! # }
//! ```

pub mod bind;
pub mod page;

pub use bind::{Anchor, Attachment, PageBinder};
pub use page::{EntityPage, RenderedGroup, RenderedValue};
