//! Resources library records
//!
//! The catalog is static and seeded at startup. Saved/pinned state is a
//! per-user overlay kept apart from the catalog.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::filter::{matches_eq, matches_search};

/// Ordered access levels. A caller may open a resource when their level is at
/// least the resource's level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessLevel {
    Public,
    Member,
    Premium,
    Enterprise,
}

impl AccessLevel {
    /// Whether a caller at this level may open a resource at `required`.
    pub fn allows(self, required: AccessLevel) -> bool {
        self >= required
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceCategory {
    Guide,
    Template,
    Regulation,
    MarketReport,
    Webinar,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceItem {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: ResourceCategory,
    #[serde(default)]
    pub tags: Vec<String>,
    pub access_level: AccessLevel,
    pub url: String,
    pub published_at: DateTime<Utc>,
}

/// A catalog entry as seen by a particular caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceView {
    #[serde(flatten)]
    pub item: ResourceItem,
    /// True when the caller's level is below the resource's level
    pub locked: bool,
    pub saved: bool,
    pub pinned: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResourceFilter {
    pub search: Option<String>,
    pub category: Option<ResourceCategory>,
    pub tag: Option<String>,
    /// Hide entries above the caller's level instead of marking them locked
    #[serde(default)]
    pub accessible_only: bool,
}

impl ResourceFilter {
    pub fn matches(&self, item: &ResourceItem, level: AccessLevel) -> bool {
        if self.accessible_only && !level.allows(item.access_level) {
            return false;
        }
        let tag_ok = self.tag.as_deref().map(str::trim).is_none_or(|wanted| {
            wanted.is_empty() || item.tags.iter().any(|t| t.eq_ignore_ascii_case(wanted))
        });
        tag_ok
            && matches_eq(self.category.as_ref(), &item.category)
            && matches_search(
                self.search.as_deref(),
                [item.title.as_str(), item.description.as_str()]
                    .into_iter()
                    .chain(item.tags.iter().map(String::as_str)),
            )
    }
}

/// Per-user saved/pinned overlay entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedResource {
    pub resource_id: String,
    #[serde(default)]
    pub pinned: bool,
    pub saved_at: DateTime<Utc>,
}

/// Pinned entries first, then most recently saved.
pub fn sort_saved(saved: &mut [SavedResource]) {
    saved.sort_by(|a, b| b.pinned.cmp(&a.pinned).then(b.saved_at.cmp(&a.saved_at)));
}
