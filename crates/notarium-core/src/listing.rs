//! Filtered, sorted listings over the in-memory collections.
//!
//! Pure functions; the view layer calls these on every render with whatever
//! query and sort key the user selected.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::models::{Folder, Note};

/// Listing sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    DateAsc,
    #[default]
    DateDesc,
    AlphaAsc,
    AlphaDesc,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DateAsc => "date-asc",
            Self::DateDesc => "date-desc",
            Self::AlphaAsc => "alpha-asc",
            Self::AlphaDesc => "alpha-desc",
        }
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SortKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "date-asc" => Ok(Self::DateAsc),
            "date-desc" => Ok(Self::DateDesc),
            "alpha-asc" => Ok(Self::AlphaAsc),
            "alpha-desc" => Ok(Self::AlphaDesc),
            other => Err(Error::InvalidInput(format!("unknown sort key: {other}"))),
        }
    }
}

/// An item that can appear in a filtered, sorted listing.
pub trait Listed {
    /// Name used for alphabetic ordering.
    fn display_name(&self) -> &str;

    /// Text fields searched by the substring filter.
    fn search_haystacks(&self) -> Vec<&str>;

    fn created_at(&self) -> DateTime<Utc>;
}

impl Listed for Folder {
    fn display_name(&self) -> &str {
        &self.name
    }

    fn search_haystacks(&self) -> Vec<&str> {
        vec![&self.name]
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Listed for Note {
    fn display_name(&self) -> &str {
        &self.title
    }

    fn search_haystacks(&self) -> Vec<&str> {
        vec![&self.title, &self.content]
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Filter by case-insensitive substring, then sort.
///
/// An empty (or whitespace-only) query keeps every item. Equal-key ordering
/// follows the underlying sort and is not otherwise guaranteed.
pub fn filter_and_sort<T: Listed + Clone>(items: &[T], query: &str, sort: SortKey) -> Vec<T> {
    let needle = query.trim().to_lowercase();

    let mut out: Vec<T> = if needle.is_empty() {
        items.to_vec()
    } else {
        items
            .iter()
            .filter(|item| {
                item.search_haystacks()
                    .iter()
                    .any(|hay| hay.to_lowercase().contains(&needle))
            })
            .cloned()
            .collect()
    };

    match sort {
        SortKey::DateAsc => out.sort_by_key(|item| item.created_at()),
        SortKey::DateDesc => out.sort_by(|a, b| b.created_at().cmp(&a.created_at())),
        SortKey::AlphaAsc => out.sort_by(|a, b| compare_names(a.display_name(), b.display_name())),
        SortKey::AlphaDesc => out.sort_by(|a, b| compare_names(b.display_name(), a.display_name())),
    }

    out
}

// Case-insensitive Unicode comparison; equal lowercased names fall back to
// the raw byte order so the result is deterministic.
fn compare_names(a: &str, b: &str) -> std::cmp::Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}
