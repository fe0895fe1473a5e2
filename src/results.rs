//! Result grouping engine
//!
//! Turns the flat query list of a response into per-platform groups for
//! display. Platforms appear in first-seen order, queries keep their arrival
//! order inside a group, and every query gets a global index counted over the
//! grouped traversal. The index only drives reveal timing and card keys; it
//! is not stored on the query.

use std::collections::HashMap;
use std::time::Duration;

use crate::api::SearchQuery;
use crate::platform::{self, BadgeStyle};

/// Key of a rendered card's interaction state
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CardKey {
    pub platform: String,
    pub index: usize,
}

impl CardKey {
    pub fn new(platform: impl Into<String>, index: usize) -> Self {
        Self {
            platform: platform.into(),
            index,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupedItem<'a> {
    pub query: &'a SearchQuery,
    /// Zero-based position in the grouped traversal
    pub index: usize,
}

impl GroupedItem<'_> {
    pub fn key(&self) -> CardKey {
        CardKey::new(self.query.platform.clone(), self.index)
    }

    /// Delay before this card is revealed, saturating at `Duration::MAX`
    pub fn reveal_delay(&self, stagger: Duration) -> Duration {
        u32::try_from(self.index)
            .ok()
            .and_then(|n| stagger.checked_mul(n))
            .unwrap_or(Duration::MAX)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformGroup<'a> {
    pub platform: &'a str,
    pub label: &'a str,
    pub badge: BadgeStyle,
    pub items: Vec<GroupedItem<'a>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GroupedResults<'a> {
    groups: Vec<PlatformGroup<'a>>,
}

/// Group queries by platform
pub fn group_queries(queries: &[SearchQuery]) -> GroupedResults<'_> {
    let mut groups: Vec<PlatformGroup<'_>> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for query in queries {
        let platform = query.platform.as_str();
        let pos = *positions.entry(platform).or_insert_with(|| {
            groups.push(PlatformGroup {
                platform,
                label: platform::label_for(platform),
                badge: platform::badge_for(platform),
                items: Vec::new(),
            });
            groups.len() - 1
        });
        groups[pos].items.push(GroupedItem { query, index: 0 });
    }

    // Indices follow the grouped traversal, not arrival order
    let mut next = 0;
    for group in &mut groups {
        for item in &mut group.items {
            item.index = next;
            next += 1;
        }
    }

    GroupedResults { groups }
}

impl<'a> GroupedResults<'a> {
    pub fn groups(&self) -> &[PlatformGroup<'a>] {
        &self.groups
    }

    /// Total number of grouped queries
    pub fn len(&self) -> usize {
        self.groups.iter().map(|g| g.items.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// All items in grouped traversal order
    pub fn items(&self) -> impl Iterator<Item = &GroupedItem<'a>> {
        self.groups.iter().flat_map(|g| g.items.iter())
    }

    /// Look up an item by its global index
    pub fn item(&self, index: usize) -> Option<&GroupedItem<'a>> {
        self.items().find(|item| item.index == index)
    }
}
