use std::cmp::Ordering;

use crate::data::models::{Deck, Tag};

/// Parses the requested tag names. `None` if any name is unknown, in which
/// case the whole filter matches nothing.
pub fn parse_tags(names: &[String]) -> Option<Vec<Tag>> {
    names.iter().map(|name| name.parse().ok()).collect()
}

/// Case-insensitive substring match on the title. Empty needles match
/// everything.
pub fn title_contains(deck: &Deck, needle: Option<&str>) -> bool {
    match needle.filter(|n| !n.is_empty()) {
        Some(needle) => deck.title.to_lowercase().contains(&needle.to_lowercase()),
        None => true,
    }
}

/// True when the deck carries every selected tag.
pub fn has_all_tags(deck: &Deck, selected: &[Tag]) -> bool {
    if selected.is_empty() {
        return true;
    }
    let tags = deck.tag_list();
    selected.iter().all(|tag| tags.contains(tag))
}

/// Browser order: most rated first, then by title.
pub fn browser_order(a: &Deck, b: &Deck) -> Ordering {
    b.rating_count
        .cmp(&a.rating_count)
        .then_with(|| a.title.cmp(&b.title))
        .then_with(|| a.id.cmp(&b.id))
}
