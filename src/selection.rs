//! Generation-based inclusion policy.
//!
//! A record belongs in the target dataset when the FIRST entry of its
//! generation-membership list, in the order the source returned it, is one
//! of the target generations. Later entries are never consulted, even if
//! they match. An empty membership list is not eligible.

use crate::raw::{RawItem, RawMove};

/// First-entry rule over an ordered membership list.
pub fn is_eligible<'a, I>(generations: I, targets: &[String]) -> bool
where
    I: IntoIterator<Item = &'a str>,
{
    match generations.into_iter().next() {
        Some(first) => targets.iter().any(|t| t == first),
        None => false,
    }
}

/// Items carry one membership per generation in `game_indices`.
pub fn item_is_eligible(raw: &RawItem, targets: &[String]) -> bool {
    is_eligible(
        raw.game_indices.iter().map(|g| g.generation.name.as_str()),
        targets,
    )
}

/// Moves carry a single introducing generation.
pub fn move_is_eligible(raw: &RawMove, targets: &[String]) -> bool {
    is_eligible(raw.generation.iter().map(|g| g.name.as_str()), targets)
}
