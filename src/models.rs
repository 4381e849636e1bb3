//! Normalized records written to the index files.
//!
//! Each record is the flattened, single-valued form of one raw resource:
//! every locale, version, or generation spread has been reduced to one
//! canonical value and every reference object to a bare name or id.

use serde::{Deserialize, Serialize};

/// One entry of an item's `held_by_pokemon`, restricted to a single release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeldByPokemon {
    pub pokemon: String,
    pub rarity: u32,
}

/// Normalized item. Keyed in the index by its API slug, while `name` holds
/// the display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRecord {
    pub id: u32,
    pub name: String,
    pub cost: Option<u32>,
    pub fling_power: Option<u32>,
    pub fling_effect: Option<String>,
    pub attributes: Vec<String>,
    pub category: String,
    pub effect: Option<String>,
    pub short_effect: Option<String>,
    pub flavour_text_entry: Option<String>,
    pub game_index: Option<u32>,
    pub held_by_pokemon: Vec<HeldByPokemon>,
    /// Root species of the evolution chain this item triggers. `None` when
    /// the item triggers nothing or the chain could not be found.
    pub baby_trigger_for: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComboMove {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComboSet {
    pub use_before: Option<Vec<ComboMove>>,
    pub use_after: Option<Vec<ComboMove>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContestCombos {
    pub normal: Option<ComboSet>,
    #[serde(rename = "super")]
    pub super_: Option<ComboSet>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineRef {
    pub machine: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveMeta {
    pub ailment: String,
    pub category: String,
    pub min_hits: Option<u32>,
    pub max_hits: Option<u32>,
    pub min_turns: Option<u32>,
    pub max_turns: Option<u32>,
    pub drain: i32,
    pub healing: i32,
    pub crit_rate: u32,
    pub ailment_chance: u32,
    pub flinch_chance: u32,
    pub stat_chance: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatChange {
    pub change: i32,
    pub stat: String,
}

/// Normalized move, keyed in the index by its API slug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    pub id: u32,
    pub name: String,
    pub accuracy: Option<u32>,
    pub effect_chance: Option<u32>,
    pub pp: Option<u32>,
    pub priority: i32,
    pub power: Option<u32>,
    pub contest_combos: Option<ContestCombos>,
    pub contest_type: Option<String>,
    pub contest_effect: Option<u32>,
    pub super_contest_effect: Option<u32>,
    pub damage_class: Option<String>,
    pub effect: Option<String>,
    pub short_effect: Option<String>,
    pub flavor_text: Option<String>,
    pub machines: Vec<MachineRef>,
    pub meta: Option<MoveMeta>,
    pub stat_changes: Vec<StatChange>,
    pub target: String,
    #[serde(rename = "type")]
    pub type_: String,
}
