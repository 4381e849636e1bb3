//! Typed shapes of the PokéAPI resources the pipeline reads.
//!
//! Only the fields the normalizer consumes are declared; everything else in
//! the response (sprites, `past_values`, `learned_by_pokemon`, ...) is
//! dropped at decode time. Collections default to empty so a resource that
//! omits one still decodes.

use serde::Deserialize;

/// `{ "name": ..., "url": ... }` pointer to another resource.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct NamedRef {
    pub name: String,
    #[serde(default)]
    pub url: String,
}

/// `{ "url": ... }` pointer without a name.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct UrlRef {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LocalizedName {
    pub name: String,
    pub language: NamedRef,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EffectEntry {
    #[serde(default)]
    pub effect: String,
    #[serde(default)]
    pub short_effect: String,
    pub language: NamedRef,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GameIndex {
    pub game_index: u32,
    pub generation: NamedRef,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ItemFlavorText {
    pub text: String,
    pub language: NamedRef,
    pub version_group: NamedRef,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MoveFlavorText {
    pub flavor_text: String,
    pub language: NamedRef,
    pub version_group: NamedRef,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HeldBy {
    pub pokemon: NamedRef,
    #[serde(default)]
    pub version_details: Vec<HeldByVersion>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HeldByVersion {
    pub rarity: u32,
    pub version: NamedRef,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MachineEntry {
    pub machine: UrlRef,
    pub version_group: NamedRef,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawItem {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub cost: Option<u32>,
    #[serde(default)]
    pub fling_power: Option<u32>,
    #[serde(default)]
    pub fling_effect: Option<NamedRef>,
    #[serde(default)]
    pub attributes: Vec<NamedRef>,
    pub category: NamedRef,
    #[serde(default)]
    pub effect_entries: Vec<EffectEntry>,
    #[serde(default)]
    pub flavor_text_entries: Vec<ItemFlavorText>,
    #[serde(default)]
    pub game_indices: Vec<GameIndex>,
    #[serde(default)]
    pub held_by_pokemon: Vec<HeldBy>,
    #[serde(default)]
    pub baby_trigger_for: Option<UrlRef>,
    #[serde(default)]
    pub machines: Vec<MachineEntry>,
    #[serde(default)]
    pub names: Vec<LocalizedName>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawComboSet {
    #[serde(default)]
    pub use_before: Option<Vec<NamedRef>>,
    #[serde(default)]
    pub use_after: Option<Vec<NamedRef>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawContestCombos {
    #[serde(default)]
    pub normal: Option<RawComboSet>,
    #[serde(default, rename = "super")]
    pub super_: Option<RawComboSet>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawMoveMeta {
    pub ailment: NamedRef,
    pub category: NamedRef,
    #[serde(default)]
    pub min_hits: Option<u32>,
    #[serde(default)]
    pub max_hits: Option<u32>,
    #[serde(default)]
    pub min_turns: Option<u32>,
    #[serde(default)]
    pub max_turns: Option<u32>,
    #[serde(default)]
    pub drain: i32,
    #[serde(default)]
    pub healing: i32,
    #[serde(default)]
    pub crit_rate: u32,
    #[serde(default)]
    pub ailment_chance: u32,
    #[serde(default)]
    pub flinch_chance: u32,
    #[serde(default)]
    pub stat_chance: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawStatChange {
    pub change: i32,
    pub stat: NamedRef,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawMove {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub accuracy: Option<u32>,
    #[serde(default)]
    pub effect_chance: Option<u32>,
    #[serde(default)]
    pub pp: Option<u32>,
    #[serde(default)]
    pub priority: i32,
    #[serde(default)]
    pub power: Option<u32>,
    #[serde(default)]
    pub contest_combos: Option<RawContestCombos>,
    #[serde(default)]
    pub contest_type: Option<NamedRef>,
    #[serde(default)]
    pub contest_effect: Option<UrlRef>,
    #[serde(default)]
    pub super_contest_effect: Option<UrlRef>,
    #[serde(default)]
    pub damage_class: Option<NamedRef>,
    #[serde(default)]
    pub effect_entries: Vec<EffectEntry>,
    #[serde(default)]
    pub flavor_text_entries: Vec<MoveFlavorText>,
    #[serde(default)]
    pub generation: Option<NamedRef>,
    #[serde(default)]
    pub machines: Vec<MachineEntry>,
    #[serde(default)]
    pub meta: Option<RawMoveMeta>,
    #[serde(default)]
    pub stat_changes: Vec<RawStatChange>,
    pub target: NamedRef,
    #[serde(rename = "type")]
    pub type_: NamedRef,
}

/// A teaching machine: which move it teaches.
#[derive(Debug, Clone, Deserialize)]
pub struct RawMachine {
    #[serde(rename = "move")]
    pub move_: NamedRef,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawEvolutionChain {
    pub chain: RawChainLink,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawChainLink {
    pub species: NamedRef,
}
