//! Field normalizer: reduces multi-valued raw fields to canonical values.
//!
//! Selection rules, applied per field:
//!
//! | Rule | Fields | Tie-break |
//! |------|--------|-----------|
//! | Locale match | display name, effect, short effect | last match in source order wins |
//! | Locale + version group, with fallback | flavor text | first group in the fallback list with a match; last match within that group |
//! | Generation match | game index | last match in source order wins |
//! | Name substitution | attributes, category, stats, types, targets, ailments | n/a |
//! | Version filter | held-by, machines | keep every match, drop the tag |
//!
//! References that need a secondary fetch (machine teaching sentence,
//! baby-trigger species) are left unset here and filled in by
//! [`crate::resolve`].

use crate::config::{ItemsConfig, MovesConfig};
use crate::error::DexError;
use crate::models::{
    ComboMove, ComboSet, ContestCombos, HeldByPokemon, ItemRecord, MachineRef, MoveMeta,
    MoveRecord, StatChange,
};
use crate::raw::{
    EffectEntry, GameIndex, HeldBy, MachineEntry, NamedRef, RawComboSet, RawItem, RawMove,
};
use crate::resolve::extract_id;

/// Per-pipeline locale and version targets.
#[derive(Debug, Clone)]
pub struct FieldRules {
    pub language: String,
    /// Tried in order; the first group with a matching entry wins.
    pub flavor_version_groups: Vec<String>,
    pub machine_version_group: String,
    /// Release version for `held_by_pokemon`. Unused for moves.
    pub held_version: Option<String>,
}

impl From<&ItemsConfig> for FieldRules {
    fn from(config: &ItemsConfig) -> Self {
        Self {
            language: config.language.clone(),
            flavor_version_groups: config.flavor_version_groups.clone(),
            machine_version_group: config.machine_version_group.clone(),
            held_version: Some(config.held_version.clone()),
        }
    }
}

impl From<&MovesConfig> for FieldRules {
    fn from(config: &MovesConfig) -> Self {
        Self {
            language: config.language.clone(),
            flavor_version_groups: config.flavor_version_groups.clone(),
            machine_version_group: config.machine_version_group.clone(),
            held_version: None,
        }
    }
}

/// Last entry satisfying `pred`, scanning in source order.
fn last_match<'a, T>(entries: &'a [T], pred: impl Fn(&'a T) -> bool) -> Option<&'a T> {
    let mut selected = None;
    for entry in entries {
        if pred(entry) {
            selected = Some(entry);
        }
    }
    selected
}

/// Effect entry for `language`.
pub fn localized_effect<'a>(
    entries: &'a [EffectEntry],
    language: &str,
) -> Option<&'a EffectEntry> {
    last_match(entries, |e| e.language.name == language)
}

/// Flavor text for `language`, walking `groups` as an ordered fallback list.
///
/// `key` projects an entry to `(text, language, version_group)`.
pub fn flavor_with_fallback<'a, T>(
    entries: &'a [T],
    language: &str,
    groups: &[String],
    key: impl Fn(&'a T) -> (&'a str, &'a str, &'a str),
) -> Option<&'a str> {
    groups.iter().find_map(|group| {
        last_match(entries, |e| {
            let (_, lang, vg) = key(e);
            lang == language && vg == group.as_str()
        })
        .map(|e| key(e).0)
    })
}

/// Game index recorded for `generation`.
pub fn game_index_for(indices: &[GameIndex], generation: &str) -> Option<u32> {
    last_match(indices, |g| g.generation.name == generation).map(|g| g.game_index)
}

/// Holders in the given release version, in source order.
pub fn held_in_version(held_by: &[HeldBy], version: &str) -> Vec<HeldByPokemon> {
    held_by
        .iter()
        .flat_map(|holder| {
            holder
                .version_details
                .iter()
                .filter(move |d| d.version.name == version)
                .map(move |d| HeldByPokemon {
                    pokemon: holder.pokemon.name.clone(),
                    rarity: d.rarity,
                })
        })
        .collect()
}

/// Machine entries for one version group, in source order.
pub fn machines_in_group<'a>(
    machines: &'a [MachineEntry],
    version_group: &'a str,
) -> impl Iterator<Item = &'a MachineEntry> {
    machines
        .iter()
        .filter(move |m| m.version_group.name == version_group)
}

fn names(refs: &[NamedRef]) -> Vec<String> {
    refs.iter().map(|r| r.name.clone()).collect()
}

/// Normalize an item. `baby_trigger_for` is left unset and machine items
/// keep their own effect text until [`crate::resolve::resolve_item`] runs.
pub fn normalize_item(raw: &RawItem, rules: &FieldRules) -> ItemRecord {
    let display_name = last_match(&raw.names, |n| n.language.name == rules.language)
        .map(|n| n.name.clone())
        .unwrap_or_else(|| raw.name.clone());

    let effect = localized_effect(&raw.effect_entries, &rules.language);

    let flavour_text_entry = flavor_with_fallback(
        &raw.flavor_text_entries,
        &rules.language,
        &rules.flavor_version_groups,
        |e| {
            (
                e.text.as_str(),
                e.language.name.as_str(),
                e.version_group.name.as_str(),
            )
        },
    )
    .map(str::to_string);

    // Index under the generation that made the item eligible.
    let game_index = raw
        .game_indices
        .first()
        .and_then(|first| game_index_for(&raw.game_indices, &first.generation.name));

    let held_by_pokemon = match &rules.held_version {
        Some(version) => held_in_version(&raw.held_by_pokemon, version),
        None => Vec::new(),
    };

    ItemRecord {
        id: raw.id,
        name: display_name,
        cost: raw.cost,
        fling_power: raw.fling_power,
        fling_effect: raw.fling_effect.as_ref().map(|f| f.name.clone()),
        attributes: names(&raw.attributes),
        category: raw.category.name.clone(),
        effect: effect.map(|e| e.effect.clone()),
        short_effect: effect.map(|e| e.short_effect.clone()),
        flavour_text_entry,
        game_index,
        held_by_pokemon,
        baby_trigger_for: None,
    }
}

fn combo_moves(refs: &Option<Vec<NamedRef>>) -> Option<Vec<ComboMove>> {
    refs.as_ref().map(|list| {
        list.iter()
            .map(|r| ComboMove {
                name: r.name.clone(),
            })
            .collect()
    })
}

fn combo_set(raw: &Option<RawComboSet>) -> Option<ComboSet> {
    raw.as_ref().map(|set| ComboSet {
        use_before: combo_moves(&set.use_before),
        use_after: combo_moves(&set.use_after),
    })
}

/// Normalize a move. Meta ids are read straight from their reference URLs,
/// so a malformed URL fails the whole record.
pub fn normalize_move(raw: &RawMove, rules: &FieldRules) -> Result<MoveRecord, DexError> {
    let effect = localized_effect(&raw.effect_entries, &rules.language);

    let flavor_text = flavor_with_fallback(
        &raw.flavor_text_entries,
        &rules.language,
        &rules.flavor_version_groups,
        |e| {
            (
                e.flavor_text.as_str(),
                e.language.name.as_str(),
                e.version_group.name.as_str(),
            )
        },
    )
    .map(str::to_string);

    let machines = machines_in_group(&raw.machines, &rules.machine_version_group)
        .map(|m| extract_id(&m.machine.url, "machine").map(|machine| MachineRef { machine }))
        .collect::<Result<Vec<_>, _>>()?;

    let contest_effect = raw
        .contest_effect
        .as_ref()
        .map(|r| extract_id(&r.url, "contest-effect"))
        .transpose()?;
    let super_contest_effect = raw
        .super_contest_effect
        .as_ref()
        .map(|r| extract_id(&r.url, "super-contest-effect"))
        .transpose()?;

    let meta = raw.meta.as_ref().map(|m| MoveMeta {
        ailment: m.ailment.name.clone(),
        category: m.category.name.clone(),
        min_hits: m.min_hits,
        max_hits: m.max_hits,
        min_turns: m.min_turns,
        max_turns: m.max_turns,
        drain: m.drain,
        healing: m.healing,
        crit_rate: m.crit_rate,
        ailment_chance: m.ailment_chance,
        flinch_chance: m.flinch_chance,
        stat_chance: m.stat_chance,
    });

    let contest_combos = raw.contest_combos.as_ref().map(|c| ContestCombos {
        normal: combo_set(&c.normal),
        super_: combo_set(&c.super_),
    });

    Ok(MoveRecord {
        id: raw.id,
        name: raw.name.clone(),
        accuracy: raw.accuracy,
        effect_chance: raw.effect_chance,
        pp: raw.pp,
        priority: raw.priority,
        power: raw.power,
        contest_combos,
        contest_type: raw.contest_type.as_ref().map(|r| r.name.clone()),
        contest_effect,
        super_contest_effect,
        damage_class: raw.damage_class.as_ref().map(|r| r.name.clone()),
        effect: effect.map(|e| e.effect.clone()),
        short_effect: effect.map(|e| e.short_effect.clone()),
        flavor_text,
        machines,
        meta,
        stat_changes: raw
            .stat_changes
            .iter()
            .map(|s| StatChange {
                change: s.change,
                stat: s.stat.name.clone(),
            })
            .collect(),
        target: raw.target.name.clone(),
        type_: raw.type_.name.clone(),
    })
}
