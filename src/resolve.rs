//! Reference resolver.
//!
//! Three patterns:
//!
//! 1. Teaching machines: a machine item's compatible machine in the target
//!    version group is fetched and its move becomes the item's effect text,
//!    `"Teaches <Move Name> to a compatible Pokémon."`.
//! 2. Baby-trigger species: the evolution chain is fetched and replaced by
//!    the name of its root species.
//! 3. Meta ids: contest-effect, super-contest-effect and machine ids are
//!    parsed out of the reference URL with no fetch.
//!
//! A secondary fetch answering 404 skips that substitution only. Any other
//! failure is fatal.

use tracing::{debug, warn};

use crate::error::DexError;
use crate::models::ItemRecord;
use crate::normalize::{machines_in_group, FieldRules};
use crate::raw::{RawEvolutionChain, RawItem, RawMachine};
use crate::source::{fetch_as, ResourceKind, ResourceRef, Source};

/// Numeric id from the `/<segment>/<digits>/` part of a reference URL.
pub fn extract_id(url: &str, segment: &str) -> Result<u32, DexError> {
    let malformed = || DexError::MalformedReference {
        url: url.to_string(),
        segment: segment.to_string(),
    };

    let marker = format!("/{}/", segment);
    let start = url.find(&marker).ok_or_else(malformed)? + marker.len();
    let rest = &url[start..];
    let end = rest.find('/').ok_or_else(malformed)?;
    let digits = &rest[..end];
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }
    digits.parse().map_err(|_| malformed())
}

/// Move slug to display form: hyphens become spaces and every letter that
/// follows a non-letter is upper-cased, the rest lower-cased.
pub fn title_case(slug: &str) -> String {
    let mut out = String::with_capacity(slug.len());
    let mut prev_is_letter = false;
    for c in slug.chars() {
        let c = if c == '-' { ' ' } else { c };
        if c.is_alphabetic() {
            if prev_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(c);
            prev_is_letter = false;
        }
    }
    out
}

pub fn teaching_sentence(move_slug: &str) -> String {
    format!("Teaches {} to a compatible Pokémon.", title_case(move_slug))
}

/// Move taught by the machine behind `machine_url`, or `None` on 404.
pub fn machine_move(source: &dyn Source, machine_url: &str) -> Result<Option<String>, DexError> {
    let id = extract_id(machine_url, "machine")?;
    let machine: Option<RawMachine> =
        fetch_as(source, &ResourceRef::id(ResourceKind::Machine, id))?;
    Ok(machine.map(|m| m.move_.name))
}

/// Root species of the chain behind `chain_url`, or `None` on 404.
pub fn chain_root_species(
    source: &dyn Source,
    chain_url: &str,
) -> Result<Option<String>, DexError> {
    let id = extract_id(chain_url, "evolution-chain")?;
    let chain: Option<RawEvolutionChain> =
        fetch_as(source, &ResourceRef::id(ResourceKind::EvolutionChain, id))?;
    Ok(chain.map(|c| c.chain.species.name))
}

/// Fill the reference-backed fields of a normalized item in place.
///
/// Every matching machine is resolved in source order; the last one that
/// resolves sets the effect text, overwriting the item's own entries.
pub fn resolve_item(
    source: &dyn Source,
    raw: &RawItem,
    record: &mut ItemRecord,
    rules: &FieldRules,
) -> Result<(), DexError> {
    for entry in machines_in_group(&raw.machines, &rules.machine_version_group) {
        match machine_move(source, &entry.machine.url)? {
            Some(move_slug) => {
                let sentence = teaching_sentence(&move_slug);
                debug!(item = %raw.name, %move_slug, "resolved teaching machine");
                record.effect = Some(sentence.clone());
                record.short_effect = Some(sentence);
            }
            None => warn!(item = %raw.name, url = %entry.machine.url, "machine not found"),
        }
    }

    if let Some(trigger) = &raw.baby_trigger_for {
        match chain_root_species(source, &trigger.url)? {
            Some(species) => record.baby_trigger_for = Some(species),
            None => warn!(item = %raw.name, url = %trigger.url, "evolution chain not found"),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemorySource;
    use serde_json::json;

    const BASE: &str = "https://pokeapi.co/api/v2";

    #[test]
    fn extract_id_reads_segment() {
        assert_eq!(
            extract_id("https://pokeapi.co/api/v2/machine/123/", "machine").unwrap(),
            123
        );
        assert_eq!(
            extract_id(
                "https://pokeapi.co/api/v2/super-contest-effect/14/",
                "super-contest-effect"
            )
            .unwrap(),
            14
        );
    }

    #[test]
    fn extract_id_does_not_match_longer_segment() {
        let err = extract_id(
            "https://pokeapi.co/api/v2/super-contest-effect/14/",
            "contest-effect",
        )
        .unwrap_err();
        assert!(matches!(err, DexError::MalformedReference { .. }));
    }

    #[test]
    fn extract_id_rejects_missing_trailing_slash_and_empty_digits() {
        assert!(extract_id("https://pokeapi.co/api/v2/machine/12", "machine").is_err());
        assert!(extract_id("https://pokeapi.co/api/v2/machine//", "machine").is_err());
    }

    #[test]
    fn title_case_matches_display_names() {
        assert_eq!(title_case("dragon-claw"), "Dragon Claw");
        assert_eq!(title_case("u-turn"), "U Turn");
        assert_eq!(title_case("solarbeam"), "Solarbeam");
    }

    #[test]
    fn sentence_for_dragon_claw() {
        assert_eq!(
            teaching_sentence("dragon-claw"),
            "Teaches Dragon Claw to a compatible Pokémon."
        );
    }

    #[test]
    fn machine_move_absent_on_404() {
        let source = MemorySource::new(BASE);
        let got = machine_move(&source, "https://pokeapi.co/api/v2/machine/9/").unwrap();
        assert!(got.is_none());
    }

    #[test]
    fn chain_root_is_first_species() {
        let mut source = MemorySource::new(BASE);
        source.insert(
            &ResourceRef::id(ResourceKind::EvolutionChain, 140),
            json!({
                "id": 140,
                "chain": {
                    "species": { "name": "azurill", "url": "" },
                    "evolves_to": [{ "species": { "name": "marill", "url": "" } }]
                }
            }),
        );
        let root =
            chain_root_species(&source, "https://pokeapi.co/api/v2/evolution-chain/140/").unwrap();
        assert_eq!(root.as_deref(), Some("azurill"));
    }
}
