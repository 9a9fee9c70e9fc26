//! Display names derived from file identifiers.
//!
//! Used only when neither the entry's name cache nor its persisted name
//! field has anything to offer. Pure string work, no store access.

use std::path::Path;

use crate::store::PlatformClass;

/// Strip `(...)` and `[...]` groups, innermost-first, then trim trailing
/// spaces. A group is removed only when both its opening and closing
/// character are present; unbalanced remainders stay untouched. Idempotent.
pub fn remove_parenthesis(input: &str) -> String {
    let mut ret = input.to_string();
    const PAIRS: [(char, char); 2] = [('(', ')'), ('[', ']')];

    let mut done = false;
    while !done {
        done = true;
        for (open, close) in PAIRS {
            if let Some(end) = ret.find(close) {
                if let Some(start) = ret[..=end].rfind(open) {
                    ret.replace_range(start..=end, "");
                    done = false;
                }
            }
        }
    }

    ret.trim_end_matches(' ').to_string()
}

/// Derive a display name from a filesystem-style identifier.
///
/// Generic platforms: file stem with release tags stripped. Arcade-class
/// platforms use short set names (`sf2`, `mslug`) that carry no readable
/// title, so those go through the canonical-name table instead.
pub fn clean_entry_name(file_id: &str, platform: PlatformClass) -> String {
    let stem = Path::new(file_id)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    match platform {
        PlatformClass::Arcade | PlatformClass::NeoGeo => clean_mame_name(&stem),
        PlatformClass::Generic => remove_parenthesis(&stem),
    }
}

/// Canonical titles for well-known arcade set names, sorted by set name.
/// Unknown sets fall back to the raw stem.
static ARCADE_NAMES: &[(&str, &str)] = &[
    ("1942", "1942"),
    ("altbeast", "Altered Beast"),
    ("contra", "Contra"),
    ("dino", "Cadillacs and Dinosaurs"),
    ("dkong", "Donkey Kong"),
    ("galaga", "Galaga"),
    ("gauntlet", "Gauntlet"),
    ("ghouls", "Ghouls'n Ghosts"),
    ("kof98", "The King of Fighters '98"),
    ("mk", "Mortal Kombat"),
    ("mslug", "Metal Slug"),
    ("mslug2", "Metal Slug 2"),
    ("outrun", "Out Run"),
    ("pacman", "Pac-Man"),
    ("puckman", "PuckMan"),
    ("raiden", "Raiden"),
    ("samsho", "Samurai Shodown"),
    ("sf2", "Street Fighter II: The World Warrior"),
    ("sf2ce", "Street Fighter II': Champion Edition"),
    ("simpsons", "The Simpsons"),
    ("ssriders", "Sunset Riders"),
    ("tmnt", "Teenage Mutant Ninja Turtles"),
    ("xmen", "X-Men"),
];

pub fn clean_mame_name(stem: &str) -> String {
    match ARCADE_NAMES.binary_search_by_key(&stem, |&(set, _)| set) {
        Ok(idx) => ARCADE_NAMES[idx].1.to_string(),
        Err(_) => stem.to_string(),
    }
}
