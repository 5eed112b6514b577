//! Cross-source merge.
//!
//! Names are compared case-sensitively. On a collision the entry whose
//! provenance ranks higher wins (descriptor files beat the search path), so
//! the result does not depend on the order sources are registered in. Two
//! sources of equal rank keep the earlier one.

use crate::entry::{EntryData, EntryMap};
use std::collections::btree_map::Entry;

pub fn merge<I>(outputs: I) -> EntryMap
where
    I: IntoIterator<Item = EntryMap>,
{
    let mut merged = EntryMap::new();
    for output in outputs {
        for (name, data) in output {
            match merged.entry(name) {
                Entry::Vacant(slot) => {
                    slot.insert(data);
                }
                Entry::Occupied(mut slot) => {
                    if outranks(&data, slot.get()) {
                        tracing::trace!(
                            "{} from {} replaces {}",
                            slot.key(),
                            data.provenance.as_str(),
                            slot.get().provenance.as_str()
                        );
                        slot.insert(data);
                    }
                }
            }
        }
    }
    merged
}

fn outranks(candidate: &EntryData, held: &EntryData) -> bool {
    candidate.provenance.precedence() > held.provenance.precedence()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::Provenance;

    fn map(entries: &[(&str, &str, &str, Provenance)]) -> EntryMap {
        entries
            .iter()
            .map(|(name, command, description, provenance)| {
                (
                    name.to_string(),
                    EntryData {
                        command: command.to_string(),
                        description: description.to_string(),
                        provenance: *provenance,
                    },
                )
            })
            .collect()
    }

    #[test]
    fn manifest_wins_regardless_of_source_order() {
        let manifest = map(&[("code", "code", "Code Editor", Provenance::Manifest)]);
        let path = map(&[
            ("code", "code", "Command line tool", Provenance::PathScan),
            ("curl", "curl", "Command line tool", Provenance::PathScan),
        ]);

        let forward = merge([manifest.clone(), path.clone()]);
        let backward = merge([path, manifest]);
        assert_eq!(forward, backward);
        assert_eq!(forward["code"].description, "Code Editor");
        assert_eq!(forward["code"].provenance, Provenance::Manifest);
        assert_eq!(forward.len(), 2);
    }

    #[test]
    fn names_differing_in_case_stay_distinct() {
        let manifest = map(&[("Firefox", "firefox", "Web Browser", Provenance::Manifest)]);
        let path = map(&[("firefox", "firefox", "Command line tool", Provenance::PathScan)]);
        let merged = merge([manifest, path]);
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn equal_rank_keeps_first() {
        let a = map(&[("tool", "a", "first", Provenance::PathScan)]);
        let b = map(&[("tool", "b", "second", Provenance::PathScan)]);
        assert_eq!(merge([a, b])["tool"].command, "a");
    }
}
