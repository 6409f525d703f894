//! Duplicate resolution over incident keys.
//!
//! Pairs are folded into a union-find so that chains such as (A, B), (B, C)
//! collapse into one group whatever order the list is in. Each group keeps a
//! single survivor:
//!
//! - the member that is kept by some pair and absorbed by none
//! - otherwise (ties, cycles) the smallest such candidate, or the smallest
//!   member when every member is absorbed somewhere
//!
//! Existing member records are folded into the survivor in the order survivor
//! first, then ascending key. When the survivor id has no record of its own,
//! the first existing member is renamed to it.

use std::collections::{BTreeMap, BTreeSet};

use incident_model::{
    ConflictWarning, DedupSummary, DuplicatePair, DuplicateResolutionWarning, IncidentKey,
    IncidentRecord,
};
use tracing::{debug, info, info_span, warn};

use crate::merge::reconcile;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DedupOutcome {
    pub records: BTreeMap<IncidentKey, IncidentRecord>,
    pub summary: DedupSummary,
    /// Conflicts raised while folding duplicates; each names the absorbed key.
    pub conflicts: Vec<ConflictWarning>,
}

#[derive(Debug, Default)]
struct UnionFind {
    parent: BTreeMap<IncidentKey, IncidentKey>,
}

impl UnionFind {
    fn find(&mut self, key: &IncidentKey) -> IncidentKey {
        let mut root = key.clone();
        while let Some(parent) = self.parent.get(&root) {
            if parent == &root {
                break;
            }
            root = parent.clone();
        }
        let mut current = key.clone();
        while current != root {
            let next = self
                .parent
                .insert(current, root.clone())
                .unwrap_or_else(|| root.clone());
            current = next;
        }
        root
    }

    fn union(&mut self, left: &IncidentKey, right: &IncidentKey) {
        self.parent
            .entry(left.clone())
            .or_insert_with(|| left.clone());
        self.parent
            .entry(right.clone())
            .or_insert_with(|| right.clone());
        let left_root = self.find(left);
        let right_root = self.find(right);
        if left_root == right_root {
            return;
        }
        // Smaller key becomes the root so group identity is order independent.
        if left_root < right_root {
            self.parent.insert(right_root, left_root);
        } else {
            self.parent.insert(left_root, right_root);
        }
    }

    fn groups(mut self) -> BTreeMap<IncidentKey, BTreeSet<IncidentKey>> {
        let keys: Vec<IncidentKey> = self.parent.keys().cloned().collect();
        let mut groups: BTreeMap<IncidentKey, BTreeSet<IncidentKey>> = BTreeMap::new();
        for key in keys {
            let root = self.find(&key);
            groups.entry(root).or_default().insert(key);
        }
        groups
    }
}

/// Applies the duplicate list to merged records.
pub fn deduplicate(
    mut records: BTreeMap<IncidentKey, IncidentRecord>,
    pairs: &[DuplicatePair],
) -> DedupOutcome {
    let _span = info_span!("dedup", pairs = pairs.len()).entered();
    let mut summary = DedupSummary {
        pairs: pairs.len(),
        ..DedupSummary::default()
    };
    let mut warnings = BTreeSet::new();
    let mut orphaned = BTreeSet::new();
    let mut kept_ids = BTreeSet::new();
    let mut absorbed_ids = BTreeSet::new();
    let mut union_find = UnionFind::default();

    for pair in pairs {
        if pair.is_self_pair() {
            warnings.insert(DuplicateResolutionWarning::SelfPair {
                key: pair.kept.clone(),
            });
            continue;
        }
        let kept_exists = records.contains_key(&pair.kept);
        let absorbed_exists = records.contains_key(&pair.absorbed);
        let (kept, absorbed) = (pair.kept.clone(), pair.absorbed.clone());
        match (kept_exists, absorbed_exists) {
            (true, true) => {}
            (false, true) => {
                orphaned.insert(absorbed.clone());
                warnings.insert(DuplicateResolutionWarning::MissingKept { kept, absorbed });
            }
            (true, false) => {
                warnings.insert(DuplicateResolutionWarning::MissingAbsorbed { kept, absorbed });
            }
            (false, false) => {
                warnings.insert(DuplicateResolutionWarning::MissingBoth { kept, absorbed });
            }
        }
        kept_ids.insert(pair.kept.clone());
        absorbed_ids.insert(pair.absorbed.clone());
        union_find.union(&pair.kept, &pair.absorbed);
    }

    let mut conflicts = Vec::new();
    for members in union_find.groups().into_values() {
        let candidates: Vec<IncidentKey> = members
            .iter()
            .filter(|key| kept_ids.contains(*key) && !absorbed_ids.contains(*key))
            .cloned()
            .collect();
        let survivor = match candidates.as_slice() {
            [only] => only.clone(),
            _ => {
                let pool: Vec<IncidentKey> = if candidates.is_empty() {
                    members.iter().cloned().collect()
                } else {
                    candidates
                };
                let Some(chosen) = pool.first().cloned() else {
                    continue;
                };
                warnings.insert(DuplicateResolutionWarning::AmbiguousSurvivor {
                    candidates: pool,
                    chosen: chosen.clone(),
                });
                chosen
            }
        };

        let order = std::iter::once(survivor.clone())
            .chain(members.iter().filter(|key| **key != survivor).cloned());
        let mut base: Option<IncidentRecord> = None;
        for key in order {
            let Some(record) = records.remove(&key) else {
                continue;
            };
            if base.is_none() {
                let mut record = record;
                if record.key() != &survivor {
                    debug!(from = %key, to = %survivor, "promoted record to survivor id");
                    record.rename(survivor.clone());
                    summary.promoted += 1;
                }
                base = Some(record);
                continue;
            }
            let Some(target) = base.as_mut() else {
                continue;
            };
            debug!(survivor = %survivor, absorbed = %key, "absorbed duplicate record");
            let fields = target.take_identity(record);
            for (field, value) in fields {
                if let Some(conflict) = reconcile(target, &field, value, Some(&key)) {
                    conflicts.push(conflict);
                }
            }
            summary.absorbed += 1;
        }
        if let Some(record) = base {
            records.insert(survivor, record);
        }
    }

    summary.warnings = warnings.into_iter().collect();
    summary.orphaned = orphaned.into_iter().collect();
    for warning in &summary.warnings {
        warn!(message = %warning.message(), "duplicate list");
    }
    conflicts.sort();
    info!(
        absorbed = summary.absorbed,
        promoted = summary.promoted,
        warnings = summary.warnings.len(),
        records = records.len(),
        "deduplicated records"
    );
    DedupOutcome {
        records,
        summary,
        conflicts,
    }
}
