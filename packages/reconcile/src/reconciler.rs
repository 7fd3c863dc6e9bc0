//! Dual-store reconciliation.
//!
//! Combines two independent existence checks over the same batch into a
//! four-way categorization keyed by record identity:
//!
//! | primary | secondary | bucket              |
//! |---------|-----------|---------------------|
//! | new     | new       | `completely_new`    |
//! | existing| new       | `in_primary_only`   |
//! | new     | existing  | `in_secondary_only` |
//! | existing| existing  | `in_both`           |
//!
//! Pure and synchronous: no I/O, no logging, diagnostics returned as data.
//! Matching is by identity-key equality, never object identity — the copy
//! of a record annotated by one store check is a different instance from
//! the copy annotated by the other, and both annotations must survive on
//! the merged output record.

use std::collections::{HashMap, HashSet};

use crate::identity::{resolve_identity, IdentityKey};
use crate::types::outcome::{ReconciledResult, StoreSide, Warning};
use crate::types::partition::ExistencePartition;
use crate::types::record::Record;

/// Identity-key view of one partition.
struct KeySets {
    existing_keys: HashSet<IdentityKey>,
    unidentifiable: Vec<Record>,
}

/// Reconcile two existence checks into the four-way categorization.
///
/// Never fails on dirty data: unidentifiable records are counted (once
/// each, even when both checks report the same keyless record) and
/// excluded, an identity key claimed as both new and existing by the same
/// partition is repaired to existing with a warning, and fail-open
/// (degraded) partitions flow through as "all new" naturally. Structural
/// validation of untyped payloads happens earlier, in
/// [`ExistencePartition::from_value`].
pub fn reconcile(primary: &ExistencePartition, secondary: &ExistencePartition) -> ReconciledResult {
    let mut warnings = Vec::new();

    let primary_keys = key_sets(primary, StoreSide::Primary, &mut warnings);
    let secondary_keys = key_sets(secondary, StoreSide::Secondary, &mut warnings);

    // One merged record per key: later (higher-precedence) copies win on
    // field conflicts, but no field present in any copy is lost. Ascending
    // precedence: secondary-new, secondary-existing, primary-new,
    // primary-existing — so the primary store's annotations take priority
    // while the secondary's (e.g. `zep_node_id`) still survive.
    let mut lookup: HashMap<IdentityKey, Record> = HashMap::new();
    let mut ordered_keys: Vec<IdentityKey> = Vec::new();
    for records in [
        &secondary.new_records,
        &secondary.existing_records,
        &primary.new_records,
        &primary.existing_records,
    ] {
        for record in records {
            let Some(key) = resolve_identity(record) else {
                continue;
            };
            match lookup.get_mut(&key) {
                Some(current) => {
                    let merged = Record::shallow_merge(record, current);
                    *current = merged;
                }
                None => {
                    lookup.insert(key.clone(), record.clone());
                    ordered_keys.push(key);
                }
            }
        }
    }

    // Both checks see the same batch, so a keyless record normally shows
    // up in both partitions. Count it once: de-duplicate by structural
    // equality (keyless records have no identity to match on).
    let mut unidentifiable: Vec<Record> = Vec::new();
    for record in primary_keys
        .unidentifiable
        .into_iter()
        .chain(secondary_keys.unidentifiable)
    {
        if !unidentifiable.contains(&record) {
            unidentifiable.push(record);
        }
    }

    let mut result = ReconciledResult {
        unidentifiable_records: unidentifiable.len(),
        ..Default::default()
    };

    for key in ordered_keys {
        let Some(record) = lookup.get(&key) else {
            warnings.push(Warning::MissingLookup { key });
            continue;
        };
        let record = record.clone();

        // A key absent from a partition's lists is treated as new on that
        // side, consistent with fail-open: unknown means not found. With
        // equal coverage this is exactly the set-intersection bucketing.
        let in_primary = primary_keys.existing_keys.contains(&key);
        let in_secondary = secondary_keys.existing_keys.contains(&key);

        match (in_primary, in_secondary) {
            (false, false) => result.completely_new.push(record),
            (true, false) => result.in_primary_only.push(record),
            (false, true) => result.in_secondary_only.push(record),
            (true, true) => result.in_both.push(record),
        }
    }

    if !result.in_secondary_only.is_empty() {
        warnings.push(Warning::SecondaryOnlyDrift {
            count: result.in_secondary_only.len(),
        });
    }

    result.warnings = warnings;
    result
}

/// Resolve one partition's record lists into identity-key sets.
///
/// A key claimed by both lists is kept as existing only (upstream contract
/// violation, repaired with a warning rather than failing the run).
fn key_sets(
    partition: &ExistencePartition,
    side: StoreSide,
    warnings: &mut Vec<Warning>,
) -> KeySets {
    let mut unidentifiable = Vec::new();

    let mut resolve_list = |records: &[Record]| -> HashSet<IdentityKey> {
        records
            .iter()
            .filter_map(|record| {
                let key = resolve_identity(record);
                if key.is_none() {
                    unidentifiable.push(record.clone());
                }
                key
            })
            .collect()
    };

    let new_keys = resolve_list(&partition.new_records);
    let existing_keys = resolve_list(&partition.existing_records);

    // Existing wins when a key is claimed by both lists; bucketing below
    // consults existing_keys only, so no removal from new_keys is needed.
    for key in new_keys.intersection(&existing_keys) {
        warnings.push(Warning::InconsistentPartition {
            side,
            key: key.clone(),
        });
    }

    KeySets {
        existing_keys,
        unidentifiable,
    }
}
