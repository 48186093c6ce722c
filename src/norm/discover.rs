use std::collections::BTreeSet;

use crate::data::FieldStore;
use crate::norm::{MEAN_SUFFIX, NormKey, STD_SUFFIX};

/// Base names that carry both stamped scale fields somewhere in `batches`.
///
/// The check runs on the union of field names, so the pair may be split
/// across batches.
pub fn discover_norm_keys<S: FieldStore>(batches: &[S]) -> BTreeSet<NormKey> {
    let names: BTreeSet<&str> = batches.iter().flat_map(|b| b.field_names()).collect();
    let with_mean: BTreeSet<&str> = names
        .iter()
        .filter_map(|n| n.strip_suffix(MEAN_SUFFIX))
        .collect();
    names
        .iter()
        .filter_map(|n| n.strip_suffix(STD_SUFFIX))
        .filter(|base| with_mean.contains(base))
        .map(NormKey::from)
        .collect()
}

#[cfg(test)]
#[path = "../../tests/src_inline/norm/discover.rs"]
mod tests;
