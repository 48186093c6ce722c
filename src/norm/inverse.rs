use std::collections::BTreeSet;

use crate::data::FieldStore;
use crate::norm::affine::Direction;
use crate::norm::{
    NormError, NormKey, NormalizedField, ScaleParams, SideTensors, discover_norm_keys,
};

/// Maps every normalized field of `batches` back to physical units in place,
/// along with any entry of `side` stored under the same key.
///
/// All fields are resolved and checked before anything is written, so an
/// error leaves `batches` and `side` untouched. A side tensor is scaled once,
/// with the parameters stamped on the first batch. Returns the keys that
/// were transformed.
pub fn denormalize_batch<S: FieldStore>(
    batches: &mut [S],
    side: &mut SideTensors,
) -> Result<BTreeSet<NormKey>, NormError> {
    let keys = discover_norm_keys(batches);
    apply_strict(batches, side, &keys, Direction::Denormalize)?;
    Ok(keys)
}

/// Applies `direction` to every `(key, batch)` pair, key-major then
/// batch-major, after validating all of them. Returns the side-tensor keys
/// that were transformed.
pub(crate) fn apply_strict<S: FieldStore>(
    batches: &mut [S],
    side: &mut SideTensors,
    keys: &BTreeSet<NormKey>,
    direction: Direction,
) -> Result<Vec<NormKey>, NormError> {
    for key in keys {
        for batch in batches.iter() {
            NormalizedField::resolve(batch, key)?;
        }
        if let (Some(extra), Some(first)) = (side.get(key.as_str()), batches.first()) {
            ScaleParams::resolve(first, key)?.check(key, extra)?;
        }
    }

    let mut side_keys = Vec::new();
    for key in keys {
        for (index, batch) in batches.iter_mut().enumerate() {
            let (updated, extra) = {
                let field = NormalizedField::resolve(&*batch, key)?;
                let updated = match direction {
                    Direction::Denormalize => field.denormalized(),
                    Direction::Normalize => field.normalized(),
                };
                let extra = match side.get(key.as_str()) {
                    Some(extra) if index == 0 => {
                        let scale = field.scale();
                        Some(match direction {
                            Direction::Denormalize => scale.denormalize(extra),
                            Direction::Normalize => scale.normalize(extra),
                        })
                    }
                    _ => None,
                };
                (updated, extra)
            };
            batch.set_field(key.as_str(), updated);
            if let Some(extra) = extra {
                side.insert(key.to_string(), extra);
                side_keys.push(key.clone());
            }
        }
        tracing::debug!(
            key = key.as_str(),
            batches = batches.len(),
            direction = direction.as_str(),
            "rescaled normalized field"
        );
    }
    Ok(side_keys)
}

#[cfg(test)]
#[path = "../../tests/src_inline/norm/inverse.rs"]
mod tests;
