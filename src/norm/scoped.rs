use std::collections::BTreeSet;

use crate::data::FieldStore;
use crate::norm::affine::Direction;
use crate::norm::inverse::apply_strict;
use crate::norm::{
    NormError, NormKey, NormalizedField, ScaleParams, SideTensors, discover_norm_keys,
};

/// Batches and side tensors held in physical units for the lifetime of the
/// guard.
///
/// Entering denormalizes exactly as [`denormalize_batch`] does. Dropping the
/// guard maps every field and side tensor touched on entry back with
/// `(value - mean) / std`, on every exit path including `?` and unwinding.
/// The key set is frozen at entry; the scale parameters are re-read from the
/// batches on release.
///
/// [`denormalize_batch`]: crate::norm::denormalize_batch
pub struct DenormalizedScope<'a, S: FieldStore> {
    batches: &'a mut [S],
    side: &'a mut SideTensors,
    keys: BTreeSet<NormKey>,
    side_keys: Vec<NormKey>,
    released: bool,
}

impl<'a, S: FieldStore> DenormalizedScope<'a, S> {
    /// If this fails nothing has been modified and no release will run.
    pub fn enter(batches: &'a mut [S], side: &'a mut SideTensors) -> Result<Self, NormError> {
        let keys = discover_norm_keys(batches);
        let side_keys = apply_strict(batches, side, &keys, Direction::Denormalize)?;
        Ok(Self {
            batches,
            side,
            keys,
            side_keys,
            released: false,
        })
    }

    pub fn keys(&self) -> &BTreeSet<NormKey> {
        &self.keys
    }

    pub fn batches(&self) -> &[S] {
        &*self.batches
    }

    pub fn batches_mut(&mut self) -> &mut [S] {
        &mut *self.batches
    }

    pub fn side_tensors(&self) -> &SideTensors {
        &*self.side
    }

    pub fn side_tensors_mut(&mut self) -> &mut SideTensors {
        &mut *self.side
    }

    pub fn parts_mut(&mut self) -> (&mut [S], &mut SideTensors) {
        (&mut *self.batches, &mut *self.side)
    }

    /// Renormalizes now and reports fields that could not be restored,
    /// instead of only logging them as a drop would.
    pub fn finish(mut self) -> Result<(), NormError> {
        let skipped = self.release();
        if skipped.is_empty() {
            Ok(())
        } else {
            Err(NormError::RenormalizeSkipped(skipped))
        }
    }

    fn release(&mut self) -> Vec<String> {
        if self.released {
            return Vec::new();
        }
        self.released = true;

        let mut skipped = Vec::new();
        for key in &self.keys {
            for (index, batch) in self.batches.iter_mut().enumerate() {
                let restored = NormalizedField::resolve(&*batch, key).map(|f| f.normalized());
                match restored {
                    Ok(value) => batch.set_field(key.as_str(), value),
                    Err(err) => {
                        tracing::warn!(
                            key = key.as_str(),
                            batch = index,
                            error = %err,
                            "field left denormalized"
                        );
                        skipped.push(format!("{key}[{index}]"));
                    }
                }
            }
        }

        for key in &self.side_keys {
            let Some(first) = self.batches.first() else {
                continue;
            };
            let scale = ScaleParams::resolve(first, key);
            let restored = match (scale, self.side.get(key.as_str())) {
                (Ok(scale), Some(extra)) => scale.check(key, extra).map(|_| scale.normalize(extra)),
                (Err(err), _) => Err(err),
                (_, None) => continue,
            };
            match restored {
                Ok(value) => {
                    self.side.insert(key.to_string(), value);
                }
                Err(err) => {
                    tracing::warn!(
                        key = key.as_str(),
                        error = %err,
                        "side tensor left denormalized"
                    );
                    skipped.push(format!("side:{key}"));
                }
            }
        }
        skipped
    }
}

impl<S: FieldStore> Drop for DenormalizedScope<'_, S> {
    fn drop(&mut self) {
        self.release();
    }
}

/// Runs `f` with `batches` and `side` denormalized, then renormalizes them
/// regardless of how `f` returns.
pub fn with_denormalized<S, R, F>(
    batches: &mut [S],
    side: &mut SideTensors,
    f: F,
) -> Result<R, NormError>
where
    S: FieldStore,
    F: FnOnce(&mut [S], &mut SideTensors) -> R,
{
    let mut scope = DenormalizedScope::enter(batches, side)?;
    let (batches, side) = scope.parts_mut();
    let out = f(batches, side);
    drop(scope);
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/src_inline/norm/scoped.rs"]
mod tests;
