use super::*;
use crate::data::{Batch, Tensor};
use ndarray::Array1;

fn t(values: &[f64]) -> Tensor {
    Array1::from_vec(values.to_vec()).into_dyn()
}

fn names(keys: &BTreeSet<NormKey>) -> Vec<&str> {
    keys.iter().map(NormKey::as_str).collect()
}

#[test]
fn requires_both_suffixes_across_the_union() {
    let a = Batch::new(1)
        .with("energy", t(&[0.1]))
        .with("energy_norm_mean", t(&[0.0]))
        .with("energy_norm_std", t(&[1.0]))
        .with("forces", t(&[0.2]))
        .with("forces_norm_mean", t(&[0.0]));
    let b = Batch::new(1)
        .with("forces_norm_std", t(&[1.0]))
        .with("stress_norm_mean", t(&[0.0]))
        .with("natoms", t(&[3.0]));

    let keys = discover_norm_keys(&[a.clone(), b]);
    assert_eq!(names(&keys), vec!["energy", "forces"]);

    let keys = discover_norm_keys(&[a]);
    assert_eq!(names(&keys), vec!["energy"]);
}

#[test]
fn base_field_is_not_required() {
    let batch = Batch::new(1)
        .with("charge_norm_mean", t(&[0.0]))
        .with("charge_norm_std", t(&[1.0]));
    assert_eq!(names(&discover_norm_keys(&[batch])), vec!["charge"]);
}

#[test]
fn empty_when_nothing_is_normalized() {
    let batch = Batch::new(1).with("energy", t(&[0.1]));
    assert!(discover_norm_keys(&[batch]).is_empty());
    assert!(discover_norm_keys::<Batch>(&[]).is_empty());
}
