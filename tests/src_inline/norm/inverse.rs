use super::*;
use crate::data::json::sample_from_json;
use crate::data::{Batch, Sample, Tensor, Value};
use crate::norm::NormalizerTransform;
use crate::targets::defs::TargetConfig;
use ndarray::Array1;

fn t(values: &[f64]) -> Tensor {
    Array1::from_vec(values.to_vec()).into_dyn()
}

fn normalized_batch() -> Batch {
    Batch::new(2)
        .with("energy", t(&[0.5, -1.0]))
        .with("energy_norm_mean", t(&[10.0, 10.0]))
        .with("energy_norm_std", t(&[2.0, 2.0]))
        .with("natoms", t(&[3.0, 4.0]))
}

fn assert_close(actual: &Tensor, expected: &[f64]) {
    assert_eq!(actual.len(), expected.len(), "{actual:?} vs {expected:?}");
    for (a, b) in actual.iter().zip(expected) {
        assert!((a - b).abs() < 1e-9, "{actual:?} vs {expected:?}");
    }
}

#[test]
fn denormalizes_fields_in_place() {
    let mut batches = vec![normalized_batch()];
    let mut side = SideTensors::new();
    let keys = denormalize_batch(&mut batches, &mut side).expect("denormalize");

    assert_eq!(keys.len(), 1);
    assert!(keys.contains("energy"));
    let batch = &batches[0];
    assert_eq!(batch.field("energy"), Some(&t(&[11.0, 8.0])));
    assert_eq!(batch.field("energy_norm_mean"), Some(&t(&[10.0, 10.0])));
    assert_eq!(batch.field("natoms"), Some(&t(&[3.0, 4.0])));
    assert!(side.is_empty());
}

#[test]
fn side_tensors_follow_their_key_only() {
    let mut batches = vec![normalized_batch()];
    let mut side = SideTensors::new();
    side.insert("energy".to_string(), t(&[1.0, 0.0]));
    side.insert("other".to_string(), t(&[5.0]));

    denormalize_batch(&mut batches, &mut side).expect("denormalize");

    assert_eq!(side.len(), 2);
    assert_eq!(side["energy"], t(&[12.0, 10.0]));
    assert_eq!(side["other"], t(&[5.0]));
}

#[test]
fn side_tensor_is_scaled_once_with_the_first_batch() {
    let second = Batch::new(2)
        .with("energy", t(&[1.0, 1.0]))
        .with("energy_norm_mean", t(&[0.0, 0.0]))
        .with("energy_norm_std", t(&[1.0, 1.0]));
    let mut batches = vec![normalized_batch(), second];
    let mut side = SideTensors::new();
    side.insert("energy".to_string(), t(&[1.0, 0.0]));

    denormalize_batch(&mut batches, &mut side).expect("denormalize");

    assert_eq!(side["energy"], t(&[12.0, 10.0]));
    assert_eq!(batches[1].field("energy"), Some(&t(&[1.0, 1.0])));
}

#[test]
fn missing_fields_leave_inputs_untouched() {
    let partial = Batch::new(1)
        .with("energy", t(&[0.3]))
        .with("energy_norm_mean", t(&[1.0]));
    let mut batches = vec![normalized_batch(), partial];
    let mut side = SideTensors::new();
    side.insert("energy".to_string(), t(&[1.0, 0.0]));

    match denormalize_batch(&mut batches, &mut side) {
        Err(NormError::MissingNormFields { key, missing }) => {
            assert_eq!(key, "energy");
            assert_eq!(missing, "energy_norm_std");
        }
        other => panic!("expected missing norm fields, got {other:?}"),
    }
    assert_eq!(batches[0].field("energy"), Some(&t(&[0.5, -1.0])));
    assert_eq!(batches[1].field("energy"), Some(&t(&[0.3])));
    assert_eq!(side["energy"], t(&[1.0, 0.0]));
}

#[test]
fn incompatible_side_tensor_is_rejected_before_writing() {
    let mut batches = vec![normalized_batch()];
    let mut side = SideTensors::new();
    side.insert("energy".to_string(), t(&[1.0, 2.0, 3.0]));

    assert!(matches!(
        denormalize_batch(&mut batches, &mut side),
        Err(NormError::ShapeMismatch { .. })
    ));
    assert_eq!(batches[0].field("energy"), Some(&t(&[0.5, -1.0])));
}

#[test]
fn recovers_physical_units_after_collation() {
    let transform = NormalizerTransform::new([
        ("energy", TargetConfig::new(-0.5, 2.0)),
        ("forces", TargetConfig::new(0.1, 3.0)),
    ])
    .expect("transform");
    let forces_a = ndarray::array![[0.3, -0.2, 1.1], [2.0, 0.0, -4.5]].into_dyn();
    let forces_b = ndarray::array![[7.7, 0.01, -0.3]].into_dyn();
    let mut samples = vec![
        Sample::new().with("energy", -1.5).with("forces", forces_a),
        Sample::new().with("energy", 2.0).with("forces", forces_b),
    ];
    transform.apply_all(&mut samples).expect("normalize");

    let mut batches = vec![Batch::collate(&samples).expect("collate")];
    let mut side = SideTensors::new();
    denormalize_batch(&mut batches, &mut side).expect("denormalize");

    let batch = &batches[0];
    assert_close(batch.field("energy").expect("energy"), &[-1.5, 2.0]);
    assert_close(
        batch.field("forces").expect("forces"),
        &[0.3, -0.2, 1.1, 2.0, 0.0, -4.5, 7.7, 0.01, -0.3],
    );
}

#[test]
fn works_directly_on_samples() {
    let transform =
        NormalizerTransform::new([("energy", TargetConfig::new(3.0, 0.5))]).expect("transform");
    let mut samples = vec![Sample::new().with("energy", 4.0)];
    transform.apply_all(&mut samples).expect("normalize");

    let mut side = SideTensors::new();
    denormalize_batch(&mut samples, &mut side).expect("denormalize");
    assert_close(samples[0].field("energy").expect("energy"), &[4.0]);
}

#[test]
fn json_samples_with_scalar_fields_denormalize() {
    let json = serde_json::json!({
        "energy": 0.5,
        "energy_norm_mean": 10.0,
        "energy_norm_std": 2.0,
        "natoms": 3
    });
    let mut samples = vec![sample_from_json(&json).expect("sample")];
    let keys = discover_norm_keys(&samples);
    assert_eq!(keys.iter().map(NormKey::as_str).collect::<Vec<_>>(), vec!["energy"]);

    let mut side = SideTensors::new();
    denormalize_batch(&mut samples, &mut side).expect("denormalize");
    assert_close(samples[0].field("energy").expect("energy"), &[11.0]);
}

#[test]
fn scalar_scale_fields_are_not_discovered_until_coerced() {
    let mut samples = vec![
        Sample::new()
            .with("energy", 0.5)
            .with("energy_norm_mean", 10.0)
            .with("energy_norm_std", 2.0),
    ];
    let mut side = SideTensors::new();
    let keys = denormalize_batch(&mut samples, &mut side).expect("nothing to do");
    assert!(keys.is_empty());
    assert_eq!(samples[0].get("energy"), Some(&Value::Float(0.5)));
}
