use super::*;
use tempfile::tempdir;

const TARGETS: &str = r#"
[[target]]
name = "energy"
mean = -0.7554
std = 2.8873

[[target]]
name = "forces"
mean = 0.0
std = 2.8873
"#;

#[test]
fn parse_keeps_declaration_order() {
    let set = parse_targets(TARGETS, "inline").expect("parse targets");
    assert_eq!(set.names().collect::<Vec<_>>(), vec!["energy", "forces"]);
    let energy = set.get("energy").expect("energy config");
    assert_eq!(energy.mean, -0.7554);
    assert_eq!(energy.std, 2.8873);
}

#[test]
fn load_from_file() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("targets.toml");
    std::fs::write(&path, TARGETS).expect("write targets");
    let set = load_targets(&path).expect("load targets");
    assert_eq!(set.targets.len(), 2);
}

#[test]
fn empty_file_is_rejected() {
    assert!(matches!(
        parse_targets("", "inline"),
        Err(TargetConfigError::Empty(_))
    ));
}

#[test]
fn duplicate_target_is_rejected() {
    let text = r#"
[[target]]
name = "energy"
mean = 0.0
std = 1.0

[[target]]
name = "energy"
mean = 1.0
std = 2.0
"#;
    assert!(matches!(
        parse_targets(text, "inline"),
        Err(TargetConfigError::Duplicate(name)) if name == "energy"
    ));
}

#[test]
fn degenerate_scale_is_rejected() {
    let zero = "[[target]]\nname = \"energy\"\nmean = 0.0\nstd = 0.0\n";
    assert!(matches!(
        parse_targets(zero, "inline"),
        Err(TargetConfigError::ZeroStd(_))
    ));

    let nan = "[[target]]\nname = \"energy\"\nmean = nan\nstd = 1.0\n";
    assert!(matches!(
        parse_targets(nan, "inline"),
        Err(TargetConfigError::NonFinite(_))
    ));
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempdir().expect("tempdir");
    assert!(matches!(
        load_targets(&dir.path().join("absent.toml")),
        Err(TargetConfigError::Io(_))
    ));
}

#[test]
fn load_bundled_targets() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("assets/targets/oc20_s2ef.toml");
    let set = load_targets(&path).expect("load bundled targets");
    assert_eq!(set.names().collect::<Vec<_>>(), vec!["energy", "forces"]);
    assert_eq!(set.get("forces").map(|c| c.mean), Some(0.0));
}
