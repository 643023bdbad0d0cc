use std::fs;

use serde::{Deserialize, Serialize};
use tempfile::tempdir;
use toml::Table;

use crate::{Config, Error, extract_diff, merge};

#[derive(Deserialize, Serialize, Debug, PartialEq, Clone)]
struct LegConfig {
    robot: String,
    links: Links,
    origin: Origin,
}

#[derive(Deserialize, Serialize, Debug, PartialEq, Clone)]
struct Links {
    upper: f64,
    lower: f64,
}

#[derive(Deserialize, Serialize, Debug, PartialEq, Clone)]
struct Origin {
    x: f64,
    y: f64,
    mirrored: bool,
}

impl Config for LegConfig {
    const PATH: &'static str = "leg.toml";
}

const MAIN: &str = r#"
robot = "dingo"

[links]
upper = 0.14
lower = 0.16

[origin]
x = 0.11
y = -0.06
mirrored = false
"#;

#[test]
fn merge_prefers_overlay_values() {
    let main: Table = MAIN.parse().unwrap();
    let overlay: Table = r#"
        [links]
        lower = 0.17

        [origin]
        mirrored = true
    "#
    .parse()
    .unwrap();

    let merged = merge(main, overlay, false);
    let links = merged["links"].as_table().unwrap();
    let origin = merged["origin"].as_table().unwrap();

    assert_eq!(merged["robot"].as_str(), Some("dingo"));
    assert_eq!(links["upper"].as_float(), Some(0.14));
    assert_eq!(links["lower"].as_float(), Some(0.17));
    assert_eq!(origin["mirrored"].as_bool(), Some(true));
    assert_eq!(origin["x"].as_float(), Some(0.11));
}

#[test]
fn merge_only_adds_unknown_keys_when_asked() {
    let main: Table = MAIN.parse().unwrap();
    let overlay: Table = "extra = 1".parse().unwrap();

    assert!(!merge(main.clone(), overlay.clone(), false).contains_key("extra"));
    assert!(merge(main, overlay, true).contains_key("extra"));
}

#[test]
fn diff_contains_only_changed_leaves() {
    let main: Table = MAIN.parse().unwrap();
    let changed: Table = r#"
        robot = "dingo"

        [links]
        upper = 0.15
        lower = 0.16

        [origin]
        x = 0.11
        y = -0.06
        mirrored = false
    "#
    .parse()
    .unwrap();

    let diff = extract_diff(&main, &changed);

    assert!(!diff.contains_key("robot"));
    assert!(!diff.contains_key("origin"));

    let links = diff["links"].as_table().unwrap();
    assert_eq!(links.len(), 1);
    assert_eq!(links["upper"].as_float(), Some(0.15));
}

#[test]
fn overlay_round_trip() {
    let temp_dir = tempdir().unwrap();
    let config_dir = temp_dir.path().join("config");
    let overlay_dir = config_dir.join("overlay").join("dingo_2");
    fs::create_dir_all(&overlay_dir).unwrap();
    fs::write(config_dir.join(LegConfig::PATH), MAIN).unwrap();

    let main = LegConfig::load(&config_dir).unwrap();
    assert_eq!(main.links.upper, 0.14);

    let mut calibrated = main.clone();
    calibrated.origin.y = -0.062;
    calibrated.origin.mirrored = true;
    calibrated.save_as_overlay(&main, &overlay_dir).unwrap();

    let overlay: Table = fs::read_to_string(overlay_dir.join(LegConfig::PATH))
        .unwrap()
        .parse()
        .unwrap();
    assert!(!overlay.contains_key("robot"));
    assert!(!overlay.contains_key("links"));
    let origin = overlay["origin"].as_table().unwrap();
    assert_eq!(origin["y"].as_float(), Some(-0.062));
    assert!(!origin.contains_key("x"));

    let loaded = LegConfig::load_with_overlay(&config_dir, &overlay_dir).unwrap();
    assert_eq!(loaded, calibrated);
}

#[test]
fn missing_overlay_falls_back_to_main() {
    let temp_dir = tempdir().unwrap();
    fs::write(temp_dir.path().join(LegConfig::PATH), MAIN).unwrap();

    let loaded =
        LegConfig::load_with_overlay(temp_dir.path(), temp_dir.path().join("overlay/none"))
            .unwrap();
    assert_eq!(loaded.robot, "dingo");
}

#[test]
fn missing_main_config_is_an_io_error() {
    let temp_dir = tempdir().unwrap();

    assert!(matches!(
        LegConfig::load(temp_dir.path()),
        Err(Error::Io { .. })
    ));
}

#[test]
fn malformed_config_is_a_deserialize_error() {
    let temp_dir = tempdir().unwrap();
    fs::write(temp_dir.path().join(LegConfig::PATH), "robot = 3").unwrap();

    assert!(matches!(
        LegConfig::load(temp_dir.path()),
        Err(Error::Deserialize { .. })
    ));
}
