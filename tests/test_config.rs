use std::collections::HashMap;
use std::error::Error;
use std::path::PathBuf;

use starship_commander::config::*;
use starship_commander::error::GameError;

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn empty_environment_gives_defaults() {
    let settings = Settings::from_lookup(lookup(&[]));
    assert_eq!(settings, Settings::default());
    assert_eq!(settings.star_count, STAR_COUNT);
    assert!(!settings.mute);
}

#[test]
fn every_key_is_read() {
    let settings = Settings::from_lookup(lookup(&[
        ("STARSHIP_LOG", "/tmp/game.log"),
        ("STARSHIP_MUTE", "true"),
        ("STARSHIP_STARS", " 120 "),
    ]));
    assert_eq!(settings.log_path, PathBuf::from("/tmp/game.log"));
    assert!(settings.mute);
    assert_eq!(settings.star_count, 120);
}

#[test]
fn bad_values_keep_defaults() {
    let settings = Settings::from_lookup(lookup(&[
        ("STARSHIP_LOG", "   "),
        ("STARSHIP_MUTE", "maybe"),
        ("STARSHIP_STARS", "lots"),
    ]));
    assert_eq!(settings.log_path, Settings::default().log_path);
    assert!(!settings.mute);
    assert_eq!(settings.star_count, STAR_COUNT);
}

#[test]
fn mute_accepts_common_spellings() {
    for value in ["1", "true", "yes"] {
        assert!(Settings::from_lookup(lookup(&[("STARSHIP_MUTE", value)])).mute);
    }
    assert!(!Settings::from_lookup(lookup(&[("STARSHIP_MUTE", "0")])).mute);
}

#[test]
fn grid_fits_the_field() {
    assert_eq!(INITIAL_ENEMIES, 25);
    assert!(ENEMY_COLUMNS * ENEMY_WIDTH < WIDTH);
    assert!(ENEMY_ROWS * ENEMY_HEIGHT < HEIGHT / 4 * 3);
}

#[test]
fn game_error_messages() {
    let e = GameError::Surface("stdout is not a terminal".into());
    assert_eq!(e.to_string(), "no drawing surface: stdout is not a terminal");
    assert!(e.source().is_none());

    let io = std::io::Error::new(std::io::ErrorKind::Other, "broken pipe");
    let e: GameError = io.into();
    assert!(e.to_string().starts_with("I/O error"));
    assert!(e.source().is_some());
}
