//! End-to-end key and mouse wiring through the terminal host.

use crate::config::ResolvedConfig;
use crate::state::{InputSurface, Region, RenderSurface};
use crate::test_harness::AcceptanceTestHarness;
use crossterm::event::KeyCode;
use std::path::PathBuf;
use std::time::Duration;

fn state_path(name: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("searchbar_wiring_{name}.state"));
    let _ = std::fs::remove_file(&path);
    path
}

fn harness(name: &str) -> AcceptanceTestHarness {
    harness_with(name, ResolvedConfig::default())
}

fn harness_with(name: &str, config: ResolvedConfig) -> AcceptanceTestHarness {
    let config = ResolvedConfig {
        state_file_path: state_path(name),
        ..config
    };
    AcceptanceTestHarness::new(config).unwrap()
}

fn events(harness: &AcceptanceTestHarness) -> Vec<String> {
    harness.app().event_log().map(str::to_string).collect()
}

#[test]
fn enter_expands_and_typing_waits_for_focus() {
    let mut harness = harness("expand");

    harness.press(KeyCode::Enter);
    assert!(harness.app().bar().is_search_enabled());
    assert_eq!(events(&harness), vec!["search expanded"]);

    // Field has no focus until the transition completes.
    harness.type_text("ab");
    assert_eq!(harness.app().bar().text(), "");

    harness.settle();
    harness.type_text("rust");

    assert_eq!(harness.app().bar().text(), "rust");
    assert!(harness.screen().contains("← rust"));
}

#[test]
fn esc_collapses_then_quits() {
    let mut harness = harness("esc");
    harness.press(KeyCode::Enter);
    harness.settle();
    harness.type_text("query");

    assert!(!harness.press(KeyCode::Esc));
    harness.settle();

    let bar = harness.app().bar();
    assert!(!bar.is_search_enabled());
    assert_eq!(bar.text(), "");
    assert!(!bar.input().has_focus());
    assert!(!bar.keyboard().is_shown());

    assert!(harness.press(KeyCode::Esc));
}

#[test]
fn q_quits_only_when_collapsed() {
    let mut harness = harness("q");
    harness.press(KeyCode::Enter);
    harness.settle();

    assert!(!harness.press(KeyCode::Char('q')));
    assert_eq!(harness.app().bar().text(), "q");

    harness.press_ctrl('b');
    harness.settle();
    assert!(harness.press(KeyCode::Char('q')));
}

#[test]
fn enter_confirms_when_expanded() {
    let mut harness = harness("confirm");
    harness.press(KeyCode::Enter);
    harness.settle();
    harness.type_text("rats");
    harness.press(KeyCode::Backspace);

    harness.press(KeyCode::Enter);

    assert_eq!(events(&harness).last().map(String::as_str), Some("confirmed \"rat\""));
    assert!(harness.app().bar().is_search_enabled());
}

#[test]
fn speech_tap_requires_speech_mode() {
    let mut harness = harness("speech");

    harness.press_ctrl('v');
    assert!(events(&harness).is_empty());

    harness.press_ctrl('t');
    harness.press_ctrl('v');

    assert_eq!(events(&harness), vec!["speech button clicked"]);
    assert!(harness.screen().contains("◉"));
}

#[test]
fn nav_tap_requires_nav_button() {
    let mut harness = harness_with(
        "nav",
        ResolvedConfig {
            nav_button_enabled: true,
            ..ResolvedConfig::default()
        },
    );

    harness.press_ctrl('n');

    assert_eq!(events(&harness), vec!["navigation button clicked"]);
}

#[test]
fn quick_expand_collapse_ends_collapsed() {
    let mut harness = harness("supersede");

    harness.press(KeyCode::Enter);
    harness.app_mut().advance_test(Duration::from_millis(100));
    harness.press(KeyCode::Esc);
    harness.settle();

    let bar = harness.app().bar();
    assert!(!bar.is_search_enabled());
    assert!(bar.render().is_visible(Region::PlaceholderContainer));
    assert!(!bar.render().is_visible(Region::InputContainer));
    assert!(!bar.input().has_focus());
    assert_eq!(events(&harness), vec!["search expanded", "search collapsed"]);
}

#[test]
fn without_animations_expand_is_immediate() {
    let mut harness = harness_with(
        "instant",
        ResolvedConfig {
            animations_enabled: false,
            ..ResolvedConfig::default()
        },
    );

    harness.press(KeyCode::Enter);
    harness.type_text("now");

    assert!(!harness.app().bar().render().is_animating());
    assert_eq!(harness.app().bar().text(), "now");
}

#[test]
fn missing_animation_degrades_to_instant() {
    let mut animations = crate::config::loader::default_animations();
    animations.remove("fade_in_left");
    let mut harness = harness_with(
        "degrade",
        ResolvedConfig {
            animations,
            ..ResolvedConfig::default()
        },
    );

    harness.press(KeyCode::Enter);

    let bar = harness.app().bar();
    assert!(bar.render().is_visible(Region::InputContainer));
    assert!(bar.input().has_focus());
}

#[test]
fn save_and_restore_round_trip() {
    let mut harness = harness("persist");
    harness.press(KeyCode::Enter);
    harness.settle();
    harness.press_ctrl('s');
    assert!(harness.app().status().is_some_and(|s| s.starts_with("Saved")));

    harness.press(KeyCode::Esc);
    harness.settle();
    assert!(!harness.app().bar().is_search_enabled());

    harness.press_ctrl('r');

    let bar = harness.app().bar();
    assert_eq!(harness.app().status(), Some("Restored"));
    assert!(bar.is_search_enabled());
    assert!(bar.render().is_visible(Region::InputContainer));
    assert!(!bar.render().is_visible(Region::PlaceholderContainer));
}

#[test]
fn restoring_collapsed_state_drops_typed_text_and_focus() {
    let mut harness = harness("restore_collapsed");
    harness.press_ctrl('s');
    harness.press(KeyCode::Enter);
    harness.settle();
    harness.type_text("abc");

    harness.press_ctrl('r');

    let bar = harness.app().bar();
    assert!(!bar.is_search_enabled());
    assert_eq!(bar.text(), "");
    assert!(!bar.input().has_focus());
    assert!(!bar.keyboard().is_shown());
    assert!(!bar.render().is_visible(Region::InputContainer));
}

#[test]
fn restored_expanded_bar_accepts_typing() {
    let mut harness = harness("restore_expanded");
    harness.press(KeyCode::Enter);
    harness.settle();
    harness.press_ctrl('s');
    harness.press(KeyCode::Esc);
    harness.settle();

    harness.press_ctrl('r');
    harness.type_text("abc");

    let bar = harness.app().bar();
    assert!(bar.input().has_focus());
    assert!(bar.keyboard().is_shown());
    assert_eq!(bar.text(), "abc");
}

#[test]
fn restore_without_saved_state_reports_nothing_saved() {
    let mut harness = harness("nothing");

    harness.press_ctrl('r');

    assert_eq!(harness.app().status(), Some("Nothing saved yet"));
}

#[test]
fn corrupt_state_file_resets_to_collapsed() {
    let path = state_path("corrupt");
    let mut harness = AcceptanceTestHarness::new(ResolvedConfig {
        state_file_path: path.clone(),
        ..ResolvedConfig::default()
    })
    .unwrap();
    harness.press(KeyCode::Enter);
    harness.settle();
    std::fs::write(&path, [0, 0, 0]).unwrap();

    harness.press_ctrl('r');

    assert!(harness
        .app()
        .status()
        .is_some_and(|s| s.starts_with("Restore failed")));
    assert!(!harness.app().bar().is_search_enabled());
    let _ = std::fs::remove_file(&path);
}

#[test]
fn menu_opens_and_selects() {
    let mut harness = harness_with(
        "menu",
        ResolvedConfig {
            menu: vec!["Settings".to_string(), "Help".to_string()],
            ..ResolvedConfig::default()
        },
    );

    harness.press_ctrl('o');
    assert!(harness.screen().contains("Settings"));

    harness.press(KeyCode::Down);
    harness.press(KeyCode::Enter);

    assert_eq!(harness.app().status(), Some("Menu: Help"));
    assert!(harness.app().bar().render().menu().is_none());
    // The key went to the menu, not the bar.
    assert!(!harness.app().bar().is_search_enabled());
}

#[test]
fn clicking_the_bar_expands_and_arrow_collapses() {
    let mut harness = harness("mouse");
    harness.screen();

    harness.click(10, 1);
    harness.settle();
    assert!(harness.app().bar().is_search_enabled());

    harness.screen();
    harness.click(1, 1);
    harness.settle();
    assert!(!harness.app().bar().is_search_enabled());
}

#[test]
fn clear_chord_empties_field() {
    let mut harness = harness("clear");
    harness.press(KeyCode::Enter);
    harness.settle();
    harness.type_text("abc");

    harness.press_ctrl('l');

    assert_eq!(harness.app().bar().text(), "");
    assert!(harness.app().bar().is_search_enabled());
}
