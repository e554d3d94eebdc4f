//! Integration test: project files and built bundles
//!
//! Hand-written project JSON loads with defaults filled in, survives a save
//! and reload, and a built bundle runs exactly like the project it came from
//! while rejecting any tampering on disk.

use engine4k::core::{EngineConfig, EngineError};
use engine4k::engine::{build_bundle, load_bundle, Engine, Key, Registry};
use engine4k::project::{parse_event, ProjectData};
use std::fs;

const PROJECT_JSON: &str = r#"{
  "frames": [
    {
      "name": "Title",
      "bg_color": [10, 10, 40],
      "objects": [
        { "type": "TextObject", "name": "Banner", "text": "Press Enter", "x": 300, "y": 250 }
      ],
      "events": [
        {
          "conditions": [ { "type": "KeyPressed", "params": { "key": "K_RETURN" } } ],
          "actions": [ { "type": "GoToFrame", "params": { "frame_name": "Game" } } ]
        }
      ]
    },
    {
      "name": "Game",
      "objects": [
        { "type": "CounterObject", "name": "Lives", "initial_value": 3 },
        { "name": "Ship" }
      ],
      "events": [
        {
          "conditions": [ { "type": "KeyPressed", "params": { "key": "K_x" } } ],
          "actions": [
            { "type": "AddToCounter", "params": { "counter_name": "Lives", "value": -1 } },
            { "type": "ChangeObjectColor", "params": { "obj_name": "Ship", "color_str": "ORANGE" } }
          ]
        }
      ]
    }
  ]
}"#;

#[test]
fn test_hand_written_project_defaults() {
    let project = ProjectData::from_json(PROJECT_JSON).unwrap();
    assert_eq!(project.frame_names(), vec!["Title", "Game"]);

    let game = project.frame("Game").unwrap();
    assert_eq!(game.bg_color, [0, 0, 0]);
    let ship = game.object("Ship").unwrap();
    assert_eq!(ship.kind, "ActiveObject");
    assert_eq!((ship.x, ship.y, ship.w, ship.h), (100.0, 100.0, 50.0, 50.0));
    assert_eq!(ship.color, "(255,0,0)");

    // Numeric parameters are kept as text
    let add = &game.events[0].actions[0];
    assert_eq!(add.params.get("value"), Some("-1"));
}

#[test]
fn test_save_reload_keeps_everything() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("game.json");
    let project = ProjectData::from_json(PROJECT_JSON).unwrap();
    project.save(&path).unwrap();
    assert_eq!(ProjectData::load(&path).unwrap(), project);
}

#[test]
fn test_sheet_text_round_trips() {
    let project = ProjectData::from_json(PROJECT_JSON).unwrap();
    for frame in &project.frames {
        for event in &frame.events {
            let line = event.to_string();
            assert_eq!(&parse_event(&line).unwrap(), event, "line: {}", line);
        }
    }
}

#[test]
fn test_bundle_runs_like_the_project() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("game.e4k");
    let project = ProjectData::from_json(PROJECT_JSON).unwrap();
    build_bundle(&project, Some("Game"), &path).unwrap();

    let bundle = load_bundle(&path).unwrap();
    let mut engine = Engine::new(EngineConfig::default(), Registry::with_default_plugins());
    engine.load_project(&bundle.project).unwrap();
    engine.start(bundle.start_frame.as_deref()).unwrap();
    assert_eq!(engine.current_frame_name(), Some("Game"));

    engine.input_mut().hold(Key::Char('x'));
    engine.step();
    let game = engine.current_frame().unwrap();
    assert_eq!(game.object("Lives").unwrap().counter_value(), Some(2.0));
    assert_eq!(
        game.object("Ship").unwrap().current_color(),
        engine4k::math::Color::ORANGE
    );
}

#[test]
fn test_title_jumps_to_game_on_enter() {
    let project = ProjectData::from_json(PROJECT_JSON).unwrap();
    let mut engine = Engine::new(EngineConfig::default(), Registry::with_default_plugins());
    engine.load_project(&project).unwrap();
    engine.start(None).unwrap();

    engine.press_key(Key::Enter);
    engine.step();
    engine.step();
    assert_eq!(engine.current_frame_name(), Some("Game"));
}

#[test]
fn test_tampered_bundle_file_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("game.e4k");
    let project = ProjectData::from_json(PROJECT_JSON).unwrap();
    build_bundle(&project, None, &path).unwrap();

    let mut bytes = fs::read(&path).unwrap();
    let last = bytes.len() - 40;
    bytes[last] ^= 0x55;
    fs::write(&path, &bytes).unwrap();

    assert!(matches!(
        load_bundle(&path),
        Err(EngineError::CorruptBundle(_))
    ));
}

#[test]
fn test_build_refuses_unknown_start_frame() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("game.e4k");
    let project = ProjectData::from_json(PROJECT_JSON).unwrap();
    assert!(matches!(
        build_bundle(&project, Some("Credits"), &path),
        Err(EngineError::UnknownFrame(_))
    ));
}
