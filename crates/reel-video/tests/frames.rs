//! End-to-end rendering of the shipped scene plans.

use reel_core::{SceneId, TickId};
use reel_test_utils::fixtures::strictly_increasing;
use reel_test_utils::RecordingSink;
use reel_video::{FrameTree, VideoConfig, VideoConfigError, VideoTimeline, SCENE_NAMES};

fn start_of(timeline: &VideoTimeline, name: &str) -> u64 {
    match timeline.boundaries().iter().find(|b| b.name == name) {
        Some(b) => b.start.0,
        None => panic!("no scene named {name}"),
    }
}

#[test]
fn both_presets_play_every_scene_in_order() {
    for config in [VideoConfig::three_minute(), VideoConfig::four_minute()] {
        let timeline = VideoTimeline::new(&config).unwrap();
        let names: Vec<&str> = timeline
            .boundaries()
            .iter()
            .map(|b| b.name.as_str())
            .collect();
        assert_eq!(names, SCENE_NAMES);

        let mut seen = Vec::new();
        for b in timeline.boundaries() {
            let mid = TickId(b.start.0 + b.duration() / 2);
            let tree = timeline.render(mid);
            let scene = tree.scene().unwrap();
            assert_eq!(scene.opacity, 1.0);
            seen.push(scene.id);
        }
        let expected: Vec<SceneId> = (0..11).map(SceneId).collect();
        assert_eq!(seen, expected);
    }
}

#[test]
fn four_minute_cut_is_longer_but_scenes_keep_their_timing() {
    let short = VideoTimeline::three_minute().unwrap();
    let long = VideoTimeline::new(&VideoConfig::four_minute()).unwrap();
    assert_eq!(long.total(), 7200);

    // Local timing does not depend on where the scene sits.
    let a = short.render(TickId(start_of(&short, "Cost") + 130));
    let b = long.render(TickId(start_of(&long, "Cost") + 130));
    assert_eq!(a.scenes[0].elements, b.scenes[0].elements);

    let saved = a.scenes[0].find("saved").unwrap();
    assert_eq!(saved.display_value(), Some(10_700.0));
}

#[test]
fn plan_loaded_from_toml_renders() {
    let text = r#"
        width = 1280
        height = 720
        scene_fade = 15

        [[scenes]]
        name = "Title"
        duration = 90

        [[scenes]]
        name = "Security"
        duration = 300

        [[scenes]]
        name = "Outro"
        duration = 200
    "#;
    let config = VideoConfig::from_toml_str(text).unwrap();
    let timeline = VideoTimeline::new(&config).unwrap();
    assert_eq!(timeline.total(), 590);

    let tree = timeline.render(TickId(90 + 7));
    let scene = tree.scene().unwrap();
    assert_eq!(scene.name, "Security");
    assert!((scene.opacity - 7.0 / 15.0).abs() < 1e-12);

    let too_short = text.replace("duration = 90", "duration = 20");
    match VideoConfig::from_toml_str(&too_short) {
        Err(VideoConfigError::SceneTooShort { name, min, .. }) => {
            assert_eq!(name, "Title");
            assert_eq!(min, 31);
        }
        other => panic!("expected SceneTooShort, got {other:?}"),
    }
}

#[test]
fn played_frames_match_pure_renders() {
    let mut timeline = VideoTimeline::three_minute().unwrap();
    let mut sink: RecordingSink<FrameTree> = RecordingSink::new();
    timeline.play(0..600, &mut sink).unwrap();
    assert!(strictly_increasing(&sink.ticks()));
    for (tick, tree) in sink.frames.iter().step_by(37) {
        assert_eq!(*tree, timeline.render(*tick));
    }
}

#[test]
fn frame_tree_serializes_for_the_painter() {
    let timeline = VideoTimeline::three_minute().unwrap();
    let json = serde_json::to_value(timeline.render(TickId(3700))).unwrap();
    assert_eq!(json["tick"], 3700);
    let scene = &json["scenes"][0];
    assert_eq!(scene["name"], "Cost");
    assert_eq!(scene["localTick"], 100);
    let heading = &scene["elements"][0];
    assert_eq!(heading["label"], "heading");
    assert_eq!(heading["color"], "#34d399");
    assert_eq!(heading["text"], "Cost Intelligence");
}
