//! The whole video as one schedule of scene spans.
//!
//! [`VideoTimeline`] places every scene of a [`VideoConfig`] as a
//! duration-bound event and renders any frame as a pure function of the
//! frame number. Scenes never see the global frame: the dispatcher hands
//! each one a clock zeroed at its own start.

use std::ops::Range;

use serde::Serialize;
use tracing::{debug, trace};

use reel_anim::{InterpolationWindow, LocalClock};
use reel_core::{Clock, FrameRate, PresentationSink, ScheduleError, ScheduledEvent, TickId};
use reel_engine::{Dispatched, Dispatcher, EventSchedule};

use crate::catalog;
use crate::config::{SceneBoundary, VideoConfig, VideoConfigError};
use crate::scene::{Scene, SceneFrame};

/// Everything visible at one frame.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameTree {
    /// Global frame number.
    pub tick: TickId,
    /// Background music volume.
    pub music_volume: f64,
    /// Active scenes in play order. At most one outside a boundary.
    pub scenes: Vec<SceneFrame>,
}

impl FrameTree {
    /// The frontmost scene, if any.
    pub fn scene(&self) -> Option<&SceneFrame> {
        self.scenes.last()
    }
}

/// A validated scene plan ready to render.
pub struct VideoTimeline {
    config: VideoConfig,
    boundaries: Vec<SceneBoundary>,
    music: InterpolationWindow,
    dispatcher: Dispatcher<Scene>,
}

impl VideoTimeline {
    /// Validate `config`, build every scene and place it on the timeline.
    ///
    /// # Errors
    ///
    /// Any [`VideoConfigError`] from validation or scene construction.
    pub fn new(config: &VideoConfig) -> Result<Self, VideoConfigError> {
        config.validate()?;
        let boundaries = config.boundaries();
        let music = config.music_window()?;

        let mut dispatcher = Dispatcher::new(
            EventSchedule::with_capacity(boundaries.len()),
            config.fps,
        );
        for boundary in &boundaries {
            let scene = Scene {
                id: boundary.id,
                spec: catalog::build(&boundary.name)?,
                fade: config.scene_fade,
            };
            dispatcher.schedule(ScheduledEvent::spanning(
                boundary.start,
                boundary.duration(),
                scene,
            ))?;
        }
        debug!(
            scenes = boundaries.len(),
            total = config.duration(),
            fps = config.fps.get(),
            "scene plan loaded"
        );
        Ok(Self {
            config: config.clone(),
            boundaries,
            music,
            dispatcher,
        })
    }

    /// The three-minute preset.
    pub fn three_minute() -> Result<Self, VideoConfigError> {
        Self::new(&VideoConfig::three_minute())
    }

    /// The plan this timeline was built from.
    pub fn config(&self) -> &VideoConfig {
        &self.config
    }

    /// Scene placement in play order.
    pub fn boundaries(&self) -> &[SceneBoundary] {
        &self.boundaries
    }

    /// Total frames.
    pub fn total(&self) -> u64 {
        self.config.duration()
    }

    /// Frame rate.
    pub fn fps(&self) -> FrameRate {
        self.config.fps
    }

    /// The scene whose range holds `tick`.
    pub fn scene_at(&self, tick: TickId) -> Option<&SceneBoundary> {
        self.boundaries.iter().find(|b| b.contains(tick))
    }

    /// Music volume at `tick`, evaluated on the root clock.
    pub fn music_volume(&self, tick: TickId) -> f64 {
        LocalClock::root(tick, self.config.fps).interpolate(&self.music)
    }

    /// Render frame `tick`.
    ///
    /// Pure: frames can be rendered in any order, any number of times.
    /// Past the end the frame tree has no scenes.
    pub fn render(&self, tick: TickId) -> FrameTree {
        let scenes: Vec<SceneFrame> = self
            .dispatcher
            .evaluate(tick)
            .into_iter()
            .map(|d| d.value)
            .collect();
        trace!(tick = tick.0, scenes = scenes.len(), "frame rendered");
        self.tree(tick, scenes)
    }

    /// Render the frame `clock` is on.
    pub fn render_now<C: Clock + ?Sized>(&self, clock: &C) -> FrameTree {
        self.render(clock.current_tick())
    }

    /// Render `frames` in order into `sink`, one call per frame.
    ///
    /// Stateful: consecutive calls must not move backwards.
    ///
    /// # Errors
    ///
    /// [`ScheduleError::TickRewound`] if `frames` starts before the last
    /// frame played.
    pub fn play<S>(&mut self, frames: Range<u64>, sink: &mut S) -> Result<u64, ScheduleError>
    where
        S: PresentationSink<FrameTree> + ?Sized,
    {
        let mut played = 0;
        for frame in frames {
            let tick = TickId(frame);
            let scenes: Vec<SceneFrame> = self
                .dispatcher
                .tick(tick)?
                .into_iter()
                .map(|d: Dispatched<'_, Scene>| d.value)
                .collect();
            let tree = self.tree(tick, scenes);
            sink.present(tick, &tree);
            played += 1;
        }
        Ok(played)
    }

    fn tree(&self, tick: TickId, scenes: Vec<SceneFrame>) -> FrameTree {
        FrameTree {
            tick,
            music_volume: self.music_volume(tick),
            scenes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reel_core::SceneId;
    use reel_test_utils::{FakeClock, RecordingSink};

    fn timeline() -> VideoTimeline {
        VideoTimeline::three_minute().unwrap()
    }

    #[test]
    fn three_minute_plan_covers_every_frame_once() {
        let t = timeline();
        assert_eq!(t.total(), 5400);
        for tick in [0, 149, 150, 2000, 5399] {
            let tree = t.render(TickId(tick));
            assert_eq!(tree.scenes.len(), 1, "frame {tick}");
        }
        assert!(t.render(TickId(5400)).scenes.is_empty());
    }

    #[test]
    fn boundary_crosses_through_black() {
        let t = timeline();
        // Title ends at 150, Problem starts there.
        let before = t.render(TickId(149));
        assert_eq!(before.scene().map(|s| s.name.as_str()), Some("Title"));
        assert!(before.scenes[0].opacity <= 0.5);

        let at = t.render(TickId(150));
        let incoming = &at.scenes[0];
        assert_eq!(incoming.name, "Problem");
        assert_eq!(incoming.local_tick, 0);
        assert_eq!(incoming.opacity, 0.0);

        let settled = t.render(TickId(162));
        assert_eq!(settled.scenes[0].opacity, 1.0);
    }

    #[test]
    fn scenes_receive_local_ticks() {
        let t = timeline();
        let problem = &t.boundaries()[1];
        assert_eq!(problem.start, TickId(150));
        let tree = t.render(TickId(200));
        let scene = tree.scene().unwrap();
        assert_eq!(scene.id, SceneId(1));
        assert_eq!(scene.local_tick, 50);
        let share = scene.find("manual-share").unwrap();
        assert_eq!(share.display_value(), Some(35.0));
    }

    #[test]
    fn music_follows_its_keyframes() {
        let t = timeline();
        assert_eq!(t.music_volume(TickId(0)), 0.0);
        assert!((t.music_volume(TickId(15)) - 0.09).abs() < 1e-12);
        assert_eq!(t.music_volume(TickId(30)), 0.18);
        assert_eq!(t.music_volume(TickId(2700)), 0.18);
        assert!((t.music_volume(TickId(5355)) - 0.09).abs() < 1e-12);
        assert_eq!(t.music_volume(TickId(5400)), 0.0);
        assert_eq!(t.music_volume(TickId(9000)), 0.0);
    }

    #[test]
    fn render_is_repeatable_in_any_order() {
        let t = timeline();
        let late = t.render(TickId(4000));
        let early = t.render(TickId(10));
        assert_eq!(t.render(TickId(4000)), late);
        assert_eq!(t.render(TickId(10)), early);
    }

    #[test]
    fn scene_at_finds_the_slot() {
        let t = timeline();
        assert_eq!(t.scene_at(TickId(0)).map(|b| b.name.as_str()), Some("Title"));
        assert_eq!(t.scene_at(TickId(5399)).map(|b| b.name.as_str()), Some("Outro"));
        assert!(t.scene_at(TickId(5400)).is_none());
    }

    #[test]
    fn render_now_reads_the_clock() {
        let t = timeline();
        let clock = FakeClock::at(480);
        assert_eq!(t.render_now(&clock), t.render(TickId(480)));
    }

    #[test]
    fn play_matches_render_and_refuses_rewinds() {
        let mut t = timeline();
        let mut sink = RecordingSink::new();
        assert_eq!(t.play(140..160, &mut sink).unwrap(), 20);
        assert_eq!(sink.len(), 20);
        assert_eq!(sink.ticks().last(), Some(&TickId(159)));
        assert_eq!(sink.last(), Some(&t.render(TickId(159))));

        match t.play(100..101, &mut sink) {
            Err(ScheduleError::TickRewound { .. }) => {}
            other => panic!("expected TickRewound, got {other:?}"),
        }
    }

    #[test]
    fn invalid_plan_is_rejected() {
        let mut config = VideoConfig::three_minute();
        config.scenes[0].name = "Bloopers".into();
        match VideoTimeline::new(&config) {
            Err(VideoConfigError::UnknownScene { name }) => assert_eq!(name, "Bloopers"),
            Err(other) => panic!("expected UnknownScene, got {other:?}"),
            Ok(_) => panic!("expected UnknownScene, got a timeline"),
        }
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn opacities(frame: &crate::ElementFrame, out: &mut Vec<f64>) {
            out.push(frame.opacity);
            for child in &frame.children {
                opacities(child, out);
            }
        }

        proptest! {
            #[test]
            fn opacity_stays_in_unit_range(tick in 0u64..5600) {
                let t = timeline();
                let tree = t.render(TickId(tick));
                prop_assert!(tree.scenes.len() <= 1);
                prop_assert!((0.0..=0.18).contains(&tree.music_volume));
                for scene in &tree.scenes {
                    prop_assert!((0.0..=1.0).contains(&scene.opacity));
                    let mut all = Vec::new();
                    for element in &scene.elements {
                        opacities(element, &mut all);
                    }
                    for o in all {
                        prop_assert!((0.0..=1.0).contains(&o));
                    }
                }
            }
        }
    }
}
