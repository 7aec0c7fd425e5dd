//! Scene scheduler for the Reel demo video.
//!
//! A [`VideoConfig`] lists the eleven catalog scenes with their
//! durations. [`VideoTimeline`] places each scene on the timeline as a
//! duration-bound event and renders any frame as a [`FrameTree`]: every
//! active scene with its cross-fade opacity and the derived values of
//! its [`ElementSpec`] tree. Rendering is a pure function of the frame
//! number.
//!
//! ```
//! use reel_core::TickId;
//! use reel_video::VideoTimeline;
//!
//! let timeline = VideoTimeline::three_minute().unwrap();
//! let frame = timeline.render(TickId(200));
//! let scene = frame.scene().unwrap();
//! assert_eq!(scene.name, "Problem");
//! assert_eq!(scene.local_tick, 50);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod catalog;
pub mod config;
pub mod element;
pub mod scene;
pub mod timeline;

pub use catalog::SCENE_NAMES;
pub use config::{MusicConfig, SceneBoundary, SceneSlot, VideoConfig, VideoConfigError};
pub use element::{
    Ease, ElementFrame, ElementKind, ElementSpec, Motion, Rgb, TextReveal, Tint, DEFAULT_FADE,
};
pub use scene::{Scene, SceneFrame, SceneSpec};
pub use timeline::{FrameTree, VideoTimeline};
