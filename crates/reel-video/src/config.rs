//! Scene plan configuration, presets, and error types.
//!
//! A [`VideoConfig`] lists the scenes in play order with their durations.
//! Scene boundaries are derived from the running sum, so changing one
//! duration shifts every later scene. Two presets ship with the crate:
//! a three-minute cut (5400 frames) and a four-minute cut (7200 frames).
//! Any other plan can be loaded from TOML.

use std::error::Error;
use std::fmt;

use serde::{Deserialize, Serialize};

use reel_anim::InterpolationWindow;
use reel_core::{AnimError, FrameRate, ScheduleError, SceneId, TickId};

use crate::catalog;

// ── VideoConfig ────────────────────────────────────────────────────

/// One scene slot in the plan.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneSlot {
    /// Catalog name of the scene, e.g. `"Problem"`.
    pub name: String,
    /// Length in frames.
    pub duration: u64,
}

/// Background music envelope.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MusicConfig {
    /// Volume between the fades. Default: 0.18.
    pub volume: f64,
    /// Frames to fade in from silence. Default: 30.
    pub fade_in: u64,
    /// Frames to fade out before the end. Default: 90.
    pub fade_out: u64,
}

impl Default for MusicConfig {
    fn default() -> Self {
        Self {
            volume: 0.18,
            fade_in: 30,
            fade_out: 90,
        }
    }
}

/// Full scene plan for one video.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VideoConfig {
    /// Frame rate. Default: 30.
    #[serde(default = "default_fps")]
    pub fps: FrameRate,
    /// Output width in pixels.
    pub width: u32,
    /// Output height in pixels.
    pub height: u32,
    /// Frames of cross-fade at each end of every scene. Default: 12.
    #[serde(default = "default_scene_fade")]
    pub scene_fade: u64,
    /// Expected total length. When set, the scene durations must sum to it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    /// Music envelope.
    #[serde(default)]
    pub music: MusicConfig,
    /// Scenes in play order.
    pub scenes: Vec<SceneSlot>,
}

fn default_fps() -> FrameRate {
    FrameRate::VIDEO
}

fn default_scene_fade() -> u64 {
    12
}

/// Placement of one scene on the global timeline.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SceneBoundary {
    /// Slot index.
    pub id: SceneId,
    /// Catalog name.
    pub name: String,
    /// First frame of the scene.
    pub start: TickId,
    /// First frame after the scene.
    pub end: TickId,
}

impl SceneBoundary {
    /// Length in frames.
    pub fn duration(&self) -> u64 {
        self.end.0 - self.start.0
    }

    /// Whether `tick` falls inside the scene.
    pub fn contains(&self, tick: TickId) -> bool {
        self.start <= tick && tick < self.end
    }
}

fn plan(fps: FrameRate, durations: [u64; 11]) -> VideoConfig {
    let total = durations.iter().sum();
    VideoConfig {
        fps,
        width: 1920,
        height: 1080,
        scene_fade: default_scene_fade(),
        total: Some(total),
        music: MusicConfig::default(),
        scenes: catalog::SCENE_NAMES
            .iter()
            .zip(durations)
            .map(|(name, duration)| SceneSlot {
                name: (*name).to_string(),
                duration,
            })
            .collect(),
    }
}

impl VideoConfig {
    /// The three-minute cut: 5400 frames at 30 fps.
    pub fn three_minute() -> Self {
        plan(
            FrameRate::VIDEO,
            [150, 330, 480, 360, 660, 480, 600, 540, 540, 480, 780],
        )
    }

    /// The four-minute cut: 7200 frames at 30 fps, with longer dwell on
    /// the diagram and demo scenes.
    pub fn four_minute() -> Self {
        plan(
            FrameRate::VIDEO,
            [180, 420, 660, 480, 900, 660, 780, 720, 720, 600, 1080],
        )
    }

    /// Parse a plan from TOML and validate it.
    pub fn from_toml_str(text: &str) -> Result<Self, VideoConfigError> {
        let config: Self = toml::from_str(text).map_err(|e| VideoConfigError::Parse {
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Render the plan as TOML.
    pub fn to_toml_string(&self) -> Result<String, VideoConfigError> {
        toml::to_string(self).map_err(|e| VideoConfigError::Parse {
            reason: e.to_string(),
        })
    }

    /// Sum of the scene durations.
    pub fn duration(&self) -> u64 {
        self.scenes
            .iter()
            .fold(0u64, |acc, s| acc.saturating_add(s.duration))
    }

    /// Start and end frame of every scene, in play order.
    pub fn boundaries(&self) -> Vec<SceneBoundary> {
        let mut start = TickId::ZERO;
        self.scenes
            .iter()
            .enumerate()
            .map(|(i, slot)| {
                let end = start.offset(slot.duration);
                let boundary = SceneBoundary {
                    id: SceneId(i as u32),
                    name: slot.name.clone(),
                    start,
                    end,
                };
                start = end;
                boundary
            })
            .collect()
    }

    /// Music volume keyframes over the whole video.
    ///
    /// A zero-length fade starts or ends at full volume, and fades that
    /// meet in the middle skip the hold.
    ///
    /// # Errors
    ///
    /// [`VideoConfigError::MusicFadesTooLong`] if both fades do not fit
    /// in the video.
    pub fn music_window(&self) -> Result<InterpolationWindow, VideoConfigError> {
        let total = self.duration();
        let (fade_in, fade_out, v) = (self.music.fade_in, self.music.fade_out, self.music.volume);
        if fade_in.saturating_add(fade_out) > total {
            return Err(VideoConfigError::MusicFadesTooLong {
                fade_in,
                fade_out,
                total,
            });
        }

        let mut keys: Vec<(u64, f64)> = Vec::with_capacity(4);
        if fade_in > 0 {
            keys.push((0, 0.0));
        }
        keys.push((fade_in, v));
        let hold_end = total - fade_out;
        if hold_end > fade_in {
            keys.push((hold_end, v));
        }
        if fade_out > 0 {
            keys.push((total, 0.0));
        }
        let input: Vec<f64> = keys.iter().map(|(at, _)| *at as f64).collect();
        let output: Vec<f64> = keys.iter().map(|(_, level)| *level).collect();
        Ok(InterpolationWindow::new(&input, &output)?)
    }

    /// Check every structural invariant.
    pub fn validate(&self) -> Result<(), VideoConfigError> {
        // 1. At least one scene.
        if self.scenes.is_empty() {
            return Err(VideoConfigError::NoScenes);
        }
        // 2. Non-degenerate output size.
        if self.width == 0 || self.height == 0 {
            return Err(VideoConfigError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        // 3. Every scene exists and outlasts both of its fades.
        let min = self.scene_fade.saturating_mul(2).saturating_add(1);
        for slot in &self.scenes {
            if !catalog::is_known(&slot.name) {
                return Err(VideoConfigError::UnknownScene {
                    name: slot.name.clone(),
                });
            }
            if slot.duration < min {
                return Err(VideoConfigError::SceneTooShort {
                    name: slot.name.clone(),
                    duration: slot.duration,
                    min,
                });
            }
        }
        // 4. Durations add up to the declared total.
        if let Some(expected) = self.total {
            let actual = self.duration();
            if actual != expected {
                return Err(VideoConfigError::DurationMismatch { expected, actual });
            }
        }
        // 5. Music envelope fits inside the video.
        if !self.music.volume.is_finite() || self.music.volume < 0.0 {
            return Err(VideoConfigError::Anim(AnimError::NonFiniteValue {
                what: "music volume",
            }));
        }
        self.music_window()?;
        Ok(())
    }
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self::three_minute()
    }
}

// ── VideoConfigError ───────────────────────────────────────────────

/// Errors detected while loading or building a scene plan.
#[derive(Clone, Debug, PartialEq)]
pub enum VideoConfigError {
    /// The TOML text could not be parsed or written.
    Parse {
        /// Parser message.
        reason: String,
    },
    /// An animation primitive rejected its parameters.
    Anim(AnimError),
    /// Scheduling a scene failed.
    Schedule(ScheduleError),
    /// The plan has no scenes.
    NoScenes,
    /// A scene name is not in the catalog.
    UnknownScene {
        /// The unknown name.
        name: String,
    },
    /// Scene durations do not sum to the declared total.
    DurationMismatch {
        /// Declared total.
        expected: u64,
        /// Sum of the scene durations.
        actual: u64,
    },
    /// A scene is too short for its fade-in and fade-out.
    SceneTooShort {
        /// Scene name.
        name: String,
        /// Its duration.
        duration: u64,
        /// Minimum allowed duration.
        min: u64,
    },
    /// Width or height is zero.
    InvalidDimensions {
        /// Configured width.
        width: u32,
        /// Configured height.
        height: u32,
    },
    /// The music fade-in and fade-out together outlast the video.
    MusicFadesTooLong {
        /// Fade-in frames.
        fade_in: u64,
        /// Fade-out frames.
        fade_out: u64,
        /// Video length in frames.
        total: u64,
    },
}

impl fmt::Display for VideoConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse { reason } => write!(f, "invalid scene plan: {reason}"),
            Self::Anim(e) => write!(f, "animation: {e}"),
            Self::Schedule(e) => write!(f, "scene schedule: {e}"),
            Self::NoScenes => write!(f, "scene plan is empty"),
            Self::UnknownScene { name } => write!(f, "unknown scene '{name}'"),
            Self::DurationMismatch { expected, actual } => write!(
                f,
                "scene durations sum to {actual} frames, expected {expected}"
            ),
            Self::SceneTooShort {
                name,
                duration,
                min,
            } => write!(
                f,
                "scene '{name}' lasts {duration} frames, needs at least {min}"
            ),
            Self::InvalidDimensions { width, height } => {
                write!(f, "output size {width}x{height} must be non-zero")
            }
            Self::MusicFadesTooLong {
                fade_in,
                fade_out,
                total,
            } => write!(
                f,
                "music fades of {fade_in} and {fade_out} frames do not fit in {total} frames"
            ),
        }
    }
}

impl Error for VideoConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Anim(e) => Some(e),
            Self::Schedule(e) => Some(e),
            _ => None,
        }
    }
}

impl From<AnimError> for VideoConfigError {
    fn from(e: AnimError) -> Self {
        Self::Anim(e)
    }
}

impl From<ScheduleError> for VideoConfigError {
    fn from(e: ScheduleError) -> Self {
        Self::Schedule(e)
    }
}
