//! Animated elements: one tagged variant, one evaluation path.
//!
//! Every element is an [`ElementSpec`]: a [`ElementKind`] plus the timing
//! shared by all kinds (`delay`, `fade`, optional [`Motion`] and
//! [`Tint`]). [`ElementSpec::frame`] turns a spec and its parent's
//! [`LocalClock`] into an [`ElementFrame`]. Groups pass their own
//! delayed clock to their children, so nested timing is a subtraction.
//!
//! Frame opacity is local. A painter multiplies it by the opacity of
//! every ancestor and of the enclosing scene.

use std::fmt;

use serde::{Serialize, Serializer};

use reel_anim::{blink, pulse, typewriter, InterpolationWindow, LocalClock, SpringConfig};
use reel_core::{ElementId, EventSpan};
use reel_engine::Animate;

// ── Colour ──────────────────────────────────────────────────────

/// An sRGB colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Colour from `0xRRGGBB`.
    pub const fn hex(v: u32) -> Self {
        Self((v >> 16) as u8, (v >> 8) as u8, v as u8)
    }

    /// Per-channel linear blend, `t` clamped to `[0, 1]`.
    pub fn mix(self, other: Rgb, t: f64) -> Rgb {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let lerp = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * t).round() as u8;
        Rgb(
            lerp(self.0, other.0),
            lerp(self.1, other.1),
            lerp(self.2, other.2),
        )
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ── Timing modifiers ────────────────────────────────────────────

/// Progress curve of an entrance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Ease {
    /// Physical spring; may overshoot 1 before settling.
    Spring(SpringConfig),
    /// Clamped linear ramp over `over` ticks.
    Linear {
        /// Ramp length.
        over: u64,
    },
}

impl Ease {
    /// Progress at `clock`: 0 before the start, settling at 1.
    pub fn progress(&self, clock: LocalClock) -> f64 {
        match self {
            Self::Spring(config) => clock.spring(config),
            Self::Linear { over } => clock.ramp(*over),
        }
    }
}

/// Entrance movement: the element starts displaced by `offset` and
/// scaled by `scale_from`, and reaches its rest pose as the ease
/// progresses.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Motion {
    /// Progress curve.
    pub ease: Ease,
    /// Starting `(x, y)` displacement in pixels.
    pub offset: (f64, f64),
    /// Starting scale.
    pub scale_from: f64,
}

impl Motion {
    /// Rise into place from `dy` pixels below.
    pub fn rise(ease: Ease, dy: f64) -> Self {
        Self {
            ease,
            offset: (0.0, dy),
            scale_from: 1.0,
        }
    }

    /// Slide in horizontally from `dx` pixels away.
    pub fn slide(ease: Ease, dx: f64) -> Self {
        Self {
            ease,
            offset: (dx, 0.0),
            scale_from: 1.0,
        }
    }

    /// Grow from `scale_from` in place.
    pub fn grow(ease: Ease, scale_from: f64) -> Self {
        Self {
            ease,
            offset: (0.0, 0.0),
            scale_from,
        }
    }

    /// Add a starting scale to this motion.
    pub fn scaled_from(mut self, scale_from: f64) -> Self {
        self.scale_from = scale_from;
        self
    }

    /// Translation and scale at `progress`.
    pub fn pose(&self, progress: f64) -> ((f64, f64), f64) {
        let rest = 1.0 - progress;
        (
            (self.offset.0 * rest, self.offset.1 * rest),
            self.scale_from + (1.0 - self.scale_from) * progress,
        )
    }
}

/// Colour transition from `from` to `to` over `over` ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tint {
    /// Colour at the element's start.
    pub from: Rgb,
    /// Colour once the transition ends.
    pub to: Rgb,
    /// Transition length.
    pub over: u64,
}

impl Tint {
    /// A colour that never changes.
    pub fn solid(color: Rgb) -> Self {
        Self {
            from: color,
            to: color,
            over: 0,
        }
    }

    /// Colour at `clock`.
    pub fn color_at(&self, clock: LocalClock) -> Rgb {
        self.from.mix(self.to, clock.ramp(self.over))
    }
}

/// How a text element reveals its content.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TextReveal {
    /// All at once; the fade does the work.
    Whole,
    /// Character by character.
    Typewriter {
        /// Characters revealed per tick.
        chars_per_tick: f64,
    },
}

// ── ElementKind ─────────────────────────────────────────────────

/// What an element is.
#[derive(Clone, Debug, PartialEq)]
pub enum ElementKind {
    /// A line of text.
    Text {
        /// Full content.
        text: String,
        /// Reveal style.
        reveal: TextReveal,
    },
    /// A card or box with a title and optional detail line.
    Panel {
        /// Title line.
        title: String,
        /// Secondary line.
        detail: Option<String>,
    },
    /// A connector drawn from tail to head over `draw` ticks.
    Arrow {
        /// Draw length.
        draw: u64,
    },
    /// A bar segment filling to `share` of its track over `draw` ticks.
    Bar {
        /// Fill length.
        draw: u64,
        /// Final fraction of the track.
        share: f64,
    },
    /// A number driven through `window` by the local clock.
    ///
    /// The value is never rounded here.
    Counter {
        /// Keyframes over local ticks.
        window: InterpolationWindow,
        /// Unit appended when displayed, e.g. `"%"`.
        unit: String,
    },
    /// A pulsing halo with a `period`-tick cycle.
    Glow {
        /// Cycle length.
        period: u64,
    },
    /// A blinking caret, visible until local tick `until`.
    Cursor {
        /// Ticks visible, then ticks hidden.
        half_period: u64,
        /// First local tick at which the caret is gone.
        until: i64,
    },
    /// Elements timed relative to this one.
    Group {
        /// Children in paint order.
        children: Vec<ElementSpec>,
    },
}

// ── ElementSpec ─────────────────────────────────────────────────

/// Default opacity ramp, in ticks.
pub const DEFAULT_FADE: u64 = 15;

/// Static description of one animated element.
///
/// Built with the kind constructors and chained modifiers:
///
/// ```
/// use reel_anim::LocalClock;
/// use reel_core::FrameRate;
/// use reel_video::{ElementSpec, Ease, Motion};
///
/// let title = ElementSpec::text("The Problem")
///     .at(10)
///     .fade(20)
///     .with_motion(Motion::rise(Ease::Linear { over: 20 }, 40.0));
///
/// let before = title.frame(LocalClock::at(5, FrameRate::VIDEO));
/// assert_eq!(before.opacity, 0.0);
///
/// let mid = title.frame(LocalClock::at(20, FrameRate::VIDEO));
/// assert_eq!(mid.opacity, 0.5);
/// assert_eq!(mid.translate, (0.0, 20.0));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ElementSpec {
    /// Identifier within the scene. Assigned by
    /// [`SceneSpec::new`](crate::SceneSpec::new).
    pub id: ElementId,
    /// Short name for inspection.
    pub label: String,
    /// Local ticks after the parent's zero point at which this starts.
    pub delay: i64,
    /// Opacity ramp length.
    pub fade: u64,
    /// Entrance movement.
    pub motion: Option<Motion>,
    /// Colour transition.
    pub tint: Option<Tint>,
    /// What the element is.
    pub kind: ElementKind,
}

impl ElementSpec {
    /// An element of `kind` starting at its parent's zero point.
    pub fn new(label: impl Into<String>, kind: ElementKind) -> Self {
        Self {
            id: ElementId(0),
            label: label.into(),
            delay: 0,
            fade: DEFAULT_FADE,
            motion: None,
            tint: None,
            kind,
        }
    }

    /// Text shown whole.
    pub fn text(text: impl Into<String>) -> Self {
        let text = text.into();
        Self::new(
            "text",
            ElementKind::Text {
                text,
                reveal: TextReveal::Whole,
            },
        )
    }

    /// Text typed out at `chars_per_tick`.
    pub fn typed(text: impl Into<String>, chars_per_tick: f64) -> Self {
        Self::new(
            "typed",
            ElementKind::Text {
                text: text.into(),
                reveal: TextReveal::Typewriter { chars_per_tick },
            },
        )
    }

    /// A panel with a title.
    pub fn panel(title: impl Into<String>) -> Self {
        Self::new(
            "panel",
            ElementKind::Panel {
                title: title.into(),
                detail: None,
            },
        )
    }

    /// An arrow drawn over `draw` ticks.
    pub fn arrow(draw: u64) -> Self {
        Self::new("arrow", ElementKind::Arrow { draw })
    }

    /// A bar filling to `share` over `draw` ticks.
    pub fn bar(draw: u64, share: f64) -> Self {
        Self::new("bar", ElementKind::Bar { draw, share })
    }

    /// A counter over `window`.
    pub fn counter(window: InterpolationWindow, unit: impl Into<String>) -> Self {
        Self::new(
            "counter",
            ElementKind::Counter {
                window,
                unit: unit.into(),
            },
        )
    }

    /// A glow pulsing every `period` ticks.
    pub fn glow(period: u64) -> Self {
        Self::new("glow", ElementKind::Glow { period })
    }

    /// A caret blinking every `half_period` ticks until local tick `until`.
    pub fn cursor(half_period: u64, until: i64) -> Self {
        Self::new("cursor", ElementKind::Cursor { half_period, until })
    }

    /// A group of children timed from this element's start.
    pub fn group(children: Vec<ElementSpec>) -> Self {
        Self::new("group", ElementKind::Group { children })
    }

    /// Rename.
    pub fn named(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Start `delay` ticks after the parent.
    pub fn at(mut self, delay: i64) -> Self {
        self.delay = delay;
        self
    }

    /// Opacity ramp over `fade` ticks.
    pub fn fade(mut self, fade: u64) -> Self {
        self.fade = fade;
        self
    }

    /// Entrance movement.
    pub fn with_motion(mut self, motion: Motion) -> Self {
        self.motion = Some(motion);
        self
    }

    /// Colour transition.
    pub fn with_tint(mut self, tint: Tint) -> Self {
        self.tint = Some(tint);
        self
    }

    /// Detail line of a panel. No effect on other kinds.
    pub fn detail(mut self, text: impl Into<String>) -> Self {
        if let ElementKind::Panel { detail, .. } = &mut self.kind {
            *detail = Some(text.into());
        }
        self
    }

    /// Children, if this is a group.
    pub fn children(&self) -> &[ElementSpec] {
        match &self.kind {
            ElementKind::Group { children } => children,
            _ => &[],
        }
    }

    /// Number of elements in this subtree, including this one.
    pub fn count(&self) -> usize {
        1 + self.children().iter().map(ElementSpec::count).sum::<usize>()
    }

    /// Evaluate at `parent`, the clock of the enclosing scene or group.
    pub fn frame(&self, parent: LocalClock) -> ElementFrame {
        let clock = parent.delayed(self.delay);
        let progress = match &self.motion {
            Some(motion) => motion.ease.progress(clock),
            None => clock.ramp(self.fade),
        };
        let (translate, scale) = match &self.motion {
            Some(motion) => motion.pose(progress),
            None => ((0.0, 0.0), 1.0),
        };

        let mut frame = ElementFrame {
            id: self.id,
            label: self.label.clone(),
            local_tick: clock.elapsed(),
            opacity: clock.ramp(self.fade),
            translate,
            scale,
            progress,
            value: None,
            unit: None,
            text: None,
            detail: None,
            color: self.tint.map(|t| t.color_at(clock)),
            intensity: 1.0,
            children: Vec::new(),
        };

        match &self.kind {
            ElementKind::Text { text, reveal } => {
                frame.text = Some(match reveal {
                    TextReveal::Whole => text.clone(),
                    TextReveal::Typewriter { chars_per_tick } => {
                        typewriter(text, clock.elapsed(), *chars_per_tick).to_string()
                    }
                });
            }
            ElementKind::Panel { title, detail } => {
                frame.text = Some(title.clone());
                frame.detail = detail.clone();
            }
            ElementKind::Arrow { draw } => frame.progress = clock.ramp(*draw),
            ElementKind::Bar { draw, share } => {
                frame.progress = clock.ramp(*draw);
                frame.value = Some(share * frame.progress);
            }
            ElementKind::Counter { window, unit } => {
                frame.value = Some(clock.interpolate(window));
                frame.unit = Some(unit.clone());
            }
            ElementKind::Glow { period } => frame.intensity = pulse(clock.elapsed(), *period),
            ElementKind::Cursor { half_period, until } => {
                let visible = clock.started()
                    && clock.elapsed() < *until
                    && blink(clock.elapsed(), *half_period);
                if !visible {
                    frame.opacity = 0.0;
                }
            }
            ElementKind::Group { children } => {
                frame.children = children.iter().map(|c| c.frame(clock)).collect();
            }
        }
        frame
    }
}

impl Animate for ElementSpec {
    type Output = ElementFrame;

    /// Evaluates with `clock` as the parent clock; `delay` still applies.
    fn animate(&self, clock: LocalClock, _span: EventSpan) -> ElementFrame {
        self.frame(clock)
    }
}

// ── ElementFrame ────────────────────────────────────────────────

/// Derived values of one element at one tick.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementFrame {
    /// Element id within the scene.
    pub id: ElementId,
    /// Element label.
    pub label: String,
    /// Ticks since the element's own start; negative before it.
    pub local_tick: i64,
    /// Local opacity in `[0, 1]`.
    pub opacity: f64,
    /// `(x, y)` displacement from the rest position.
    pub translate: (f64, f64),
    /// Scale factor.
    pub scale: f64,
    /// Entrance progress, or draw progress for arrows and bars.
    pub progress: f64,
    /// Unrounded counter or bar value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    /// Counter unit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    /// Visible text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Panel detail line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// Current tint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Rgb>,
    /// Glow intensity; 1 for other kinds.
    pub intensity: f64,
    /// Child frames of a group.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ElementFrame>,
}

impl ElementFrame {
    /// `value` rounded for display.
    pub fn display_value(&self) -> Option<f64> {
        self.value.map(f64::round)
    }

    /// Counter text as painted, e.g. `"58%"`.
    pub fn display_text(&self) -> Option<String> {
        let value = self.display_value()?;
        Some(format!("{value}{}", self.unit.as_deref().unwrap_or("")))
    }

    /// Whether anything would be painted.
    pub fn is_visible(&self) -> bool {
        self.opacity > 0.0
    }

    /// Depth-first search of this subtree.
    pub fn find(&self, label: &str) -> Option<&ElementFrame> {
        if self.label == label {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(label))
    }
}
