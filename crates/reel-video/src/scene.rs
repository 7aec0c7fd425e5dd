//! Scenes: a named element tree placed on the timeline as one
//! duration-bound event.

use serde::Serialize;

use reel_anim::LocalClock;
use reel_core::{ElementId, EventSpan, SceneId};
use reel_engine::Animate;

use crate::element::{ElementFrame, ElementKind, ElementSpec};

/// The element tree of one scene, independent of where it is placed.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneSpec {
    name: String,
    elements: Vec<ElementSpec>,
}

impl SceneSpec {
    /// Build from top-level elements, numbering every element in the
    /// tree in pre-order so ids follow paint order.
    pub fn new(name: impl Into<String>, mut elements: Vec<ElementSpec>) -> Self {
        let mut next = 0u32;
        for element in &mut elements {
            number(element, &mut next);
        }
        Self {
            name: name.into(),
            elements,
        }
    }

    /// Scene name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Top-level elements in paint order.
    pub fn elements(&self) -> &[ElementSpec] {
        &self.elements
    }

    /// Elements in the whole tree.
    pub fn element_count(&self) -> usize {
        self.elements.iter().map(ElementSpec::count).sum()
    }

    /// Evaluate every top-level element at `clock`.
    pub fn frames(&self, clock: LocalClock) -> Vec<ElementFrame> {
        self.elements.iter().map(|e| e.frame(clock)).collect()
    }
}

fn number(element: &mut ElementSpec, next: &mut u32) {
    element.id = ElementId(*next);
    *next += 1;
    if let ElementKind::Group { children } = &mut element.kind {
        for child in children {
            number(child, next);
        }
    }
}

/// A scene placed in a video plan.
///
/// As a payload it animates against the scene-local clock; its opacity
/// fades in over the first `fade` ticks of its window and out over the
/// last `fade`, so adjacent scenes cross through black at the boundary.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Slot in the plan.
    pub id: SceneId,
    /// Element tree.
    pub spec: SceneSpec,
    /// Cross-fade length at both ends.
    pub fade: u64,
}

impl Animate for Scene {
    type Output = SceneFrame;

    fn animate(&self, clock: LocalClock, span: EventSpan) -> SceneFrame {
        let opacity = match span.duration {
            Some(duration) => clock.fade_in_out(duration, self.fade),
            None => clock.ramp(self.fade),
        };
        SceneFrame {
            id: self.id,
            name: self.spec.name.clone(),
            local_tick: clock.elapsed(),
            opacity,
            elements: self.spec.frames(clock),
        }
    }
}

/// Derived values of one scene at one tick.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneFrame {
    /// Slot in the plan.
    pub id: SceneId,
    /// Scene name.
    pub name: String,
    /// Ticks since the scene started.
    pub local_tick: i64,
    /// Scene opacity, applied on top of every element's own.
    pub opacity: f64,
    /// Top-level element frames in paint order.
    pub elements: Vec<ElementFrame>,
}

impl SceneFrame {
    /// Depth-first search for an element by label.
    pub fn find(&self, label: &str) -> Option<&ElementFrame> {
        self.elements.iter().find_map(|e| e.find(label))
    }
}
