//! Declarative tweens and timelines
//!
//! A [`Program`] is a start offset followed by steps that run back to back:
//! tweens interpolate one property over a duration, sets apply instantly.
//! Programs are pure data; an [`Animator`] owns them once scheduled and is
//! responsible for writing sampled values to the DOM.
//!
//! ```ignore
//! let program = Program::new(0.15)
//!     .tween(block, Prop::ScaleX(0.0), Prop::ScaleX(1.0), 0.75, Ease::InOutQuart)
//!     .set(line, Prop::Opacity(1.0));
//! let id = animator.timeline(program, false);
//! ```

pub mod engine;

pub use engine::Engine;

use crate::dom::{Dom, DomError};

/// Maps normalized time in [0,1] to normalized progress
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Ease {
    Linear,
    InQuad,
    OutQuad,
    InOutQuad,
    InCubic,
    OutCubic,
    InOutCubic,
    InQuart,
    OutQuart,
    InOutQuart,
}

impl Ease {
    #[inline]
    pub fn sample(self, x: f64) -> f64 {
        let t = x.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::InQuad => t * t,
            Ease::OutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Ease::InOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) * 0.5
                }
            }
            Ease::InCubic => t * t * t,
            Ease::OutCubic => 1.0 - (1.0 - t).powi(3),
            Ease::InOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) * 0.5
                }
            }
            Ease::InQuart => t.powi(4),
            Ease::OutQuart => 1.0 - (1.0 - t).powi(4),
            Ease::InOutQuart => {
                if t < 0.5 {
                    8.0 * t.powi(4)
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(4) * 0.5
                }
            }
        }
    }
}

/// Horizontal anchor for `transform-origin`
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Origin {
    Left,
    Right,
}

impl Origin {
    pub fn css(self) -> &'static str {
        match self {
            Origin::Left => "left center",
            Origin::Right => "right center",
        }
    }
}

/// An animatable property with its value
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Prop {
    Opacity(f64),
    ScaleX(f64),
    TransformOrigin(Origin),
}

impl Prop {
    /// CSS property name and value
    pub fn css(&self) -> (&'static str, String) {
        match self {
            Prop::Opacity(v) => ("opacity", format_number(*v)),
            Prop::ScaleX(v) => ("transform", format!("scaleX({})", format_number(*v))),
            Prop::TransformOrigin(origin) => ("transform-origin", origin.css().to_string()),
        }
    }

    /// Interpolate towards `to`. Discrete properties jump at the end.
    pub fn lerp(&self, to: &Prop, k: f64) -> Prop {
        match (self, to) {
            (Prop::Opacity(a), Prop::Opacity(b)) => Prop::Opacity(a + (b - a) * k),
            (Prop::ScaleX(a), Prop::ScaleX(b)) => Prop::ScaleX(a + (b - a) * k),
            _ => {
                if k >= 1.0 {
                    *to
                } else {
                    *self
                }
            }
        }
    }

    pub fn apply<D: Dom>(&self, dom: &mut D, target: &D::Node) -> Result<(), DomError> {
        let (property, value) = self.css();
        dom.set_style(target, property, &value)
    }
}

// Trim float noise so styles read `scaleX(0.5)` rather than `scaleX(0.5000000001)`
fn format_number(v: f64) -> String {
    let rounded = (v * 10_000.0).round() / 10_000.0;
    if rounded == 0.0 {
        "0".to_string()
    } else {
        format!("{}", rounded)
    }
}

/// One entry of a [`Program`]
#[derive(Debug, Clone, PartialEq)]
pub enum Step<N> {
    Tween {
        target: N,
        from: Prop,
        to: Prop,
        duration: f64,
        ease: Ease,
    },
    Set {
        target: N,
        prop: Prop,
    },
}

impl<N> Step<N> {
    pub fn duration(&self) -> f64 {
        match self {
            Step::Tween { duration, .. } => duration.max(0.0),
            Step::Set { .. } => 0.0,
        }
    }

    pub fn target(&self) -> &N {
        match self {
            Step::Tween { target, .. } | Step::Set { target, .. } => target,
        }
    }

    /// Value at `local` seconds after the step starts
    pub fn value_at(&self, local: f64) -> Prop {
        match self {
            Step::Tween {
                from,
                to,
                duration,
                ease,
                ..
            } => {
                let u = if *duration <= 0.0 { 1.0 } else { local / duration };
                from.lerp(to, ease.sample(u))
            }
            Step::Set { prop, .. } => *prop,
        }
    }
}

/// Sequenced animation: `start_offset` seconds of wait, then each step in turn
#[derive(Debug, Clone, PartialEq)]
pub struct Program<N> {
    pub start_offset: f64,
    pub steps: Vec<Step<N>>,
}

impl<N> Program<N> {
    pub fn new(start_offset: f64) -> Self {
        Self {
            start_offset: start_offset.max(0.0),
            steps: Vec::new(),
        }
    }

    pub fn tween(mut self, target: N, from: Prop, to: Prop, duration: f64, ease: Ease) -> Self {
        self.steps.push(Step::Tween {
            target,
            from,
            to,
            duration,
            ease,
        });
        self
    }

    pub fn set(mut self, target: N, prop: Prop) -> Self {
        self.steps.push(Step::Set { target, prop });
        self
    }

    /// Start time of step `index`, measured from when the program starts
    /// playing. Indices past the end give the end of the program.
    pub fn step_start(&self, index: usize) -> f64 {
        let index = index.min(self.steps.len());
        self.start_offset + self.steps[..index].iter().map(Step::duration).sum::<f64>()
    }

    pub fn total_duration(&self) -> f64 {
        self.step_start(self.steps.len())
    }

    /// Every started step with its value at `t`, in program order. Later
    /// entries win when two steps touch the same property.
    pub fn sample(&self, t: f64) -> Vec<(&N, Prop)> {
        let mut out = Vec::new();
        let mut start = self.start_offset;
        for step in &self.steps {
            if t < start {
                break;
            }
            out.push((step.target(), step.value_at(t - start)));
            start += step.duration();
        }
        out
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimelineId(pub u64);

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TriggerId(pub u64);

/// Fires once the watched element's top edge is at or above
/// `viewport_fraction` of the viewport height ("top 90%").
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Threshold {
    pub viewport_fraction: f64,
}

impl Threshold {
    pub const fn top_at(viewport_fraction: f64) -> Self {
        Self { viewport_fraction }
    }

    pub fn is_crossed(&self, element_top: f64, viewport_height: f64) -> bool {
        element_top <= viewport_height * self.viewport_fraction
    }
}

/// Animation capability consumed by the reveal pipeline
pub trait Animator<D: Dom> {
    /// Assign `props` to every target immediately
    fn set(&mut self, dom: &mut D, targets: &[D::Node], props: &[Prop]) -> Result<(), DomError>;

    /// Take ownership of a program; it starts counting time unless `paused`
    fn timeline(&mut self, program: Program<D::Node>, paused: bool) -> TimelineId;

    fn play(&mut self, id: TimelineId);

    /// `None` once the timeline has been killed
    fn is_paused(&self, id: TimelineId) -> Option<bool>;

    /// Stop and discard. Unknown ids are ignored.
    fn kill(&mut self, id: TimelineId);

    /// Play `timeline` the first time `root` crosses `threshold`
    fn once_visible(
        &mut self,
        root: &D::Node,
        threshold: Threshold,
        timeline: TimelineId,
    ) -> TriggerId;

    fn kill_trigger(&mut self, id: TriggerId);
}
