//! Frame-driven animation engine
//!
//! The host calls [`Engine::tick`] once per animation frame with the elapsed
//! seconds, and [`Engine::refresh_triggers`] whenever scroll or layout may
//! have changed. Nothing runs on its own.

use std::collections::BTreeMap;

use super::{Animator, Program, Prop, Threshold, TimelineId, TriggerId};
use crate::dom::{Dom, DomError};

#[derive(Debug)]
struct TimelineState<N> {
    program: Program<N>,
    paused: bool,
    elapsed: f64,
    /// Steps before this index are finished and have had their final value written
    settled: usize,
}

impl<N> TimelineState<N> {
    fn is_finished(&self) -> bool {
        self.settled >= self.program.steps.len()
    }
}

#[derive(Debug)]
struct TriggerState<N> {
    root: N,
    threshold: Threshold,
    timeline: TimelineId,
}

/// Owns scheduled timelines and visibility triggers
#[derive(Debug)]
pub struct Engine<N> {
    next_id: u64,
    timelines: BTreeMap<TimelineId, TimelineState<N>>,
    triggers: BTreeMap<TriggerId, TriggerState<N>>,
}

impl<N> Default for Engine<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> Engine<N> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            timelines: BTreeMap::new(),
            triggers: BTreeMap::new(),
        }
    }

    fn allocate(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    pub fn timeline_count(&self) -> usize {
        self.timelines.len()
    }

    pub fn trigger_count(&self) -> usize {
        self.triggers.len()
    }

    pub fn program(&self, id: TimelineId) -> Option<&Program<N>> {
        self.timelines.get(&id).map(|t| &t.program)
    }

    pub fn elapsed(&self, id: TimelineId) -> Option<f64> {
        self.timelines.get(&id).map(|t| t.elapsed)
    }

    /// True when no playing timeline has work left
    pub fn is_idle(&self) -> bool {
        self.timelines.values().all(|t| t.paused || t.is_finished())
    }

    /// Fire every trigger whose root has crossed its threshold. Each trigger
    /// is removed as it fires, so it can never fire twice.
    pub fn refresh_triggers<D>(&mut self, dom: &D)
    where
        D: Dom<Node = N>,
    {
        let viewport_height = dom.viewport_height();
        let fired: Vec<TriggerId> = self
            .triggers
            .iter()
            .filter(|(_, trigger)| {
                dom.bounding_top(&trigger.root)
                    .map(|top| trigger.threshold.is_crossed(top, viewport_height))
                    .unwrap_or(false)
            })
            .map(|(id, _)| *id)
            .collect();

        for id in fired {
            if let Some(trigger) = self.triggers.remove(&id) {
                log::debug!("trigger {:?} fired, playing {:?}", id, trigger.timeline);
                if let Some(timeline) = self.timelines.get_mut(&trigger.timeline) {
                    timeline.paused = false;
                }
            }
        }
    }

    /// Advance every playing timeline by `dt` seconds and write the sampled
    /// values to the DOM.
    pub fn tick<D>(&mut self, dom: &mut D, dt: f64) -> Result<(), DomError>
    where
        D: Dom<Node = N>,
    {
        self.refresh_triggers(&*dom);

        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        for timeline in self.timelines.values_mut() {
            if timeline.paused || timeline.is_finished() {
                continue;
            }
            timeline.elapsed += dt;
            render(timeline, dom)?;
        }
        Ok(())
    }
}

fn render<D: Dom>(timeline: &mut TimelineState<D::Node>, dom: &mut D) -> Result<(), DomError> {
    let program = &timeline.program;
    let t = timeline.elapsed;
    let mut index = timeline.settled;
    while let Some(step) = program.steps.get(index) {
        let start = program.step_start(index);
        if t < start {
            break;
        }
        let local = t - start;
        step.value_at(local).apply(dom, step.target())?;
        if local < step.duration() {
            break;
        }
        index += 1;
    }
    timeline.settled = index;
    Ok(())
}

impl<D: Dom> Animator<D> for Engine<D::Node> {
    fn set(&mut self, dom: &mut D, targets: &[D::Node], props: &[Prop]) -> Result<(), DomError> {
        for target in targets {
            for prop in props {
                prop.apply(dom, target)?;
            }
        }
        Ok(())
    }

    fn timeline(&mut self, program: Program<D::Node>, paused: bool) -> TimelineId {
        let id = TimelineId(self.allocate());
        self.timelines.insert(
            id,
            TimelineState {
                program,
                paused,
                elapsed: 0.0,
                settled: 0,
            },
        );
        id
    }

    fn play(&mut self, id: TimelineId) {
        if let Some(timeline) = self.timelines.get_mut(&id) {
            timeline.paused = false;
        }
    }

    fn is_paused(&self, id: TimelineId) -> Option<bool> {
        self.timelines.get(&id).map(|t| t.paused)
    }

    fn kill(&mut self, id: TimelineId) {
        self.timelines.remove(&id);
    }

    fn once_visible(&mut self, root: &D::Node, threshold: Threshold, timeline: TimelineId) -> TriggerId {
        let id = TriggerId(self.allocate());
        self.triggers.insert(
            id,
            TriggerState {
                root: root.clone(),
                threshold,
                timeline,
            },
        );
        id
    }

    fn kill_trigger(&mut self, id: TriggerId) {
        self.triggers.remove(&id);
    }
}
