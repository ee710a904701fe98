//! Line-by-line text reveal
//!
//! [`RevealOrchestrator`] splits the text under a content root into lines,
//! wraps each line with a colored overlay block and schedules one timeline per
//! line: the block wipes in from the left, the text is switched on underneath,
//! and the block wipes out to the right.
//!
//! Everything a mount creates lives in one [`RevealCycle`]. Unmounting
//! consumes the cycle: timelines and triggers are killed, the mutation ledger
//! is rolled back and the splits are reverted, leaving the root as it was.

pub mod timeline;
pub mod wrap;

pub use timeline::{build_reveal_program, start_offset, VISIBILITY_THRESHOLD};
pub use wrap::{wrap_line, WrappedLine, BLOCK_CLASS, WRAPPER_CLASS};

use crate::anim::{Animator, Origin, Prop, TimelineId, TriggerId};
use crate::config::RevealConfig;
use crate::dom::{Dom, DomError};
use crate::error::RevealError;
use crate::ledger::MutationLedger;
use crate::split::{LineSplitter, Split};

/// Marks a root whose element children are revealed independently
pub const HOST_ATTR: &str = "data-reveal-host";
pub const HOST_MULTI: &str = "multi";

/// Flag `root` so each direct element child becomes its own reveal target
pub fn mark_multi_host<D: Dom>(dom: &mut D, root: &D::Node) -> Result<(), DomError> {
    dom.set_attribute(root, HOST_ATTR, HOST_MULTI)
}

pub fn is_multi_host<D: Dom>(dom: &D, root: &D::Node) -> bool {
    dom.attribute(root, HOST_ATTR).as_deref() == Some(HOST_MULTI)
}

/// Elements that get split: the root itself, or its children for a multi host
pub fn targets<D: Dom>(dom: &D, root: &D::Node) -> Vec<D::Node> {
    if is_multi_host(dom, root) {
        dom.element_children(root)
    } else {
        vec![root.clone()]
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MountOutcome {
    /// No root, or the root is not in the document
    Skipped,
    /// Configuration was identical, the running reveal was left alone
    Unchanged,
    Mounted { lines: usize },
}

/// Resources owned by one activation
#[derive(Debug)]
pub struct RevealCycle<N, H> {
    root: N,
    splits: Vec<Split<N, H>>,
    ledger: MutationLedger<N>,
    lines: Vec<WrappedLine<N>>,
    timelines: Vec<TimelineId>,
    triggers: Vec<TriggerId>,
}

impl<N: Clone + PartialEq + std::fmt::Debug, H> RevealCycle<N, H> {
    fn new(root: N) -> Self {
        Self {
            root,
            splits: Vec::new(),
            ledger: MutationLedger::new(),
            lines: Vec::new(),
            timelines: Vec::new(),
            triggers: Vec::new(),
        }
    }

    pub fn root(&self) -> &N {
        &self.root
    }

    pub fn lines(&self) -> &[WrappedLine<N>] {
        &self.lines
    }

    pub fn timelines(&self) -> &[TimelineId] {
        &self.timelines
    }

    pub fn triggers(&self) -> &[TriggerId] {
        &self.triggers
    }

    /// Undo everything this cycle did. Keeps going after a failure and
    /// returns the first error at the end.
    fn teardown<D, S, A>(self, dom: &mut D, splitter: &mut S, animator: &mut A) -> Result<(), RevealError>
    where
        D: Dom<Node = N>,
        S: LineSplitter<D, Handle = H>,
        A: Animator<D>,
    {
        for id in &self.triggers {
            animator.kill_trigger(*id);
        }
        for id in &self.timelines {
            animator.kill(*id);
        }

        let (report, rollback) = self.ledger.rollback(dom);
        let mut first_error = rollback.err().map(RevealError::from);
        log::debug!(
            "rolled back {} mutations ({} skipped, {} failed)",
            report.reverted,
            report.skipped,
            report.failed
        );

        for split in self.splits {
            if let Err(e) = splitter.revert(dom, split) {
                log::warn!("failed to revert split: {}", e);
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

/// Owns the injected splitter and animator plus the live cycle, if any
pub struct RevealOrchestrator<D, S, A>
where
    D: Dom,
    S: LineSplitter<D>,
    A: Animator<D>,
{
    config: RevealConfig,
    splitter: S,
    animator: A,
    root: Option<D::Node>,
    cycle: Option<RevealCycle<D::Node, S::Handle>>,
}

impl<D, S, A> RevealOrchestrator<D, S, A>
where
    D: Dom,
    S: LineSplitter<D>,
    A: Animator<D>,
{
    pub fn new(config: RevealConfig, splitter: S, animator: A) -> Result<Self, RevealError> {
        config.validate()?;
        Ok(Self {
            config,
            splitter,
            animator,
            root: None,
            cycle: None,
        })
    }

    pub fn config(&self) -> &RevealConfig {
        &self.config
    }

    pub fn animator(&self) -> &A {
        &self.animator
    }

    pub fn animator_mut(&mut self) -> &mut A {
        &mut self.animator
    }

    pub fn cycle(&self) -> Option<&RevealCycle<D::Node, S::Handle>> {
        self.cycle.as_ref()
    }

    pub fn is_mounted(&self) -> bool {
        self.cycle.is_some()
    }

    pub fn line_count(&self) -> usize {
        self.cycle.as_ref().map(|c| c.lines.len()).unwrap_or(0)
    }

    /// Build a reveal under `root`. Any previous cycle is torn down first.
    /// A missing or detached root is not an error; nothing happens, though a
    /// later [`reconfigure`](Self::reconfigure) retries the same root.
    pub fn mount(&mut self, dom: &mut D, root: Option<&D::Node>) -> Result<MountOutcome, RevealError> {
        self.discard_cycle(dom);
        self.root = root.cloned();

        let Some(root) = root.filter(|r| dom.is_attached(r)) else {
            log::debug!("reveal root missing or detached, skipping mount");
            return Ok(MountOutcome::Skipped);
        };

        let mut cycle = RevealCycle::new(root.clone());
        if let Err(e) = self.build(dom, &mut cycle) {
            log::error!("reveal mount failed: {}", e);
            if let Err(cleanup) = cycle.teardown(dom, &mut self.splitter, &mut self.animator) {
                log::warn!("cleanup after failed mount also failed: {}", cleanup);
            }
            return Err(e);
        }

        let lines = cycle.lines.len();
        log::debug!(
            "reveal mounted: {} lines, {}",
            lines,
            if self.config.animate_on_scroll { "scroll-gated" } else { "immediate" }
        );
        self.cycle = Some(cycle);
        Ok(MountOutcome::Mounted { lines })
    }

    fn build(&mut self, dom: &mut D, cycle: &mut RevealCycle<D::Node, S::Handle>) -> Result<(), RevealError> {
        for target in targets(&*dom, &cycle.root) {
            let split = self.splitter.split(dom, &target)?;
            cycle.splits.push(split);
        }

        let lines: Vec<D::Node> = cycle
            .splits
            .iter()
            .flat_map(|s| s.lines.iter().cloned())
            .collect();
        for line in &lines {
            let wrapped = wrap_line(dom, &mut cycle.ledger, line, &self.config.block_color)?;
            cycle.lines.push(wrapped);
        }

        // Hide everything before any timeline exists
        let blocks: Vec<D::Node> = cycle.lines.iter().map(|w| w.block.clone()).collect();
        self.animator.set(dom, &lines, &[Prop::Opacity(0.0)])?;
        self.animator.set(
            dom,
            &blocks,
            &[Prop::ScaleX(0.0), Prop::TransformOrigin(Origin::Left)],
        )?;

        let gated = self.config.animate_on_scroll;
        for (index, wrapped) in cycle.lines.iter().enumerate() {
            let program =
                build_reveal_program(wrapped.block.clone(), wrapped.line.clone(), index, &self.config);
            let timeline = self.animator.timeline(program, gated);
            cycle.timelines.push(timeline);
            if gated {
                let trigger = self
                    .animator
                    .once_visible(&cycle.root, VISIBILITY_THRESHOLD, timeline);
                cycle.triggers.push(trigger);
            }
        }
        Ok(())
    }

    /// Tear down the live cycle, if any
    pub fn unmount(&mut self, dom: &mut D) -> Result<(), RevealError> {
        self.root = None;
        match self.cycle.take() {
            Some(cycle) => {
                log::debug!("reveal unmounting {} lines", cycle.lines.len());
                cycle.teardown(dom, &mut self.splitter, &mut self.animator)
            }
            None => Ok(()),
        }
    }

    /// Tear down the live cycle ahead of a rebuild. A teardown error is
    /// logged and the rebuild goes ahead.
    fn discard_cycle(&mut self, dom: &mut D) {
        if let Some(cycle) = self.cycle.take() {
            log::debug!("reveal rebuilding, dropping {} lines", cycle.lines.len());
            if let Err(e) = cycle.teardown(dom, &mut self.splitter, &mut self.animator) {
                log::warn!("teardown before rebuild failed: {}", e);
            }
        }
    }

    /// Swap the configuration. If a reveal is active, a different
    /// configuration tears it down and rebuilds it on the same root; an
    /// identical one is a no-op. When inactive the config is just stored.
    pub fn reconfigure(&mut self, dom: &mut D, config: RevealConfig) -> Result<MountOutcome, RevealError> {
        if config == self.config {
            return Ok(MountOutcome::Unchanged);
        }
        config.validate()?;
        let root = self.root.clone();
        self.discard_cycle(dom);
        self.config = config;
        match root {
            Some(root) => self.mount(dom, Some(&root)),
            None => Ok(MountOutcome::Skipped),
        }
    }
}
