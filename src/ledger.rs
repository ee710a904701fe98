//! Mutation ledger
//!
//! Every structural change the reveal makes to the page goes through
//! [`MutationLedger::apply`], which performs it and records it. Rolling back
//! replays the inverses newest-first, so restoration never has to rediscover
//! synthetic nodes by class name.

use crate::dom::{Dom, DomError};

/// A reversible structural change
#[derive(Clone, Debug, PartialEq)]
pub enum Mutation<N> {
    /// Insert a fresh `wrapper` into `parent` just before `before`
    InsertWrapper { parent: N, wrapper: N, before: N },
    /// Move `node` into `wrapper` (which sits where `node` used to be)
    MoveInto { node: N, wrapper: N },
    /// Append a fresh `overlay` to the end of `wrapper`
    AppendOverlay { wrapper: N, overlay: N },
}

/// What happened to one entry during rollback
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Undo {
    Reverted,
    /// The page no longer looks the way the entry left it
    Skipped,
}

impl<N: Clone + PartialEq + std::fmt::Debug> Mutation<N> {
    pub fn execute<D: Dom<Node = N>>(&self, dom: &mut D) -> Result<(), DomError> {
        match self {
            Mutation::InsertWrapper {
                parent,
                wrapper,
                before,
            } => dom.insert_before(parent, wrapper, Some(before)),
            Mutation::MoveInto { node, wrapper } => dom.append_child(wrapper, node),
            Mutation::AppendOverlay { wrapper, overlay } => dom.append_child(wrapper, overlay),
        }
    }

    pub fn undo<D: Dom<Node = N>>(&self, dom: &mut D) -> Result<Undo, DomError> {
        match self {
            Mutation::InsertWrapper { wrapper, .. } => match dom.parent(wrapper) {
                Some(parent) => {
                    dom.remove_child(&parent, wrapper)?;
                    Ok(Undo::Reverted)
                }
                None => Ok(Undo::Skipped),
            },
            Mutation::MoveInto { node, wrapper } => {
                // Put the node back where the wrapper stands; the wrapper
                // itself is removed by the older InsertWrapper entry.
                if dom.parent(node).as_ref() != Some(wrapper) {
                    return Ok(Undo::Skipped);
                }
                match dom.parent(wrapper) {
                    Some(parent) => {
                        dom.insert_before(&parent, node, Some(wrapper))?;
                        Ok(Undo::Reverted)
                    }
                    None => Ok(Undo::Skipped),
                }
            }
            Mutation::AppendOverlay { wrapper, overlay } => {
                if dom.parent(overlay).as_ref() != Some(wrapper) {
                    return Ok(Undo::Skipped);
                }
                dom.remove_child(wrapper, overlay)?;
                Ok(Undo::Reverted)
            }
        }
    }
}

/// Totals from [`MutationLedger::rollback`]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RollbackReport {
    pub reverted: usize,
    pub skipped: usize,
    pub failed: usize,
}

#[derive(Clone, Debug)]
pub struct MutationLedger<N> {
    entries: Vec<Mutation<N>>,
}

impl<N> Default for MutationLedger<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> MutationLedger<N> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Mutation<N>] {
        &self.entries
    }
}

impl<N: Clone + PartialEq + std::fmt::Debug> MutationLedger<N> {
    /// Execute `mutation` and record it. Nothing is recorded if it fails.
    pub fn apply<D: Dom<Node = N>>(&mut self, dom: &mut D, mutation: Mutation<N>) -> Result<(), DomError> {
        mutation.execute(dom)?;
        self.entries.push(mutation);
        Ok(())
    }

    /// Undo every entry, newest first. A failing entry does not stop the
    /// pass; the first error is returned once everything has been tried.
    pub fn rollback<D: Dom<Node = N>>(self, dom: &mut D) -> (RollbackReport, Result<(), DomError>) {
        let mut report = RollbackReport::default();
        let mut first_error = None;

        for entry in self.entries.iter().rev() {
            match entry.undo(dom) {
                Ok(Undo::Reverted) => report.reverted += 1,
                Ok(Undo::Skipped) => {
                    log::warn!("skipping rollback of {:?}: node was moved externally", entry);
                    report.skipped += 1;
                }
                Err(e) => {
                    log::warn!("rollback of {:?} failed: {}", entry, e);
                    report.failed += 1;
                    first_error.get_or_insert(e);
                }
            }
        }

        let result = match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        };
        (report, result)
    }
}
