//! Line segmentation
//!
//! A [`LineSplitter`] turns a rendered text block into one element per visual
//! line and can later put the original nodes back. The [`Split`] it returns
//! must be handed back to [`LineSplitter::revert`] exactly once; `revert`
//! takes it by value so a split cannot be released twice.

pub mod js;
pub mod wrap;

pub use js::JsSplitter;
pub use wrap::WrapSplitter;

use crate::dom::Dom;
use crate::error::RevealError;

/// Class added to every line element
pub const LINE_CLASS: &str = "reveal-text-line";

/// Lines produced for one target, plus whatever the splitter needs to undo it
#[derive(Debug)]
pub struct Split<N, H> {
    pub target: N,
    /// Line elements in document order
    pub lines: Vec<N>,
    pub(crate) handle: H,
}

impl<N, H> Split<N, H> {
    pub fn new(target: N, lines: Vec<N>, handle: H) -> Self {
        Self {
            target,
            lines,
            handle,
        }
    }
}

pub trait LineSplitter<D: Dom> {
    /// Splitter-specific undo data
    type Handle;

    fn split(&mut self, dom: &mut D, target: &D::Node)
        -> Result<Split<D::Node, Self::Handle>, RevealError>;

    fn revert(&mut self, dom: &mut D, split: Split<D::Node, Self::Handle>) -> Result<(), RevealError>;
}
