//! Line wrapper and overlay block synthesis

use crate::dom::{Dom, DomError};
use crate::ledger::{Mutation, MutationLedger};

pub const WRAPPER_CLASS: &str = "reveal-line";
pub const BLOCK_CLASS: &str = "reveal-block";

const WRAPPER_STYLE: &[(&str, &str)] = &[("position", "relative"), ("display", "block")];

// Sits on top of the line: later in DOM order and above it in z-order
const BLOCK_STYLE: &[(&str, &str)] = &[
    ("position", "absolute"),
    ("top", "0"),
    ("left", "0"),
    ("width", "100%"),
    ("height", "100%"),
    ("z-index", "2"),
    ("pointer-events", "none"),
];

/// Nodes synthesized around one line
#[derive(Clone, Debug, PartialEq)]
pub struct WrappedLine<N> {
    pub line: N,
    pub wrapper: N,
    pub block: N,
}

/// Put `line` inside a new wrapper at its current position and append an
/// overlay block filled with `block_color` after it.
pub fn wrap_line<D: Dom>(
    dom: &mut D,
    ledger: &mut MutationLedger<D::Node>,
    line: &D::Node,
    block_color: &str,
) -> Result<WrappedLine<D::Node>, DomError> {
    let parent = dom
        .parent(line)
        .ok_or_else(|| DomError::Hierarchy(format!("line {:?} has no parent", line)))?;

    let wrapper = dom.create_element("div")?;
    dom.add_class(&wrapper, WRAPPER_CLASS)?;
    for (property, value) in WRAPPER_STYLE {
        dom.set_style(&wrapper, property, value)?;
    }

    let block = dom.create_element("div")?;
    dom.add_class(&block, BLOCK_CLASS)?;
    for (property, value) in BLOCK_STYLE {
        dom.set_style(&block, property, value)?;
    }
    dom.set_style(&block, "background-color", block_color)?;

    ledger.apply(
        dom,
        Mutation::InsertWrapper {
            parent,
            wrapper: wrapper.clone(),
            before: line.clone(),
        },
    )?;
    ledger.apply(
        dom,
        Mutation::MoveInto {
            node: line.clone(),
            wrapper: wrapper.clone(),
        },
    )?;
    ledger.apply(
        dom,
        Mutation::AppendOverlay {
            wrapper: wrapper.clone(),
            overlay: block.clone(),
        },
    )?;

    Ok(WrappedLine {
        line: line.clone(),
        wrapper,
        block,
    })
}
