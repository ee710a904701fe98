//! Per-line reveal program

use crate::anim::{Ease, Origin, Program, Prop, Threshold};
use crate::config::RevealConfig;

/// Scroll-gated reveals start when the root's top edge reaches 90% of the viewport
pub const VISIBILITY_THRESHOLD: Threshold = Threshold::top_at(0.9);

pub const REVEAL_EASE: Ease = Ease::InOutQuart;

/// Seconds before line `index` starts moving.
///
/// This is `delay + index + stagger`: lines are one second apart whatever
/// `stagger` is, and `stagger` only shifts every line by the same amount.
pub fn start_offset(index: usize, config: &RevealConfig) -> f64 {
    config.delay + index as f64 + config.stagger
}

/// Grow the block over the line from the left, show the text underneath,
/// then shrink the block into the right edge.
pub fn build_reveal_program<N: Clone>(block: N, line: N, index: usize, config: &RevealConfig) -> Program<N> {
    Program::new(start_offset(index, config))
        .tween(
            block.clone(),
            Prop::ScaleX(0.0),
            Prop::ScaleX(1.0),
            config.duration,
            REVEAL_EASE,
        )
        .set(line, Prop::Opacity(1.0))
        .set(block.clone(), Prop::TransformOrigin(Origin::Right))
        .tween(
            block,
            Prop::ScaleX(1.0),
            Prop::ScaleX(0.0),
            config.duration,
            REVEAL_EASE,
        )
}
