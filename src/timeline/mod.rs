//! Horizontal battle timeline: layout, hover tooltip and click dispatch.

pub mod manager;
pub mod node;
pub mod tooltip;

pub use manager::{ClickCallback, TimelineManager};
pub use node::{NodeEvent, NodeEventKind, NodeState, TimelineNode};
pub use tooltip::Tooltip;

/// Position parameter of node `index` out of `count`: 0 for the first, 1 for
/// the last, 0.5 for a lone node.
pub fn layout_t(index: usize, count: usize) -> f32 {
    if count > 1 {
        index as f32 / (count - 1) as f32
    } else {
        0.5
    }
}

/// Evenly spaced x positions; the endpoints land exactly on `x_start` and `x_end`.
pub fn node_positions(count: usize, x_start: f32, x_end: f32) -> Vec<f32> {
    (0..count)
        .map(|i| {
            let t = layout_t(i, count);
            x_start * (1.0 - t) + x_end * t
        })
        .collect()
}
