//! Placement of the title, description and stats blocks inside the card

use serde::Serialize;

use super::layout::TextLayout;
use super::path::{round2, serialize_path};

pub const FRAME_WIDTH: f64 = 420.0;
pub const FRAME_HEIGHT: f64 = 210.0;
/// Horizontal centre shared by all three blocks
pub const ANCHOR_X: f64 = FRAME_WIDTH / 2.0;
/// Gap between consecutive blocks
pub const TEXT_SPACING: f64 = 15.0;

/// A serialised text block and the translation that places it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextBlock {
    pub path: String,
    /// Horizontal offset centring the block's box on [`ANCHOR_X`]
    pub x: f64,
    /// Vertical offset putting the block's top edge at its stacked position
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardText {
    pub title: TextBlock,
    pub description: TextBlock,
    pub stats: TextBlock,
}

/// Stacks the three blocks with two fixed gaps, vertically centred in the
/// frame and nudged down by a third of the description's per-line height.
pub fn stack_blocks(title: &TextLayout, description: &TextLayout, stats: &TextLayout) -> CardText {
    let title_height = title.bounding_box.height();
    let description_height = description.bounding_box.height();
    let stats_height = stats.bounding_box.height();

    let combined = title_height + description_height + stats_height + TEXT_SPACING * 2.0;
    let correction = if description.lines > 0 {
        let lines = description.lines as f64;
        (lines / 3.0) * (description_height / lines)
    } else {
        0.0
    };

    let title_y = (FRAME_HEIGHT - combined) / 2.0 + correction;
    let description_y = title_y + title_height + TEXT_SPACING;
    let stats_y = description_y + description_height + TEXT_SPACING;

    CardText {
        title: place(title, title_y),
        description: place(description, description_y),
        stats: place(stats, stats_y),
    }
}

fn place(layout: &TextLayout, top: f64) -> TextBlock {
    let bbox = &layout.bounding_box;
    TextBlock {
        path: serialize_path(&layout.commands),
        x: round2(ANCHOR_X - (bbox.x1 + bbox.x2) / 2.0),
        y: round2(bbox.y1.abs() + top),
    }
}
