//! Pagination — splits the block sequence into A4-sized pages.
//!
//! # Algorithm
//! Greedy first-fit in a single pass. A block that does not fit on the current
//! page starts the next one; a block taller than a whole page sits alone on
//! its own page and is never split. Blocks are never reordered.
//!
//! Heights come from an injected [`MeasureHeight`], so the algorithm runs the
//! same against the metric-based measurer and against fixed test heights.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::layout::blocks::Block;

/// A4 at 96 dpi.
pub const A4_WIDTH_PX: f32 = 794.0;
pub const A4_HEIGHT_PX: f32 = 1122.0;

/// Fixed-width viewport blocks are measured in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width_px: f32,
    pub height_px: f32,
}

impl Viewport {
    pub const A4: Viewport = Viewport {
        width_px: A4_WIDTH_PX,
        height_px: A4_HEIGHT_PX,
    };
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport::A4
    }
}

#[derive(Debug, Error)]
#[error("cannot measure {kind} block: {reason}")]
pub struct MeasureError {
    pub kind: &'static str,
    pub reason: String,
}

/// Measures the rendered height of a block, in px, at a given viewport width.
pub trait MeasureHeight {
    fn measure(&self, block: &Block, viewport_width: f32) -> Result<f32, MeasureError>;
}

impl<F> MeasureHeight for F
where
    F: Fn(&Block, f32) -> Result<f32, MeasureError>,
{
    fn measure(&self, block: &Block, viewport_width: f32) -> Result<f32, MeasureError> {
        self(block, viewport_width)
    }
}

/// One page of the preview.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    pub blocks: Vec<Block>,
    /// Sum of the measured heights of `blocks`.
    pub height_px: f32,
}

/// Partitions `blocks` into pages no taller than `viewport.height_px`.
///
/// Measurement failures (errors, NaN, negative heights) count as zero height.
pub fn paginate<M>(blocks: &[Block], measure: &M, viewport: Viewport) -> Vec<Page>
where
    M: MeasureHeight + ?Sized,
{
    let mut pages = Vec::new();
    let mut current: Vec<Block> = Vec::new();
    let mut current_height = 0.0_f32;

    for block in blocks {
        let height = measured_height(measure, block, viewport.width_px);

        if current_height + height > viewport.height_px && !current.is_empty() {
            debug!(
                page = pages.len() + 1,
                blocks = current.len(),
                height = current_height,
                "page break"
            );
            pages.push(Page {
                blocks: std::mem::take(&mut current),
                height_px: current_height,
            });
            current_height = 0.0;
        }

        current.push(block.clone());
        current_height += height;
    }

    if !current.is_empty() {
        pages.push(Page {
            blocks: current,
            height_px: current_height,
        });
    }

    pages
}

fn measured_height<M>(measure: &M, block: &Block, viewport_width: f32) -> f32
where
    M: MeasureHeight + ?Sized,
{
    match measure.measure(block, viewport_width) {
        Ok(height) if height.is_finite() && height >= 0.0 => height,
        Ok(height) => {
            warn!(kind = block.kind(), height, "Invalid block height, treating as zero");
            0.0
        }
        Err(e) => {
            warn!(kind = block.kind(), error = %e, "Block measurement failed, treating as zero");
            0.0
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
