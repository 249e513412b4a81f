// Layout core: shared section contract, block building, metric measurement
// and greedy A4 pagination. Everything here is pure and synchronous; the
// renderers under `crate::render` build on it.

pub mod blocks;
pub mod contract;
pub mod font_metrics;
pub mod measure;
pub mod pagination;
pub mod template;

// Re-export the public API consumed by the renderers and handlers.
pub use blocks::{build_blocks, Block};
pub use measure::MetricMeasurer;
pub use pagination::{paginate, MeasureHeight, Page, Viewport};
pub use template::{template_style, TemplateStyle};
