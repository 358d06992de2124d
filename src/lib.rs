//! # Folio
//!
//! A report paginator.
//!
//! Reports arrive as an ordered list of blocks that a rendering layer has
//! already measured: record cards, table rows, anything with a known height.
//! Folio packs them, in order and without splitting, into fixed-size pages
//! with optional per-page headers and footers, then computes the uniform
//! scale that fits those pages onto a real device's printable area.
//!
//! ## Architecture
//!
//! ```text
//! Input (ReportDefinition JSON / API)
//!       ↓
//!   [model]            — Blocks, margins, page setup, header/footer policy
//!       ↓
//!   [layout::geometry] — Logical page size from container width + device ratio
//!       ↓
//!   [layout]           — Greedy, order-preserving page builder
//!       ↓
//!   [layout::scale]    — Shrink-to-fit factor for printers
//!       ↓
//!   [render]           — Adapter boundary: surfaces, print jobs, export sizing
//! ```
//!
//! Every call is synchronous and self-contained. There is no global state;
//! independent reports can be paginated on different threads.

pub mod error;
pub mod layout;
pub mod model;
pub mod render;

pub use error::{FolioError, Result};

use layout::{PageBuilder, Report};
use model::ReportDefinition;
use render::text::{TextFragment, TextHost};
use render::{Destination, RenderedPage};

/// Paginate a report definition with the plain-text adapter.
pub fn paginate(
    definition: &ReportDefinition,
    host: &TextHost,
) -> Result<Report<String, TextFragment>> {
    let page = &definition.page;
    let geometry = layout::geometry::resolve(
        page.container_width,
        page.margin,
        page.orientation,
        page.printable_area.dimensions(),
    )?;

    PageBuilder::new(host).paginate(
        definition.blocks.iter().cloned(),
        &geometry,
        &definition.header_footer(),
    )
}

/// The destination a definition asks for, with the printable area oriented
/// the way the pages will be printed.
pub fn destination(definition: &ReportDefinition) -> Destination {
    let page = &definition.page;
    Destination::from_kind(
        definition.destination,
        page.orientation.apply(page.printable_area.dimensions()),
    )
}

/// Paginate and render a report definition to plain-text pages.
pub fn render(definition: &ReportDefinition) -> Result<Vec<RenderedPage<String>>> {
    let host = TextHost::default();
    let report = paginate(definition, &host)?;
    render::render_report(
        &report,
        &host,
        destination(definition),
        definition.title.as_deref().unwrap_or_default(),
    )
}

/// Parse a report definition from JSON.
pub fn parse_json(json: &str) -> Result<ReportDefinition> {
    Ok(serde_json::from_str(json)?)
}

/// Paginate a report definition described as JSON.
pub fn paginate_json(json: &str) -> Result<Report<String, TextFragment>> {
    let definition = parse_json(json)?;
    paginate(&definition, &TextHost::default())
}

/// Render a report definition described as JSON to plain-text pages.
pub fn render_json(json: &str) -> Result<Vec<RenderedPage<String>>> {
    let definition = parse_json(json)?;
    render(&definition)
}
