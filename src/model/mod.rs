//! # Report Model
//!
//! The input representation for the paginator. A report is an ordered list of
//! pre-measured content blocks plus the page setup and header/footer policy.
//!
//! Blocks are opaque to the engine: it only ever reads their measured height
//! and vertical margin. Whatever the caller's rendering layer needs to draw
//! the block travels along in the `handle`.

use serde::{Deserialize, Serialize};

/// Device-independent units per inch. All logical sizes are in these units.
pub const DIU_PER_INCH: f64 = 96.0;

/// Page margin used when a report definition doesn't specify one.
pub const DEFAULT_MARGIN: f64 = 25.0;

/// A width/height pair in logical units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// True when both dimensions are finite and strictly positive.
    pub fn is_positive(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// Edge values (top, right, bottom, left) used for page and block margins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Edges {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Edges {
    pub fn uniform(v: f64) -> Self {
        Self {
            top: v,
            right: v,
            bottom: v,
            left: v,
        }
    }

    pub fn symmetric(vertical: f64, horizontal: f64) -> Self {
        Self {
            top: vertical,
            right: horizontal,
            bottom: vertical,
            left: horizontal,
        }
    }

    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f64 {
        self.top + self.bottom
    }

    fn is_valid(&self) -> bool {
        [self.top, self.right, self.bottom, self.left]
            .iter()
            .all(|v| v.is_finite() && *v >= 0.0)
    }
}

/// Page orientation requested for the output device.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

impl Orientation {
    /// Orient a portrait size: landscape swaps width and height.
    pub fn apply(&self, portrait: Size) -> Size {
        match self {
            Orientation::Portrait => portrait,
            Orientation::Landscape => Size::new(portrait.height, portrait.width),
        }
    }
}

/// Standard paper sizes, in device-independent units (1/96 inch),
/// portrait orientation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum PageSize {
    #[default]
    A4,
    A3,
    A5,
    Letter,
    Legal,
    Tabloid,
    Custom {
        width: f64,
        height: f64,
    },
}

impl PageSize {
    /// Returns the printable area for this preset.
    pub fn dimensions(&self) -> Size {
        match self {
            PageSize::A4 => Size::new(793.7, 1122.52),
            PageSize::A3 => Size::new(1122.52, 1587.4),
            PageSize::A5 => Size::new(559.37, 793.7),
            PageSize::Letter => Size::new(816.0, 1056.0),
            PageSize::Legal => Size::new(816.0, 1344.0),
            PageSize::Tabloid => Size::new(1056.0, 1632.0),
            PageSize::Custom { width, height } => Size::new(*width, *height),
        }
    }
}

/// One atomic, pre-measured unit of report content.
///
/// Never split across pages. Only `height` and the vertical part of `margin`
/// take part in pagination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentBlock<B> {
    /// Caller-owned identity of the block (a row id, a visual handle, ...).
    pub handle: B,
    /// Rendered height, excluding margin.
    pub height: f64,
    #[serde(default)]
    pub margin: Edges,
}

impl<B> ContentBlock<B> {
    pub fn new(handle: B, height: f64) -> Self {
        Self {
            handle,
            height,
            margin: Edges::default(),
        }
    }

    pub fn with_margin(mut self, margin: Edges) -> Self {
        self.margin = margin;
        self
    }

    /// Height plus top and bottom margin: what the block consumes on a page.
    pub fn outer_height(&self) -> f64 {
        self.height + self.margin.vertical()
    }

    pub(crate) fn validation_error(&self) -> Option<String> {
        if !self.height.is_finite() || self.height < 0.0 {
            return Some(format!("height must be finite and >= 0, got {}", self.height));
        }
        for (name, v) in [("top", self.margin.top), ("bottom", self.margin.bottom)] {
            if !v.is_finite() || v < 0.0 {
                return Some(format!("{} margin must be finite and >= 0, got {}", name, v));
            }
        }
        None
    }
}

/// Header/footer templates plus their placement toggles.
///
/// The two toggles are independent: suppressing the header on later pages
/// says nothing about the footer on the first one.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderFooterSpec<T> {
    pub header: Option<T>,
    pub footer: Option<T>,
    /// Only page 1 carries the header.
    pub header_only_on_first_page: bool,
    /// Page 1 carries no footer.
    pub footer_starts_from_second_page: bool,
}

impl<T> Default for HeaderFooterSpec<T> {
    fn default() -> Self {
        Self {
            header: None,
            footer: None,
            header_only_on_first_page: false,
            footer_starts_from_second_page: false,
        }
    }
}

impl<T> HeaderFooterSpec<T> {
    pub fn new(header: Option<T>, footer: Option<T>) -> Self {
        Self {
            header,
            footer,
            ..Self::default()
        }
    }

    /// Header template for the given 1-based page, after suppression rules.
    pub fn header_for(&self, page_number: usize) -> Option<&T> {
        if page_number > 1 && self.header_only_on_first_page {
            return None;
        }
        self.header.as_ref()
    }

    /// Footer template for the given 1-based page, after suppression rules.
    pub fn footer_for(&self, page_number: usize) -> Option<&T> {
        if page_number == 1 && self.footer_starts_from_second_page {
            return None;
        }
        self.footer.as_ref()
    }
}

/// The logical page that content is laid out against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageGeometry {
    pub width: f64,
    pub height: f64,
    pub margin: Edges,
}

impl PageGeometry {
    pub fn new(width: f64, height: f64, margin: Edges) -> Self {
        Self {
            width,
            height,
            margin,
        }
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Height minus top and bottom margin: the budget for header, blocks and footer.
    pub fn usable_height(&self) -> f64 {
        self.height - self.margin.vertical()
    }

    /// Width minus left and right margin.
    pub fn content_width(&self) -> f64 {
        self.width - self.margin.horizontal()
    }

    /// Checks the dimension invariants. Usable height is checked separately
    /// by the page builder so it can report `EmptyGeometry`.
    pub(crate) fn dimension_error(&self) -> Option<String> {
        if !self.size().is_positive() {
            return Some(format!(
                "page size must be positive, got {}x{}",
                self.width, self.height
            ));
        }
        if !self.margin.is_valid() {
            return Some(format!("margins must be finite and >= 0, got {:?}", self.margin));
        }
        None
    }
}

// ── Report definitions (JSON input) ─────────────────────────────────

/// Page setup inside a report definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSetup {
    /// Width of the container the blocks were measured in.
    pub container_width: f64,

    #[serde(default = "default_margin")]
    pub margin: Edges,

    #[serde(default)]
    pub orientation: Orientation,

    /// Printable area of the output device. Defaults to A4.
    #[serde(default)]
    pub printable_area: PageSize,
}

impl Default for PageSetup {
    fn default() -> Self {
        Self {
            container_width: PageSize::A4.dimensions().width - 2.0 * DEFAULT_MARGIN,
            margin: default_margin(),
            orientation: Orientation::Portrait,
            printable_area: PageSize::A4,
        }
    }
}

fn default_margin() -> Edges {
    Edges::uniform(DEFAULT_MARGIN)
}

/// Where the finished pages go.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DestinationKind {
    /// A physical or virtual printer: pages are scaled to its printable area.
    Printer,
    /// A fixed-size page export (XPS/PDF): pages keep their realised size.
    #[default]
    FixedPage,
}

/// A complete report description, as accepted by `folio::paginate_json`
/// and the CLI.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDefinition {
    /// Used to name print jobs.
    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub page: PageSetup,

    pub blocks: Vec<ContentBlock<String>>,

    /// Header template text. `{{pageNumber}}` and `{{totalPages}}` are substituted.
    #[serde(default)]
    pub header: Option<String>,

    /// Footer template text. `{{pageNumber}}` and `{{totalPages}}` are substituted.
    #[serde(default)]
    pub footer: Option<String>,

    #[serde(default)]
    pub header_only_on_first_page: bool,

    #[serde(default)]
    pub footer_starts_from_second_page: bool,

    #[serde(default)]
    pub destination: DestinationKind,
}

impl ReportDefinition {
    pub fn header_footer(&self) -> HeaderFooterSpec<String> {
        HeaderFooterSpec {
            header: self.header.clone(),
            footer: self.footer.clone(),
            header_only_on_first_page: self.header_only_on_first_page,
            footer_starts_from_second_page: self.footer_starts_from_second_page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_suppressed_after_first_page() {
        let spec = HeaderFooterSpec {
            header_only_on_first_page: true,
            ..HeaderFooterSpec::new(Some("H"), Some("F"))
        };
        assert_eq!(spec.header_for(1), Some(&"H"));
        assert_eq!(spec.header_for(2), None);
        assert_eq!(spec.footer_for(1), Some(&"F"));
        assert_eq!(spec.footer_for(2), Some(&"F"));
    }

    #[test]
    fn footer_suppressed_on_first_page() {
        let spec = HeaderFooterSpec {
            footer_starts_from_second_page: true,
            ..HeaderFooterSpec::new(Some("H"), Some("F"))
        };
        assert_eq!(spec.footer_for(1), None);
        assert_eq!(spec.footer_for(2), Some(&"F"));
        assert_eq!(spec.header_for(5), Some(&"H"));
    }

    #[test]
    fn outer_height_counts_vertical_margin_only() {
        let block = ContentBlock::new("row", 100.0).with_margin(Edges {
            top: 5.0,
            right: 40.0,
            bottom: 7.0,
            left: 40.0,
        });
        assert!((block.outer_height() - 112.0).abs() < 0.001);
    }

    #[test]
    fn negative_block_height_rejected() {
        assert!(ContentBlock::new((), -1.0).validation_error().is_some());
        assert!(ContentBlock::new((), f64::NAN).validation_error().is_some());
        assert!(ContentBlock::new((), 0.0).validation_error().is_none());
    }

    #[test]
    fn geometry_usable_height() {
        let g = PageGeometry::new(600.0, 800.0, Edges::symmetric(50.0, 20.0));
        assert!((g.usable_height() - 700.0).abs() < 0.001);
        assert!((g.content_width() - 560.0).abs() < 0.001);
        assert!(g.dimension_error().is_none());
    }

    #[test]
    fn negative_margin_rejected() {
        let g = PageGeometry::new(600.0, 800.0, Edges::uniform(-1.0));
        assert!(g.dimension_error().is_some());
    }

    #[test]
    fn landscape_swaps_dimensions() {
        let a4 = PageSize::A4.dimensions();
        let landscape = Orientation::Landscape.apply(a4);
        assert_eq!(landscape, Size::new(a4.height, a4.width));
        assert_eq!(Orientation::Portrait.apply(a4), a4);
    }

    #[test]
    fn definition_defaults() {
        let def: ReportDefinition =
            serde_json::from_str(r#"{ "blocks": [{ "handle": "a", "height": 10 }] }"#).unwrap();
        assert_eq!(def.page.margin, Edges::uniform(DEFAULT_MARGIN));
        assert_eq!(def.page.orientation, Orientation::Portrait);
        assert_eq!(def.destination, DestinationKind::FixedPage);
        assert_eq!(def.blocks[0].margin, Edges::default());
        assert!(!def.header_only_on_first_page);
    }

    #[test]
    fn definition_custom_printable_area() {
        let def: ReportDefinition = serde_json::from_str(
            r#"{
                "page": { "containerWidth": 500, "printableArea": { "Custom": { "width": 600, "height": 900 } }, "orientation": "Landscape" },
                "blocks": []
            }"#,
        )
        .unwrap();
        assert_eq!(def.page.printable_area.dimensions(), Size::new(600.0, 900.0));
        assert_eq!(def.page.orientation, Orientation::Landscape);
    }
}
