//! # Page Renderer Adapter
//!
//! The boundary between the paginator and whatever actually draws pages.
//! Folio never renders anything itself; it needs two things from the
//! presentation layer:
//!
//! - a [`TemplateHost`] that turns header/footer templates into measured
//!   instances (consumed while paginating), and
//! - a [`PageRenderer`] that turns a finished page into a surface and reports
//!   the size it actually realised (consumed while printing or exporting).
//!
//! [`text`] provides a small reference implementation of both.

pub mod text;

use crate::error::{FolioError, Result};
use crate::layout::{Page, Report};
use crate::model::{DestinationKind, Size, DIU_PER_INCH};

/// Page number and total page count stamped into headers and footers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageNumbering {
    pub number: usize,
    pub total: usize,
}

/// Creates and measures header/footer instances.
pub trait TemplateHost {
    type Template;
    type Instance;

    /// Produce a fresh instance of `template`, or `None` if the template
    /// can't produce anything renderable.
    fn instantiate(&self, template: &Self::Template) -> Option<Self::Instance>;

    /// Realised size of `instance` within `constraint`. The height includes
    /// the instance's own vertical margin.
    fn measure(&self, instance: &Self::Instance, constraint: Size) -> Size;

    /// Substitute page numbering into an instance. Called once per instance,
    /// after pagination has finished.
    fn stamp(&self, instance: &mut Self::Instance, numbering: PageNumbering);
}

/// A page turned into a drawable surface.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedPage<S> {
    pub number: usize,
    pub surface: S,
    /// Realised size after scaling; sizes the page for fixed-page export.
    pub width: f64,
    pub height: f64,
    /// Scale applied, if the destination is a printer.
    pub scale: Option<f64>,
    /// Print job name for this page.
    pub job_name: String,
}

/// Draws finished pages.
pub trait PageRenderer<B>: TemplateHost {
    type Surface;

    fn render(
        &self,
        page: &Page<B, Self::Instance>,
        report: &Report<B, Self::Instance>,
        scale: Option<f64>,
    ) -> Result<(Self::Surface, Size)>;
}

/// Where finished pages are sent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Destination {
    /// A physical or virtual printer with the given printable area. Each page
    /// is scaled to fit.
    Printer { printable_area: Size },
    /// A fixed-size page document. Pages keep their realised size.
    FixedPage,
}

impl Destination {
    pub fn from_kind(kind: DestinationKind, printable_area: Size) -> Self {
        match kind {
            DestinationKind::Printer => Destination::Printer { printable_area },
            DestinationKind::FixedPage => Destination::FixedPage,
        }
    }

    pub fn printable_area(&self) -> Option<Size> {
        match self {
            Destination::Printer { printable_area } => Some(*printable_area),
            Destination::FixedPage => None,
        }
    }
}

/// Render every page of a report for `destination`.
///
/// All pages render or none do.
pub fn render_report<B, R>(
    report: &Report<B, R::Instance>,
    renderer: &R,
    destination: Destination,
    title: &str,
) -> Result<Vec<RenderedPage<R::Surface>>>
where
    R: PageRenderer<B>,
{
    let scale = destination
        .printable_area()
        .map(|area| report.scale_to(area))
        .transpose()?;

    report
        .pages()
        .iter()
        .map(|page| {
            let (surface, size) = renderer.render(page, report, scale)?;
            if !size.is_positive() {
                return Err(FolioError::Render(format!(
                    "page {} realised a non-positive size {}x{}",
                    page.number(),
                    size.width,
                    size.height
                )));
            }
            Ok(RenderedPage {
                number: page.number(),
                surface,
                width: size.width,
                height: size.height,
                scale,
                job_name: job_name(title, page.number()),
            })
        })
        .collect()
}

/// Each printed page goes out as its own job: "{title} {page_number}".
pub fn job_name(title: &str, page_number: usize) -> String {
    if title.is_empty() {
        format!("Page {}", page_number)
    } else {
        format!("{} {}", title, page_number)
    }
}

/// Pixel dimensions for rasterising `size` at the given DPI.
pub fn raster_pixel_size(size: Size, dpi_x: f64, dpi_y: f64) -> Result<(u32, u32)> {
    if !size.is_positive() || !(dpi_x.is_finite() && dpi_y.is_finite() && dpi_x > 0.0 && dpi_y > 0.0) {
        return Err(FolioError::InvalidGeometry(format!(
            "cannot rasterise {}x{} at {}x{} dpi",
            size.width, size.height, dpi_x, dpi_y
        )));
    }
    let px = |extent: f64, dpi: f64| (extent / DIU_PER_INCH * dpi).round().min(u32::MAX as f64) as u32;
    Ok((px(size.width, dpi_x), px(size.height, dpi_y)))
}

/// Output formats the export collaborators understand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Xps,
    Pdf,
    Jpeg,
    Png,
    Bmp,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Xps => ".xps",
            ExportFormat::Pdf => ".pdf",
            ExportFormat::Jpeg => ".jpg",
            ExportFormat::Png => ".png",
            ExportFormat::Bmp => ".bmp",
        }
    }

    /// Save-dialog filter string.
    pub fn filter(&self) -> &'static str {
        match self {
            ExportFormat::Xps => "XPS Documents (.xps)|*.xps",
            ExportFormat::Pdf => "PDF Documents (.pdf)|*.pdf",
            ExportFormat::Jpeg => "JPG Images (.jpg)|*.jpg",
            ExportFormat::Png => "PNG Images (.png)|*.png",
            ExportFormat::Bmp => "BMP Images (.bmp)|*.bmp",
        }
    }

    /// Paged formats take a whole report; image formats take a single surface.
    pub fn is_paged(&self) -> bool {
        matches!(self, ExportFormat::Xps | ExportFormat::Pdf)
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "xps" => Some(ExportFormat::Xps),
            "pdf" => Some(ExportFormat::Pdf),
            "jpg" | "jpeg" => Some(ExportFormat::Jpeg),
            "png" => Some(ExportFormat::Png),
            "bmp" => Some(ExportFormat::Bmp),
            _ => None,
        }
    }
}
