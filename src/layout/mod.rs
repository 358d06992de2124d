//! # Page Builder
//!
//! The bin-packing core. Blocks arrive already measured; the builder only
//! decides which page each one lands on.
//!
//! ## How Folio Paginates
//!
//! 1. Open page 1 with its header and footer (subject to the placement
//!    toggles) and count their heights as used.
//! 2. For each block, in order: if it fits the remaining height, place it.
//! 3. If it doesn't fit and the page already holds a block, close the page,
//!    open the next one, and place it there.
//! 4. If it doesn't fit an empty page, place it anyway. Blocks are atomic;
//!    an oversized block gets a page to itself and overflows.
//! 5. Once every block is placed, stamp each header and footer with its page
//!    number and the total page count.
//!
//! Nothing is reordered, dropped, or duplicated. A single pass, O(n) in the
//! number of blocks, with no state outside the call.

pub mod geometry;
pub mod page_break;
pub mod scale;

use std::fmt;

use serde::Serialize;

use crate::error::{FolioError, Result, TemplateSlot};
use crate::model::*;
use crate::render::{PageNumbering, TemplateHost};

use self::page_break::{decide_break, BreakDecision};

/// A header or footer instance placed on a page, with its measured height.
#[derive(Debug, Clone, PartialEq)]
pub struct PageDecoration<I> {
    pub instance: I,
    pub height: f64,
}

/// One finished page: blocks in visual order plus optional header/footer.
///
/// Pages are immutable once the builder returns them.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<B, I> {
    number: usize,
    blocks: Vec<ContentBlock<B>>,
    header: Option<PageDecoration<I>>,
    footer: Option<PageDecoration<I>>,
    used_height: f64,
}

impl<B, I> Page<B, I> {
    /// 1-based page number.
    pub fn number(&self) -> usize {
        self.number
    }

    pub fn blocks(&self) -> &[ContentBlock<B>] {
        &self.blocks
    }

    pub fn header(&self) -> Option<&PageDecoration<I>> {
        self.header.as_ref()
    }

    pub fn footer(&self) -> Option<&PageDecoration<I>> {
        self.footer.as_ref()
    }

    pub fn header_height(&self) -> f64 {
        self.header.as_ref().map_or(0.0, |h| h.height)
    }

    pub fn footer_height(&self) -> f64 {
        self.footer.as_ref().map_or(0.0, |f| f.height)
    }

    /// Header + footer + every block's outer height.
    pub fn used_height(&self) -> f64 {
        self.used_height
    }

    /// True when the page's contents exceed the usable height. Only happens
    /// with a lone oversized block (or a header/footer pair with no room left).
    pub fn is_overflowing(&self, geometry: &PageGeometry) -> bool {
        self.used_height > geometry.usable_height()
    }

    /// Top edge of each block (inside its own margin), in page coordinates.
    pub fn block_offsets(&self, geometry: &PageGeometry) -> Vec<f64> {
        let mut y = geometry.margin.top + self.header_height();
        self.blocks
            .iter()
            .map(|block| {
                let top = y + block.margin.top;
                y += block.outer_height();
                top
            })
            .collect()
    }

    /// Top edge of the footer. The footer is pinned to the bottom of the
    /// content area regardless of how full the page is.
    pub fn footer_offset(&self, geometry: &PageGeometry) -> Option<f64> {
        self.footer
            .as_ref()
            .map(|f| geometry.height - geometry.margin.bottom - f.height)
    }

    /// Split the page into its owned parts.
    pub fn into_parts(
        self,
    ) -> (
        Vec<ContentBlock<B>>,
        Option<PageDecoration<I>>,
        Option<PageDecoration<I>>,
    ) {
        (self.blocks, self.header, self.footer)
    }
}

/// The pages of one pagination run plus the geometry they were built against.
#[derive(Debug, Clone, PartialEq)]
pub struct Report<B, I> {
    pages: Vec<Page<B, I>>,
    geometry: PageGeometry,
}

impl<B, I> Report<B, I> {
    pub fn pages(&self) -> &[Page<B, I>] {
        &self.pages
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn into_pages(self) -> Vec<Page<B, I>> {
        self.pages
    }

    /// The scale that fits these pages onto a device's printable area.
    /// Every page shares the report geometry, so one factor serves all.
    pub fn scale_to(&self, printable_area: Size) -> Result<f64> {
        scale::fit_scale(self.geometry.size(), printable_area)
    }
}

impl<B: fmt::Display, I> Report<B, I> {
    /// Collect serializable layout metadata for inspection tooling.
    ///
    /// When `printable_area` is given, each page reports the scale it will be
    /// printed at.
    pub fn layout_info(&self, printable_area: Option<Size>) -> Result<LayoutInfo> {
        let scale = printable_area.map(|area| self.scale_to(area)).transpose()?;
        let geometry = &self.geometry;

        let pages = self
            .pages
            .iter()
            .map(|page| {
                let blocks = page
                    .blocks
                    .iter()
                    .zip(page.block_offsets(geometry))
                    .map(|(block, y)| ElementInfo {
                        label: block.handle.to_string(),
                        y,
                        height: block.height,
                    })
                    .collect();
                PageInfo {
                    number: page.number,
                    width: geometry.width,
                    height: geometry.height,
                    usable_height: geometry.usable_height(),
                    used_height: page.used_height,
                    overflowing: page.is_overflowing(geometry),
                    scale,
                    header: page.header.as_ref().map(|h| ElementInfo {
                        label: "header".to_string(),
                        y: geometry.margin.top,
                        height: h.height,
                    }),
                    footer: page.footer.as_ref().map(|f| ElementInfo {
                        label: "footer".to_string(),
                        y: geometry.height - geometry.margin.bottom - f.height,
                        height: f.height,
                    }),
                    blocks,
                }
            })
            .collect();

        Ok(LayoutInfo { pages })
    }
}

// ── Serializable layout metadata (for debug output / dev tools) ───

/// Complete layout metadata for all pages.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutInfo {
    pub pages: Vec<PageInfo>,
}

/// Layout metadata for a single page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub number: usize,
    pub width: f64,
    pub height: f64,
    pub usable_height: f64,
    pub used_height: f64,
    pub overflowing: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<ElementInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<ElementInfo>,
    pub blocks: Vec<ElementInfo>,
}

/// A positioned element on a page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementInfo {
    pub label: String,
    pub y: f64,
    pub height: f64,
}

/// Tracks the page currently being filled.
struct PageCursor<B, I> {
    number: usize,
    blocks: Vec<ContentBlock<B>>,
    header: Option<PageDecoration<I>>,
    footer: Option<PageDecoration<I>>,
    used_height: f64,
}

impl<B, I> PageCursor<B, I> {
    fn place(&mut self, block: ContentBlock<B>) {
        self.used_height += block.outer_height();
        self.blocks.push(block);
    }

    fn finalize(self) -> Page<B, I> {
        Page {
            number: self.number,
            blocks: self.blocks,
            header: self.header,
            footer: self.footer,
            used_height: self.used_height,
        }
    }
}

/// Partitions blocks into pages, instantiating headers and footers through
/// a [`TemplateHost`].
pub struct PageBuilder<'h, H> {
    host: &'h H,
}

impl<'h, H: TemplateHost> PageBuilder<'h, H> {
    pub fn new(host: &'h H) -> Self {
        Self { host }
    }

    /// Paginate `blocks` against `geometry`.
    ///
    /// Fails before building anything when the geometry is unusable, and
    /// aborts the whole run when a template can't be instantiated or a block
    /// carries an invalid measurement.
    pub fn paginate<B>(
        &self,
        blocks: impl IntoIterator<Item = ContentBlock<B>>,
        geometry: &PageGeometry,
        spec: &HeaderFooterSpec<H::Template>,
    ) -> Result<Report<B, H::Instance>> {
        if let Some(reason) = geometry.dimension_error() {
            return Err(FolioError::InvalidGeometry(reason));
        }
        let usable_height = geometry.usable_height();
        if usable_height <= 0.0 {
            return Err(FolioError::EmptyGeometry { usable_height });
        }

        let mut pages: Vec<Page<B, H::Instance>> = Vec::new();
        let mut cursor = self.open_page(1, geometry, spec)?;
        let mut block_count = 0usize;

        for (index, block) in blocks.into_iter().enumerate() {
            if let Some(reason) = block.validation_error() {
                return Err(FolioError::InvalidBlock { index, reason });
            }
            block_count += 1;

            let decision = decide_break(
                cursor.used_height,
                block.outer_height(),
                usable_height,
                !cursor.blocks.is_empty(),
            );
            match decision {
                BreakDecision::Place => {}
                BreakDecision::MoveToNextPage => {
                    let next = self.open_page(cursor.number + 1, geometry, spec)?;
                    pages.push(std::mem::replace(&mut cursor, next).finalize());
                    if cursor.used_height + block.outer_height() > usable_height {
                        warn_oversized(index, &block, &cursor, usable_height);
                    }
                }
                BreakDecision::PlaceOversized => {
                    warn_oversized(index, &block, &cursor, usable_height);
                }
            }
            cursor.place(block);
        }
        pages.push(cursor.finalize());

        self.stamp_page_numbers(&mut pages);

        log::info!(
            "Paginated {} blocks into {} pages (usable height {:.2})",
            block_count,
            pages.len(),
            usable_height
        );

        Ok(Report {
            pages,
            geometry: *geometry,
        })
    }

    fn open_page<B>(
        &self,
        number: usize,
        geometry: &PageGeometry,
        spec: &HeaderFooterSpec<H::Template>,
    ) -> Result<PageCursor<B, H::Instance>> {
        let header = spec
            .header_for(number)
            .map(|t| self.instantiate(t, TemplateSlot::Header, number, geometry))
            .transpose()?;
        let footer = spec
            .footer_for(number)
            .map(|t| self.instantiate(t, TemplateSlot::Footer, number, geometry))
            .transpose()?;

        let used_height = header.as_ref().map_or(0.0, |h| h.height)
            + footer.as_ref().map_or(0.0, |f| f.height);

        log::debug!(
            "Opened page {} (header: {}, footer: {}, used {:.2} of {:.2})",
            number,
            header.is_some(),
            footer.is_some(),
            used_height,
            geometry.usable_height()
        );
        if used_height >= geometry.usable_height() {
            log::warn!(
                "Header and footer on page {} use {:.2} of {:.2}; no room left for content",
                number,
                used_height,
                geometry.usable_height()
            );
        }

        Ok(PageCursor {
            number,
            blocks: Vec::new(),
            header,
            footer,
            used_height,
        })
    }

    fn instantiate(
        &self,
        template: &H::Template,
        slot: TemplateSlot,
        page_number: usize,
        geometry: &PageGeometry,
    ) -> Result<PageDecoration<H::Instance>> {
        let failed = || FolioError::TemplateInstantiation { slot, page_number };

        let instance = self.host.instantiate(template).ok_or_else(failed)?;
        let constraint = Size::new(geometry.content_width(), geometry.usable_height());
        let height = self.host.measure(&instance, constraint).height;
        if !height.is_finite() || height < 0.0 {
            return Err(failed());
        }

        Ok(PageDecoration { instance, height })
    }

    fn stamp_page_numbers<B>(&self, pages: &mut [Page<B, H::Instance>]) {
        let total = pages.len();
        for page in pages.iter_mut() {
            let numbering = PageNumbering {
                number: page.number,
                total,
            };
            if let Some(header) = page.header.as_mut() {
                self.host.stamp(&mut header.instance, numbering);
            }
            if let Some(footer) = page.footer.as_mut() {
                self.host.stamp(&mut footer.instance, numbering);
            }
        }
    }
}

fn warn_oversized<B, I>(
    index: usize,
    block: &ContentBlock<B>,
    cursor: &PageCursor<B, I>,
    usable_height: f64,
) {
    log::warn!(
        "Block {} ({:.2} tall) overflows the {:.2} left on page {}; placing it alone",
        index,
        block.outer_height(),
        usable_height - cursor.used_height,
        cursor.number
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::text::TextHost;

    fn geometry(usable: f64) -> PageGeometry {
        PageGeometry::new(500.0, usable + 50.0, Edges::symmetric(25.0, 25.0))
    }

    fn blocks(heights: &[f64]) -> Vec<ContentBlock<usize>> {
        heights
            .iter()
            .enumerate()
            .map(|(i, &h)| ContentBlock::new(i, h))
            .collect()
    }

    fn distribution<I>(report: &Report<usize, I>) -> Vec<Vec<usize>> {
        report
            .pages()
            .iter()
            .map(|p| p.blocks().iter().map(|b| b.handle).collect())
            .collect()
    }

    #[test]
    fn everything_fits_one_page() {
        let host = TextHost::default();
        let report = PageBuilder::new(&host)
            .paginate(blocks(&[100.0, 100.0, 100.0]), &geometry(700.0), &HeaderFooterSpec::default())
            .unwrap();
        assert_eq!(distribution(&report), vec![vec![0, 1, 2]]);
    }

    #[test]
    fn overflow_opens_next_page() {
        let host = TextHost::default();
        let report = PageBuilder::new(&host)
            .paginate(blocks(&[300.0, 300.0, 300.0]), &geometry(700.0), &HeaderFooterSpec::default())
            .unwrap();
        assert_eq!(distribution(&report), vec![vec![0, 1], vec![2]]);
        assert_eq!(report.pages()[1].number(), 2);
    }

    #[test]
    fn exact_fill_stays_on_page() {
        let host = TextHost::default();
        let report = PageBuilder::new(&host)
            .paginate(blocks(&[350.0, 350.0, 1.0]), &geometry(700.0), &HeaderFooterSpec::default())
            .unwrap();
        assert_eq!(distribution(&report), vec![vec![0, 1], vec![2]]);
    }

    #[test]
    fn block_margins_count() {
        let host = TextHost::default();
        let blocks = vec![
            ContentBlock::new(0, 300.0).with_margin(Edges::symmetric(10.0, 0.0)),
            ContentBlock::new(1, 300.0).with_margin(Edges::symmetric(10.0, 0.0)),
        ];
        // 320 + 320 = 640 fits 650; 330 + 330 wouldn't.
        let report = PageBuilder::new(&host)
            .paginate(blocks, &geometry(650.0), &HeaderFooterSpec::default())
            .unwrap();
        assert_eq!(report.len(), 1);
        assert!((report.pages()[0].used_height() - 640.0).abs() < 0.001);
    }

    #[test]
    fn oversized_block_alone() {
        let host = TextHost::default();
        let report = PageBuilder::new(&host)
            .paginate(blocks(&[100.0, 900.0, 100.0]), &geometry(700.0), &HeaderFooterSpec::default())
            .unwrap();
        assert_eq!(distribution(&report), vec![vec![0], vec![1], vec![2]]);
        assert!(report.pages()[1].is_overflowing(report.geometry()));
        assert!(!report.pages()[0].is_overflowing(report.geometry()));
    }

    #[test]
    fn oversized_first_block_stays_on_page_one() {
        let host = TextHost::default();
        let report = PageBuilder::new(&host)
            .paginate(blocks(&[900.0]), &geometry(700.0), &HeaderFooterSpec::default())
            .unwrap();
        assert_eq!(distribution(&report), vec![vec![0]]);
    }

    #[test]
    fn empty_input_yields_single_page() {
        let host = TextHost::default();
        let spec = HeaderFooterSpec::new(Some("Title".to_string()), None);
        let report = PageBuilder::new(&host)
            .paginate(Vec::<ContentBlock<usize>>::new(), &geometry(700.0), &spec)
            .unwrap();
        assert_eq!(report.len(), 1);
        assert!(report.pages()[0].blocks().is_empty());
        assert!(report.pages()[0].header().is_some());
    }

    #[test]
    fn empty_geometry_fails_fast() {
        let host = TextHost::default();
        let g = PageGeometry::new(500.0, 100.0, Edges::symmetric(50.0, 0.0));
        let err = PageBuilder::new(&host)
            .paginate(blocks(&[10.0]), &g, &HeaderFooterSpec::default())
            .unwrap_err();
        assert!(matches!(err, FolioError::EmptyGeometry { .. }));
    }

    #[test]
    fn invalid_block_aborts() {
        let host = TextHost::default();
        let err = PageBuilder::new(&host)
            .paginate(blocks(&[10.0, f64::NAN]), &geometry(700.0), &HeaderFooterSpec::default())
            .unwrap_err();
        assert!(matches!(err, FolioError::InvalidBlock { index: 1, .. }));
    }

    #[test]
    fn header_and_footer_heights_are_budgeted() {
        // Default text host: 20 units per line.
        let host = TextHost::default();
        let spec = HeaderFooterSpec::new(Some("H".to_string()), Some("F".to_string()));
        let report = PageBuilder::new(&host)
            .paginate(blocks(&[330.0, 330.0]), &geometry(700.0), &spec)
            .unwrap();
        // 40 + 330 + 330 = 700: exact fill.
        assert_eq!(report.len(), 1);
        let report = PageBuilder::new(&host)
            .paginate(blocks(&[331.0, 330.0]), &geometry(700.0), &spec)
            .unwrap();
        assert_eq!(report.len(), 2);
    }

    #[test]
    fn block_offsets_follow_header_and_margins() {
        let host = TextHost::default();
        let spec = HeaderFooterSpec::new(Some("H".to_string()), Some("F".to_string()));
        let g = geometry(700.0);
        let blocks = vec![
            ContentBlock::new(0, 100.0).with_margin(Edges::symmetric(5.0, 0.0)),
            ContentBlock::new(1, 100.0),
        ];
        let report = PageBuilder::new(&host).paginate(blocks, &g, &spec).unwrap();
        let page = &report.pages()[0];
        let offsets = page.block_offsets(&g);
        assert!((offsets[0] - (25.0 + 20.0 + 5.0)).abs() < 0.001);
        assert!((offsets[1] - (25.0 + 20.0 + 110.0)).abs() < 0.001);
        assert!((page.footer_offset(&g).unwrap() - (750.0 - 25.0 - 20.0)).abs() < 0.001);
    }
}
