//! Plain-text reference adapter.
//!
//! Templates are strings; each `\n`-separated line is one fixed-height line.
//! `{{pageNumber}}` and `{{totalPages}}` are substituted when pages are
//! stamped. Pages render to a plain-text dump, which is what the CLI prints.

use std::fmt::{self, Write};

use crate::error::{FolioError, Result};
use crate::layout::{Page, Report};
use crate::model::Size;

use super::{PageNumbering, PageRenderer, TemplateHost};

/// A header or footer instantiated from a text template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextFragment {
    pub lines: Vec<String>,
}

impl TextFragment {
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

/// Text template host and page renderer.
#[derive(Debug, Clone, Copy)]
pub struct TextHost {
    pub line_height: f64,
    pub char_width: f64,
}

impl Default for TextHost {
    fn default() -> Self {
        Self {
            line_height: 20.0,
            char_width: 7.0,
        }
    }
}

impl TemplateHost for TextHost {
    type Template = String;
    type Instance = TextFragment;

    fn instantiate(&self, template: &String) -> Option<TextFragment> {
        if template.trim().is_empty() {
            return None;
        }
        Some(TextFragment {
            lines: template.lines().map(str::to_string).collect(),
        })
    }

    fn measure(&self, instance: &TextFragment, constraint: Size) -> Size {
        let longest = instance
            .lines
            .iter()
            .map(|l| l.chars().count())
            .max()
            .unwrap_or(0);
        Size::new(
            (longest as f64 * self.char_width).min(constraint.width),
            instance.lines.len() as f64 * self.line_height,
        )
    }

    fn stamp(&self, instance: &mut TextFragment, numbering: PageNumbering) {
        for line in &mut instance.lines {
            *line = line
                .replace("{{pageNumber}}", &numbering.number.to_string())
                .replace("{{totalPages}}", &numbering.total.to_string());
        }
    }
}

impl<B: fmt::Display> PageRenderer<B> for TextHost {
    type Surface = String;

    fn render(
        &self,
        page: &Page<B, TextFragment>,
        report: &Report<B, TextFragment>,
        scale: Option<f64>,
    ) -> Result<(String, Size)> {
        let geometry = report.geometry();
        let factor = scale.unwrap_or(1.0);
        let mut out = String::new();

        write_page(&mut out, page, report.len(), scale, geometry.usable_height())
            .map_err(|e| FolioError::Render(e.to_string()))?;

        Ok((
            out,
            Size::new(geometry.width * factor, geometry.height * factor),
        ))
    }
}

fn write_page<B: fmt::Display>(
    out: &mut String,
    page: &Page<B, TextFragment>,
    total: usize,
    scale: Option<f64>,
    usable_height: f64,
) -> fmt::Result {
    write!(out, "--- Page {} of {}", page.number(), total)?;
    if let Some(s) = scale {
        write!(out, " (scale {:.3})", s)?;
    }
    writeln!(out, " ---")?;

    if let Some(header) = page.header() {
        for line in &header.instance.lines {
            writeln!(out, "  | {}", line)?;
        }
    }
    for block in page.blocks() {
        writeln!(out, "  {} [{:.1}]", block.handle, block.height)?;
    }
    if page.used_height() > usable_height {
        writeln!(
            out,
            "  !! overflows by {:.1}",
            page.used_height() - usable_height
        )?;
    }
    if let Some(footer) = page.footer() {
        for line in &footer.instance.lines {
            writeln!(out, "  | {}", line)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_template_fails() {
        let host = TextHost::default();
        assert!(host.instantiate(&"   ".to_string()).is_none());
        assert!(host.instantiate(&"Title".to_string()).is_some());
    }

    #[test]
    fn measures_lines() {
        let host = TextHost::default();
        let frag = host.instantiate(&"Report\nPage {{pageNumber}}".to_string()).unwrap();
        let size = host.measure(&frag, Size::new(1000.0, 1000.0));
        assert!((size.height - 40.0).abs() < 0.001);
        assert!((size.width - 19.0 * 7.0).abs() < 0.001);
    }

    #[test]
    fn width_clamped_to_constraint() {
        let host = TextHost::default();
        let frag = host.instantiate(&"x".repeat(200)).unwrap();
        let size = host.measure(&frag, Size::new(300.0, 1000.0));
        assert!((size.width - 300.0).abs() < 0.001);
    }

    #[test]
    fn stamp_substitutes_placeholders() {
        let host = TextHost::default();
        let mut frag = host
            .instantiate(&"Page {{pageNumber}} of {{totalPages}}".to_string())
            .unwrap();
        host.stamp(&mut frag, PageNumbering { number: 2, total: 5 });
        assert_eq!(frag.text(), "Page 2 of 5");
    }
}
