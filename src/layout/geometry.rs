//! # Geometry Resolution
//!
//! Derives the logical page that blocks are laid out against. The width comes
//! from the container the blocks were measured in; the height follows the
//! device's aspect ratio so a full logical page maps onto a full device page.

use crate::error::{FolioError, Result};
use crate::model::{Edges, Orientation, PageGeometry, Size};

/// Resolve the logical page geometry for a container of measured content.
///
/// `printable_area` is the device's printable area as reported in portrait;
/// for landscape the ratio is inverted.
pub fn resolve(
    container_content_width: f64,
    margin: Edges,
    orientation: Orientation,
    printable_area: Size,
) -> Result<PageGeometry> {
    if !container_content_width.is_finite() || container_content_width <= 0.0 {
        return Err(FolioError::InvalidGeometry(format!(
            "container content width must be positive, got {}",
            container_content_width
        )));
    }
    if !printable_area.is_positive() {
        return Err(FolioError::InvalidGeometry(format!(
            "printable area must be positive, got {}x{}",
            printable_area.width, printable_area.height
        )));
    }

    let width = container_content_width + margin.horizontal();
    let ratio = match orientation {
        Orientation::Portrait => printable_area.height / printable_area.width,
        Orientation::Landscape => printable_area.width / printable_area.height,
    };

    let geometry = PageGeometry::new(width, width * ratio, margin);
    if let Some(reason) = geometry.dimension_error() {
        return Err(FolioError::InvalidGeometry(reason));
    }
    Ok(geometry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn portrait_keeps_device_ratio() {
        let g = resolve(550.0, Edges::uniform(25.0), Orientation::Portrait, Size::new(800.0, 1000.0))
            .unwrap();
        assert!((g.width - 600.0).abs() < 0.001);
        assert!((g.height - 750.0).abs() < 0.001);
    }

    #[test]
    fn landscape_inverts_ratio() {
        let g = resolve(550.0, Edges::uniform(25.0), Orientation::Landscape, Size::new(800.0, 1000.0))
            .unwrap();
        assert!((g.width - 600.0).abs() < 0.001);
        assert!((g.height - 480.0).abs() < 0.001);
    }

    #[test]
    fn zero_width_is_invalid() {
        let err = resolve(0.0, Edges::default(), Orientation::Portrait, Size::new(800.0, 1000.0))
            .unwrap_err();
        assert!(matches!(err, FolioError::InvalidGeometry(_)));
    }

    #[test]
    fn zero_printable_dimension_is_invalid() {
        let err = resolve(500.0, Edges::default(), Orientation::Portrait, Size::new(800.0, 0.0))
            .unwrap_err();
        assert!(matches!(err, FolioError::InvalidGeometry(_)));
        let err = resolve(500.0, Edges::default(), Orientation::Landscape, Size::new(0.0, 800.0))
            .unwrap_err();
        assert!(matches!(err, FolioError::InvalidGeometry(_)));
    }

    #[test]
    fn negative_margin_is_invalid() {
        let err = resolve(500.0, Edges::uniform(-5.0), Orientation::Portrait, Size::new(800.0, 1000.0))
            .unwrap_err();
        assert!(matches!(err, FolioError::InvalidGeometry(_)));
    }
}
