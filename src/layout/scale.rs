//! # Scale to Fit
//!
//! One uniform shrink factor per page so a logical page fits the device's
//! printable area. Pages are never enlarged.

use crate::error::{FolioError, Result};
use crate::model::Size;

/// Subtracted from every computed shrink factor so rasteriser rounding can't
/// push content past the physical page edge.
pub const SCALE_SAFETY_MARGIN: f64 = 0.015;

/// Compute the uniform scale for `logical_size` on `printable_area`.
///
/// Returns exactly `1.0` when the logical page already fits the printable
/// area in both dimensions (an exact fit counts). Otherwise the limiting axis ratio minus
/// `SCALE_SAFETY_MARGIN`. The result is only meaningful for positive inputs;
/// see [`fit_scale`] for the checked variant.
pub fn compute_scale(logical_size: Size, printable_area: Size) -> f64 {
    if logical_size.width <= printable_area.width && logical_size.height <= printable_area.height {
        return 1.0;
    }

    let sx = printable_area.width / logical_size.width;
    let sy = printable_area.height / logical_size.height;
    sx.min(sy) - SCALE_SAFETY_MARGIN
}

/// Like [`compute_scale`], but rejects malformed input and non-positive results.
pub fn fit_scale(logical_size: Size, printable_area: Size) -> Result<f64> {
    if !logical_size.is_positive() || !printable_area.is_positive() {
        return Err(FolioError::InvalidGeometry(format!(
            "cannot scale {}x{} onto {}x{}",
            logical_size.width, logical_size.height, printable_area.width, printable_area.height
        )));
    }

    let scale = compute_scale(logical_size, printable_area);
    if !scale.is_finite() || scale <= 0.0 {
        return Err(FolioError::InvalidGeometry(format!(
            "scale factor {} for {}x{} onto {}x{} is not positive",
            scale, logical_size.width, logical_size.height, printable_area.width, printable_area.height
        )));
    }
    Ok(scale)
}
