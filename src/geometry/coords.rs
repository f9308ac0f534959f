//! Coordinate conversions between the three spaces that meet in redaction.
//!
//! (A) image pixels, top-left origin, at a render DPI; (B) PDF points,
//! top-left origin (the application convention); (C) PDF points, bottom-left
//! origin (PDF native). Every function names the spaces it maps between, so
//! a call site can never look correct while flipping the wrong axis.
//!
//! All functions are pure; none touch the document.

use crate::error::{Error, Result};
use crate::geometry::Rect;

/// PDF points per inch.
pub const POINTS_PER_INCH: f64 = 72.0;

/// Convert a scalar from image pixels to PDF points (both top-left).
///
/// # Errors
///
/// Returns `InvalidArgument` when `render_dpi` is zero or negative.
pub fn image_px_to_pdf_pt(value_px: f64, render_dpi: f64) -> Result<f64> {
    if render_dpi <= 0.0 {
        return Err(Error::InvalidArgument(format!(
            "render_dpi must be positive, got {}",
            render_dpi
        )));
    }
    Ok(value_px * POINTS_PER_INCH / render_dpi)
}

/// Convert a scalar from PDF points to image pixels (both top-left).
///
/// # Errors
///
/// Returns `InvalidArgument` when `render_dpi` is zero or negative.
pub fn pdf_pt_to_image_px(value_pt: f64, render_dpi: f64) -> Result<f64> {
    if render_dpi <= 0.0 {
        return Err(Error::InvalidArgument(format!(
            "render_dpi must be positive, got {}",
            render_dpi
        )));
    }
    Ok(value_pt * render_dpi / POINTS_PER_INCH)
}

/// Convert a rectangle from image pixels to PDF points.
///
/// Both spaces are top-left, so only the four components scale; the origin
/// does not move.
pub fn image_rect_to_pdf_rect(rect_px: &Rect, render_dpi: f64) -> Result<Rect> {
    Ok(Rect::new(
        image_px_to_pdf_pt(rect_px.x, render_dpi)?,
        image_px_to_pdf_pt(rect_px.y, render_dpi)?,
        image_px_to_pdf_pt(rect_px.width, render_dpi)?,
        image_px_to_pdf_pt(rect_px.height, render_dpi)?,
    ))
}

/// Convert a rectangle from PDF points to image pixels.
pub fn pdf_rect_to_image_rect(rect_pt: &Rect, render_dpi: f64) -> Result<Rect> {
    Ok(Rect::new(
        pdf_pt_to_image_px(rect_pt.x, render_dpi)?,
        pdf_pt_to_image_px(rect_pt.y, render_dpi)?,
        pdf_pt_to_image_px(rect_pt.width, render_dpi)?,
        pdf_pt_to_image_px(rect_pt.height, render_dpi)?,
    ))
}

/// Flip a Y coordinate between PDF-native bottom-left and top-left space.
///
/// The map is its own inverse: `y' = page_height − y` in both directions.
pub fn flip_y(y: f64, page_height: f64) -> f64 {
    page_height - y
}

/// Convert a top-left rectangle to its bottom-left counterpart.
///
/// `bottom = H − y − h`; width and height are unchanged.
pub fn rect_top_left_to_bottom_left(rect_tl: &Rect, page_height: f64) -> Rect {
    Rect::new(
        rect_tl.x,
        page_height - rect_tl.y - rect_tl.height,
        rect_tl.width,
        rect_tl.height,
    )
}

/// Convert a bottom-left rectangle to its top-left counterpart.
///
/// Structurally identical to [`rect_top_left_to_bottom_left`]; spelled out
/// separately so call sites state their direction.
pub fn rect_bottom_left_to_top_left(rect_bl: &Rect, page_height: f64) -> Rect {
    Rect::new(
        rect_bl.x,
        page_height - rect_bl.y - rect_bl.height,
        rect_bl.width,
        rect_bl.height,
    )
}

/// Compose the pixel→point scale with the Y flip for an image-space
/// selection, returning `(left, bottom, right, top)` in PDF-native
/// bottom-left points.
pub fn image_selection_to_pdf_coords(
    rect_px: &Rect,
    page_height_pt: f64,
    render_dpi: f64,
) -> Result<(f64, f64, f64, f64)> {
    let rect_pt = image_rect_to_pdf_rect(rect_px, render_dpi)?;
    let bottom = page_height_pt - rect_pt.y - rect_pt.height;
    let top = page_height_pt - rect_pt.y;
    Ok((rect_pt.x, bottom, rect_pt.x + rect_pt.width, top))
}

/// Pre-rotate a top-left rectangle selected on a rotated page back into the
/// unrotated page's coordinate space.
///
/// `rotation` is the page's `/Rotate` value (clockwise display rotation).
/// `page_width` and `page_height` are the unrotated page dimensions in the
/// same unit as the rectangle. For 90/270 the selection was made against a
/// display whose axes are swapped, so the inverse mapping swaps width and
/// height back.
pub fn transform_for_rotation(
    rect_tl: &Rect,
    rotation: i32,
    page_width: f64,
    page_height: f64,
) -> Rect {
    match rotation.rem_euclid(360) {
        90 => Rect::new(
            rect_tl.y,
            page_height - rect_tl.x - rect_tl.width,
            rect_tl.height,
            rect_tl.width,
        ),
        180 => Rect::new(
            page_width - rect_tl.x - rect_tl.width,
            page_height - rect_tl.y - rect_tl.height,
            rect_tl.width,
            rect_tl.height,
        ),
        270 => Rect::new(
            page_width - rect_tl.y - rect_tl.height,
            rect_tl.x,
            rect_tl.height,
            rect_tl.width,
        ),
        _ => *rect_tl,
    }
}

/// Sanity predicate for a top-left rectangle against a page.
///
/// True iff the rectangle lies within the page bounds expanded by `tolerance`
/// on every side and has strictly positive width and height. This is a
/// warning signal, not a gate: callers log and proceed.
pub fn is_valid_for_page(
    rect_tl: &Rect,
    page_width: f64,
    page_height: f64,
    tolerance: f64,
) -> bool {
    rect_tl.width > 0.0
        && rect_tl.height > 0.0
        && rect_tl.x >= -tolerance
        && rect_tl.y >= -tolerance
        && rect_tl.right() <= page_width + tolerance
        && rect_tl.bottom() <= page_height + tolerance
}
