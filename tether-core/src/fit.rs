//! Grid fitting
//!
//! Computes the whole-cell grid that fills a container. Partial cells are
//! never counted, and the result is always at least one cell in each
//! direction so a surface can be resized to it unconditionally.

use crate::geometry::{FontMetrics, Geometry, PixelSize, Reservation};

/// Compute the geometry that best fills `size` with cells of `metrics`
///
/// Pure: identical inputs always produce identical output.
pub fn compute_fit(size: PixelSize, metrics: &FontMetrics, reserve: Reservation) -> Geometry {
    if !metrics.is_valid() {
        log::debug!("Unusable font metrics {:?}, fitting to 1x1", metrics);
        return Geometry::MIN;
    }

    let available = reserve.available(size);
    let cols = cells(available.width, metrics.cell_width);
    let rows = cells(available.height, metrics.cell_height);
    Geometry::new(cols, rows).clamped()
}

fn cells(pixels: u32, cell: f32) -> u16 {
    let count = (pixels as f64 / cell as f64).floor();
    count.clamp(0.0, u16::MAX as f64) as u16
}
