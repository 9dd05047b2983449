use log::debug;

use super::canvas_size;
use crate::common::codec::find_min_version;
use crate::common::error::{QRError, QRResult};
use crate::common::metadata::ECLevel;

/// Unit of a dimension query.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Default)]
pub enum Unit {
    /// Side of the module grid.
    Modules,
    /// Side of the rendered canvas, quiet zone included.
    #[default]
    Pixels,
}

/// Width and height of the symbol `text` would produce at `ecl`, without
/// building it. Only the version selection runs.
pub fn dimensions(text: &str, ecl: ECLevel, unit: Unit) -> QRResult<(u32, u32)> {
    if text.is_empty() {
        return Err(QRError::EmptyData);
    }
    let ver = find_min_version(text.len(), ecl)?;
    let w = ver.width();
    let side = match unit {
        Unit::Modules => w as u32,
        Unit::Pixels => canvas_size(w),
    };
    debug!("Dimensions of {} bytes at level {ecl}: version {ver}, {side} {unit:?}", text.len());
    Ok((side, side))
}
