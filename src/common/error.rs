use thiserror::Error;

use super::metadata::ECLevel;
use crate::render::{Format, ModuleClass, Shape};

// Error
//------------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum QRError {
    // Builder
    #[error("Empty data")]
    EmptyData,
    #[error("Capacity exceeded: {len} bytes do not fit in any version at error correction level {ec_level}")]
    CapacityExceeded { len: usize, ec_level: ECLevel },
    #[error("Invalid version: {0}")]
    InvalidVersion(usize),
    #[error("Invalid masking pattern: {0}")]
    InvalidMaskingPattern(u8),

    // Render config
    #[error("Invalid shape: {0:?}")]
    InvalidShape(String),
    #[error("Invalid color: {0:?}")]
    InvalidColor(String),

    // Renderers
    #[error("Unsupported shape: {shape} is not implemented for {class} modules in {format}")]
    UnsupportedShape { shape: Shape, class: ModuleClass, format: Format },
    #[error("Failed to encode image: {0}")]
    ImageEncoding(#[from] image::ImageError),
}

pub type QRResult<T> = Result<T, QRError>;
