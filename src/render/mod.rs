mod config;
mod dimensions;
mod raster;
mod svg;

pub use config::{RenderConfig, Rgb};
pub use dimensions::{dimensions, Unit};

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::builder::QR;
use crate::common::error::{QRError, QRResult};
use crate::common::metadata::{Color, Role};

// Shapes
//------------------------------------------------------------------------------

/// Geometry used to draw a dark module.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash, Default)]
pub enum Shape {
    #[default]
    Square,
    Dot,
    Rounded,
    Triangle,
}

impl Display for Shape {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Square => "Square",
            Self::Dot => "Dot",
            Self::Rounded => "Rounded",
            Self::Triangle => "Triangle",
        };
        f.write_str(s)
    }
}

impl FromStr for Shape {
    type Err = QRError;

    fn from_str(s: &str) -> QRResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "square" => Ok(Self::Square),
            "dot" => Ok(Self::Dot),
            "rounded" => Ok(Self::Rounded),
            "triangle" => Ok(Self::Triangle),
            _ => Err(QRError::InvalidShape(s.to_string())),
        }
    }
}

impl Shape {
    /// Whether the renderers can draw this shape for the module class.
    pub fn is_implemented(self, class: ModuleClass) -> bool {
        match (self, class) {
            (Self::Square | Self::Dot, _) => true,
            (Self::Rounded, ModuleClass::Finder) => true,
            (Self::Rounded, ModuleClass::Data) | (Self::Triangle, _) => false,
        }
    }
}

/// Modules are styled in two classes: the three finder patterns, and every
/// other dark module.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash)]
pub enum ModuleClass {
    Finder,
    Data,
}

impl Display for ModuleClass {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Finder => f.write_str("finder"),
            Self::Data => f.write_str("data"),
        }
    }
}

impl From<Role> for ModuleClass {
    fn from(role: Role) -> Self {
        match role {
            Role::Finder => Self::Finder,
            _ => Self::Data,
        }
    }
}

// Output formats
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash)]
pub enum Format {
    Svg,
    Png,
    Jpeg,
}

impl Display for Format {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Svg => f.write_str("SVG"),
            Self::Png => f.write_str("PNG"),
            Self::Jpeg => f.write_str("JPEG"),
        }
    }
}

/// Rejects shapes the renderer for `format` cannot draw. Runs before any
/// drawing so no partial output is produced.
pub(crate) fn check_shapes(config: &RenderConfig, format: Format) -> QRResult<()> {
    for class in [ModuleClass::Finder, ModuleClass::Data] {
        let shape = config.shape(class);
        if !shape.is_implemented(class) {
            return Err(QRError::UnsupportedShape { shape, class, format });
        }
    }
    Ok(())
}

/// Side of the rendered canvas in pixels for a symbol `width` modules wide.
pub fn canvas_size(width: usize) -> u32 {
    (width as u32 + 2 * QUIET_ZONE) * MODULE_SIZE
}

// Top left pixel and class of every dark module, row by row
pub(crate) fn dark_modules(qr: &QR) -> impl Iterator<Item = (u32, u32, ModuleClass)> + '_ {
    let w = qr.width() as i16;
    (0..w).flat_map(move |r| (0..w).map(move |c| (r, c))).filter_map(move |(r, c)| {
        let m = qr.get(r, c);
        if *m != Color::Dark {
            return None;
        }
        let x = (c as u32 + QUIET_ZONE) * MODULE_SIZE;
        let y = (r as u32 + QUIET_ZONE) * MODULE_SIZE;
        Some((x, y, ModuleClass::from(m.role())))
    })
}


// Global constants
//------------------------------------------------------------------------------

/// Pixels per module.
pub const MODULE_SIZE: u32 = 10;

/// Light margin around the symbol, in modules.
pub const QUIET_ZONE: u32 = 4;

pub const JPEG_QUALITY: u8 = 90;

// Corner radius of rounded modules
const ROUNDED_RADIUS: u32 = MODULE_SIZE / 4;

// Curved shapes are rasterized at this many times the module size, then
// downsampled
const SUPER_SAMPLING: u32 = 12;
