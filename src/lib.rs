//! # qrstyle
//!
//! A Rust library for generating QR codes with Reed-Solomon error correction and
//! rendering them as SVG, PNG or JPEG with custom module shapes and colors.
//!
//! ## Features
//!
//! - **QR Code Generation**: Byte mode symbols, versions 1 to 40, error correction levels L, M, Q and H
//! - **Mask Selection**: All eight masks are scored with the standard penalty rules, in parallel
//! - **Styled Rendering**: Square, dot or rounded modules, separate colors for finder patterns and data
//! - **Output Formats**: SVG text, PNG and JPEG bytes, or base64 strings for bindings
//!
//! ## Quick Start
//!
//! ### Boundary functions
//!
//! ```rust
//! use qrstyle::{get_dimensions, render_png, render_svg, RenderConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Square modules in black, error correction level M
//! let svg = render_svg("https://google.com", None)?;
//! assert!(svg.starts_with("<svg"));
//!
//! let config = RenderConfig::parse("Rounded", "Dot", "#1e90ff", "black")?;
//! let png_base64 = render_png("https://google.com", Some(&config))?;
//! let (w, h) = get_dimensions("https://google.com", Some(&config))?;
//! assert_eq!((w, h), (330, 330));
//! config.release();
//! # let _ = png_base64;
//! # Ok(())
//! # }
//! ```
//!
//! ### Full Configuration
//!
//! ```rust
//! use qrstyle::{ECLevel, MaskPattern, QRBuilder, RenderConfig, Shape, Version};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let qr = QRBuilder::new(b"Hello, World!")
//!     .version(Version::new(2))   // QR version (size) - if not provided, finds smallest version to fit data
//!     .ec_level(ECLevel::Q)       // Error correction level - if not provided, defaults to ECLevel::M
//!     .mask(MaskPattern::new(3))  // Mask pattern - if not provided, finds best mask based on penalty score
//!     .build()?;
//!
//! let config = RenderConfig::new(Shape::Dot, Shape::Square);
//! let jpeg = qr.to_jpeg(&config)?;
//! assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Rendering
//!
//! Every module is drawn 10 pixels wide with a 4 module white quiet zone, so a
//! symbol `w` modules wide becomes a `(w + 8) * 10` pixel square. Modules of
//! the three finder patterns use the finder shape and color, every other dark
//! module uses the data shape and color.
//!
//! | Shape      | Finder | Data |
//! |------------|--------|------|
//! | `Square`   | yes    | yes  |
//! | `Dot`      | yes    | yes  |
//! | `Rounded`  | yes    | no   |
//! | `Triangle` | no     | no   |
//!
//! Shapes that are not implemented are rejected with
//! [`QRError::UnsupportedShape`] instead of being drawn as something else.

#![allow(clippy::items_after_test_module, clippy::suspicious_arithmetic_impl)]

pub mod builder;
pub(crate) mod common;
pub mod render;

use base64::{engine::general_purpose::STANDARD, Engine};

pub use builder::{Module, QRBuilder, QR};
pub use common::error::{QRError, QRResult};
pub use common::mask::MaskPattern;
pub use common::metadata::{Color, ECLevel, Role, Version};
pub use render::{dimensions, Format, ModuleClass, RenderConfig, Rgb, Shape, Unit};

// Boundary functions
//------------------------------------------------------------------------------

/// Error correction level used by the boundary functions.
pub const BOUNDARY_EC_LEVEL: ECLevel = ECLevel::M;

/// Renders `text` as an SVG document.
///
/// `text` is encoded as given. It must contain something besides whitespace,
/// but surrounding whitespace is not trimmed: that is left to the caller.
/// A missing `config` means [`RenderConfig::default`].
pub fn render_svg(text: &str, config: Option<&RenderConfig>) -> QRResult<String> {
    let default = RenderConfig::default();
    build_symbol(text)?.to_svg(config.unwrap_or(&default))
}

/// Renders `text` as a PNG and returns it base64 encoded, standard alphabet
/// with padding. See [`render_svg`] for how `text` and `config` are handled.
pub fn render_png(text: &str, config: Option<&RenderConfig>) -> QRResult<String> {
    let default = RenderConfig::default();
    let png = build_symbol(text)?.to_png(config.unwrap_or(&default))?;
    Ok(STANDARD.encode(png))
}

/// Renders `text` as a JPEG and returns it base64 encoded. See
/// [`render_svg`] for how `text` and `config` are handled.
pub fn render_jpeg(text: &str, config: Option<&RenderConfig>) -> QRResult<String> {
    let default = RenderConfig::default();
    let jpeg = build_symbol(text)?.to_jpeg(config.unwrap_or(&default))?;
    Ok(STANDARD.encode(jpeg))
}

/// Pixel width and height of the image the `render_*` functions produce for
/// `text`. Shapes and colors do not affect the size, so `config` is accepted
/// only for symmetry with the render functions.
pub fn get_dimensions(text: &str, _config: Option<&RenderConfig>) -> QRResult<(u32, u32)> {
    reject_blank(text)?;
    dimensions(text, BOUNDARY_EC_LEVEL, Unit::Pixels)
}

fn reject_blank(text: &str) -> QRResult<()> {
    if text.trim().is_empty() {
        return Err(QRError::EmptyData);
    }
    Ok(())
}

fn build_symbol(text: &str) -> QRResult<QR> {
    reject_blank(text)?;
    QRBuilder::new(text.as_bytes()).ec_level(BOUNDARY_EC_LEVEL).build()
}
