use std::fmt::{Display, Formatter};
use std::str::FromStr;

use log::trace;

use super::{ModuleClass, Shape};
use crate::common::error::{QRError, QRResult};

// Color
//------------------------------------------------------------------------------

/// Opaque 8 bit RGB color.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const WHITE: Rgb = Rgb(255, 255, 255);

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

impl Display for Rgb {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl From<Rgb> for image::Rgba<u8> {
    fn from(c: Rgb) -> Self {
        image::Rgba([c.0, c.1, c.2, 255])
    }
}

/// Accepts `#rrggbb`, `#rgb` or a CSS named color, case-insensitively.
impl FromStr for Rgb {
    type Err = QRError;

    fn from_str(s: &str) -> QRResult<Self> {
        let token = s.trim().to_ascii_lowercase();
        let parsed = match token.strip_prefix('#') {
            Some(hex) => parse_hex(hex),
            None => NAMED_COLORS
                .binary_search_by_key(&token.as_str(), |&(name, _)| name)
                .ok()
                .map(|i| NAMED_COLORS[i].1),
        };
        parsed.ok_or_else(|| QRError::InvalidColor(s.to_string()))
    }
}

fn parse_hex(hex: &str) -> Option<Rgb> {
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |i: usize, len: usize| u8::from_str_radix(&hex[i..i + len], 16).ok();
    match hex.len() {
        6 => Some(Rgb(channel(0, 2)?, channel(2, 2)?, channel(4, 2)?)),
        // Each digit is doubled: #f80 is #ff8800
        3 => Some(Rgb(channel(0, 1)? * 17, channel(1, 1)? * 17, channel(2, 1)? * 17)),
        _ => None,
    }
}

// Render configuration
//------------------------------------------------------------------------------

/// Shapes and colors for the two module classes.
///
/// ```
/// use qrstyle::{RenderConfig, Rgb, Shape};
///
/// let config = RenderConfig::parse("rounded", "dot", "#1e90ff", "black").unwrap();
/// assert_eq!(config.finder_shape, Shape::Rounded);
/// assert_eq!(config.finder_color, Rgb(0x1e, 0x90, 0xff));
/// config.release();
/// ```
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct RenderConfig {
    pub finder_shape: Shape,
    pub data_shape: Shape,
    pub finder_color: Rgb,
    pub data_color: Rgb,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self::new(Shape::Square, Shape::Square)
    }
}

impl RenderConfig {
    /// Config with the given shapes and black modules.
    pub fn new(finder_shape: Shape, data_shape: Shape) -> Self {
        Self { finder_shape, data_shape, finder_color: Rgb::BLACK, data_color: Rgb::BLACK }
    }

    pub fn parse(
        finder_shape: &str,
        data_shape: &str,
        finder_color: &str,
        data_color: &str,
    ) -> QRResult<Self> {
        let config = Self {
            finder_shape: finder_shape.parse()?,
            data_shape: data_shape.parse()?,
            finder_color: finder_color.parse()?,
            data_color: data_color.parse()?,
        };
        trace!("Parsed render config {config:?}");
        Ok(config)
    }

    pub fn with_colors(mut self, finder_color: Rgb, data_color: Rgb) -> Self {
        self.finder_color = finder_color;
        self.data_color = data_color;
        self
    }

    pub fn shape(&self, class: ModuleClass) -> Shape {
        match class {
            ModuleClass::Finder => self.finder_shape,
            ModuleClass::Data => self.data_shape,
        }
    }

    pub fn color(&self, class: ModuleClass) -> Rgb {
        match class {
            ModuleClass::Finder => self.finder_color,
            ModuleClass::Data => self.data_color,
        }
    }

    /// Consumes the config. Bindings without automatic reclamation call this
    /// to free a config they handed out; a second release does not compile.
    pub fn release(self) {
        trace!("Releasing render config {self:?}");
    }
}


// Global constants
//------------------------------------------------------------------------------

// CSS named colors, sorted by name for binary search
static NAMED_COLORS: [(&str, Rgb); 48] = [
    ("aqua", Rgb(0x00, 0xff, 0xff)),
    ("black", Rgb(0x00, 0x00, 0x00)),
    ("blue", Rgb(0x00, 0x00, 0xff)),
    ("blueviolet", Rgb(0x8a, 0x2b, 0xe2)),
    ("brown", Rgb(0xa5, 0x2a, 0x2a)),
    ("chocolate", Rgb(0xd2, 0x69, 0x1e)),
    ("coral", Rgb(0xff, 0x7f, 0x50)),
    ("crimson", Rgb(0xdc, 0x14, 0x3c)),
    ("cyan", Rgb(0x00, 0xff, 0xff)),
    ("darkblue", Rgb(0x00, 0x00, 0x8b)),
    ("darkgray", Rgb(0xa9, 0xa9, 0xa9)),
    ("darkgreen", Rgb(0x00, 0x64, 0x00)),
    ("darkred", Rgb(0x8b, 0x00, 0x00)),
    ("darkslategray", Rgb(0x2f, 0x4f, 0x4f)),
    ("deeppink", Rgb(0xff, 0x14, 0x93)),
    ("dimgray", Rgb(0x69, 0x69, 0x69)),
    ("dodgerblue", Rgb(0x1e, 0x90, 0xff)),
    ("firebrick", Rgb(0xb2, 0x22, 0x22)),
    ("forestgreen", Rgb(0x22, 0x8b, 0x22)),
    ("fuchsia", Rgb(0xff, 0x00, 0xff)),
    ("gold", Rgb(0xff, 0xd7, 0x00)),
    ("gray", Rgb(0x80, 0x80, 0x80)),
    ("green", Rgb(0x00, 0x80, 0x00)),
    ("grey", Rgb(0x80, 0x80, 0x80)),
    ("indigo", Rgb(0x4b, 0x00, 0x82)),
    ("lime", Rgb(0x00, 0xff, 0x00)),
    ("magenta", Rgb(0xff, 0x00, 0xff)),
    ("maroon", Rgb(0x80, 0x00, 0x00)),
    ("midnightblue", Rgb(0x19, 0x19, 0x70)),
    ("navy", Rgb(0x00, 0x00, 0x80)),
    ("olive", Rgb(0x80, 0x80, 0x00)),
    ("orange", Rgb(0xff, 0xa5, 0x00)),
    ("orangered", Rgb(0xff, 0x45, 0x00)),
    ("orchid", Rgb(0xda, 0x70, 0xd6)),
    ("purple", Rgb(0x80, 0x00, 0x80)),
    ("rebeccapurple", Rgb(0x66, 0x33, 0x99)),
    ("red", Rgb(0xff, 0x00, 0x00)),
    ("royalblue", Rgb(0x41, 0x69, 0xe1)),
    ("saddlebrown", Rgb(0x8b, 0x45, 0x13)),
    ("seagreen", Rgb(0x2e, 0x8b, 0x57)),
    ("sienna", Rgb(0xa0, 0x52, 0x2d)),
    ("silver", Rgb(0xc0, 0xc0, 0xc0)),
    ("slategray", Rgb(0x70, 0x80, 0x90)),
    ("steelblue", Rgb(0x46, 0x82, 0xb4)),
    ("teal", Rgb(0x00, 0x80, 0x80)),
    ("tomato", Rgb(0xff, 0x63, 0x47)),
    ("white", Rgb(0xff, 0xff, 0xff)),
    ("yellow", Rgb(0xff, 0xff, 0x00)),
];
