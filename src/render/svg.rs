use super::{
    check_shapes, canvas_size, dark_modules, Format, RenderConfig, Shape, MODULE_SIZE,
    ROUNDED_RADIUS,
};
use crate::builder::QR;
use crate::common::error::{QRError, QRResult};

// SVG renderer
//------------------------------------------------------------------------------

impl QR {
    /// Renders the symbol as an SVG document, one element per dark module, on
    /// a white background including the quiet zone.
    pub fn to_svg(&self, config: &RenderConfig) -> QRResult<String> {
        check_shapes(config, Format::Svg)?;

        let size = canvas_size(self.width());
        let mut svg = String::with_capacity(64 * self.count_dark_modules() + 256);
        svg.push_str(&format!(
            "<svg xmlns='http://www.w3.org/2000/svg' width='{size}' height='{size}' \
             viewBox='0 0 {size} {size}' shape-rendering='crispEdges'>\n"
        ));
        svg.push_str(&format!("  <rect width='{size}' height='{size}' fill='#ffffff'/>\n"));

        for (x, y, class) in dark_modules(self) {
            let fill = config.color(class).to_hex();
            let elem = match config.shape(class) {
                Shape::Square => {
                    format!("  <rect x='{x}' y='{y}' width='{MODULE_SIZE}' height='{MODULE_SIZE}' fill='{fill}'/>\n")
                }
                Shape::Dot => {
                    let (cx, cy, r) = (x + MODULE_SIZE / 2, y + MODULE_SIZE / 2, MODULE_SIZE / 2);
                    format!("  <circle cx='{cx}' cy='{cy}' r='{r}' fill='{fill}'/>\n")
                }
                Shape::Rounded => format!(
                    "  <rect x='{x}' y='{y}' width='{MODULE_SIZE}' height='{MODULE_SIZE}' \
                     rx='{ROUNDED_RADIUS}' ry='{ROUNDED_RADIUS}' fill='{fill}'/>\n"
                ),
                shape @ Shape::Triangle => {
                    return Err(QRError::UnsupportedShape { shape, class, format: Format::Svg })
                }
            };
            svg.push_str(&elem);
        }

        svg.push_str("</svg>\n");
        Ok(svg)
    }
}
