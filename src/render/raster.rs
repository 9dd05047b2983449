use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage, ImageFormat, Luma, Pixel, Rgba, RgbaImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;
use log::trace;

use super::{
    canvas_size, check_shapes, dark_modules, Format, ModuleClass, RenderConfig, Rgb, Shape,
    JPEG_QUALITY, MODULE_SIZE, ROUNDED_RADIUS, SUPER_SAMPLING,
};
use crate::builder::QR;
use crate::common::error::{QRError, QRResult};

// Raster renderers
//------------------------------------------------------------------------------

impl QR {
    /// Draws the symbol onto an opaque white RGBA canvas with the quiet zone.
    pub fn to_image(&self, config: &RenderConfig) -> QRResult<RgbaImage> {
        self.rasterize(config, Format::Png)
    }

    /// PNG encoded bytes of [`QR::to_image`].
    pub fn to_png(&self, config: &RenderConfig) -> QRResult<Vec<u8>> {
        let canvas = self.rasterize(config, Format::Png)?;
        let mut buf = Cursor::new(Vec::new());
        canvas.write_to(&mut buf, ImageFormat::Png)?;
        trace!("Encoded {}px PNG in {} bytes", canvas.width(), buf.get_ref().len());
        Ok(buf.into_inner())
    }

    /// JPEG encoded bytes of the same canvas, flattened to RGB.
    pub fn to_jpeg(&self, config: &RenderConfig) -> QRResult<Vec<u8>> {
        let canvas = self.rasterize(config, Format::Jpeg)?;
        let rgb = DynamicImage::ImageRgba8(canvas).into_rgb8();
        let mut buf = Vec::new();
        JpegEncoder::new_with_quality(&mut buf, JPEG_QUALITY).encode_image(&rgb)?;
        trace!("Encoded {}px JPEG in {} bytes", rgb.width(), buf.len());
        Ok(buf)
    }

    // Squares are pixel aligned and filled directly. Curved shapes are blended
    // through an antialiased coverage mask computed once per class.
    fn rasterize(&self, config: &RenderConfig, format: Format) -> QRResult<RgbaImage> {
        check_shapes(config, format)?;

        let masks = [ModuleClass::Finder, ModuleClass::Data]
            .map(|class| coverage_mask(config.shape(class)));
        let size = canvas_size(self.width());
        let mut canvas = RgbaImage::from_pixel(size, size, Rgb::WHITE.into());
        for (x, y, class) in dark_modules(self) {
            let clr: Rgba<u8> = config.color(class).into();
            match (config.shape(class), &masks[class as usize]) {
                (shape @ Shape::Triangle, _) => {
                    return Err(QRError::UnsupportedShape { shape, class, format })
                }
                (_, Some(mask)) => blend_coverage(&mut canvas, x, y, mask, clr),
                (_, None) => draw_filled_rect_mut(
                    &mut canvas,
                    Rect::at(x as i32, y as i32).of_size(MODULE_SIZE, MODULE_SIZE),
                    clr,
                ),
            }
        }
        Ok(canvas)
    }
}

// Coverage of one module by a curved shape, drawn SUPER_SAMPLING times larger
// and downsampled with Lanczos3. None for shapes that fill the whole cell.
fn coverage_mask(shape: Shape) -> Option<GrayImage> {
    let inside: fn(f32, f32, f32) -> bool = match shape {
        Shape::Square | Shape::Triangle => return None,
        // Inscribed circle
        Shape::Dot => |px: f32, py: f32, side: f32| {
            let r = side / 2.0;
            (px - r).powi(2) + (py - r).powi(2) <= r * r
        },
        // Full cell with quarter circle corners
        Shape::Rounded => |px: f32, py: f32, side: f32| {
            let r = side * ROUNDED_RADIUS as f32 / MODULE_SIZE as f32;
            let (qx, qy) = (px.clamp(r, side - r), py.clamp(r, side - r));
            (px - qx).powi(2) + (py - qy).powi(2) <= r * r
        },
    };

    let side = MODULE_SIZE * SUPER_SAMPLING;
    let fine = GrayImage::from_fn(side, side, |x, y| {
        let covered = inside(x as f32 + 0.5, y as f32 + 0.5, side as f32);
        Luma([if covered { u8::MAX } else { 0 }])
    });
    Some(imageops::resize(&fine, MODULE_SIZE, MODULE_SIZE, FilterType::Lanczos3))
}

fn blend_coverage(canvas: &mut RgbaImage, x: u32, y: u32, mask: &GrayImage, clr: Rgba<u8>) {
    let Rgba([r, g, b, _]) = clr;
    for (dx, dy, Luma([alpha])) in mask.enumerate_pixels() {
        canvas.get_pixel_mut(x + dx, y + dy).blend(&Rgba([r, g, b, *alpha]));
    }
}
