use std::fmt;

use dither::ditherer::Dither;
use piet::RenderContext;
use thiserror::Error;

pub mod framebuffer;

#[derive(Debug, Error)]
pub enum DisplayError {
    #[error("drawing failed: {0}")]
    Piet(#[from] piet::Error),
    #[error("dithering failed: {0}")]
    Dither(String),
    #[error("frame has {actual} pixels, display has {expected}")]
    FrameSize { expected: usize, actual: usize },
    #[error("display is powered off")]
    PoweredOff,
}

pub trait Display {
    type Err: fmt::Debug + From<DisplayError>;

    /// Initialize the display.
    fn on(&mut self) -> Result<(), Self::Err>;

    /// Clear the display and power it down.
    fn off(&mut self) -> Result<(), Self::Err>;

    /// Put the display in low-power mode. This may or may not be the same as `off`.
    fn sleep(&mut self) -> Result<(), Self::Err>;

    /// Draw an image on the display. The image is represented as bytes in the range
    /// `0..self.get_color_depth()`, with 0 being black, so the input should have length
    /// `display_width * display_height`.
    fn draw(&mut self, image: impl IntoIterator<Item = u8>) -> Result<(), Self::Err>;

    /// Get the dimensions of the display in pixels (width, height).
    fn get_dimensions(&self) -> (usize, usize);

    /// Get the number of colours supported by the display. Used for dithering.
    fn get_color_depth(&self) -> u8;

    /// Draw a 24-bit RGB image dithered to the available colour depth. The image is represented as
    /// RGB bytes, so the input should have length `display_width * display_height * 3`.
    fn draw_dithered(&mut self, image: impl IntoIterator<Item = u8>) -> Result<(), Self::Err> {
        let (display_width, _) = self.get_dimensions();
        let mut image_iter = image.into_iter();
        let color_depth = self.get_color_depth();

        let luma = std::iter::from_fn(|| {
            // Map pixels to f64 in range 0.0..255.0
            match (image_iter.next(), image_iter.next(), image_iter.next()) {
                (Some(r), Some(g), Some(b)) => Some(
                    dither::color::RGB(r as f64, g as f64, b as f64)
                        .to_chroma_corrected_black_and_white(),
                ),
                _ => None,
            }
        });

        let img = dither::prelude::Img::new(luma, display_width as u32)
            .ok_or_else(|| DisplayError::Dither("image does not fit the display width".into()))?;
        let quantize = dither::create_quantize_n_bits_func(color_depth.saturating_sub(1))
            .map_err(|e| DisplayError::Dither(format!("{:?}", e)))?;

        let pixels: Vec<u8> = dither::ditherer::FLOYD_STEINBERG
            .dither(img, quantize)
            .iter()
            .map(|x| (x / 255. * (color_depth - 1) as f64) as u8)
            .collect();

        self.draw(pixels)
    }

    /// Paint a frame with piet and push it, dithered, to the display.
    fn draw_context<F>(&mut self, f: F) -> Result<(), Self::Err>
    where
        F: FnOnce(&mut piet_cairo::CairoRenderContext) -> Result<(), piet::Error>,
    {
        let (display_width, display_height) = self.get_dimensions();
        let mut device = piet_common::Device::new().map_err(DisplayError::from)?;
        let mut bitmap_target = device
            .bitmap_target(display_width, display_height, 1.)
            .map_err(DisplayError::from)?;

        {
            let mut render_context = bitmap_target.render_context();
            render_context.clear(piet::Color::WHITE);
            f(&mut render_context).map_err(DisplayError::from)?;
            render_context.finish().map_err(DisplayError::from)?;
        }

        let image = bitmap_target
            .to_image_buf(piet_common::ImageFormat::RgbaPremul)
            .map_err(DisplayError::from)?;

        self.draw_dithered(
            image
                .raw_pixels()
                .iter()
                .enumerate()
                .filter_map(|(index, pixel)| if index % 4 == 3 { None } else { Some(pixel) })
                .copied()
                .collect::<Vec<u8>>(),
        )
    }
}
