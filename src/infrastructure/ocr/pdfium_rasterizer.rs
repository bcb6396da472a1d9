use image::ImageFormat;
use pdfium_render::prelude::*;

use crate::application::ports::{PageRasterizer, RasterizeError};
use crate::domain::Deadline;

pub struct PdfiumRasterizer {
    max_pages: usize,
}

impl PdfiumRasterizer {
    pub const DEFAULT_MAX_PAGES: usize = 200;

    pub fn new(max_pages: usize) -> Self {
        Self { max_pages }
    }
}

impl Default for PdfiumRasterizer {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_PAGES)
    }
}

impl PageRasterizer for PdfiumRasterizer {
    fn rasterize(
        &self,
        pdf_bytes: &[u8],
        dpi: f32,
        deadline: &Deadline,
    ) -> Result<Vec<Vec<u8>>, RasterizeError> {
        let pdfium = Pdfium::new(
            Pdfium::bind_to_system_library()
                .map_err(|e| RasterizeError::Unavailable(format!("pdfium bind failed: {e}")))?,
        );

        let doc = pdfium
            .load_pdf_from_byte_slice(pdf_bytes, None)
            .map_err(|e| RasterizeError::Unopenable(e.to_string()))?;

        let page_count = doc.pages().len() as usize;
        let pages_to_render = page_count.min(self.max_pages);
        if pages_to_render < page_count {
            tracing::warn!(page_count, pages_to_render, "Rendering only the first pages");
        }

        let mut png_buffers: Vec<Vec<u8>> = Vec::with_capacity(pages_to_render);

        for index in 0..pages_to_render {
            if deadline.is_expired() {
                return Err(RasterizeError::TimedOut);
            }

            let page = doc.pages().get(index as u16).map_err(|e| {
                RasterizeError::RenderFailed(format!("page {} access failed: {e}", index + 1))
            })?;

            let width = (page.width().value * dpi / 72.0) as i32;
            let height = (page.height().value * dpi / 72.0) as i32;

            let bitmap = page
                .render_with_config(
                    &PdfRenderConfig::new()
                        .set_target_width(width)
                        .set_target_height(height),
                )
                .map_err(|e| {
                    RasterizeError::RenderFailed(format!("render page {} failed: {e}", index + 1))
                })?;

            let mut png_bytes: Vec<u8> = Vec::new();
            bitmap
                .as_image()
                .write_to(&mut std::io::Cursor::new(&mut png_bytes), ImageFormat::Png)
                .map_err(|e| {
                    RasterizeError::RenderFailed(format!("PNG encode page {} failed: {e}", index + 1))
                })?;

            png_buffers.push(png_bytes);
        }

        Ok(png_buffers)
    }
}
