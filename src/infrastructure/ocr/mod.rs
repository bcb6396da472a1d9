mod pdfium_rasterizer;
mod tesseract_engine;

pub use pdfium_rasterizer::PdfiumRasterizer;
pub use tesseract_engine::TesseractEngine;
