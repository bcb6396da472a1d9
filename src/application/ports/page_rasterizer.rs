use crate::domain::Deadline;

/// Renders PDF pages to PNG images. Blocking; call from `spawn_blocking`.
pub trait PageRasterizer: Send + Sync {
    fn rasterize(
        &self,
        pdf_bytes: &[u8],
        dpi: f32,
        deadline: &Deadline,
    ) -> Result<Vec<Vec<u8>>, RasterizeError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RasterizeError {
    #[error("rasterizer unavailable: {0}")]
    Unavailable(String),
    #[error("cannot open pdf: {0}")]
    Unopenable(String),
    #[error("rasterizing exceeded its deadline")]
    TimedOut,
    #[error("render failed: {0}")]
    RenderFailed(String),
}
