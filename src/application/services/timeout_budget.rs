use std::time::Duration;

use crate::domain::ExtractionStage;

const MIB: f64 = 1024.0 * 1024.0;

/// Per-stage wall-clock budgets, scaled by file size where the stage cost is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeoutBudget {
    pub native_min: Duration,
    pub native_per_mib: Duration,
    pub native_max: Duration,
    pub ocr_multiplier: u32,
    pub legacy: Duration,
    pub image_ocr_guard: Duration,
}

impl Default for TimeoutBudget {
    fn default() -> Self {
        Self {
            native_min: Duration::from_secs(30),
            native_per_mib: Duration::from_secs(10),
            native_max: Duration::from_secs(120),
            ocr_multiplier: 2,
            legacy: Duration::from_secs(60),
            image_ocr_guard: Duration::from_secs(90),
        }
    }
}

impl TimeoutBudget {
    pub fn budget(&self, byte_size: u64, stage: ExtractionStage) -> Duration {
        match stage {
            ExtractionStage::PdfNative | ExtractionStage::WordProcessor => {
                self.size_scaled(byte_size)
            }
            ExtractionStage::PdfOcr => self.size_scaled(byte_size) * self.ocr_multiplier,
            ExtractionStage::PdfLegacy => self.legacy,
            ExtractionStage::ImageOcr => self.image_ocr_guard,
        }
    }

    fn size_scaled(&self, byte_size: u64) -> Duration {
        let mib = byte_size as f64 / MIB;
        self.native_per_mib
            .mul_f64(mib)
            .max(self.native_min)
            .min(self.native_max)
    }
}
