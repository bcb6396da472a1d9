use crate::domain::{DocumentFormat, FileDescriptor};

use super::extraction_service::ExtractionError;

/// Declarative early reject: decides from the declared size and extension only,
/// before a single byte is fetched.
#[derive(Debug, Clone)]
pub struct FormatRouter {
    max_file_size_bytes: u64,
}

impl FormatRouter {
    pub const DEFAULT_MAX_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;

    pub fn new(max_file_size_bytes: u64) -> Self {
        Self {
            max_file_size_bytes,
        }
    }

    pub fn max_file_size_bytes(&self) -> u64 {
        self.max_file_size_bytes
    }

    pub fn route(&self, descriptor: &FileDescriptor) -> Result<DocumentFormat, ExtractionError> {
        self.check_size(descriptor.byte_size)?;

        descriptor
            .format()
            .ok_or_else(|| ExtractionError::UnsupportedFormat {
                extension: descriptor.declared_extension.clone(),
            })
    }

    pub fn check_size(&self, byte_size: u64) -> Result<(), ExtractionError> {
        if byte_size > self.max_file_size_bytes {
            return Err(ExtractionError::SizeExceeded {
                size: byte_size,
                limit: self.max_file_size_bytes,
            });
        }
        Ok(())
    }
}

impl Default for FormatRouter {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_FILE_SIZE_BYTES)
    }
}
