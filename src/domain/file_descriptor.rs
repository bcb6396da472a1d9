use std::fmt;

/// Opaque reference handed over by the messaging transport for one upload.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileHandle(String);

impl FileHandle {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FileHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileClass {
    Document,
    Image,
    Unsupported,
}

/// Concrete format a supported file is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentFormat {
    WordProcessor,
    Pdf,
    Image,
}

impl DocumentFormat {
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "doc" | "docx" => Some(Self::WordProcessor),
            "pdf" => Some(Self::Pdf),
            "jpg" | "jpeg" | "png" | "bmp" | "tif" | "tiff" => Some(Self::Image),
            _ => None,
        }
    }

    pub fn class(&self) -> FileClass {
        match self {
            Self::WordProcessor | Self::Pdf => FileClass::Document,
            Self::Image => FileClass::Image,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WordProcessor => "word_processor",
            Self::Pdf => "pdf",
            Self::Image => "image",
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDescriptor {
    pub id: FileHandle,
    pub declared_name: String,
    pub declared_extension: String,
    pub byte_size: u64,
    pub classified_type: FileClass,
}

impl FileDescriptor {
    pub fn new(id: FileHandle, declared_name: impl Into<String>, byte_size: u64) -> Self {
        let declared_name = declared_name.into();
        let declared_extension = std::path::Path::new(&declared_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        let classified_type = DocumentFormat::from_extension(&declared_extension)
            .map(|format| format.class())
            .unwrap_or(FileClass::Unsupported);

        Self {
            id,
            declared_name,
            declared_extension,
            byte_size,
            classified_type,
        }
    }

    pub fn format(&self) -> Option<DocumentFormat> {
        DocumentFormat::from_extension(&self.declared_extension)
    }
}
