use lexdoc::domain::{DocumentFormat, FileClass, FileDescriptor, FileHandle};

fn descriptor(name: &str) -> FileDescriptor {
    FileDescriptor::new(FileHandle::new("file-1"), name, 1024)
}

#[test]
fn given_uppercase_extension_when_describing_then_extension_is_lowercased() {
    let descriptor = descriptor("Contract.DOCX");

    assert_eq!(descriptor.declared_extension, "docx");
    assert_eq!(descriptor.classified_type, FileClass::Document);
    assert_eq!(descriptor.format(), Some(DocumentFormat::WordProcessor));
}

#[test]
fn given_image_extensions_when_describing_then_classified_as_image() {
    for name in ["scan.jpg", "scan.jpeg", "scan.png", "scan.bmp", "scan.tiff", "scan.tif"] {
        let descriptor = descriptor(name);
        assert_eq!(descriptor.classified_type, FileClass::Image, "{name}");
        assert_eq!(descriptor.format(), Some(DocumentFormat::Image), "{name}");
    }
}

#[test]
fn given_pdf_when_describing_then_routed_to_pdf_document() {
    let descriptor = descriptor("claim.pdf");

    assert_eq!(descriptor.format(), Some(DocumentFormat::Pdf));
    assert_eq!(DocumentFormat::Pdf.class(), FileClass::Document);
}

#[test]
fn given_unknown_or_missing_extension_when_describing_then_unsupported() {
    assert_eq!(descriptor("notes.xyz").classified_type, FileClass::Unsupported);
    assert_eq!(descriptor("README").classified_type, FileClass::Unsupported);
    assert_eq!(descriptor("README").declared_extension, "");
}

#[test]
fn given_extension_with_leading_dot_when_parsing_then_dot_is_ignored() {
    assert_eq!(DocumentFormat::from_extension(".PDF"), Some(DocumentFormat::Pdf));
}
