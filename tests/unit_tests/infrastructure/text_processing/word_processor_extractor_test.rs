use std::io::{Cursor, Write};
use std::path::PathBuf;
use std::time::Duration;

use bytes::Bytes;
use zip::write::SimpleFileOptions;

use lexdoc::application::ports::{Extractor, StagedFile};
use lexdoc::domain::{AttemptOutcome, Deadline, ExtractionStage};
use lexdoc::infrastructure::text_processing::WordProcessorExtractor;

const DOCUMENT_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p><w:r><w:t>Supply agreement</w:t></w:r></w:p>
    <w:p><w:r><w:t xml:space="preserve">Article 1. </w:t></w:r><w:r><w:t>Subject</w:t></w:r></w:p>
    <w:tbl>
      <w:tr>
        <w:tc><w:p><w:r><w:t>Seller</w:t></w:r></w:p></w:tc>
        <w:tc><w:p><w:r><w:t>Buyer</w:t></w:r></w:p></w:tc>
      </w:tr>
    </w:tbl>
    <w:p><w:r><w:t>Signatures &amp; seals</w:t></w:r></w:p>
  </w:body>
</w:document>"#;

fn docx_bytes(document_xml: &str) -> Bytes {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    writer
        .start_file("word/document.xml", SimpleFileOptions::default())
        .unwrap();
    writer.write_all(document_xml.as_bytes()).unwrap();
    Bytes::from(writer.finish().unwrap().into_inner())
}

fn staged(bytes: Bytes, extension: &str) -> StagedFile {
    StagedFile {
        path: PathBuf::from(format!("upload.{extension}")),
        bytes,
        extension: extension.to_string(),
    }
}

fn deadline() -> Deadline {
    Deadline::after(Duration::from_secs(30))
}

#[tokio::test]
async fn given_docx_when_extracting_then_paragraphs_then_table_cells_are_returned() {
    let extractor = WordProcessorExtractor::new();

    let outcome = extractor
        .attempt(&staged(docx_bytes(DOCUMENT_XML), "docx"), deadline())
        .await;

    assert_eq!(
        outcome,
        AttemptOutcome::success(
            "Supply agreement\nArticle 1. Subject\nSignatures & seals\nSeller\nBuyer"
        )
    );
}

#[tokio::test]
async fn given_docx_without_text_when_extracting_then_insufficient_yield() {
    let extractor = WordProcessorExtractor::new();
    let empty = r#"<w:document xmlns:w="x"><w:body><w:p/></w:body></w:document>"#;

    let outcome = extractor
        .attempt(&staged(docx_bytes(empty), "docx"), deadline())
        .await;

    assert!(matches!(outcome, AttemptOutcome::InsufficientYield { .. }));
}

#[tokio::test]
async fn given_broken_archive_when_extracting_docx_then_corrupt() {
    let extractor = WordProcessorExtractor::new();

    let outcome = extractor
        .attempt(&staged(Bytes::from_static(b"not a zip"), "docx"), deadline())
        .await;

    assert!(matches!(outcome, AttemptOutcome::Corrupt { .. }));
}

#[tokio::test]
async fn given_non_ole_bytes_when_extracting_doc_then_corrupt() {
    let extractor = WordProcessorExtractor::new();

    let outcome = extractor
        .attempt(&staged(Bytes::from_static(b"plain text"), "doc"), deadline())
        .await;

    assert!(matches!(outcome, AttemptOutcome::Corrupt { .. }));
}

#[test]
fn given_extractor_when_asking_stage_then_word_processor() {
    assert_eq!(
        WordProcessorExtractor::new().stage(),
        ExtractionStage::WordProcessor
    );
}

#[tokio::test]
async fn given_expired_deadline_when_extracting_docx_then_timed_out() {
    let extractor = WordProcessorExtractor::new();

    let outcome = extractor
        .attempt(
            &staged(docx_bytes(DOCUMENT_XML), "docx"),
            Deadline::after(Duration::ZERO),
        )
        .await;

    assert_eq!(outcome, AttemptOutcome::TimedOut);
}
