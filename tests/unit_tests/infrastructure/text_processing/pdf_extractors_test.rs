use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use tempfile::NamedTempFile;

use lexdoc::application::ports::{
    Extractor, OcrEngine, OcrError, OcrPass, PageRasterizer, PageSegmentation, RasterizeError,
    StagedFile,
};
use lexdoc::domain::{AttemptOutcome, Deadline};
use lexdoc::infrastructure::text_processing::{
    PdfLegacyExtractor, PdfNativeExtractor, PdfOcrExtractor,
};

struct PageOcr {
    available: bool,
    pages: Mutex<Vec<Result<String, OcrError>>>,
    passes: Mutex<Vec<OcrPass>>,
}

impl PageOcr {
    fn returning(pages: Vec<Result<String, OcrError>>) -> Self {
        Self {
            available: true,
            pages: Mutex::new(pages),
            passes: Mutex::new(Vec::new()),
        }
    }

    fn unavailable() -> Self {
        Self {
            available: false,
            pages: Mutex::new(Vec::new()),
            passes: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl OcrEngine for PageOcr {
    fn name(&self) -> &str {
        "tesseract"
    }

    async fn is_available(&self) -> bool {
        self.available
    }

    async fn recognize(&self, _image_png: &[u8], pass: &OcrPass) -> Result<String, OcrError> {
        self.passes.lock().unwrap().push(pass.clone());
        let mut pages = self.pages.lock().unwrap();
        if pages.is_empty() {
            return Ok(String::new());
        }
        pages.remove(0)
    }
}

struct FixedRasterizer {
    result: fn() -> Result<Vec<Vec<u8>>, RasterizeError>,
    calls: AtomicUsize,
}

impl FixedRasterizer {
    fn new(result: fn() -> Result<Vec<Vec<u8>>, RasterizeError>) -> Self {
        Self {
            result,
            calls: AtomicUsize::new(0),
        }
    }
}

impl PageRasterizer for FixedRasterizer {
    fn rasterize(
        &self,
        _pdf_bytes: &[u8],
        _dpi: f32,
        _deadline: &Deadline,
    ) -> Result<Vec<Vec<u8>>, RasterizeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        (self.result)()
    }
}

fn two_pages() -> Result<Vec<Vec<u8>>, RasterizeError> {
    Ok(vec![vec![1u8], vec![2u8]])
}

fn timed_out() -> Result<Vec<Vec<u8>>, RasterizeError> {
    Err(RasterizeError::TimedOut)
}

fn staged_on_disk(content: &[u8]) -> (NamedTempFile, StagedFile) {
    let mut temp = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
    temp.write_all(content).unwrap();
    temp.flush().unwrap();
    let staged = StagedFile {
        path: temp.path().to_path_buf(),
        bytes: Bytes::copy_from_slice(content),
        extension: "pdf".to_string(),
    };
    (temp, staged)
}

fn deadline() -> Deadline {
    Deadline::after(Duration::from_secs(30))
}

const CONTRACT_LINE: &str =
    "This lease agreement is concluded between the landlord and the tenant today";
const SHORT_LINE: &str = "Invoice";

/// Single-page PDF with one line of Helvetica text and a correct xref table.
fn one_page_pdf(text: &str) -> Vec<u8> {
    let content = format!("BT /F1 12 Tf 72 720 Td ({text}) Tj ET");
    let objects = [
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
        "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
         /Resources << /Font << /F1 4 0 R >> >> /Contents 5 0 R >>"
            .to_string(),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
            .to_string(),
        format!(
            "<< /Length {} >>\nstream\n{}\nendstream",
            content.len(),
            content
        ),
    ];

    let mut pdf = b"%PDF-1.4\n".to_vec();
    let mut offsets = Vec::with_capacity(objects.len());
    for (index, object) in objects.iter().enumerate() {
        offsets.push(pdf.len());
        pdf.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", index + 1, object).as_bytes());
    }

    let xref_offset = pdf.len();
    pdf.extend_from_slice(format!("xref\n0 {}\n", objects.len() + 1).as_bytes());
    pdf.extend_from_slice(b"0000000000 65535 f \n");
    for offset in offsets {
        pdf.extend_from_slice(format!("{offset:010} 00000 n \n").as_bytes());
    }
    pdf.extend_from_slice(
        format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            objects.len() + 1,
            xref_offset
        )
        .as_bytes(),
    );
    pdf
}

fn assert_page_marked_success(outcome: AttemptOutcome) {
    match outcome {
        AttemptOutcome::Success { text, warnings } => {
            assert!(text.starts_with("--- Page 1 ---\n"), "unexpected text: {text}");
            assert!(text.contains("lease agreement"), "unexpected text: {text}");
            assert!(!text.contains("--- Page 2 ---"));
            assert!(warnings.is_empty());
        }
        other => panic!("expected success, got {other:?}"),
    }
}

#[tokio::test]
async fn given_garbage_bytes_when_reading_text_layer_then_corrupt() {
    let (_temp, staged) = staged_on_disk(b"this is not a pdf at all");

    let outcome = PdfNativeExtractor::default().attempt(&staged, deadline()).await;

    assert!(matches!(outcome, AttemptOutcome::Corrupt { .. }));
}

#[tokio::test]
async fn given_garbage_bytes_when_using_legacy_parser_then_corrupt() {
    let (_temp, staged) = staged_on_disk(b"this is not a pdf at all");

    let outcome = PdfLegacyExtractor::default().attempt(&staged, deadline()).await;

    assert!(matches!(outcome, AttemptOutcome::Corrupt { .. }));
}

#[tokio::test]
async fn given_ocr_missing_when_running_pdf_ocr_then_tool_unavailable_without_rasterizing() {
    let rasterizer = Arc::new(FixedRasterizer::new(two_pages));
    let extractor = PdfOcrExtractor::new(
        Arc::new(PageOcr::unavailable()),
        rasterizer.clone(),
        "rus+eng",
        300.0,
    );
    let (_temp, staged) = staged_on_disk(b"%PDF-1.4");

    let outcome = extractor.attempt(&staged, deadline()).await;

    assert_eq!(
        outcome,
        AttemptOutcome::ToolUnavailable {
            tool: "tesseract".to_string()
        }
    );
    assert_eq!(rasterizer.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn given_two_scanned_pages_when_running_pdf_ocr_then_text_carries_page_markers() {
    let ocr = Arc::new(PageOcr::returning(vec![
        Ok("Lease agreement".to_string()),
        Ok("  Signed by both parties  ".to_string()),
    ]));
    let extractor = PdfOcrExtractor::new(
        ocr.clone(),
        Arc::new(FixedRasterizer::new(two_pages)),
        "rus+eng",
        300.0,
    );
    let (_temp, staged) = staged_on_disk(b"%PDF-1.4");

    let outcome = extractor.attempt(&staged, deadline()).await;

    assert_eq!(
        outcome,
        AttemptOutcome::success(
            "--- Page 1 ---\nLease agreement\n\n--- Page 2 ---\nSigned by both parties"
        )
    );
    let passes = ocr.passes.lock().unwrap();
    assert_eq!(passes.len(), 2);
    assert!(passes.iter().all(|p| p.languages == "rus+eng"
        && p.segmentation == PageSegmentation::Auto));
}

#[tokio::test]
async fn given_failing_page_when_running_pdf_ocr_then_remaining_pages_are_kept() {
    let ocr = Arc::new(PageOcr::returning(vec![
        Err(OcrError::RecognitionFailed("bad page".to_string())),
        Ok("Second page text".to_string()),
    ]));
    let extractor = PdfOcrExtractor::new(
        ocr,
        Arc::new(FixedRasterizer::new(two_pages)),
        "rus+eng",
        300.0,
    );
    let (_temp, staged) = staged_on_disk(b"%PDF-1.4");

    let outcome = extractor.attempt(&staged, deadline()).await;

    assert_eq!(
        outcome,
        AttemptOutcome::Success {
            text: "--- Page 2 ---\nSecond page text".to_string(),
            warnings: vec!["1 page could not be read and is missing from the text".to_string()],
        }
    );
}

#[tokio::test]
async fn given_rasterizer_out_of_time_when_running_pdf_ocr_then_timed_out() {
    let extractor = PdfOcrExtractor::new(
        Arc::new(PageOcr::returning(Vec::new())),
        Arc::new(FixedRasterizer::new(timed_out)),
        "rus+eng",
        300.0,
    );
    let (_temp, staged) = staged_on_disk(b"%PDF-1.4");

    let outcome = extractor.attempt(&staged, deadline()).await;

    assert_eq!(outcome, AttemptOutcome::TimedOut);
}

#[tokio::test]
async fn given_blank_scans_when_running_pdf_ocr_then_insufficient_yield() {
    let extractor = PdfOcrExtractor::new(
        Arc::new(PageOcr::returning(vec![Ok("   ".to_string()), Ok(String::new())])),
        Arc::new(FixedRasterizer::new(two_pages)),
        "rus+eng",
        300.0,
    );
    let (_temp, staged) = staged_on_disk(b"%PDF-1.4");

    let outcome = extractor.attempt(&staged, deadline()).await;

    assert!(matches!(outcome, AttemptOutcome::InsufficientYield { .. }));
}

#[tokio::test]
async fn given_born_digital_page_when_reading_text_layer_then_success_with_page_marker() {
    let (_temp, staged) = staged_on_disk(&one_page_pdf(CONTRACT_LINE));

    let outcome = PdfNativeExtractor::default().attempt(&staged, deadline()).await;

    assert_page_marked_success(outcome);
}

#[tokio::test]
async fn given_page_with_few_characters_when_reading_text_layer_then_insufficient_yield() {
    let (_temp, staged) = staged_on_disk(&one_page_pdf(SHORT_LINE));

    let outcome = PdfNativeExtractor::default().attempt(&staged, deadline()).await;

    assert!(matches!(outcome, AttemptOutcome::InsufficientYield { .. }));
}

#[tokio::test]
async fn given_born_digital_page_when_using_legacy_parser_then_success_with_page_marker() {
    let (_temp, staged) = staged_on_disk(&one_page_pdf(CONTRACT_LINE));

    let outcome = PdfLegacyExtractor::default().attempt(&staged, deadline()).await;

    assert_page_marked_success(outcome);
}

#[tokio::test]
async fn given_page_with_few_characters_when_using_legacy_parser_then_insufficient_yield() {
    let (_temp, staged) = staged_on_disk(&one_page_pdf(SHORT_LINE));

    let outcome = PdfLegacyExtractor::default().attempt(&staged, deadline()).await;

    assert!(matches!(outcome, AttemptOutcome::InsufficientYield { .. }));
}

#[tokio::test]
async fn given_expired_deadline_when_using_legacy_parser_then_timed_out() {
    let (_temp, staged) = staged_on_disk(&one_page_pdf(CONTRACT_LINE));

    let outcome = PdfLegacyExtractor::default()
        .attempt(&staged, Deadline::after(Duration::ZERO))
        .await;

    assert_eq!(outcome, AttemptOutcome::TimedOut);
}

#[tokio::test]
async fn given_expired_deadline_when_reading_text_layer_then_timed_out() {
    let (_temp, staged) = staged_on_disk(&one_page_pdf(CONTRACT_LINE));

    let outcome = PdfNativeExtractor::default()
        .attempt(&staged, Deadline::after(Duration::ZERO))
        .await;

    assert_eq!(outcome, AttemptOutcome::TimedOut);
}
