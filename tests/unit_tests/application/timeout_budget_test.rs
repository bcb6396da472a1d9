use std::time::Duration;

use lexdoc::application::services::TimeoutBudget;
use lexdoc::domain::ExtractionStage;

const MIB: u64 = 1024 * 1024;

#[test]
fn given_small_pdf_when_budgeting_native_then_floor_applies() {
    let budget = TimeoutBudget::default();

    assert_eq!(
        budget.budget(200 * 1024, ExtractionStage::PdfNative),
        Duration::from_secs(30)
    );
}

#[test]
fn given_five_mebibytes_when_budgeting_native_then_scales_with_size() {
    let budget = TimeoutBudget::default();

    assert_eq!(
        budget.budget(5 * MIB, ExtractionStage::PdfNative),
        Duration::from_secs(50)
    );
}

#[test]
fn given_huge_pdf_when_budgeting_native_then_ceiling_applies() {
    let budget = TimeoutBudget::default();

    assert_eq!(
        budget.budget(500 * MIB, ExtractionStage::PdfNative),
        Duration::from_secs(120)
    );
}

#[test]
fn given_increasing_sizes_when_budgeting_native_then_monotonic_and_bounded() {
    let budget = TimeoutBudget::default();
    let mut previous = Duration::ZERO;

    for size in (0..=40 * MIB).step_by(97 * 1024) {
        let current = budget.budget(size, ExtractionStage::PdfNative);
        assert!(current >= previous, "budget decreased at {size} bytes");
        assert!(current >= Duration::from_secs(30));
        assert!(current <= Duration::from_secs(120));
        previous = current;
    }
}

#[test]
fn given_any_size_when_budgeting_ocr_then_double_the_native_budget() {
    let budget = TimeoutBudget::default();

    for size in [0, 3 * MIB, 8 * MIB, 50 * MIB] {
        assert_eq!(
            budget.budget(size, ExtractionStage::PdfOcr),
            budget.budget(size, ExtractionStage::PdfNative) * 2
        );
    }
}

#[test]
fn given_any_size_when_budgeting_legacy_then_fixed_sixty_seconds() {
    let budget = TimeoutBudget::default();

    assert_eq!(
        budget.budget(0, ExtractionStage::PdfLegacy),
        Duration::from_secs(60)
    );
    assert_eq!(
        budget.budget(9 * MIB, ExtractionStage::PdfLegacy),
        Duration::from_secs(60)
    );
}

#[test]
fn given_image_when_budgeting_then_guard_is_size_independent() {
    let budget = TimeoutBudget::default();

    assert_eq!(
        budget.budget(1024, ExtractionStage::ImageOcr),
        budget.budget(9 * MIB, ExtractionStage::ImageOcr)
    );
}
