use booklet_impose::*;

#[test]
fn test_sheet_layout_from_pages_per_sheet() {
    assert_eq!(SheetLayout::try_from(2).unwrap(), SheetLayout::TwoUp);
    assert_eq!(SheetLayout::try_from(4).unwrap(), SheetLayout::FourUp);

    let err = SheetLayout::try_from(3).unwrap_err();
    assert!(matches!(err, BookletError::InvalidLayout(3)));
    assert_eq!(err.kind(), ErrorKind::UnsupportedConfiguration);
}

#[test]
fn test_signature_size_from_pages() {
    for size in SignatureSize::ALL {
        assert_eq!(SignatureSize::try_from(size.pages()).unwrap(), size);
    }
    let err = SignatureSize::try_from(12).unwrap_err();
    assert!(matches!(err, BookletError::UnsupportedSignature(12)));
    assert_eq!(err.kind(), ErrorKind::UnsupportedConfiguration);
}

#[test]
fn test_lookup_pattern_matches_typed_lookup() {
    for layout in [SheetLayout::TwoUp, SheetLayout::FourUp] {
        for size in SignatureSize::ALL {
            let pattern = lookup_pattern(layout, size.pages()).unwrap();
            assert_eq!(pattern, Pattern::for_signature(layout, size));
            assert!(pattern.is_bijection());
        }
    }
}

#[test]
fn test_four_up_thirty_two_plan() {
    let plan = plan_imposition(32, SheetLayout::FourUp, SignatureSize::ThirtyTwo).unwrap();
    assert_eq!(plan.signatures, 1);
    assert_eq!(plan.sheets.len(), 8);
    assert_eq!(plan.output_pages(), 8);
}

#[test]
fn test_cancelled_error_kind() {
    let err = BookletError::Cancelled(Phase::Padding);
    assert_eq!(err.kind(), ErrorKind::Cancelled);
    assert_eq!(err.to_string(), "Cancelled before padding");
}
