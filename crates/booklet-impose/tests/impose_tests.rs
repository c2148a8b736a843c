mod common;

use booklet_impose::*;
use common::*;
use tokio::sync::mpsc;

fn options(layout: SheetLayout, size: SignatureSize) -> ImpositionOptions {
    ImpositionOptions::new(layout, size)
}

#[tokio::test]
async fn test_load_pdf() {
    use tempfile::NamedTempFile;

    let temp = NamedTempFile::new().unwrap();
    std::fs::write(temp.path(), to_bytes(create_test_pdf(5))).unwrap();

    let loaded = load_pdf(temp.path()).await.unwrap();
    assert_eq!(page_count(&loaded), 5);
    assert_eq!(
        page_size(&loaded, 0).unwrap(),
        Some(PageSize::new(612.0, 792.0))
    );
    assert_eq!(page_size(&loaded, 5).unwrap(), None);
}

#[tokio::test]
async fn test_save_pdf_round_trip() {
    use tempfile::NamedTempFile;

    let imposed = impose(
        create_test_pdf(8),
        &options(SheetLayout::TwoUp, SignatureSize::Eight),
    )
    .await
    .unwrap();

    let temp = NamedTempFile::new().unwrap();
    save_pdf(imposed, temp.path()).await.unwrap();
    let reloaded = load_pdf(temp.path()).await.unwrap();
    assert_eq!(page_count(&reloaded), 8);
}

#[tokio::test]
async fn test_load_missing_file_is_io_error() {
    let result = load_pdf("/definitely/not/here.pdf").await;
    assert!(matches!(result, Err(BookletError::Io(_))));
    assert_eq!(result.unwrap_err().kind(), ErrorKind::BadInput);
}

#[test]
fn test_two_up_ten_pages_signature_four() {
    let doc = create_test_pdf(10);
    let imposed = impose_document(
        &doc,
        &options(SheetLayout::TwoUp, SignatureSize::Four),
        &mut NoProgress,
    )
    .unwrap();

    // Pages 11 and 12 are blank fillers
    assert_eq!(
        page_labels(&imposed),
        vec![
            Some(4),
            Some(1),
            Some(2),
            Some(3),
            Some(8),
            Some(5),
            Some(6),
            Some(7),
            None,
            Some(9),
            Some(10),
            None,
        ]
    );
}

#[test]
fn test_two_up_eight_pages_signature_eight() {
    let imposed = impose_document(
        &create_test_pdf(8),
        &options(SheetLayout::TwoUp, SignatureSize::Eight),
        &mut NoProgress,
    )
    .unwrap();

    let labels: Vec<usize> = page_labels(&imposed).into_iter().flatten().collect();
    assert_eq!(labels, vec![8, 1, 2, 7, 6, 3, 4, 5]);
}

#[test]
fn test_two_up_output_matches_padded_count() {
    for size in SignatureSize::ALL {
        for total in [1, 3, 7, 17, 33] {
            let imposed = impose_document(
                &create_test_pdf(total),
                &options(SheetLayout::TwoUp, size),
                &mut NoProgress,
            )
            .unwrap();
            assert_eq!(page_count(&imposed), total + compute_padding(total, size.pages()));
        }
    }
}

#[test]
fn test_fillers_take_first_page_size() {
    let doc = create_sized_pdf(&[(300.0, 400.0), (612.0, 792.0), (612.0, 792.0)]);
    let imposed = impose_document(
        &doc,
        &options(SheetLayout::TwoUp, SignatureSize::Four),
        &mut NoProgress,
    )
    .unwrap();

    // [4, 1, 2, 3]: slot 0 carries the filler
    assert_eq!(
        page_size(&imposed, 0).unwrap(),
        Some(PageSize::new(300.0, 400.0))
    );
    assert_eq!(
        page_size(&imposed, 2).unwrap(),
        Some(PageSize::new(612.0, 792.0))
    );
}

#[test]
fn test_four_up_sheets_and_cells() {
    let imposed = impose_document(
        &create_test_pdf(8),
        &options(SheetLayout::FourUp, SignatureSize::Eight),
        &mut NoProgress,
    )
    .unwrap();

    let sheets = page_ids(&imposed);
    assert_eq!(sheets.len(), 2);
    assert_eq!(
        page_size(&imposed, 0).unwrap(),
        Some(PageSize::new(1224.0, 1584.0))
    );

    let first: Vec<usize> = sheet_labels(&imposed, sheets[0]).into_iter().flatten().collect();
    let second: Vec<usize> = sheet_labels(&imposed, sheets[1]).into_iter().flatten().collect();
    assert_eq!(first, vec![8, 1, 6, 3]);
    assert_eq!(second, vec![2, 7, 4, 5]);
}

#[test]
fn test_four_up_cells_tile_the_sheet() {
    let imposed = impose_document(
        &create_test_pdf(4),
        &options(SheetLayout::FourUp, SignatureSize::Four),
        &mut NoProgress,
    )
    .unwrap();

    let sheet = page_ids(&imposed)[0];
    let matrices = sheet_matrices(&imposed, sheet);
    let origins: Vec<(f32, f32)> = matrices.iter().map(|m| (m[4], m[5])).collect();
    assert_eq!(
        origins,
        vec![(0.0, 792.0), (612.0, 792.0), (0.0, 0.0), (612.0, 0.0)]
    );
    assert!(matrices.iter().all(|m| m[0] == 1.0 && m[3] == 1.0));
}

#[test]
fn test_four_up_stretches_mismatched_pages() {
    let doc = create_sized_pdf(&[(600.0, 800.0), (300.0, 400.0), (600.0, 800.0), (600.0, 800.0)]);
    let imposed = impose_document(
        &doc,
        &options(SheetLayout::FourUp, SignatureSize::Four),
        &mut NoProgress,
    )
    .unwrap();

    let sheet = page_ids(&imposed)[0];
    // Cells hold [4, 1, 2, 3]; page 2 is half size and drawn in the bottom-left cell
    let matrices = sheet_matrices(&imposed, sheet);
    assert_eq!(matrices[2][0], 2.0);
    assert_eq!(matrices[2][3], 2.0);
    assert_eq!(matrices[1][0], 1.0);
}

#[test]
fn test_four_up_output_sheet_count() {
    for size in SignatureSize::ALL {
        let total = size.pages() * 2 + 1;
        let imposed = impose_document(
            &create_test_pdf(total),
            &options(SheetLayout::FourUp, size),
            &mut NoProgress,
        )
        .unwrap();
        let padded = total + compute_padding(total, size.pages());
        assert_eq!(page_count(&imposed), padded / 4);
    }
}

#[test]
fn test_page_numbers_stamped_before_reordering() {
    let imposed = impose_document(
        &create_test_pdf(3),
        &options(SheetLayout::TwoUp, SignatureSize::Four).with_page_numbers(true),
        &mut NoProgress,
    )
    .unwrap();

    let first = page_ids(&imposed)[0];
    let dict = imposed.get_dictionary(first).unwrap();
    let content = render::get_page_content(&imposed, dict).unwrap();
    let text = String::from_utf8_lossy(&content);
    // Slot 0 is the filler carrying running number 4
    assert!(text.contains("(4) Tj"));
    assert!(!text.contains("(Page-"));

    let second = page_ids(&imposed)[1];
    let dict = imposed.get_dictionary(second).unwrap();
    let text = String::from_utf8(render::get_page_content(&imposed, dict).unwrap()).unwrap();
    assert!(text.contains("(Page-1)"));
    assert!(text.contains("(1) Tj"));
}

#[test]
fn test_links_follow_copied_pages() {
    let mut source = create_test_pdf(5);
    add_page_link(&mut source, 0, 2);

    // Numbering, padding and reordering each copy the pages once
    let imposed = impose_document(
        &source,
        &options(SheetLayout::TwoUp, SignatureSize::Four).with_page_numbers(true),
        &mut NoProgress,
    )
    .unwrap();

    assert_eq!(page_count(&imposed), 8);
    assert_eq!(page_object_count(&imposed), 8);

    let destinations = link_destinations(&imposed);
    assert_eq!(destinations.len(), 1);
    assert!(page_ids(&imposed).contains(&destinations[0]));
    assert_eq!(label_of(&imposed, destinations[0]), Some(3));
}

#[test]
fn test_link_to_earlier_page_after_reordering() {
    let mut source = create_test_pdf(4);
    add_page_link(&mut source, 3, 1);

    let imposed = impose_document(
        &source,
        &options(SheetLayout::TwoUp, SignatureSize::Four),
        &mut NoProgress,
    )
    .unwrap();

    assert_eq!(page_object_count(&imposed), 4);
    let destinations = link_destinations(&imposed);
    assert_eq!(label_of(&imposed, destinations[0]), Some(2));
}

#[test]
fn test_empty_document_rejected() {
    let result = impose_document(
        &create_test_pdf(0),
        &ImpositionOptions::default(),
        &mut NoProgress,
    );
    assert!(matches!(result, Err(BookletError::EmptyDocument)));
    assert_eq!(result.unwrap_err().kind(), ErrorKind::Precondition);
}

#[tokio::test]
async fn test_impose_pdf_bytes_reports_every_phase() {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let output = impose_pdf_bytes(
        to_bytes(create_test_pdf(10)),
        &options(SheetLayout::TwoUp, SignatureSize::Four).with_page_numbers(true),
        tx,
    )
    .await
    .unwrap();

    let mut phases = Vec::new();
    while let Ok(update) = rx.try_recv() {
        phases.push(update.percent);
    }
    assert_eq!(phases, vec![0, 20, 40, 60, 80, 100]);

    assert_eq!(output.statistics.source_pages, 10);
    assert_eq!(output.statistics.blank_pages_added, 2);
    let reloaded = load_pdf_bytes(&output.bytes).unwrap();
    assert_eq!(page_count(&reloaded), 12);
}

#[tokio::test]
async fn test_dropped_receiver_cancels_imposition() {
    let (tx, rx) = mpsc::unbounded_channel();
    drop(rx);
    let result = impose_pdf_bytes(
        to_bytes(create_test_pdf(4)),
        &ImpositionOptions::default(),
        tx,
    )
    .await;
    assert!(matches!(result, Err(BookletError::Cancelled(Phase::Loading))));
}

#[tokio::test]
async fn test_garbage_bytes_rejected() {
    let options = ImpositionOptions::default();
    let result = impose_pdf_bytes(b"not a pdf".to_vec(), &options, NoProgress).await;
    assert!(matches!(result, Err(BookletError::Pdf(_))));
}

#[test]
fn test_cancel_midway_stops_pipeline() {
    struct CancelAt(Phase);

    impl ProgressReporter for CancelAt {
        fn checkpoint(&mut self, update: ProgressUpdate) -> Checkpoint {
            if update.phase == self.0 {
                Checkpoint::Cancel
            } else {
                Checkpoint::Continue
            }
        }
    }

    let result = impose_document(
        &create_test_pdf(5),
        &ImpositionOptions::default(),
        &mut CancelAt(Phase::Reordering),
    );
    assert!(matches!(result, Err(BookletError::Cancelled(Phase::Reordering))));
}
