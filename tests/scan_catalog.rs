use std::fs;
use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use rust_photo_collage::catalog::load_images;
use rust_photo_collage::error::Error;
use rust_photo_collage::scan::{ScanOptions, SortOrder, order_paths, scan_with_options};
use tempfile::tempdir;

/// A valid minimal 1x1 RGBA PNG.
const PNG_BYTES: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
    0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x44, 0x41, 0x54, 0x78, 0xDA, 0x63, 0x60,
    0xF8, 0xCF, 0xF0, 0x1F, 0x00, 0x04, 0x01, 0x01, 0xFF, 0xAE, 0xB5, 0x55, 0xF5, 0x00, 0x00,
    0x00, 0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];

#[test]
fn scan_finds_images_and_skips_other_files() {
    let tmp = tempdir().unwrap();
    let root = tmp.path();

    fs::write(root.join("b.png"), PNG_BYTES).unwrap();
    fs::create_dir_all(root.join("sub")).unwrap();
    fs::write(root.join("sub").join("a.png"), PNG_BYTES).unwrap();
    fs::write(root.join("note.txt"), "hello").unwrap();

    let paths = vec![root.to_path_buf()];
    let files = scan_with_options(&paths, &ScanOptions::default()).unwrap();
    assert_eq!(files.len(), 2);
    // Base order is sorted by path regardless of walk order.
    assert!(files[0].ends_with("b.png"));
    assert!(files[1].ends_with("sub/a.png") || files[1].ends_with("sub\\a.png"));
}

#[test]
fn non_recursive_scan_stays_at_the_root() {
    let tmp = tempdir().unwrap();
    let root = tmp.path();

    fs::write(root.join("top.png"), PNG_BYTES).unwrap();
    fs::create_dir_all(root.join("sub")).unwrap();
    fs::write(root.join("sub").join("deep.png"), PNG_BYTES).unwrap();

    let opts = ScanOptions {
        recursive: false,
        ..Default::default()
    };
    let files = scan_with_options(&[root.to_path_buf()], &opts).unwrap();
    assert_eq!(files.len(), 1);
    assert!(files[0].ends_with("top.png"));
}

#[test]
fn invalid_root_errors() {
    let bogus = PathBuf::from("/this/path/does/not/exist/for_collage_test");
    let err = scan_with_options(&[bogus], &ScanOptions::default()).unwrap_err();
    assert!(matches!(err, Error::BadDir(_)));
}

#[test]
fn directory_without_images_errors() {
    let tmp = tempdir().unwrap();
    fs::write(tmp.path().join("note.txt"), "hello").unwrap();
    let err = scan_with_options(&[tmp.path().to_path_buf()], &ScanOptions::default()).unwrap_err();
    assert!(matches!(err, Error::EmptyScan));
}

#[test]
fn catalog_decodes_in_scan_order() {
    let tmp = tempdir().unwrap();
    let root = tmp.path();
    fs::write(root.join("one.png"), PNG_BYTES).unwrap();
    fs::write(root.join("two.png"), PNG_BYTES).unwrap();

    let files = scan_with_options(&[root.to_path_buf()], &ScanOptions::default()).unwrap();
    let images = load_images(&files).unwrap();
    assert_eq!(images.len(), 2);
    assert!(images[0].source().ends_with("one.png"));
    assert_eq!((images[0].width(), images[0].height()), (1, 1));
}

#[test]
fn undecodable_file_is_reported_by_path() {
    let tmp = tempdir().unwrap();
    let fake = tmp.path().join("broken.png");
    fs::write(&fake, b"not a png").unwrap();

    let err = load_images(&[fake.clone()]).unwrap_err();
    match err {
        Error::Decode { path, .. } => assert_eq!(path, fake),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn modified_order_sorts_oldest_first() {
    let tmp = tempdir().unwrap();
    let root = tmp.path();
    let newer = root.join("a_newer.png");
    let older = root.join("b_older.png");
    fs::write(&newer, PNG_BYTES).unwrap();
    fs::write(&older, PNG_BYTES).unwrap();

    let base = SystemTime::now() - Duration::from_secs(3600);
    fs::File::options()
        .write(true)
        .open(&older)
        .unwrap()
        .set_modified(base)
        .unwrap();
    fs::File::options()
        .write(true)
        .open(&newer)
        .unwrap()
        .set_modified(base + Duration::from_secs(600))
        .unwrap();

    let mut files = scan_with_options(&[root.to_path_buf()], &ScanOptions::default()).unwrap();
    order_paths(&mut files, SortOrder::Modified, None);
    assert!(files[0].ends_with("b_older.png"));
    assert!(files[1].ends_with("a_newer.png"));
}
