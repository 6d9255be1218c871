//! Frame listing parser tests

use burst_plan::frame::{parse_file, parse_listing, CatalogOptions, DetectorCatalog, EPOCH_FLOOR};
use burst_plan::{Error, FormatError};
use std::io::Write;

// =============================================================================
// Accepted listings
// =============================================================================

#[test]
fn test_parses_frame_name_fields() {
    let frames = parse_listing(
        "/data/H-H1_HOFT_C00-1200000000-128.gwf\n",
        "H1",
        &CatalogOptions::default(),
    )
    .unwrap();

    assert_eq!(frames.len(), 1);
    let frame = &frames[0];
    assert_eq!(frame.detector_id(), "H1");
    assert_eq!(frame.path(), "/data/H-H1_HOFT_C00-1200000000-128.gwf");
    assert_eq!(frame.start_time(), 1_200_000_000.0);
    assert_eq!(frame.duration(), 128.0);
    assert_eq!(frame.end_time(), 1_200_000_128.0);
}

#[test]
fn test_gw_data_find_artifacts_are_stripped() {
    let listing = "\
framefile=/data/H-H1-1200000000-128.gwf
file://localhost/data/H-H1-1200000128-128.gwf
gsiftp://ldr.aei.uni-hannover.de:15000/archive/H-H1-1200000256-128.gwf
";
    let frames = parse_listing(listing, "H1", &CatalogOptions::default()).unwrap();
    let paths: Vec<&str> = frames.iter().map(|f| f.path()).collect();
    assert_eq!(
        paths,
        vec![
            "/data/H-H1-1200000000-128.gwf",
            "/data/H-H1-1200000128-128.gwf",
            "/archive/H-H1-1200000256-128.gwf",
        ]
    );
}

#[test]
fn test_comments_blank_and_unlabelled_lines_skipped() {
    let listing = "\
# H1 frames
   
/data/H-H1-1200000000-128.gwf
/data/README.txt
/data/H-H1-1200000128-128.gwf
";
    let frames = parse_listing(listing, "H1", &CatalogOptions::default()).unwrap();
    assert_eq!(frames.len(), 2);
    assert_eq!(frames[1].start_time(), 1_200_000_128.0);
}

#[test]
fn test_indented_hash_is_not_a_comment() {
    let listing = "\
# /data/H-H1-notes-4.gwf
  # /data/H-H1-notes-4.gwf
";
    let err = parse_listing(listing, "H1", &CatalogOptions::default()).unwrap_err();
    assert!(matches!(err, FormatError::NonIntegerField { ref token, .. } if token == "notes"));
    assert_eq!(err.path(), "# /data/H-H1-notes-4.gwf");
}

#[test]
fn test_order_kept_and_duplicates_not_removed() {
    let listing = "\
/d/L-L1-1200000256-128.gwf
/d/L-L1-1200000000-128.gwf
/d/L-L1-1200000256-128.gwf
";
    let frames = parse_listing(listing, "L1", &CatalogOptions::default()).unwrap();
    let starts: Vec<f64> = frames.iter().map(|f| f.start_time()).collect();
    assert_eq!(starts, vec![1_200_000_256.0, 1_200_000_000.0, 1_200_000_256.0]);
}

#[test]
fn test_floor_value_itself_is_accepted() {
    let listing = format!("/d/V-V1-{EPOCH_FLOOR}-1.gwf");
    let frames = parse_listing(&listing, "V1", &CatalogOptions::default()).unwrap();
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].duration(), 1.0);
}

#[test]
fn test_extra_prefix_option() {
    let options = CatalogOptions::default().strip_prefix("osdf://");
    let frames = parse_listing("osdf:///igwn/H-H1-1200000000-4096.gwf", "H1", &options).unwrap();
    assert_eq!(frames[0].path(), "/igwn/H-H1-1200000000-4096.gwf");
}

// =============================================================================
// Rejected listings
// =============================================================================

#[test]
fn test_non_integer_field_is_format_error() {
    let err = parse_listing("/d/H-H1-abc-128.gwf", "H1", &CatalogOptions::default()).unwrap_err();
    assert_eq!(
        err,
        FormatError::NonIntegerField {
            path: "/d/H-H1-abc-128.gwf".to_string(),
            token: "abc".to_string(),
        }
    );
}

#[test]
fn test_start_below_floor_is_format_error() {
    let err = parse_listing("/d/H-H1-1000000000-128.gwf", "H1", &CatalogOptions::default())
        .unwrap_err();
    assert!(matches!(
        err,
        FormatError::BeforeEpoch {
            gps_start: 1_000_000_000,
            ..
        }
    ));
    assert_eq!(err.path(), "/d/H-H1-1000000000-128.gwf");
}

#[test]
fn test_zero_duration_is_format_error() {
    let err =
        parse_listing("/d/H-H1-1200000000-0.gwf", "H1", &CatalogOptions::default()).unwrap_err();
    assert!(matches!(err, FormatError::NonPositiveDuration { duration: 0, .. }));
}

#[test]
fn test_missing_fields_is_format_error() {
    let err = parse_listing("/d/frame.gwf", "H1", &CatalogOptions::default()).unwrap_err();
    assert!(matches!(err, FormatError::MissingTimeFields { .. }));
}

#[test]
fn test_error_aborts_whole_catalog() {
    let listing = "/d/H-H1-1200000000-128.gwf\n/d/H-H1-bad-128.gwf\n";
    assert!(DetectorCatalog::parse(listing, "H1", &CatalogOptions::default()).is_err());
}

// =============================================================================
// File helper
// =============================================================================

#[test]
fn test_parse_file_reads_listing() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "# L1").unwrap();
    writeln!(file, "file://localhost/d/L-L1-1200000000-128.gwf").unwrap();

    let catalog = parse_file(file.path(), "L1", &CatalogOptions::default()).unwrap();
    assert_eq!(catalog.detector_id(), "L1");
    assert_eq!(catalog.len(), 1);
}

#[test]
fn test_parse_file_missing_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = parse_file(dir.path().join("absent.lst"), "L1", &CatalogOptions::default())
        .unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn test_parse_file_malformed_is_format_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "/d/L-L1-12-128.gwf").unwrap();
    let err = parse_file(file.path(), "L1", &CatalogOptions::default()).unwrap_err();
    assert!(matches!(err, Error::Format(FormatError::BeforeEpoch { .. })));
}
