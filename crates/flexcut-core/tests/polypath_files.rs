use flexcut_core::{read_polypath_file, write_polypath_file, Point, Polyline};
use std::fs;

#[test]
fn test_polypath_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("job.json");

    let polypath = vec![
        Polyline::from(vec![(0.0, 0.0), (100.0, 0.0), (100.0, 50.0)]),
        Polyline::from(vec![(3.5, -1.25)]),
        Polyline::default(),
    ];

    write_polypath_file(&path, &polypath, true).unwrap();
    let loaded = read_polypath_file(&path).unwrap();

    assert_eq!(loaded, polypath);
}

#[test]
fn test_pretty_output_is_multiline() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pretty.json");

    let polypath = vec![Polyline::chord(Point::new(0.0, 0.0), Point::new(1.0, 1.0))];
    write_polypath_file(&path, &polypath, true).unwrap();

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.lines().count() > 1);
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = read_polypath_file(&dir.path().join("nope.json")).unwrap_err();
    assert!(err.is_io_error());
}
