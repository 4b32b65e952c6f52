//! Integration tests for JSONL landmark replay.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::fs;

use iris_watch_adapters::{JsonlLandmarkSource, ReplayInput};
use iris_watch_core::{compute_offset, is_centered, Detection, LandmarkSource};
use iris_watch_test_support::{FaceBuilder, MeshBuilder, SCRIPT_START};

fn write_lines(lines: &[String]) -> tempfile::NamedTempFile {
    let file = tempfile::NamedTempFile::new().unwrap();
    fs::write(file.path(), lines.join("\n")).unwrap();
    file
}

#[test]
fn test_load_mixed_frames() {
    let centered = MeshBuilder::from_face(&FaceBuilder::centered().build());
    let looking_away = MeshBuilder::from_face(&FaceBuilder::looking(0.8, 0.0).build());

    let file = write_lines(&[
        centered.jsonl_line(None),
        MeshBuilder::no_face_line(None),
        looking_away.jsonl_line(None),
    ]);

    let source = JsonlLandmarkSource::from_path(file.path(), 30.0, SCRIPT_START);
    assert_eq!(source.count_hint(), Some(3));

    let frames: Vec<_> = source.frames().map(|f| f.expect("readable")).collect();
    assert_eq!(frames.len(), 3);

    let face = frames[0].face().expect("first frame has a face");
    assert!(is_centered(&compute_offset(&face.left)));
    assert!(is_centered(&compute_offset(&face.right)));

    assert_eq!(frames[1].detection, Detection::NoFace);

    let face = frames[2].face().expect("third frame has a face");
    assert!(!is_centered(&compute_offset(&face.left)));
}

#[test]
fn test_timestamps_follow_fps() {
    let file = write_lines(&[
        MeshBuilder::no_face_line(None),
        MeshBuilder::no_face_line(None),
        MeshBuilder::no_face_line(None),
    ]);

    let source = JsonlLandmarkSource::from_path(file.path(), 10.0, SCRIPT_START);
    let frames: Vec<_> = source.frames().map(Result::unwrap).collect();

    assert_eq!(frames[0].timestamp, SCRIPT_START);
    assert_eq!(
        frames[2].timestamp,
        SCRIPT_START + time::Duration::milliseconds(200)
    );
}

#[test]
fn test_explicit_timestamps_win() {
    let file = write_lines(&[
        MeshBuilder::no_face_line(Some(0.0)),
        MeshBuilder::no_face_line(Some(7.5)),
    ]);

    let source = JsonlLandmarkSource::from_path(file.path(), 30.0, SCRIPT_START);
    let frames: Vec<_> = source.frames().map(Result::unwrap).collect();

    assert_eq!(
        frames[1].timestamp,
        SCRIPT_START + time::Duration::milliseconds(7500)
    );
}

#[test]
fn test_blank_lines_skipped() {
    let file = write_lines(&[
        MeshBuilder::no_face_line(None),
        String::new(),
        "   ".to_string(),
        MeshBuilder::no_face_line(None),
    ]);

    let source = JsonlLandmarkSource::from_path(file.path(), 30.0, SCRIPT_START);
    assert_eq!(source.count_hint(), Some(2));

    let frames: Vec<_> = source.frames().map(Result::unwrap).collect();
    assert_eq!(frames.len(), 2);
    assert_eq!(frames[1].index, 1);
}

#[test]
fn test_truncated_mesh_is_malformed_not_error() {
    let short = MeshBuilder::from_face(&FaceBuilder::centered().build()).truncated(468);
    let file = write_lines(&[short.jsonl_line(None)]);

    let source = JsonlLandmarkSource::from_path(file.path(), 30.0, SCRIPT_START);
    let frames: Vec<_> = source.frames().collect();

    assert_eq!(frames.len(), 1);
    let frame = frames.into_iter().next().unwrap().expect("record is readable");
    assert!(matches!(frame.detection, Detection::Malformed(_)));
    assert!(frame.face().is_none());
}

#[test]
fn test_garbage_line_is_error_and_stream_continues() {
    let file = write_lines(&[
        "{ not json".to_string(),
        MeshBuilder::no_face_line(None),
    ]);

    let source = JsonlLandmarkSource::from_path(file.path(), 30.0, SCRIPT_START);
    let frames: Vec<_> = source.frames().collect();

    assert_eq!(frames.len(), 2);
    assert!(frames[0].is_err());
    assert!(frames[1].is_ok());
}

#[test]
fn test_missing_file_yields_single_error() {
    let source = JsonlLandmarkSource::new(
        ReplayInput::Path("/nonexistent/frames.jsonl".into()),
        30.0,
        SCRIPT_START,
    );

    assert_eq!(source.count_hint(), None);
    let frames: Vec<_> = source.frames().collect();
    assert_eq!(frames.len(), 1);

    let err = frames.into_iter().next().unwrap().unwrap_err();
    assert!(format!("{err:#}").contains("Failed to open landmark file"));
}
