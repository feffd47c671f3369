use std::path::Path;
use std::sync::Arc;

use ocrdex::models::Metadata;
use ocrdex::ocr::{MockOcrEngine, RawLine, RawOcrOutput, TextMode};
use ocrdex::services::reader::{ImageOcrReader, ReaderConfig, ReaderError};
use serde_json::json;
use tempfile::TempDir;

fn touch(dir: &Path, name: &str) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, b"not really an image").unwrap();
}

fn receipt() -> RawOcrOutput {
    RawOcrOutput::Lines(vec![
        RawLine::new("CORNER SHOP", 0.95),
        RawLine::new("Total 12.50", 0.85),
    ])
}

fn reader_with(engine: MockOcrEngine) -> ImageOcrReader {
    ImageOcrReader::new(Arc::new(engine), ReaderConfig::default())
}

#[tokio::test]
async fn test_directory_load_is_sorted_and_filtered() {
    let tmp = TempDir::new().unwrap();
    touch(tmp.path(), "b.png");
    touch(tmp.path(), "a.JPG");
    touch(tmp.path(), "notes.txt");
    touch(tmp.path(), "nested/c.tiff");

    let engine = MockOcrEngine::new().with_fallback(receipt());
    let reader = reader_with(engine);

    let docs = reader
        .load_data_from_dir(tmp.path(), false, None)
        .await
        .unwrap();

    let names: Vec<&str> = docs
        .iter()
        .map(|d| d.metadata_str("file_name").unwrap())
        .collect();
    assert_eq!(names, vec!["a.JPG", "b.png"]);
}

#[tokio::test]
async fn test_recursive_directory_load() {
    let tmp = TempDir::new().unwrap();
    touch(tmp.path(), "top.png");
    touch(tmp.path(), "nested/deeper/inner.bmp");

    let reader = reader_with(MockOcrEngine::new().with_fallback(receipt()));

    let docs = reader
        .load_data_from_dir(tmp.path(), true, None)
        .await
        .unwrap();

    assert_eq!(docs.len(), 2);
    assert!(docs
        .iter()
        .any(|d| d.metadata_str("file_name") == Some("inner.bmp")));
}

#[tokio::test]
async fn test_directory_without_images_is_empty() {
    let tmp = TempDir::new().unwrap();
    touch(tmp.path(), "readme.md");

    let engine = Arc::new(MockOcrEngine::new());
    let reader = ImageOcrReader::new(engine.clone(), ReaderConfig::default());

    let docs = reader
        .load_data_from_dir(tmp.path(), true, None)
        .await
        .unwrap();

    assert!(docs.is_empty());
    assert_eq!(engine.calls(), 0);
}

#[tokio::test]
async fn test_missing_directory_fails() {
    let tmp = TempDir::new().unwrap();
    let reader = reader_with(MockOcrEngine::new());

    let err = reader
        .load_data_from_dir(tmp.path().join("nope"), false, None)
        .await
        .unwrap_err();

    assert!(matches!(err, ReaderError::NotADirectory(_)));
}

#[tokio::test]
async fn test_extra_info_is_merged_into_every_document() {
    let tmp = TempDir::new().unwrap();
    touch(tmp.path(), "one.png");
    touch(tmp.path(), "two.png");

    let reader = reader_with(MockOcrEngine::new().with_fallback(receipt()));

    let mut extra = Metadata::new();
    extra.insert("batch".to_string(), json!("2024-06"));
    extra.insert("language".to_string(), json!("override"));

    let docs = reader
        .load_data_from_dir(tmp.path(), false, Some(&extra))
        .await
        .unwrap();

    assert_eq!(docs.len(), 2);
    for doc in &docs {
        assert_eq!(doc.metadata_str("batch"), Some("2024-06"));
        assert_eq!(doc.metadata_str("language"), Some("override"));
        assert_eq!(doc.metadata_u64("num_text_blocks"), Some(2));
    }
}

#[tokio::test]
async fn test_load_data_stops_at_first_error() {
    let tmp = TempDir::new().unwrap();
    touch(tmp.path(), "1.png");
    touch(tmp.path(), "2.png");
    touch(tmp.path(), "3.png");

    let engine = Arc::new(
        MockOcrEngine::new()
            .with_fallback(receipt())
            .failing_on("2.png"),
    );
    let reader = ImageOcrReader::new(engine.clone(), ReaderConfig::default());

    let paths = ["1.png", "2.png", "3.png"].map(|n| tmp.path().join(n));
    let err = reader.load_data(&paths, None).await.unwrap_err();

    assert!(matches!(err, ReaderError::Ocr { .. }));
    assert_eq!(err.path(), Some(&paths[1]));
    assert_eq!(engine.calls(), 2);
}

#[tokio::test]
async fn test_plain_text_mode_document() {
    let tmp = TempDir::new().unwrap();
    touch(tmp.path(), "scan.png");

    let config = ReaderConfig::default().with_text_mode(TextMode::Plain);
    let engine = MockOcrEngine::new().with_output("scan.png", receipt());
    let reader = ImageOcrReader::new(Arc::new(engine), config);

    let doc = reader
        .load_file(tmp.path().join("scan.png"), None)
        .await
        .unwrap();

    assert_eq!(doc.text, "CORNER SHOP\nTotal 12.50");
    assert_eq!(doc.metadata_f64("avg_confidence"), Some(0.9));
    assert_eq!(doc.metadata_f64("min_confidence"), Some(0.85));
    assert_eq!(doc.metadata_f64("max_confidence"), Some(0.95));
}

#[cfg(unix)]
#[tokio::test]
async fn test_directory_load_follows_symlinked_images() {
    let tmp = TempDir::new().unwrap();
    let scans = tmp.path().join("scans");
    let originals = tmp.path().join("originals");
    touch(&originals, "real.png");
    std::fs::create_dir_all(&scans).unwrap();
    std::os::unix::fs::symlink(originals.join("real.png"), scans.join("link.png")).unwrap();
    std::os::unix::fs::symlink(tmp.path().join("gone.png"), scans.join("dangling.png")).unwrap();

    let reader = reader_with(MockOcrEngine::new().with_fallback(receipt()));

    let single = reader.load_file(scans.join("link.png"), None).await.unwrap();
    let docs = reader.load_data_from_dir(&scans, false, None).await.unwrap();

    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].metadata_str("file_name"), Some("link.png"));
    assert_eq!(docs[0].text, single.text);
}
