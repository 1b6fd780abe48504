use std::fs;
use tempfile::TempDir;

use ragdb_core::loader::DocumentLoader;

#[test]
fn load_directory_reads_supported_files_with_metadata() {
    let tmp = TempDir::new().expect("tempdir");
    let dir = tmp.path();
    fs::write(dir.join("a.txt"), "alpha bravo\n").expect("write");
    fs::write(dir.join("b.md"), "# charlie\n").expect("write");
    fs::write(dir.join("ignored.bin"), [0u8, 159, 146]).expect("write");

    let loader = DocumentLoader::new();
    let docs = loader.load_directory(dir).expect("load");

    assert_eq!(docs.len(), 2, "only .txt and .md files are loaded");
    assert_eq!(docs[0].filename(), Some("a.txt"));
    assert_eq!(docs[0].content, "alpha bravo");
    assert_eq!(docs[0].metadata.get("type").map(String::as_str), Some("txt"));
    assert_eq!(docs[1].filename(), Some("b.md"));
    assert_eq!(docs[1].metadata.get("type").map(String::as_str), Some("md"));
}

#[test]
fn load_directory_on_empty_dir_returns_nothing() {
    let tmp = TempDir::new().expect("tempdir");
    let loader = DocumentLoader::new();
    let docs = loader.load_directory(tmp.path()).expect("load");
    assert!(docs.is_empty());
}

#[test]
fn nested_directories_are_walked_in_sorted_order() {
    let tmp = TempDir::new().expect("tempdir");
    let dir = tmp.path();
    fs::create_dir_all(dir.join("sub")).expect("mkdir");
    fs::write(dir.join("sub/z.txt"), "nested").expect("write");
    fs::write(dir.join("a.txt"), "top").expect("write");

    let loader = DocumentLoader::new();
    let docs = loader.load_directory(dir).expect("load");
    assert_eq!(docs.len(), 2);
    assert_eq!(docs[0].filename(), Some("a.txt"));
    assert_eq!(docs[1].filename(), Some("sub/z.txt"));
}

#[test]
fn same_name_in_different_subdirectories_stays_distinct() {
    let tmp = TempDir::new().expect("tempdir");
    let dir = tmp.path();
    fs::create_dir_all(dir.join("plants")).expect("mkdir");
    fs::create_dir_all(dir.join("tools")).expect("mkdir");
    fs::write(dir.join("plants/notes.txt"), "companion planting").expect("write");
    fs::write(dir.join("tools/notes.txt"), "sharpening an axe").expect("write");

    let loader = DocumentLoader::new();
    let docs = loader.load_directory(dir).expect("load");
    assert_eq!(docs.len(), 2);
    assert_eq!(docs[0].filename(), Some("plants/notes.txt"));
    assert_eq!(docs[1].filename(), Some("tools/notes.txt"));
}
