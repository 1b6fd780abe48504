use ragdb_core::chunker::TextSplitter;
use ragdb_core::Error;

#[test]
fn short_input_is_a_single_chunk_equal_to_input() {
    let splitter = TextSplitter::new(500, 50).expect("splitter");
    let text = "A short paragraph.\nWith a second line.";
    let chunks = splitter.split(text);
    assert_eq!(chunks, vec![text.to_string()]);
}

#[test]
fn empty_input_yields_no_chunks() {
    let splitter = TextSplitter::new(500, 50).expect("splitter");
    assert!(splitter.split("").is_empty());
}

#[test]
fn uniform_text_splits_into_expected_windows() {
    // 1000 identical characters, size 500, overlap 50: windows start at
    // 0, 450 and 900, so exactly three chunks of 500, 500 and 100.
    let splitter = TextSplitter::new(500, 50).expect("splitter");
    let text = "A".repeat(1000);
    let chunks = splitter.split(&text);
    assert_eq!(chunks.len(), 3);
    assert_eq!(chunks[0].chars().count(), 500);
    assert_eq!(chunks[1].chars().count(), 500);
    assert_eq!(chunks[2].chars().count(), 100);
}

#[test]
fn chunks_never_exceed_chunk_size_on_natural_text() {
    let splitter = TextSplitter::new(80, 10).expect("splitter");
    let text = "The quick brown fox jumps over the lazy dog. \
                Pack my box with five dozen liquor jugs. \
                How vexingly quick daft zebras jump!\n\n\
                Sphinx of black quartz, judge my vow. \
                The five boxing wizards jump quickly."
        .to_string();
    let chunks = splitter.split(&text);
    assert!(!chunks.is_empty());
    for chunk in &chunks {
        assert!(chunk.chars().count() <= 80, "oversize chunk: {:?}", chunk);
    }
}

#[test]
fn adjacent_chunks_overlap_by_configured_tail() {
    let splitter = TextSplitter::new(200, 40).expect("splitter");
    // Cycling alphabet, no separators: forces character-level windows
    // and makes the overlap comparison meaningful.
    let text: String = (0..900u32)
        .map(|i| char::from(b'a' + (i % 26) as u8))
        .collect();
    let chunks = splitter.split(&text);
    assert!(chunks.len() > 1);
    for pair in chunks.windows(2) {
        let prev: Vec<char> = pair[0].chars().collect();
        let next: Vec<char> = pair[1].chars().collect();
        let tail: String = prev[prev.len() - 40..].iter().collect();
        let head: String = next[..40].iter().collect();
        assert_eq!(tail, head, "overlap region must carry over");
    }
}

#[test]
fn separators_are_preserved_in_chunk_text() {
    // With zero overlap the chunks partition the input, so concatenating
    // them must restore it byte for byte, separators included.
    let splitter = TextSplitter::new(30, 0).expect("splitter");
    let text = "One sentence here. Another one follows.\n\nA new paragraph with more words in it.";
    let chunks = splitter.split(text);
    assert!(chunks.len() > 1);
    assert_eq!(chunks.concat(), text);
}

#[test]
fn paragraph_breaks_take_priority_over_spaces() {
    let splitter = TextSplitter::new(30, 0).expect("splitter");
    let text = format!("{}\n\n{}", "a".repeat(20), "b".repeat(20));
    let chunks = splitter.split(&text);
    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[0], format!("{}\n\n", "a".repeat(20)));
    assert_eq!(chunks[1], "b".repeat(20));
}

#[test]
fn invalid_size_or_overlap_is_rejected() {
    assert!(matches!(TextSplitter::new(0, 0), Err(Error::InvalidConfig(_))));
    assert!(matches!(TextSplitter::new(100, 100), Err(Error::InvalidConfig(_))));
    assert!(matches!(TextSplitter::new(100, 150), Err(Error::InvalidConfig(_))));
    assert!(TextSplitter::new(100, 99).is_ok());
}
