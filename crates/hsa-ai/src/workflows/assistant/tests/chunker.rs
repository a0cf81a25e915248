use crate::workflows::assistant::chunker::DocumentChunker;

#[test]
fn short_text_yields_a_single_chunk() {
    let chunker = DocumentChunker::default();

    let chunks = chunker.chunk("HSA funds roll over year to year.", "basics.txt");

    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].id, "basics.txt_chunk_0");
    assert_eq!(chunks[0].chunk_index, 0);
    assert_eq!(chunks[0].text, "HSA funds roll over year to year.");
    assert_eq!(chunks[0].char_count, 33);
}

#[test]
fn paragraphs_accumulate_until_the_size_limit() {
    let chunker = DocumentChunker::new(100, 10);
    let text = "First paragraph.\n\nSecond paragraph.";

    let chunks = chunker.chunk(text, "doc.txt");

    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].text, "First paragraph.\n\nSecond paragraph.");
}

#[test]
fn overflow_emits_a_chunk_and_seeds_the_next_with_overlap() {
    let chunker = DocumentChunker::new(40, 10);
    let text = "alpha one two three four five.\n\nbeta six seven eight nine ten.\n\ngamma eleven twelve.";

    let chunks = chunker.chunk(text, "doc.txt");

    assert_eq!(chunks.len(), 3);
    assert_eq!(chunks[0].text, "alpha one two three four five.");
    // Next chunk carries the tail of the previous one for continuity.
    assert!(chunks[1].text.starts_with("four five."));
    assert!(chunks[1].text.contains("beta six seven eight nine ten."));
    assert!(chunks[2].text.contains("gamma eleven twelve."));

    for (index, chunk) in chunks.iter().enumerate() {
        assert_eq!(chunk.chunk_index, index);
        assert_eq!(chunk.id, format!("doc.txt_chunk_{index}"));
        assert_eq!(chunk.document, "doc.txt");
    }
}

#[test]
fn oversized_paragraph_stays_in_one_chunk() {
    let chunker = DocumentChunker::new(50, 10);
    let paragraph = "x".repeat(200);

    let chunks = chunker.chunk(&paragraph, "doc.txt");

    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].char_count, 200);
}

#[test]
fn whitespace_only_input_yields_nothing() {
    let chunker = DocumentChunker::default();

    let chunks = chunker.chunk("  \n\n  ", "doc.txt");

    assert!(chunks.is_empty());
}
