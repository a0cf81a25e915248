use super::domain::KnowledgeChunk;

/// Splits raw knowledge-base text into overlapping chunks, preserving
/// paragraph boundaries where possible. Paragraphs accumulate greedily;
/// when the next one would exceed `chunk_size` characters the buffer is
/// emitted and the next buffer is seeded with the last `overlap` characters
/// of the emitted chunk for context continuity.
#[derive(Debug, Clone)]
pub struct DocumentChunker {
    chunk_size: usize,
    overlap: usize,
}

impl Default for DocumentChunker {
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            overlap: 200,
        }
    }
}

impl DocumentChunker {
    pub fn new(chunk_size: usize, overlap: usize) -> Self {
        Self {
            chunk_size,
            overlap,
        }
    }

    pub fn chunk(&self, text: &str, document: &str) -> Vec<KnowledgeChunk> {
        let mut chunks = Vec::new();
        let mut buffer = String::new();
        let mut chunk_index = 0usize;

        for paragraph in text.split("\n\n") {
            let buffer_len = buffer.chars().count();
            if buffer_len + paragraph.chars().count() > self.chunk_size && !buffer.is_empty() {
                chunks.push(make_chunk(&buffer, document, chunk_index));

                buffer = if buffer_len > self.overlap {
                    format!("{}\n\n{paragraph}", tail_chars(&buffer, self.overlap))
                } else {
                    paragraph.to_string()
                };
                chunk_index += 1;
            } else if buffer.is_empty() {
                buffer = paragraph.to_string();
            } else {
                buffer.push_str("\n\n");
                buffer.push_str(paragraph);
            }
        }

        if !buffer.trim().is_empty() {
            chunks.push(make_chunk(&buffer, document, chunk_index));
        }

        chunks
    }
}

fn make_chunk(buffer: &str, document: &str, chunk_index: usize) -> KnowledgeChunk {
    KnowledgeChunk {
        id: format!("{document}_chunk_{chunk_index}"),
        document: document.to_string(),
        chunk_index,
        text: buffer.trim().to_string(),
        char_count: buffer.chars().count(),
    }
}

/// Last `n` characters of `s`, respecting char boundaries.
fn tail_chars(s: &str, n: usize) -> &str {
    let total = s.chars().count();
    if total <= n {
        return s;
    }
    s.char_indices()
        .nth(total - n)
        .map(|(index, _)| &s[index..])
        .unwrap_or(s)
}
