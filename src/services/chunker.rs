pub const MAX_CHUNK_CHARS: usize = 6000;

/// Consecutive chunks of at most `max_chars` characters. Boundaries land
/// on char boundaries, never inside a code point.
pub fn split_content(content: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    if max_chars == 0 {
        return chunks;
    }

    let mut rest = content;
    while !rest.is_empty() {
        match rest.char_indices().nth(max_chars) {
            Some((byte_offset, _)) => {
                let (chunk, remainder) = rest.split_at(byte_offset);
                chunks.push(chunk.to_string());
                rest = remainder;
            }
            None => {
                chunks.push(rest.to_string());
                break;
            }
        }
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_content_is_a_single_chunk() {
        let chunks = split_content("hello world", 6000);
        assert_eq!(chunks, vec!["hello world".to_string()]);
    }

    #[test]
    fn empty_content_yields_no_chunks() {
        let chunks = split_content("", 6000);
        assert!(chunks.is_empty());
    }

    #[test]
    fn content_splits_into_max_sized_chunks_with_remainder() {
        let content = "a".repeat(6000 * 2 + 1);
        let chunks = split_content(&content, 6000);

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].chars().count(), 6000);
        assert_eq!(chunks[1].chars().count(), 6000);
        assert_eq!(chunks[2].chars().count(), 1);
        assert_eq!(chunks.concat(), content);
    }

    #[test]
    fn exact_multiple_has_no_empty_tail() {
        let content = "b".repeat(12);
        let chunks = split_content(&content, 4);

        assert_eq!(chunks.len(), 3);
        assert!(chunks.iter().all(|c| c.chars().count() == 4));
    }

    #[test]
    fn multibyte_text_splits_on_char_boundaries() {
        let content = "héllo wörld ünïcode";
        let chunks = split_content(content, 5);

        assert_eq!(chunks.concat(), content);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 5);
        }
    }
}
