//! Raw result-file content handling.
//!
//! TestRunner output is close to JSON but not guaranteed well-formed:
//! files can be truncated mid-record when a target loses power, carry
//! NUL bytes from C string termination, and use `\r` line endings. The
//! helpers here get the content into a state the record extractor can
//! work through one block at a time.

use sha2::{Digest, Sha256};

/// Strip NUL bytes and normalize carriage returns to newlines.
///
/// NULs are `std::ends` artifacts from the C++ side of the runner; the
/// `\r` endings come from the single-test output files.
pub fn normalize_content(raw: &str) -> String {
    raw.replace('\0', "").replace('\r', "\n")
}

/// Scan `content` for top-level brace-delimited blocks.
///
/// Counts brace depth, skipping braces inside string literals (with
/// backslash escapes), so a `}` embedded in a field value cannot split
/// a block. Text between blocks (array punctuation, trailers) is
/// ignored. A block whose closing brace never arrives is dropped,
/// which is how a truncated file tail ends the scan.
pub fn scan_blocks(content: &str) -> Vec<&str> {
    let mut blocks = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (idx, ch) in content.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }
        match ch {
            // Quotes outside any block are stray text, not a literal.
            '"' if depth > 0 => in_string = true,
            '{' => {
                if depth == 0 {
                    start = idx;
                }
                depth += 1;
            }
            '}' => {
                if depth > 0 {
                    depth -= 1;
                    if depth == 0 {
                        blocks.push(&content[start..=idx]);
                    }
                }
            }
            _ => {}
        }
    }

    blocks
}

/// SHA256 hash of content, hex encoded. Used to fingerprint malformed
/// input in log events without copying the content into the log.
pub fn content_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_content() {
        assert_eq!(normalize_content("a\0b\rc"), "ab\nc");
        assert_eq!(normalize_content("clean"), "clean");
    }

    #[test]
    fn test_scan_two_blocks() {
        let content = r#"[{"model": "rsinterface.test", "pk": 1, "fields": {"a": 1}},
{"model": "rsinterface.log", "pk": 2, "fields": {"b": 2}} ]"#;
        let blocks = scan_blocks(content);
        assert_eq!(blocks.len(), 2);
        assert!(blocks[0].starts_with(r#"{"model": "rsinterface.test""#));
        assert!(blocks[1].ends_with("}}"));
    }

    #[test]
    fn test_braces_inside_strings_do_not_split() {
        let content = r#"{"model": "rsinterface.log", "pk": 1, "fields": {"logText": "left { right } \" done"}}"#;
        let blocks = scan_blocks(content);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0], content);
    }

    #[test]
    fn test_truncated_tail_is_dropped() {
        let content = r#"{"model": "rsinterface.test", "pk": 1, "fields": {"a": 1}},
{"model": "rsinterface.log", "pk": 2, "fields": {"b":"#;
        let blocks = scan_blocks(content);
        assert_eq!(blocks.len(), 1);
    }

    #[test]
    fn test_stray_text_between_blocks_ignored() {
        let content = "junk before {\"pk\": 1} , middle junk {\"pk\": 2} ]\nFile in database";
        let blocks = scan_blocks(content);
        assert_eq!(blocks, vec!["{\"pk\": 1}", "{\"pk\": 2}"]);
    }

    #[test]
    fn test_content_hash() {
        let hash = content_hash("test content");
        assert_eq!(hash.len(), 64);
        assert_eq!(hash, content_hash("test content"));
        assert_ne!(hash, content_hash("other content"));
    }
}
