//! Payload codecs
//!
//! Text formats carried inside data frames:
//!
//! - **Line block**: every line followed by `\n`, the last one included
//! - **Partial table**: one `word count` pair per line, fields separated by a
//!   single space
//!
//! Normalized words never contain a tokenizer separator, so neither format
//! needs escaping. Other whitespace, such as U+00A0, is carried as is.

use crate::error::{PipelineError, PipelineResult};
use crate::stats::FrequencyTable;
use crate::worker::tokenizer::is_separator;
use std::fmt::Write as _;

/// Encode lines as a newline-terminated block
pub fn encode_lines(lines: &[String]) -> String {
    let capacity = lines.iter().map(|line| line.len() + 1).sum();
    let mut block = String::with_capacity(capacity);
    for line in lines {
        block.push_str(line);
        block.push('\n');
    }
    block
}

/// Split a block back into its lines
///
/// A final line without a trailing newline is still a line. An empty block
/// has no lines at all.
pub fn decode_lines(block: &str) -> Vec<String> {
    block.split_terminator('\n').map(str::to_string).collect()
}

/// Decode a line-block frame payload
pub fn decode_line_block(payload: &[u8]) -> PipelineResult<Vec<String>> {
    let block = std::str::from_utf8(payload)?;
    Ok(decode_lines(block))
}

/// Encode a table as `word count` lines
pub fn encode_table(table: &FrequencyTable) -> String {
    let mut payload = String::new();
    for (word, count) in table {
        // Writing to a String cannot fail
        let _ = writeln!(payload, "{} {}", word, count);
    }
    payload
}

/// Decode a partial-table payload
///
/// Parsing is strict: every non-empty line must be exactly one word, one
/// space and a positive count. Anything else fails with the 1-based line
/// number rather than being skipped. Counts that would overflow `u64` fail
/// with `CountOverflow`.
pub fn decode_table(payload: &str) -> PipelineResult<FrequencyTable> {
    let mut table = FrequencyTable::new();
    fold_table(payload, |word, count| table.add(word, count))?;
    Ok(table)
}

/// Decode a partial-table payload and add every pair into `target`
///
/// The payload is fully validated, and every sum checked, before `target`
/// is touched.
pub fn merge_table_payload(target: &mut FrequencyTable, payload: &[u8]) -> PipelineResult<()> {
    let text = std::str::from_utf8(payload)?;
    let partial = decode_table(text)?;
    target.try_merge(partial)
}

fn fold_table<F>(payload: &str, mut apply: F) -> PipelineResult<()>
where
    F: FnMut(&str, u64) -> PipelineResult<()>,
{
    for (idx, line) in payload.split_terminator('\n').enumerate() {
        if line.is_empty() {
            continue;
        }
        let (word, count) = parse_pair(line).map_err(|reason| PipelineError::MalformedTable {
            line: idx + 1,
            reason,
        })?;
        apply(word, count)?;
    }
    Ok(())
}

fn parse_pair(line: &str) -> Result<(&str, u64), String> {
    let (word, count) = line
        .split_once(' ')
        .ok_or_else(|| format!("expected `word count`, got {:?}", line))?;

    if word.is_empty() || word.contains(is_separator) {
        return Err(format!("invalid word {:?}", word));
    }

    let count: u64 = count
        .parse()
        .map_err(|_| format!("invalid count {:?} for word {:?}", count, word))?;

    if count == 0 {
        return Err(format!("zero count for word {:?}", word));
    }

    Ok((word, count))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_encode_lines_trailing_newline() {
        assert_eq!(encode_lines(&lines(&["The cat.", "the CAT sat."])), "The cat.\nthe CAT sat.\n");
        assert_eq!(encode_lines(&[]), "");
        assert_eq!(encode_lines(&lines(&[""])), "\n");
    }

    #[test]
    fn test_decode_lines() {
        assert_eq!(decode_lines("a\nb\n"), lines(&["a", "b"]));
        assert_eq!(decode_lines("a\nb"), lines(&["a", "b"]));
        assert_eq!(decode_lines("a\n\nb\n"), lines(&["a", "", "b"]));
        assert_eq!(decode_lines("\n"), lines(&[""]));
    }

    #[test]
    fn test_empty_block_has_no_lines() {
        assert!(decode_lines("").is_empty());
        assert!(decode_line_block(b"").unwrap().is_empty());
    }

    #[test]
    fn test_line_block_round_trip_keeps_blank_lines() {
        let original = lines(&["", "first", "", "  spaced  ", "\tlast\r", ""]);
        assert_eq!(decode_lines(&encode_lines(&original)), original);
    }

    #[test]
    fn test_line_block_invalid_utf8() {
        let result = decode_line_block(&[0x66, 0xff, 0x0a]);
        assert!(matches!(result, Err(PipelineError::InvalidUtf8(_))));
    }

    #[test]
    fn test_table_round_trip() {
        let table: FrequencyTable = [("the", 2), ("cat", 3), ("éclair", 1)].into_iter().collect();
        let payload = encode_table(&table);
        assert_eq!(decode_table(&payload).unwrap(), table);

        let largest: FrequencyTable = [("x", u64::MAX)].into_iter().collect();
        assert_eq!(decode_table(&encode_table(&largest)).unwrap(), largest);
    }

    #[test]
    fn test_table_round_trip_unicode_whitespace_words() {
        let table: FrequencyTable = [("caf\u{a0}bar", 2), ("\u{2003}x", 1), ("a\u{85}b", 4)]
            .into_iter()
            .collect();

        let payload = encode_table(&table);
        assert_eq!(decode_table(&payload).unwrap(), table);
    }

    #[test]
    fn test_tokenized_corpus_round_trip() {
        let corpus = [
            "Plain ASCII, with punctuation!",
            "caf\u{a0}bar\u{2003}em a\u{85}b",
            "zero\u{200b}width ctrl\u{1}char",
            "日本語 テキスト 日本語",
            "Éclair naïve—word CAFÉ",
            "tab\tvt\x0bff\x0ccr\r",
        ];

        let mut table = FrequencyTable::new();
        for line in corpus {
            for word in crate::worker::tokenizer::tokenize(line) {
                table.record(&word);
            }
        }
        assert_eq!(table.get("日本語"), 2);
        assert_eq!(table.get("caf\u{a0}bar\u{2003}em"), 1);

        let payload = encode_table(&table);
        assert_eq!(decode_table(&payload).unwrap(), table);
    }

    #[test]
    fn test_decode_count_overflow() {
        let result = decode_table("x 18446744073709551615\nx 1\n");
        match result {
            Err(PipelineError::CountOverflow { word }) => assert_eq!(word, "x"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_encode_table_format() {
        let table: FrequencyTable = [("cat", 3), ("a", 2)].into_iter().collect();
        assert_eq!(encode_table(&table), "a 2\ncat 3\n");
        assert_eq!(encode_table(&FrequencyTable::new()), "");
    }

    #[test]
    fn test_decode_empty_table() {
        assert!(decode_table("").unwrap().is_empty());
    }

    #[test]
    fn test_decode_duplicate_words_accumulate() {
        let table = decode_table("cat 1\ncat 2\n").unwrap();
        assert_eq!(table.get("cat"), 3);
    }

    #[test]
    fn test_decode_malformed_reports_line() {
        let cases = [
            ("cat 3\ndog\n", 2),
            ("cat three\n", 1),
            ("cat -1\n", 1),
            ("a 1\nb 2\ncat 0\n", 3),
            (" 4\n", 1),
            ("cat 3 extra\n", 1),
            ("cat  3\n", 1),
        ];

        for (payload, expected_line) in cases {
            match decode_table(payload) {
                Err(PipelineError::MalformedTable { line, .. }) => {
                    assert_eq!(line, expected_line, "payload {:?}", payload)
                }
                other => panic!("payload {:?} decoded to {:?}", payload, other),
            }
        }
    }

    #[test]
    fn test_merge_table_payload_is_all_or_nothing() {
        let mut global: FrequencyTable = [("cat", 1)].into_iter().collect();

        merge_table_payload(&mut global, b"cat 2\nmat 1\n").unwrap();
        assert_eq!(global.get("cat"), 3);
        assert_eq!(global.get("mat"), 1);

        let before = global.clone();
        assert!(merge_table_payload(&mut global, b"cat 5\nbroken\n").is_err());
        assert_eq!(global, before);
    }

    #[test]
    fn test_merge_table_payload_overflow_leaves_target_unchanged() {
        let mut global: FrequencyTable = [("cat", u64::MAX - 1), ("mat", 1)].into_iter().collect();
        let before = global.clone();

        let result = merge_table_payload(&mut global, b"mat 1\ncat 2\n");
        assert!(matches!(result, Err(PipelineError::CountOverflow { .. })));
        assert_eq!(global, before);
    }
}
