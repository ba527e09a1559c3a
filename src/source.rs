//! Turning files and streams into the line sequence the parser consumes.

use crate::error::Result;
use crate::model::Document;
use crate::parser::{Parser, ParserOptions};
use log::debug;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Reads every line of `reader`.
///
/// Lines end at `\n`, with an optional `\r` before it. Lines that are not
/// valid UTF-8 are decoded as Latin-1, the usual encoding of bank-issued
/// files. Blank lines at the end of the input are dropped.
pub fn read_lines<R: BufRead>(mut reader: R) -> Result<Vec<String>> {
    let mut lines = Vec::new();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        if buf.last() == Some(&b'\n') {
            buf.pop();
        }
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
        lines.push(decode_line(&buf));
    }

    while lines.last().is_some_and(|line| line.trim().is_empty()) {
        lines.pop();
    }

    debug!("Read {} lines", lines.len());
    Ok(lines)
}

/// Reads every line of the file at `path`.
pub fn read_file<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let file = File::open(path)?;
    read_lines(BufReader::new(file))
}

/// Reads and parses a whole statement, discarding any partial document on
/// failure.
pub fn parse_reader<R: BufRead>(reader: R, options: ParserOptions) -> Result<Document> {
    let lines = read_lines(reader)?;
    Ok(Parser::new(lines, options)?.parse()?)
}

fn decode_line(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => bytes.iter().map(|&b| char::from(b)).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RecordLine;
    use std::io::Cursor;

    #[test]
    fn test_splits_lines_and_strips_carriage_returns() {
        let lines = read_lines(Cursor::new("11abc\r\n22def\n23ghi")).unwrap();
        assert_eq!(lines, vec!["11abc", "22def", "23ghi"]);
    }

    #[test]
    fn test_drops_trailing_blank_lines_only() {
        let lines = read_lines(Cursor::new("11abc\n\n22def\n\n  \n")).unwrap();
        assert_eq!(lines, vec!["11abc", "", "22def"]);
    }

    #[test]
    fn test_latin1_fallback() {
        let bytes: &[u8] = b"2301CAF\xC9 ESPA\xD1A\n";
        let lines = read_lines(Cursor::new(bytes)).unwrap();
        assert_eq!(lines, vec!["2301CAFÉ ESPAÑA"]);
    }

    #[test]
    fn test_latin1_bytes_keep_their_column() {
        let mut bytes =
            b"22    22222002032002041240810000000000239900000000000000000000001234567890123456"
                .to_vec();
        bytes[49] = 0xD1;
        bytes.truncate(52);
        bytes.extend_from_slice(b"DESCRIPCI\xD3N\n");

        let lines = read_lines(Cursor::new(bytes)).unwrap();
        let movement = RecordLine::new(&lines[0], 1).movement().unwrap();
        assert_eq!(movement.amount.to_string(), "-23.99");
        assert_eq!(movement.description, "DESCRIPCIÓN");
    }

    #[test]
    fn test_empty_input() {
        assert!(read_lines(Cursor::new("")).unwrap().is_empty());
    }

    #[test]
    fn test_read_missing_file() {
        assert!(read_file("definitely/not/here.n43").is_err());
    }
}
