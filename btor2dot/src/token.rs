use bstr::{BStr, BString, ByteSlice};
use flussab::{
    text::{self, LineReader},
    DeferredReader,
    Parsed::{self, Fallthrough, Res},
};

use crate::{
    error::ParseError,
    graph::{Kind, NodeRef},
};

/// Whitespace within a line, this includes the `'\r'` of a CRLF line ending.
#[inline]
fn is_blank(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\r' | b'\x0b' | b'\x0c')
}

#[inline]
fn is_separator(byte: u8) -> bool {
    byte == b'\n' || is_blank(byte)
}

#[inline]
fn is_field_end(reader: &mut DeferredReader, offset: usize) -> bool {
    match reader.request_byte_at_offset(offset) {
        Some(byte) => is_separator(byte),
        None => true,
    }
}

#[inline]
fn field_len(reader: &mut DeferredReader) -> usize {
    let mut offset = 0;
    while !is_field_end(reader, offset) {
        offset += 1;
    }
    offset
}

#[cold]
pub fn unexpected(input: &mut LineReader, expected: &str) -> ParseError {
    let mut unexpected_bytes = vec![];

    if text::newline(input.reader(), 0) != 0 {
        return input.give_up(format!("expected {expected}, found end of line"));
    } else if input.reader.is_at_end() {
        return input.give_up(format!("expected {expected}, found end of file"));
    }

    while unexpected_bytes.len() < 60 {
        match input.reader.request_byte_at_offset(unexpected_bytes.len()) {
            Some(byte) if is_separator(byte) && !unexpected_bytes.is_empty() => break,
            None => break,
            Some(byte) => unexpected_bytes.push(byte),
        }
    }

    input.give_up(format!(
        "expected {}, found {:?}",
        expected,
        String::from_utf8_lossy(&unexpected_bytes)
    ))
}

/// Skips whitespace within the current line.
#[inline]
pub fn skip_blanks(input: &mut LineReader) {
    let mut offset = 0;
    while matches!(input.reader.request_byte_at_offset(offset), Some(byte) if is_blank(byte)) {
        offset += 1;
    }
    input.reader.advance(offset);
}

/// Skips whitespace including any number of blank lines.
#[inline]
pub fn skip_empty_lines(input: &mut LineReader) {
    let mut offset = 0;
    loop {
        match input.reader.request_byte_at_offset(offset) {
            Some(b'\n') => input.line_at_offset(offset + 1),
            Some(byte) if is_blank(byte) => (),
            _ => break,
        }
        offset += 1;
    }
    input.reader.advance(offset);
}

/// Skips everything up to the end of the current line, leaving the newline itself.
pub fn skip_line_rest(input: &mut LineReader) {
    let mut offset = 0;
    while !matches!(
        input.reader.request_byte_at_offset(offset),
        Some(b'\n') | None
    ) {
        offset += 1;
    }
    input.reader.advance(offset);
}

/// Returns whether the cursor is at the end of a line or the end of the input.
#[inline]
pub fn at_line_end(input: &mut LineReader) -> bool {
    matches!(input.reader.request_byte(), Some(b'\n') | None)
}

/// Parses a single newline or the end of the input.
#[inline]
pub fn end_of_line(input: &mut LineReader) -> Parsed<(), ParseError> {
    match input.reader.request_byte() {
        Some(b'\n') => {
            input.reader.advance(1);
            input.line_at_offset(0);
            Res(Ok(()))
        }
        None if input.reader.io_error().is_none() => Res(Ok(())),
        _ => Fallthrough,
    }
}

#[inline]
pub fn eof(input: &mut LineReader) -> Parsed<(), ParseError> {
    if input.reader.request_byte().is_none() && input.reader.io_error().is_none() {
        Res(Ok(()))
    } else {
        Fallthrough
    }
}

/// Parses a whitespace delimited field.
#[inline]
pub fn word<'a>(input: &'a mut LineReader) -> Parsed<&'a BStr, ParseError> {
    let len = field_len(input.reader());
    if len == 0 {
        Fallthrough
    } else {
        Res(Ok(input.reader.advance_with_buf(len).as_bstr()))
    }
}

/// Passes over a whitespace delimited field without interpreting it.
///
/// Returns whether a field was present.
#[inline]
pub fn skip_field(input: &mut LineReader) -> bool {
    let len = field_len(input.reader());
    input.reader.advance(len);
    len != 0
}

#[cold]
#[inline(never)]
fn out_of_range(input: &mut LineReader, what: &str, len: usize) -> ParseError {
    let digits = String::from_utf8_lossy(&input.reader.buf()[..len]).into_owned();
    input.give_up(format!(
        "{} {} exceeds the supported range of {}..={}",
        what,
        digits,
        i64::MIN,
        i64::MAX,
    ))
}

/// Parses a decimal integer with an optional sign that spans a complete field.
#[inline]
pub fn int(input: &mut LineReader, what: &str) -> Parsed<i64, ParseError> {
    let start = match input.reader.request_byte() {
        Some(b'+') if matches!(input.reader.request_byte_at_offset(1), Some(b'0'..=b'9')) => 1,
        _ => 0,
    };
    let (value, offset) = text::signed_ascii_digits::<i64>(input.reader(), start);
    if offset == start || !is_field_end(input.reader(), offset) {
        return Fallthrough;
    }
    match value {
        Some(value) => {
            input.reader.advance(offset);
            Res(Ok(value))
        }
        None => Res(Err(out_of_range(input, what, offset))),
    }
}

#[inline]
pub fn node_ref(input: &mut LineReader, what: &str) -> Parsed<NodeRef, ParseError> {
    int(input, what).map(NodeRef)
}

#[inline]
pub fn required_node_ref(input: &mut LineReader, what: &str) -> Result<NodeRef, ParseError> {
    node_ref(input, what).or_give_up(|| unexpected(input, what))
}

pub enum LineToken {
    Path,
    Node(Kind<'static>),
}

/// Parses the keyword following the leading id of a line.
///
/// The name of a [`Kind::Other`] node is copied into `name_buf` and left empty in the returned
/// token.
pub fn line_token(input: &mut LineReader, name_buf: &mut BString) -> Parsed<LineToken, ParseError> {
    word(input).map(|name| {
        if name.as_bytes() == b"path" {
            return LineToken::Path;
        }
        LineToken::Node(Kind::known(name).unwrap_or_else(|| {
            name_buf.clear();
            name_buf.extend_from_slice(name);
            Kind::Other("".into())
        }))
    })
}
