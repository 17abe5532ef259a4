use std::{
    io::{BufReader, Read},
    num::NonZeroU64,
};

use bstr::{BString, ByteSlice};
use flussab::{text::LineReader, DeferredReader, Parsed};

use crate::{
    error::ParseError,
    graph::{Kind, Line, Node, NodeId, NodeRef, Path},
    token::{self, LineToken},
};

/// A parser for the lines of a BTOR node graph.
///
/// Each non-empty line either defines a node, `<id> <kind> [<extra fields>] <children>...`, or
/// annotates a path, `<id> path <node>...`. Only the structure needed for drawing is interpreted,
/// the number of leading fields skipped before the children depends on the node's [`Kind`].
pub struct Parser<'a> {
    reader: LineReader<'a>,
    name_buf: BString,
    ref_buf: Vec<NodeRef>,
}

impl<'a> Parser<'a> {
    /// Creates a parser reading from a [`LineReader`].
    pub fn new(reader: LineReader<'a>) -> Result<Self, ParseError> {
        Ok(Self {
            reader,
            name_buf: Default::default(),
            ref_buf: Default::default(),
        })
    }

    /// Creates a parser reading from a [`BufReader`].
    pub fn from_buf_reader(buf_reader: BufReader<impl Read + 'a>) -> Result<Self, ParseError> {
        Self::new(LineReader::new(DeferredReader::from_buf_reader(buf_reader)))
    }

    /// Creates a parser reading from a [`Read`] instance.
    ///
    /// If the [`Read`] instance is a [`BufReader`], it is better to use
    /// [`from_buf_reader`][Self::from_buf_reader] to avoid unnecessary double buffering of the
    /// data.
    pub fn from_read(read: impl Read + 'a) -> Result<Self, ParseError> {
        Self::new(LineReader::new(DeferredReader::from_read(read)))
    }

    /// Reads node references up to the end of the line into `ref_buf`.
    fn references(&mut self, what: &str) -> Result<(), ParseError> {
        self.ref_buf.clear();
        token::skip_blanks(&mut self.reader);
        while !token::at_line_end(&mut self.reader) {
            let node_ref = token::required_node_ref(&mut self.reader, what)?;
            self.ref_buf.push(node_ref);
            token::skip_blanks(&mut self.reader);
        }
        Ok(())
    }

    fn try_line(&mut self) -> Parsed<Line<'static>, ParseError> {
        self.reader.reader.set_mark();
        token::int(&mut self.reader, "node id").and_then(|id| {
            token::skip_blanks(&mut self.reader);
            let line_token = token::line_token(&mut self.reader, &mut self.name_buf)
                .or_give_up(|| token::unexpected(&mut self.reader, "node kind or path"))?;

            let line = match line_token {
                LineToken::Path => {
                    self.references("path node")?;
                    Line::Path(Path { id, nodes: &[] })
                }
                LineToken::Node(kind) => {
                    let Some(id) = u64::try_from(id).ok().and_then(NonZeroU64::new) else {
                        return Err(self.reader.give_up_at(
                            self.reader.reader.mark(),
                            format!("node id must be positive, found {id}"),
                        ));
                    };

                    if kind.is_leaf() {
                        self.ref_buf.clear();
                        token::skip_line_rest(&mut self.reader);
                    } else {
                        for _ in 0..kind.skipped_fields() {
                            token::skip_blanks(&mut self.reader);
                            token::skip_field(&mut self.reader);
                        }
                        self.references("node reference")?;

                        if kind == Kind::Slice && self.ref_buf.len() < 3 {
                            return Err(self.reader.give_up(format!(
                                "slice requires a base node and upper and lower bit indices, \
                                 found {} operands",
                                self.ref_buf.len()
                            )));
                        }
                    }

                    Line::Node(Node {
                        id: NodeId(id),
                        kind,
                        children: &[],
                    })
                }
            };

            token::end_of_line(&mut self.reader)
                .or_give_up(|| token::unexpected(&mut self.reader, "end of line"))?;

            Ok(line)
        })
    }

    /// Parses the next non-empty line.
    ///
    /// Returns `Ok(None)` when reaching the end of the input.
    pub fn next_line(&mut self) -> Result<Option<Line>, ParseError> {
        token::skip_empty_lines(&mut self.reader);

        let Some(mut line) = self
            .try_line()
            .map(Some)
            .or_parse(|| token::eof(&mut self.reader).map(|_| None))
            .or_give_up(|| token::unexpected(&mut self.reader, "node id"))?
        else {
            self.reader.reader.check_io_error()?;
            return Ok(None);
        };

        line.update_bufs(self.name_buf.as_bstr(), &self.ref_buf);

        Ok(Some(line))
    }
}
