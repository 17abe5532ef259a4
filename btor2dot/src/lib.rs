//! Conversion of BTOR node graphs into Graphviz DOT.
//!
//! The input is read one line at a time. Every node definition is turned into a DOT node statement
//! followed by one edge per child, path annotations become chains of highlighted edges. See
//! [`convert`] for the complete pass and [`Parser`] and [`Converter`] for driving it line by line.
#![warn(missing_docs)]

use std::io::{Read, Write};

use flussab::DeferredWriter;
use tracing::debug;

pub mod dot;
pub mod graph;

mod error;
mod parser;
mod token;

pub use dot::{Config, Converter, Stats};
pub use error::{Error, InnerParseError, ParseError};
pub use parser::Parser;

/// Reads a node graph from `read` and writes it as a DOT digraph to `write`.
///
/// On success the output is flushed and the conversion counters are returned. When an error is
/// encountered conversion stops and the closing brace of the digraph is not written.
pub fn convert<'a>(
    read: impl Read + 'a,
    write: impl Write + 'a,
    config: Config,
) -> Result<Stats, Error> {
    let mut parser = Parser::from_read(read)?;
    let mut target = DeferredWriter::from_write(write);
    let mut converter = Converter::new(config);

    converter.write_header(&mut target);
    while let Some(line) = parser.next_line()? {
        converter.write_line(&line, &mut target);
    }
    converter.write_footer(&mut target);
    target.flush().map_err(Error::WriteError)?;

    let stats = converter.stats();
    debug!(
        nodes = stats.nodes,
        edges = stats.edges,
        path_edges = stats.path_edges,
        parameterized = stats.parameterized,
        roots = stats.roots,
        "converted graph"
    );

    Ok(stats)
}
