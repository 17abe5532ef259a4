//! Writing node graphs as Graphviz DOT.
use flussab::{write::text::ascii_digits, DeferredWriter};
use tracing::trace;
use zwohash::HashSet;

use crate::graph::{Kind, Line, Node, NodeId, NodeRef, Path};

/// Configuration options for DOT generation.
#[derive(Clone, Default, Debug)]
#[non_exhaustive]
pub struct Config {
    /// Place all root nodes on the same rank.
    pub rank_roots: bool,
}

/// Counters accumulated while converting.
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug)]
pub struct Stats {
    /// Number of node statements written.
    pub nodes: usize,
    /// Number of edges written for node children.
    pub edges: usize,
    /// Number of edges written for path annotations.
    pub path_edges: usize,
    /// Number of nodes drawn as parameterized.
    pub parameterized: usize,
    /// Number of root nodes.
    pub roots: usize,
}

/// Converts a stream of lines into DOT statements.
///
/// Nodes that depend on a `param` node are drawn dotted. This is tracked across lines, so a
/// converter must see the lines in input order. A `lambda` node never inherits the flag from its
/// children.
pub struct Converter {
    config: Config,
    parameterized: HashSet<u64>,
    roots: Vec<NodeId>,
    stats: Stats,
}

impl Converter {
    /// Creates a converter that has not seen any lines yet.
    pub fn new(config: Config) -> Self {
        Self {
            config,
            parameterized: Default::default(),
            roots: vec![],
            stats: Stats::default(),
        }
    }

    /// Writes the opening line of the graph.
    pub fn write_header(&self, target: &mut DeferredWriter) {
        target.write_all_defer_err(b"digraph G {\n");
    }

    /// Writes the DOT statements for a single line.
    pub fn write_line(&mut self, line: &Line, target: &mut DeferredWriter) {
        match line {
            Line::Node(node) => self.write_node(node, target),
            Line::Path(path) => self.write_path(path, target),
        }
    }

    /// Writes the closing line of the graph.
    pub fn write_footer(&self, target: &mut DeferredWriter) {
        if self.config.rank_roots {
            if let Some((first, rest)) = self.roots.split_first() {
                target.write_all_defer_err(b"{rank=same; ");
                ascii_digits(target, first.get());
                for root in rest {
                    target.write_all_defer_err(b" ");
                    ascii_digits(target, root.get());
                }
                target.write_all_defer_err(b"}\n");
            }
        }
        target.write_all_defer_err(b"}\n");
    }

    /// Whether a node seen so far is drawn as parameterized.
    pub fn is_parameterized(&self, id: NodeId) -> bool {
        self.parameterized.contains(&id.get())
    }

    /// The root nodes seen so far, in input order.
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Returns the counters for everything written so far.
    pub fn stats(&self) -> Stats {
        self.stats
    }

    fn write_node(&mut self, node: &Node, target: &mut DeferredWriter) {
        let Node { id, kind, children } = *node;

        // Slice bounds are part of the label, only the base is drawn as an edge.
        let (children, bounds) = match (kind, children) {
            (Kind::Slice, [_, upper, lower, ..]) => (&children[..1], Some((*upper, *lower))),
            _ => (children, None),
        };

        let fill = match kind {
            Kind::Root => {
                self.roots.push(id);
                self.stats.roots += 1;
                None
            }
            Kind::Array | Kind::Acond | Kind::Write | Kind::Lambda => Some("lightblue"),
            Kind::Apply => Some("lightyellow"),
            Kind::Param => {
                self.parameterized.insert(id.get());
                None
            }
            Kind::Slice
            | Kind::Var
            | Kind::Const
            | Kind::Consth
            | Kind::Constd
            | Kind::Other(_) => None,
        };

        if kind != Kind::Lambda
            && children
                .iter()
                .any(|child| self.parameterized.contains(&child.target()))
        {
            self.parameterized.insert(id.get());
        }

        let parameterized = self.is_parameterized(id);
        let (style, fill) = if parameterized {
            self.stats.parameterized += 1;
            (Some("dotted"), None)
        } else {
            (fill.map(|_| "filled"), fill)
        };

        trace!(id = id.get(), kind = %kind.name(), parameterized, "node");

        ascii_digits(target, id.get());
        target.write_all_defer_err(b" [shape=");
        target.write_all_defer_err(kind.shape().name().as_bytes());
        target.write_all_defer_err(b", label=\"");
        if kind != Kind::Root {
            ascii_digits(target, id.get());
            target.write_all_defer_err(b": ");
            target.write_all_defer_err(kind.name());
            if let Some((NodeRef(upper), NodeRef(lower))) = bounds {
                target.write_all_defer_err(b"\\n");
                ascii_digits(target, upper);
                target.write_all_defer_err(b" ");
                ascii_digits(target, lower);
            }
        }
        target.write_all_defer_err(b"\"");
        if let Some(style) = style {
            target.write_all_defer_err(b", style=");
            target.write_all_defer_err(style.as_bytes());
        }
        if let Some(fill) = fill {
            target.write_all_defer_err(b", fillcolor=");
            target.write_all_defer_err(fill.as_bytes());
        }
        target.write_all_defer_err(b"]\n");
        self.stats.nodes += 1;

        for (index, child) in children.iter().enumerate() {
            ascii_digits(target, id.get());
            target.write_all_defer_err(b" -> ");
            ascii_digits(target, child.target());
            let arrowhead: &[u8] = if child.is_inverted() { b"dot" } else { b"normal" };
            target.write_all_defer_err(b" [arrowhead=\"");
            target.write_all_defer_err(arrowhead);
            target.write_all_defer_err(b"\", taillabel=\"");
            // Operand positions are only labeled when there is more than one.
            if children.len() > 1 {
                ascii_digits(target, index + 1);
            }
            target.write_all_defer_err(b"\"]\n");
        }
        self.stats.edges += children.len();
    }

    fn write_path(&mut self, path: &Path, target: &mut DeferredWriter) {
        trace!(id = path.id, len = path.nodes.len(), "path");

        // Paths are listed from their end, so edges point towards earlier entries.
        for pair in path.nodes.windows(2).rev() {
            let [NodeRef(to), NodeRef(from)] = [pair[0], pair[1]];
            ascii_digits(target, from);
            target.write_all_defer_err(b" -> ");
            ascii_digits(target, to);
            target.write_all_defer_err(b" [fontcolor=\"blue\", color=\"blue\", label=\"L");
            ascii_digits(target, path.id);
            target.write_all_defer_err(b"\"]\n");
            self.stats.path_edges += 1;
        }
    }
}
