//! Types for representing the lines of a BTOR node graph.
use std::num::NonZeroU64;

use bstr::{BStr, ByteSlice};

/// A single non-empty line of the input.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Line<'a> {
    /// A node definition.
    Node(Node<'a>),
    /// A path annotation.
    Path(Path<'a>),
}

impl<'a> Line<'a> {
    pub(crate) fn update_bufs(&mut self, kind: &'a BStr, refs: &'a [NodeRef]) {
        match self {
            Line::Node(node) => {
                if let Kind::Other(name) = &mut node.kind {
                    *name = kind;
                }
                node.children = refs;
            }
            Line::Path(path) => path.nodes = refs,
        }
    }
}

/// Refers to a defined node.
///
/// Node ids are strictly positive.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct NodeId(pub NonZeroU64);

impl NodeId {
    /// Returns the node with the given id.
    ///
    /// This panics when the id is zero.
    pub fn new(id: u64) -> Self {
        Self(NonZeroU64::new(id).unwrap())
    }

    /// Returns the id as plain integer.
    #[inline]
    pub fn get(self) -> u64 {
        self.0.get()
    }
}

/// A signed reference to a node.
///
/// The magnitude is the id of the referenced node, a negative sign marks an inverted reference.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct NodeRef(pub i64);

impl NodeRef {
    /// The id of the referenced node.
    #[inline]
    pub fn target(self) -> u64 {
        self.0.unsigned_abs()
    }

    /// Whether this reference is inverted.
    #[inline]
    pub fn is_inverted(self) -> bool {
        self.0 < 0
    }
}

/// A node definition.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Node<'a> {
    /// The id of this node.
    pub id: NodeId,
    /// The kind of this node.
    pub kind: Kind<'a>,
    /// The operands of this node, in order.
    ///
    /// Always empty for leaf kinds. For a [`Kind::Slice`] node these are `[base, upper, lower]`.
    pub children: &'a [NodeRef],
}

/// A path annotation connecting a sequence of nodes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Path<'a> {
    /// The identifier of this path, used to label its edges.
    pub id: i64,
    /// The nodes along the path, in input order.
    pub nodes: &'a [NodeRef],
}

/// The kind tag of a node.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Kind<'a> {
    /// A root marker.
    Root,
    /// Bit-vector slicing.
    Slice,
    /// An array variable.
    Array,
    /// A conditional on arrays.
    Acond,
    /// An array write.
    Write,
    /// A lambda abstraction.
    Lambda,
    /// A bit-vector variable.
    Var,
    /// A lambda parameter.
    Param,
    /// A binary constant.
    Const,
    /// A hexadecimal constant.
    Consth,
    /// A decimal constant.
    Constd,
    /// A function application.
    Apply,
    /// Any other operator.
    Other(&'a BStr),
}

impl<'a> Kind<'a> {
    /// Looks up the kind with the given name, falling back to [`Kind::Other`].
    pub fn from_name(name: &'a BStr) -> Self {
        Self::known(name).unwrap_or(Kind::Other(name))
    }

    pub(crate) fn known(name: &[u8]) -> Option<Kind<'static>> {
        Some(match name {
            b"root" => Kind::Root,
            b"slice" => Kind::Slice,
            b"array" => Kind::Array,
            b"acond" => Kind::Acond,
            b"write" => Kind::Write,
            b"lambda" => Kind::Lambda,
            b"var" => Kind::Var,
            b"param" => Kind::Param,
            b"const" => Kind::Const,
            b"consth" => Kind::Consth,
            b"constd" => Kind::Constd,
            b"apply" => Kind::Apply,
            _ => return None,
        })
    }

    /// The name of the kind as it appears in the input.
    pub fn name(&self) -> &'a BStr {
        match *self {
            Kind::Root => "root".into(),
            Kind::Slice => "slice".into(),
            Kind::Array => "array".into(),
            Kind::Acond => "acond".into(),
            Kind::Write => "write".into(),
            Kind::Lambda => "lambda".into(),
            Kind::Var => "var".into(),
            Kind::Param => "param".into(),
            Kind::Const => "const".into(),
            Kind::Consth => "consth".into(),
            Kind::Constd => "constd".into(),
            Kind::Apply => "apply".into(),
            Kind::Other(name) => name,
        }
    }

    /// Leaf nodes have no operands, any trailing tokens are ignored.
    pub fn is_leaf(&self) -> bool {
        matches!(
            self,
            Kind::Array | Kind::Var | Kind::Param | Kind::Const | Kind::Consth | Kind::Constd
        )
    }

    /// Array-like nodes carry an additional metadata token in front of their operands.
    pub fn is_array_like(&self) -> bool {
        matches!(self, Kind::Array | Kind::Acond | Kind::Write | Kind::Lambda)
    }

    /// Number of tokens between the kind and the first operand of a non-leaf node.
    pub fn skipped_fields(&self) -> usize {
        if self.is_array_like() {
            2
        } else {
            1
        }
    }

    /// The shape used to draw nodes of this kind.
    pub fn shape(&self) -> Shape {
        match self {
            Kind::Root => Shape::None,
            Kind::Array | Kind::Var | Kind::Param | Kind::Const | Kind::Consth | Kind::Constd => {
                Shape::Box
            }
            Kind::Other(name) if name.contains_str("const") => Shape::Box,
            _ => Shape::Oval,
        }
    }
}

/// A Graphviz node shape.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Shape {
    /// No outline.
    None,
    /// A rectangle.
    Box,
    /// An ellipse.
    Oval,
}

impl Shape {
    pub(crate) fn name(&self) -> &'static str {
        match self {
            Shape::None => "none",
            Shape::Box => "box",
            Shape::Oval => "oval",
        }
    }
}
