use std::ops;

/// Numeric identifier for a graph node.
///
/// This is a plain `u32` index, which lets slices of node ids be reinterpreted as slices of arena
/// words and back using [`bytemuck`].
#[repr(transparent)]
#[derive(
    Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, bytemuck::Pod, bytemuck::Zeroable,
)]
pub struct NodeId(u32);

impl NodeId {
    /// The constant false node.
    pub const CONST: Self = Self(0);

    /// Returns the node id for a given index.
    ///
    /// Panics if the index does not fit into 32 bits.
    #[inline(always)]
    pub fn from_index(index: usize) -> Self {
        Self(u32::try_from(index).expect("node index out of range"))
    }

    /// Returns the node id with the given raw 32-bit value.
    #[inline(always)]
    pub const fn from_u32(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the index of this node.
    #[inline(always)]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Returns the raw 32-bit value of this node id.
    #[inline(always)]
    pub const fn as_u32(self) -> u32 {
        self.0
    }
}

impl std::fmt::Debug for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(self, f)
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// A fan-in edge: a node together with an inversion flag.
///
/// Like an AIGER literal, the node and the flag are packed into a single code, with the flag in
/// the least significant bit.
#[repr(transparent)]
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Edge(u32);

impl Edge {
    /// The edge representing constant false.
    pub const FALSE: Self = Self(0);
    /// The edge representing constant true.
    pub const TRUE: Self = Self(1);

    /// Returns the edge to `node`, inverted if `inverted` is `true`.
    #[inline(always)]
    pub fn new(node: NodeId, inverted: bool) -> Self {
        debug_assert!(node.0 < 1 << 31);
        Self(node.0 << 1 | inverted as u32)
    }

    /// Returns the non-inverted edge to `node`.
    #[inline(always)]
    pub fn pos(node: NodeId) -> Self {
        Self::new(node, false)
    }

    /// Returns the inverted edge to `node`.
    #[inline(always)]
    pub fn neg(node: NodeId) -> Self {
        Self::new(node, true)
    }

    /// Returns the node this edge points to.
    #[inline(always)]
    pub fn node(self) -> NodeId {
        NodeId(self.0 >> 1)
    }

    /// Returns `true` if the edge is inverted.
    #[inline(always)]
    pub fn is_inverted(self) -> bool {
        self.0 & 1 != 0
    }

    /// Returns the packed code of the edge.
    #[inline(always)]
    pub fn code(self) -> u32 {
        self.0
    }
}

impl From<NodeId> for Edge {
    #[inline(always)]
    fn from(node: NodeId) -> Self {
        Self::pos(node)
    }
}

impl ops::Not for Edge {
    type Output = Self;

    #[inline(always)]
    fn not(self) -> Self::Output {
        Self(self.0 ^ 1)
    }
}

impl ops::BitXor<bool> for Edge {
    type Output = Self;

    #[inline(always)]
    fn bitxor(self, rhs: bool) -> Self::Output {
        Self(self.0 ^ rhs as u32)
    }
}

impl std::fmt::Debug for Edge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(self, f)
    }
}

impl std::fmt::Display for Edge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.node() == NodeId::CONST {
            return write!(f, "{}", self.is_inverted() as u8);
        }
        let prefix = if self.is_inverted() { "!" } else { "" };
        write!(f, "{}{}", prefix, self.node())
    }
}

/// The kind of a graph node.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum NodeKind {
    /// The constant false node.
    Const,
    /// A primary input.
    Input,
    /// A 2-input AND of the given fan-in edges.
    And([Edge; 2]),
}
