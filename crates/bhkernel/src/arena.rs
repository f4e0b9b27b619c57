//! Flat node storage for the quadtree.
//!
//! Nodes live contiguously in a `Vec` and reference each other by [`NodeId`]
//! rather than by pointer. The arena is append-only during a build and is
//! rewound with [`NodeArena::reset`] before the next one; the backing
//! allocation is kept, so steady-state builds do not allocate.
//!
//! Capacity is a hard bound: once `capacity` nodes exist, [`NodeArena::allocate`]
//! returns `None` and the caller decides how to degrade.

use std::ops::Index;

use nalgebra::Point2;

/// Index into the node arena.
///
/// Uses `u32` rather than `usize`; four of these are stored per node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    /// Sentinel for "no node"
    pub const NONE: NodeId = NodeId(u32::MAX);

    fn new(index: usize) -> Self {
        debug_assert!(index < u32::MAX as usize, "NodeId overflow");
        NodeId(index as u32)
    }

    /// Position of the node in the arena
    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn is_none(self) -> bool {
        self == Self::NONE
    }
}

/// A square region of the quadtree together with the mass it contains.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Node {
    /// Geometric center of the region
    pub center: Point2<f64>,
    /// Half the side length of the region
    pub half_width: f64,
    /// Total mass of every body routed through this node
    pub mass: f64,
    /// Mass-weighted average position of those bodies
    pub com: Point2<f64>,
    /// Number of bodies routed through this node
    pub count: u32,
    /// Body stored directly in this node; only meaningful while `count == 1`
    pub body: Option<u32>,
    /// Children in NW, NE, SW, SE order, all `NONE` for leaves
    pub children: [NodeId; 4],
    /// Holds several bodies but could not be subdivided
    pub saturated: bool,
}

impl Node {
    fn new(center: Point2<f64>, half_width: f64) -> Self {
        Self {
            center,
            half_width,
            mass: 0.0,
            com: Point2::origin(),
            count: 0,
            body: None,
            children: [NodeId::NONE; 4],
            saturated: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// The body held by a single-body leaf
    pub fn leaf_body(&self) -> Option<usize> {
        match (self.count, self.body) {
            (1, Some(body)) => Some(body as usize),
            _ => None,
        }
    }

    pub fn has_children(&self) -> bool {
        !self.children[0].is_none()
    }

    /// Side length of the region
    pub fn width(&self) -> f64 {
        2.0 * self.half_width
    }
}

/// Append-only node storage with a fixed capacity.
#[derive(Debug, Clone)]
pub struct NodeArena {
    nodes: Vec<Node>,
    capacity: usize,
}

impl NodeArena {
    /// Creates an empty arena that will never hold more than `capacity` nodes.
    ///
    /// Memory is reserved lazily; use [`NodeArena::reserve`] to pre-size it.
    pub fn new(capacity: usize) -> Self {
        Self {
            nodes: Vec::new(),
            capacity,
        }
    }

    /// Reserves room for `additional` more nodes, clamped to the capacity
    pub fn reserve(&mut self, additional: usize) {
        let wanted = (self.nodes.len() + additional).min(self.capacity);
        self.nodes.reserve(wanted.saturating_sub(self.nodes.len()));
    }

    /// Rewinds the allocation cursor; every previously issued id becomes stale.
    pub fn reset(&mut self) {
        self.nodes.clear();
    }

    /// Allocates an empty node, or `None` when the arena is full.
    ///
    /// ```
    /// use bhkernel::arena::NodeArena;
    /// use nalgebra::Point2;
    ///
    /// let mut arena = NodeArena::new(1);
    /// assert!(arena.allocate(Point2::origin(), 1.0).is_some());
    /// assert!(arena.allocate(Point2::origin(), 1.0).is_none());
    /// ```
    pub fn allocate(&mut self, center: Point2<f64>, half_width: f64) -> Option<NodeId> {
        if self.nodes.len() >= self.capacity {
            return None;
        }
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(Node::new(center, half_width));
        Some(id)
    }

    /// Allocates four nodes at once, or none at all when fewer than four slots
    /// remain.
    pub fn allocate_quad(&mut self, regions: [(Point2<f64>, f64); 4]) -> Option<[NodeId; 4]> {
        if self.remaining() < 4 {
            return None;
        }
        let mut ids = [NodeId::NONE; 4];
        for (slot, (center, half_width)) in ids.iter_mut().zip(regions) {
            *slot = self.allocate(center, half_width)?;
        }
        Some(ids)
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn remaining(&self) -> usize {
        self.capacity.saturating_sub(self.nodes.len())
    }

    /// All live nodes with their ids, in allocation order
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (NodeId::new(i), node))
    }
}

impl Index<NodeId> for NodeArena {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }
}
