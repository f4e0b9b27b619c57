//! Arena-backed Barnes-Hut quadtree.
//!
//! The tree is rebuilt from scratch for every force evaluation. Building
//! rewinds the [`NodeArena`], sizes a square root region around all bodies and
//! inserts the bodies one at a time in input order. Each insertion walks down
//! from the root, folding the body into the mass and center of mass of every
//! node it passes, until it reaches an empty node and settles there as a leaf.
//!
//! # Degraded builds
//!
//! A node that must be split but cannot be (the arena is full, or the node
//! already sits at [`MAX_DEPTH`]) becomes *saturated*: it keeps no children
//! and absorbs every further body into its aggregate mass only. Mass is still
//! conserved up the tree, the build never fails, and the traversal treats the
//! node as a single point mass. [`TreeStats`] records that this happened.
//!
//! # Example
//!
//! ```rust
//! use bhkernel::bodies::PointMasses;
//! use bhkernel::quadtree::QuadTree;
//! use nalgebra::Point2;
//!
//! let x = [0.0, 1.0, 5.0];
//! let y = [0.0, 0.0, 2.0];
//! let mass = [1.0, 1.0, 2.0];
//! let points = PointMasses::new(&x, &y, &mass).unwrap();
//!
//! let mut tree = QuadTree::new(1_000);
//! let root = tree.build(&points);
//!
//! assert_eq!(tree.node(root).unwrap().count, 3);
//! let accel = tree.acceleration(Point2::new(10.0, 0.0), 0.7, 1e-4);
//! assert!(accel.x < 0.0);
//! ```

use nalgebra::{Point2, Vector2};

use crate::arena::{Node, NodeArena, NodeId};
use crate::bodies::PointMasses;
use crate::forces::softened_accel;

/// Deepest level a node may be subdivided at
///
/// The root spans at least 0.2 units, so leaves at this depth are well below
/// any separation the softening term can resolve.
pub const MAX_DEPTH: usize = 48;

/// Root half-width as a fraction of the larger bounding-box side
const ROOT_SCALE: f64 = 0.55;

/// Added to the root half-width so no body sits on the outer boundary
const ROOT_PADDING: f64 = 0.1;

/// Axis-aligned box enclosing a set of bodies.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    /// Minimum corner (south-west)
    pub min: Point2<f64>,
    /// Maximum corner (north-east)
    pub max: Point2<f64>,
}

impl BoundingBox {
    /// Smallest box containing every body, or `None` for an empty set.
    pub fn from_points(points: &PointMasses) -> Option<Self> {
        if points.is_empty() {
            return None;
        }
        let bounds = (0..points.len()).fold(
            Self {
                min: Point2::new(f64::INFINITY, f64::INFINITY),
                max: Point2::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
            },
            |bounds, i| {
                let pos = points.position(i);
                Self {
                    min: Point2::new(bounds.min.x.min(pos.x), bounds.min.y.min(pos.y)),
                    max: Point2::new(bounds.max.x.max(pos.x), bounds.max.y.max(pos.y)),
                }
            },
        );
        Some(bounds)
    }

    pub fn center(&self) -> Point2<f64> {
        Point2::new(
            (self.min.x + self.max.x) * 0.5,
            (self.min.y + self.max.y) * 0.5,
        )
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Center and half-width of the square root region for this box
    pub fn root_region(&self) -> (Point2<f64>, f64) {
        let half_width = self.width().max(self.height()) * ROOT_SCALE + ROOT_PADDING;
        (self.center(), half_width)
    }
}

/// Child slot of a node.
///
/// ```text
/// +----+----+
/// | NW | NE |
/// +----+----+
/// | SW | SE |
/// +----+----+
/// ```
///
/// Points on the center lines go north (`y >= cy`) and east (`x >= cx`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Quadrant {
    NorthWest = 0,
    NorthEast = 1,
    SouthWest = 2,
    SouthEast = 3,
}

impl Quadrant {
    pub const ALL: [Quadrant; 4] = [
        Quadrant::NorthWest,
        Quadrant::NorthEast,
        Quadrant::SouthWest,
        Quadrant::SouthEast,
    ];

    /// Quadrant of `center` that `point` falls in
    pub fn of(center: Point2<f64>, point: Point2<f64>) -> Self {
        match (point.x >= center.x, point.y >= center.y) {
            (false, true) => Quadrant::NorthWest,
            (true, true) => Quadrant::NorthEast,
            (false, false) => Quadrant::SouthWest,
            (true, false) => Quadrant::SouthEast,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// Center of this quadrant for a parent at `center` with children of
    /// half-width `child_half`
    fn child_center(self, center: Point2<f64>, child_half: f64) -> Point2<f64> {
        let (sx, sy) = match self {
            Quadrant::NorthWest => (-1.0, 1.0),
            Quadrant::NorthEast => (1.0, 1.0),
            Quadrant::SouthWest => (-1.0, -1.0),
            Quadrant::SouthEast => (1.0, -1.0),
        };
        Point2::new(center.x + sx * child_half, center.y + sy * child_half)
    }
}

/// Diagnostics from the most recent build
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TreeStats {
    /// Nodes allocated
    pub nodes: usize,
    /// Deepest level any body settled at (root is 0)
    pub max_depth: usize,
    /// Nodes holding several bodies without children
    pub saturated: usize,
    /// The arena ran out of capacity
    pub exhausted: bool,
    /// A node reached [`MAX_DEPTH`] and could not be split
    pub depth_capped: bool,
}

impl TreeStats {
    /// Whether any part of the tree is coarser than a full build
    pub fn is_degraded(&self) -> bool {
        self.saturated > 0 || self.exhausted
    }
}

/// Barnes-Hut quadtree that owns (and reuses) its node arena.
#[derive(Debug, Clone)]
pub struct QuadTree {
    arena: NodeArena,
    root: NodeId,
    stats: TreeStats,
}

impl QuadTree {
    /// Creates a tree whose arena holds at most `max_nodes` nodes
    pub fn new(max_nodes: usize) -> Self {
        Self {
            arena: NodeArena::new(max_nodes),
            root: NodeId::NONE,
            stats: TreeStats::default(),
        }
    }

    /// Rebuilds the tree over `points` and returns the root id.
    ///
    /// Ids from any previous build are invalid afterwards. An empty body set
    /// still yields an (empty) root node; only a zero-capacity arena returns
    /// [`NodeId::NONE`].
    pub fn build(&mut self, points: &PointMasses) -> NodeId {
        self.arena.reset();
        self.stats = TreeStats::default();
        self.arena.reserve(points.len() * 2 + 1);

        let (center, half_width) = match BoundingBox::from_points(points) {
            Some(bounds) => bounds.root_region(),
            None => (Point2::origin(), ROOT_PADDING),
        };

        self.root = match self.arena.allocate(center, half_width) {
            Some(root) => root,
            None => {
                self.stats.exhausted = true;
                log::warn!("quadtree arena has no capacity, {} bodies dropped", points.len());
                return NodeId::NONE;
            }
        };

        for body in 0..points.len() {
            self.insert(body, points);
        }

        self.stats.nodes = self.arena.len();
        log::debug!(
            "built quadtree over {} bodies: {} nodes, depth {}",
            points.len(),
            self.stats.nodes,
            self.stats.max_depth
        );
        if self.stats.is_degraded() {
            log::warn!(
                "quadtree degraded: {} saturated nodes (arena exhausted: {}, depth capped: {})",
                self.stats.saturated,
                self.stats.exhausted,
                self.stats.depth_capped
            );
        }

        self.root
    }

    /// Routes one body from the root down to the empty node it settles in.
    fn insert(&mut self, body: usize, points: &PointMasses) {
        let pos = points.position(body);
        let mass = points.mass(body);
        let mut id = self.root;
        let mut depth = 0;

        loop {
            if self.arena[id].is_empty() {
                let node = self.arena.node_mut(id);
                node.body = Some(body as u32);
                node.mass = mass;
                node.com = pos;
                node.count = 1;
                self.stats.max_depth = self.stats.max_depth.max(depth);
                return;
            }

            if !self.arena[id].has_children() && !self.arena[id].saturated {
                self.subdivide(id, depth, points);
            }

            let node = self.arena.node_mut(id);
            accumulate(node, pos, mass);
            if node.saturated {
                return;
            }

            id = node.children[Quadrant::of(node.center, pos).index()];
            depth += 1;
        }
    }

    /// Splits a leaf into four quadrants and moves its body into the matching
    /// child. Marks the node saturated when that is not possible.
    fn subdivide(&mut self, id: NodeId, depth: usize, points: &PointMasses) {
        if depth >= MAX_DEPTH {
            self.saturate(id);
            self.stats.depth_capped = true;
            return;
        }

        let Node {
            center, half_width, ..
        } = self.arena[id];
        let child_half = half_width * 0.5;
        let regions = Quadrant::ALL.map(|q| (q.child_center(center, child_half), child_half));

        let Some(children) = self.arena.allocate_quad(regions) else {
            self.saturate(id);
            self.stats.exhausted = true;
            return;
        };

        let node = self.arena.node_mut(id);
        node.children = children;
        if let Some(old) = node.body.take() {
            let old = old as usize;
            let old_pos = points.position(old);
            let child = self
                .arena
                .node_mut(children[Quadrant::of(center, old_pos).index()]);
            child.body = Some(old as u32);
            child.mass = points.mass(old);
            child.com = old_pos;
            child.count = 1;
            self.stats.max_depth = self.stats.max_depth.max(depth + 1);
        }
    }

    fn saturate(&mut self, id: NodeId) {
        let node = self.arena.node_mut(id);
        node.saturated = true;
        node.body = None;
        self.stats.saturated += 1;
    }

    /// Gravitational acceleration at `point` from the current tree.
    ///
    /// Allocates a traversal stack; see [`QuadTree::acceleration_with`] to
    /// reuse one across calls.
    pub fn acceleration(&self, point: Point2<f64>, theta: f64, softening: f64) -> Vector2<f64> {
        let mut stack = Vec::new();
        self.acceleration_with(point, theta, softening, &mut stack)
    }

    /// Gravitational acceleration at `point` using an explicit traversal stack.
    ///
    /// A node of width `s` whose center of mass is `r` away is used as a point
    /// mass when `s² < θ²·r²`; otherwise its children are visited. Single-body
    /// leaves closer than the softening scale are taken to be the body at
    /// `point` itself and skipped.
    pub fn acceleration_with(
        &self,
        point: Point2<f64>,
        theta: f64,
        softening: f64,
        stack: &mut Vec<NodeId>,
    ) -> Vector2<f64> {
        let mut accel = Vector2::zeros();
        if self.root.is_none() {
            return accel;
        }

        let theta_sq = theta * theta;
        stack.clear();
        stack.push(self.root);

        while let Some(id) = stack.pop() {
            let node = &self.arena[id];
            if node.is_empty() {
                continue;
            }

            let delta = node.com - point;
            let r_sq = delta.magnitude_squared();

            if node.count == 1 {
                if r_sq < softening {
                    continue;
                }
                accel += softened_accel(delta, node.mass, softening);
                continue;
            }

            let width = node.width();
            if node.saturated || width * width < theta_sq * r_sq {
                accel += softened_accel(delta, node.mass, softening);
                continue;
            }

            stack.extend(node.children.iter().filter(|child| !child.is_none()));
        }

        accel
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.arena.get(id)
    }

    pub fn arena(&self) -> &NodeArena {
        &self.arena
    }

    pub fn stats(&self) -> TreeStats {
        self.stats
    }

    pub fn node_count(&self) -> usize {
        self.arena.len()
    }
}

/// Folds one body into a node's running mass and center of mass.
fn accumulate(node: &mut Node, pos: Point2<f64>, mass: f64) {
    let total = node.mass + mass;
    if total > 0.0 {
        node.com = Point2::from((node.com.coords * node.mass + pos.coords * mass) / total);
    }
    node.mass = total;
    node.count += 1;
}
