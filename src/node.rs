use std::fmt;

use crate::cell::Cell;

/// Which child of its parent a node is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// A node of a [`KdTree`](crate::KdTree).
///
/// Every node owns its children and carries the aggregate of its whole
/// subtree. Nodes are never modified once construction returns.
#[derive(Clone, Debug)]
pub struct KdNode {
    data: Option<Vec<f64>>,
    left: Option<Box<KdNode>>,
    right: Option<Box<KdNode>>,
    axis: usize,
    dimensions: usize,
    cell: Cell,
}

impl KdNode {
    #[must_use]
    pub(crate) fn empty(axis: usize, dimensions: usize) -> KdNode {
        KdNode {
            data: None,
            left: None,
            right: None,
            axis,
            dimensions,
            cell: Cell::empty(dimensions),
        }
    }

    #[must_use]
    pub(crate) fn new(
        data: Vec<f64>,
        left: Option<Box<KdNode>>,
        right: Option<Box<KdNode>>,
        axis: usize,
    ) -> KdNode {
        let dimensions = data.len();
        let mut cell = Cell::point(&data);
        for child in left.iter().chain(right.iter()) {
            cell.absorb(&child.cell);
        }
        cell.update_centroid();
        KdNode {
            data: Some(data),
            left,
            right,
            axis,
            dimensions,
            cell,
        }
    }

    /// The pivot point stored at this node, `None` for an empty node.
    #[must_use]
    pub fn data(&self) -> Option<&[f64]> {
        self.data.as_deref()
    }

    #[must_use]
    pub fn left(&self) -> Option<&KdNode> {
        self.left.as_deref()
    }

    #[must_use]
    pub fn right(&self) -> Option<&KdNode> {
        self.right.as_deref()
    }

    /// The splitting axis of this node.
    #[must_use]
    pub fn axis(&self) -> usize {
        self.axis
    }

    #[must_use]
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Number of points in the subtree rooted here, including this node.
    #[must_use]
    pub fn point_count(&self) -> usize {
        self.cell.count
    }

    #[must_use]
    pub fn coordinate_sum(&self) -> &[f64] {
        &self.cell.sum
    }

    #[must_use]
    pub fn centroid(&self) -> &[f64] {
        &self.cell.centroid
    }

    /// Per-axis minimum over the subtree. All `+inf` for an empty node.
    #[must_use]
    pub fn min(&self) -> &[f64] {
        &self.cell.min
    }

    /// Per-axis maximum over the subtree. All `-inf` for an empty node.
    #[must_use]
    pub fn max(&self) -> &[f64] {
        &self.cell.max
    }

    pub(crate) fn cell(&self) -> &Cell {
        &self.cell
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_none()
    }

    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.cell.count == 1
    }

    /// Non-empty children of this node, left first.
    pub fn children(&self) -> impl Iterator<Item = (&KdNode, Side)> {
        self.left()
            .map(|node| (node, Side::Left))
            .into_iter()
            .chain(self.right().map(|node| (node, Side::Right)))
            .filter(|(node, _)| !node.is_empty())
    }

    /// Height of the subtree: 0 for an empty node, 1 for a single point.
    #[must_use]
    pub fn height(&self) -> usize {
        if self.is_empty() {
            return 0;
        }
        self.children()
            .fold(0, |max, (child, _)| max.max(child.height()))
            + 1
    }

    /// Every point of the subtree, in pre-order.
    #[must_use]
    pub fn points(&self) -> Points<'_> {
        Points { stack: vec![self] }
    }
}

pub struct Points<'a> {
    stack: Vec<&'a KdNode>,
}

impl<'a> Iterator for Points<'a> {
    type Item = &'a [f64];

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.stack.pop() {
            self.stack.extend(node.right());
            self.stack.extend(node.left());
            if let Some(data) = node.data() {
                return Some(data);
            }
        }
        None
    }
}

/// Read-only summary of a node, enough to render the tree.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeView<'a> {
    pub data: &'a [f64],
    pub axis: usize,
    pub depth: usize,
    pub has_left: bool,
    pub has_right: bool,
}

impl<'a> NodeView<'a> {
    pub(crate) fn of(node: &'a KdNode, depth: usize) -> Option<NodeView<'a>> {
        let data = node.data()?;
        Some(NodeView {
            data,
            axis: node.axis(),
            depth,
            has_left: node.left().map_or(false, |n| !n.is_empty()),
            has_right: node.right().map_or(false, |n| !n.is_empty()),
        })
    }
}

impl fmt::Display for NodeView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let coords = self
            .data
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");
        write!(
            f,
            "{},{},{},{},{}",
            self.depth,
            self.axis,
            u8::from(self.has_left),
            u8::from(self.has_right),
            coords
        )
    }
}
