use std::collections::VecDeque;

use ordered_float::OrderedFloat;
use tracing::debug;

use crate::{
    error::{KdError, Result},
    filter::{self, Candidate, FilterStats},
    node::{KdNode, NodeView},
};

/// A balanced k-d tree over points of a fixed dimensionality.
///
/// The tree is built once from a slice of points and is read-only afterwards.
#[derive(Clone, Debug)]
pub struct KdTree {
    root: KdNode,
    dimensions: usize,
}

impl KdTree {
    /// Builds a tree from `points`.
    ///
    /// `dimensions` is optional when `points` is non-empty; when both are
    /// given they must agree. An empty `points` with `dimensions` yields a
    /// tree whose root is an empty node.
    ///
    /// # Errors
    ///
    /// [`KdError::Dimensionality`] if a point has a different length than the
    /// others (or than `dimensions`), [`KdError::Configuration`] if the
    /// dimensionality cannot be determined or is zero.
    pub fn build(points: &[Vec<f64>], dimensions: Option<usize>) -> Result<KdTree> {
        let dimensions = check_dimensionality(points, dimensions)?;

        // Partition a private copy, the caller's points stay untouched.
        let mut points = points.to_vec();
        let root = construct(&mut points, 0, dimensions)
            .map_or_else(|| KdNode::empty(0, dimensions), |node| *node);

        debug!(
            points = root.point_count(),
            dimensions,
            height = root.height(),
            "built kd-tree"
        );
        Ok(KdTree { root, dimensions })
    }

    #[must_use]
    pub fn root(&self) -> &KdNode {
        &self.root
    }

    #[must_use]
    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.root.point_count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.root.height()
    }

    /// Runs one filtering pass from the root. See [`filter::filter`].
    ///
    /// # Errors
    ///
    /// Same as [`filter::filter`].
    pub fn filter(&self, candidates: &mut [Candidate]) -> Result<FilterStats> {
        filter::filter(&self.root, candidates)
    }

    /// Pre-order traversal over the non-empty nodes.
    #[must_use]
    pub fn depth_first(&self) -> DepthFirst<'_> {
        DepthFirst {
            stack: vec![(&self.root, 0)],
        }
    }

    /// Breadth-first traversal over the non-empty nodes.
    #[must_use]
    pub fn level_order(&self) -> LevelOrder<'_> {
        LevelOrder {
            queue: VecDeque::from(vec![(&self.root, 0)]),
        }
    }

    /// One row per node, top level first: `depth,axis,has_left,has_right,coords...`.
    /// Rows carry no line terminator.
    #[must_use]
    pub fn nodes_to_string_rows(&self) -> Vec<String> {
        self.level_order().map(|view| view.to_string()).collect()
    }
}

fn check_dimensionality(points: &[Vec<f64>], dimensions: Option<usize>) -> Result<usize> {
    let dimensions = match (dimensions, points.first()) {
        (Some(dimensions), _) => dimensions,
        (None, Some(first)) => first.len(),
        (None, None) => {
            return Err(KdError::Configuration(
                "either points or dimensions must be provided".into(),
            ))
        }
    };
    if dimensions == 0 {
        return Err(KdError::Configuration(
            "points must have at least one coordinate".into(),
        ));
    }

    for (index, point) in points.iter().enumerate() {
        if point.len() != dimensions {
            return Err(KdError::Dimensionality {
                index,
                expected: dimensions,
                found: point.len(),
            });
        }
    }
    Ok(dimensions)
}

// Median split along `axis`, cycling to the next axis at every level.
fn construct(points: &mut [Vec<f64>], axis: usize, dimensions: usize) -> Option<Box<KdNode>> {
    if points.is_empty() {
        return None;
    }

    let median = points.len() / 2;
    points.select_nth_unstable_by_key(median, |point| OrderedFloat(point[axis]));

    let next_axis = (axis + 1) % dimensions;
    let (left, rest) = points.split_at_mut(median);
    let (pivot, right) = rest.split_first_mut()?;
    let data = std::mem::take(pivot);

    let left = construct(left, next_axis, dimensions);
    let right = construct(right, next_axis, dimensions);
    Some(Box::new(KdNode::new(data, left, right, axis)))
}

pub struct DepthFirst<'a> {
    stack: Vec<(&'a KdNode, usize)>,
}

impl<'a> Iterator for DepthFirst<'a> {
    type Item = NodeView<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((node, depth)) = self.stack.pop() {
            self.stack.extend(node.right().map(|child| (child, depth + 1)));
            self.stack.extend(node.left().map(|child| (child, depth + 1)));
            if let Some(view) = NodeView::of(node, depth) {
                return Some(view);
            }
        }
        None
    }
}

pub struct LevelOrder<'a> {
    queue: VecDeque<(&'a KdNode, usize)>,
}

impl<'a> Iterator for LevelOrder<'a> {
    type Item = NodeView<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((node, depth)) = self.queue.pop_front() {
            self.queue.extend(node.left().map(|child| (child, depth + 1)));
            self.queue.extend(node.right().map(|child| (child, depth + 1)));
            if let Some(view) = NodeView::of(node, depth) {
                return Some(view);
            }
        }
        None
    }
}
