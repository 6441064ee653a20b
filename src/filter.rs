use tracing::{debug, trace, warn};

use crate::{
    cell::{weight, Cell},
    distance::{nearest, squared_euclidean},
    error::{KdError, Result},
    node::KdNode,
};

/// A candidate cluster center and the points assigned to it during a pass.
#[derive(Clone, Debug, PartialEq)]
pub struct Candidate {
    position: Vec<f64>,
    assigned_sum: Vec<f64>,
    assigned_count: usize,
}

impl Candidate {
    #[must_use]
    pub fn new(position: Vec<f64>) -> Candidate {
        let dimensions = position.len();
        Candidate {
            position,
            assigned_sum: vec![0.0; dimensions],
            assigned_count: 0,
        }
    }

    #[must_use]
    pub fn position(&self) -> &[f64] {
        &self.position
    }

    #[must_use]
    pub fn assigned_sum(&self) -> &[f64] {
        &self.assigned_sum
    }

    #[must_use]
    pub fn assigned_count(&self) -> usize {
        self.assigned_count
    }

    /// Mean of the assigned points, `None` if nothing was assigned.
    #[must_use]
    pub fn mean(&self) -> Option<Vec<f64>> {
        if self.assigned_count == 0 {
            return None;
        }
        let weight = weight(self.assigned_count);
        Some(self.assigned_sum.iter().map(|x| x / weight).collect())
    }

    /// Clears the accumulators, keeping the position.
    pub fn reset(&mut self) {
        self.assigned_sum.iter_mut().for_each(|x| *x = 0.0);
        self.assigned_count = 0;
    }

    /// Moves the candidate to a new position and clears the accumulators.
    pub fn relocate(&mut self, position: Vec<f64>) {
        self.assigned_sum = vec![0.0; position.len()];
        self.assigned_count = 0;
        self.position = position;
    }

    fn assign_point(&mut self, point: &[f64]) {
        for (s, x) in self.assigned_sum.iter_mut().zip(point) {
            *s += x;
        }
        self.assigned_count += 1;
    }

    fn assign_cell(&mut self, cell: &Cell) {
        for (s, x) in self.assigned_sum.iter_mut().zip(&cell.sum) {
            *s += x;
        }
        self.assigned_count += cell.count;
    }
}

/// Counters collected during one filtering pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FilterStats {
    pub nodes_visited: usize,
    /// Subtrees handed to a single candidate without visiting their points.
    pub subtrees_attributed: usize,
    pub candidates_pruned: usize,
    /// Points assigned one by one.
    pub points_assigned: usize,
}

/// Assigns every point under `node` to its nearest candidate.
///
/// Each candidate's `assigned_sum` and `assigned_count` are increased by the
/// points it wins. Candidates that provably cannot be the nearest center of
/// any point in a subtree are pruned for that subtree, and a subtree left
/// with a single candidate is attributed to it in one step.
///
/// Ties go to the lowest index still alive for the subtree. A candidate that
/// can at best tie the cell's closest candidate is pruned.
///
/// # Errors
///
/// [`KdError::EmptyCandidateSet`] if `candidates` is empty, and
/// [`KdError::Dimensionality`] if a candidate's position length differs from
/// the tree's dimensionality. Both are reported before any accumulator is
/// touched.
pub fn filter(node: &KdNode, candidates: &mut [Candidate]) -> Result<FilterStats> {
    if candidates.is_empty() {
        warn!("filtering pass started without candidates");
        return Err(KdError::EmptyCandidateSet);
    }
    for (index, candidate) in candidates.iter().enumerate() {
        if candidate.position.len() != node.dimensions() {
            return Err(KdError::Dimensionality {
                index,
                expected: node.dimensions(),
                found: candidate.position.len(),
            });
        }
    }

    let mut stats = FilterStats::default();
    let alive = (0..candidates.len()).collect::<Vec<_>>();
    filter_recursive(node, candidates, alive, &mut stats)?;

    debug!(
        nodes_visited = stats.nodes_visited,
        subtrees_attributed = stats.subtrees_attributed,
        candidates_pruned = stats.candidates_pruned,
        points_assigned = stats.points_assigned,
        "filtering pass finished"
    );
    Ok(stats)
}

// `alive` is owned by this call; each child gets its own copy.
fn filter_recursive(
    node: &KdNode,
    candidates: &mut [Candidate],
    alive: Vec<usize>,
    stats: &mut FilterStats,
) -> Result<()> {
    stats.nodes_visited += 1;
    let data = match node.data() {
        Some(data) => data,
        None => return Ok(()),
    };

    if node.is_leaf() {
        let closest = nearest_alive(candidates, &alive, data)?;
        candidates[closest].assign_point(data);
        stats.points_assigned += 1;
        return Ok(());
    }

    let cell = node.cell();
    let closest = nearest_alive(candidates, &alive, &cell.centroid)?;
    let before = alive.len();
    let alive = alive
        .into_iter()
        .filter(|&z| {
            z == closest || !dominates(cell, &candidates[closest].position, &candidates[z].position)
        })
        .collect::<Vec<_>>();
    stats.candidates_pruned += before - alive.len();

    match alive.as_slice() {
        [] => {
            warn!(points = cell.count, "pruning eliminated every candidate");
            return Err(KdError::EmptyCandidateSet);
        }
        [only] => {
            trace!(candidate = *only, points = cell.count, "attributed whole subtree");
            candidates[*only].assign_cell(cell);
            stats.subtrees_attributed += 1;
            return Ok(());
        }
        _ => {}
    }

    // The pivot lives in this node, not in either child.
    let owner = nearest_alive(candidates, &alive, data)?;
    candidates[owner].assign_point(data);
    stats.points_assigned += 1;

    for (child, _) in node.children() {
        filter_recursive(child, candidates, alive.clone(), stats)?;
    }
    Ok(())
}

fn nearest_alive(candidates: &[Candidate], alive: &[usize], point: &[f64]) -> Result<usize> {
    nearest(
        point,
        alive
            .iter()
            .map(|&idx| (idx, candidates[idx].position.as_slice())),
    )
    .ok_or(KdError::EmptyCandidateSet)
}

/// True if no point of `cell` is strictly closer to `z` than to `closest`.
///
/// The difference of squared distances is linear in the point, so it is
/// enough to test the box corner lying farthest toward `z`.
fn dominates(cell: &Cell, closest: &[f64], z: &[f64]) -> bool {
    let vertex = cell.extreme_vertex(closest, z);
    squared_euclidean(&vertex, z) >= squared_euclidean(&vertex, closest)
}
