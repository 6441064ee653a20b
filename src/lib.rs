//! A balanced k-d tree whose nodes carry subtree aggregates, and the
//! filtering pass of k-means clustering built on top of it.
//!
//! ```
//! use kdfilter::{Candidate, KdTree};
//!
//! let points = vec![vec![0.0, 0.0], vec![0.0, 1.0], vec![9.0, 9.0], vec![9.0, 8.0]];
//! let tree = KdTree::build(&points, None).unwrap();
//!
//! let mut candidates = vec![Candidate::new(vec![0.0, 0.0]), Candidate::new(vec![10.0, 10.0])];
//! tree.filter(&mut candidates).unwrap();
//!
//! assert_eq!(candidates[0].assigned_count(), 2);
//! assert_eq!(candidates[1].mean(), Some(vec![9.0, 8.5]));
//! ```
mod cell;
mod distance;
mod error;
mod filter;
mod kdtree;
mod node;

pub use distance::{euclidean, squared_euclidean};
pub use error::{KdError, Result};
pub use filter::{filter, Candidate, FilterStats};
pub use kdtree::{DepthFirst, KdTree, LevelOrder};
pub use node::{KdNode, NodeView, Points, Side};
