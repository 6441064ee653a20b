use approx::assert_relative_eq;
use kdfilter::{KdNode, KdTree};
use rand::{rngs::StdRng, Rng, SeedableRng};

fn random_points(rng: &mut StdRng, n: usize, dimensions: usize) -> Vec<Vec<f64>> {
    (0..n)
        .map(|_| (0..dimensions).map(|_| rng.gen_range(-100.0..100.0)).collect())
        .collect()
}

// Small integer coordinates, so many points share a value along some axis.
fn clumped_points(rng: &mut StdRng, n: usize, dimensions: usize) -> Vec<Vec<f64>> {
    (0..n)
        .map(|_| {
            (0..dimensions)
                .map(|_| f64::from(rng.gen_range(0..4_i32)))
                .collect()
        })
        .collect()
}

fn verify_node(node: &KdNode) -> usize {
    let data = match node.data() {
        Some(data) => data,
        None => {
            assert_eq!(node.point_count(), 0);
            return 0;
        }
    };
    let axis = node.axis();
    assert!(axis < node.dimensions());

    // Median split along the node's axis
    if let Some(left) = node.left() {
        assert_eq!(left.axis(), (axis + 1) % node.dimensions());
        for point in left.points() {
            assert!(point[axis] <= data[axis]);
        }
    }
    if let Some(right) = node.right() {
        assert_eq!(right.axis(), (axis + 1) % node.dimensions());
        for point in right.points() {
            assert!(point[axis] >= data[axis]);
        }
    }

    // Subtree counts add up
    let left = node.left().map_or(0, verify_node);
    let right = node.right().map_or(0, verify_node);
    assert_eq!(node.point_count(), 1 + left + right);

    // Sum, centroid and bounds match a scan of the subtree
    let mut sum = vec![0.0; node.dimensions()];
    let mut min = vec![f64::INFINITY; node.dimensions()];
    let mut max = vec![f64::NEG_INFINITY; node.dimensions()];
    for point in node.points() {
        for (i, x) in point.iter().enumerate() {
            sum[i] += x;
            min[i] = min[i].min(*x);
            max[i] = max[i].max(*x);
        }
    }
    for i in 0..node.dimensions() {
        assert_relative_eq!(node.coordinate_sum()[i], sum[i], epsilon = 1e-9);
        assert_relative_eq!(
            node.centroid()[i],
            node.coordinate_sum()[i] / node.point_count() as f64,
            epsilon = 1e-9
        );
    }
    assert_eq!(node.min(), min.as_slice());
    assert_eq!(node.max(), max.as_slice());

    node.point_count()
}

#[test]
fn test_random_invariants() {
    let mut rng = StdRng::seed_from_u64(0);
    for dimensions in 1..=5 {
        for &n in &[1, 2, 3, 10, 100, 1000] {
            let points = random_points(&mut rng, n, dimensions);
            let tree = KdTree::build(&points, Some(dimensions)).unwrap();
            assert_eq!(tree.len(), n);
            assert_eq!(tree.dimensions(), dimensions);
            assert_eq!(verify_node(tree.root()), n);
            assert_eq!(tree.depth_first().count(), n);
            assert_eq!(tree.level_order().count(), n);
        }
    }
}

#[test]
fn test_duplicate_coordinates() {
    let mut rng = StdRng::seed_from_u64(1);
    for dimensions in 1..=3 {
        let points = clumped_points(&mut rng, 500, dimensions);
        let tree = KdTree::build(&points, None).unwrap();
        assert_eq!(verify_node(tree.root()), 500);
    }
}

#[test]
fn test_balanced_height() {
    let mut rng = StdRng::seed_from_u64(2);
    let points = random_points(&mut rng, 1023, 2);
    let tree = KdTree::build(&points, None).unwrap();
    // A median split of 2^10 - 1 points gives a perfect tree
    assert_eq!(tree.height(), 10);

    let points = random_points(&mut rng, 1000, 2);
    let tree = KdTree::build(&points, None).unwrap();
    assert_eq!(tree.height(), 10);
}

#[test]
fn test_every_point_is_stored() {
    let mut rng = StdRng::seed_from_u64(3);
    let points = random_points(&mut rng, 200, 3);
    let tree = KdTree::build(&points, None).unwrap();

    let mut expected = points.clone();
    let mut actual = tree
        .root()
        .points()
        .map(<[f64]>::to_vec)
        .collect::<Vec<_>>();
    let by_coords = |a: &Vec<f64>, b: &Vec<f64>| a.partial_cmp(b).unwrap();
    expected.sort_by(by_coords);
    actual.sort_by(by_coords);
    assert_eq!(expected, actual);

    let mut from_views = tree
        .level_order()
        .map(|view| view.data.to_vec())
        .collect::<Vec<_>>();
    from_views.sort_by(by_coords);
    assert_eq!(expected, from_views);
}
