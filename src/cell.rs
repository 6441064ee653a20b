use conv::ValueFrom;

/// Aggregate of every point in a subtree.
///
/// Besides the count and coordinate sum the cell caches its axis-aligned
/// bounding box, so the pruning test never has to rescan the subtree.
#[derive(Clone, Debug, PartialEq)]
pub struct Cell {
    pub count: usize,
    pub sum: Vec<f64>,
    pub centroid: Vec<f64>,
    pub min: Vec<f64>,
    pub max: Vec<f64>,
}

impl Cell {
    #[must_use]
    pub fn empty(dimensions: usize) -> Cell {
        Cell {
            count: 0,
            sum: vec![0.0; dimensions],
            centroid: vec![0.0; dimensions],
            min: vec![f64::INFINITY; dimensions],
            max: vec![f64::NEG_INFINITY; dimensions],
        }
    }

    #[must_use]
    pub fn point(point: &[f64]) -> Cell {
        Cell {
            count: 1,
            sum: point.to_vec(),
            centroid: point.to_vec(),
            min: point.to_vec(),
            max: point.to_vec(),
        }
    }

    /// Folds `other` into this cell. The centroid is left stale until
    /// [`Cell::update_centroid`] is called.
    pub fn absorb(&mut self, other: &Cell) {
        self.count += other.count;
        for (i, x) in other.sum.iter().enumerate() {
            self.sum[i] += x;
            self.min[i] = self.min[i].min(other.min[i]);
            self.max[i] = self.max[i].max(other.max[i]);
        }
    }

    pub fn update_centroid(&mut self) {
        if self.count == 0 {
            self.centroid.iter_mut().for_each(|x| *x = 0.0);
            return;
        }
        let weight = weight(self.count);
        for (c, s) in self.centroid.iter_mut().zip(&self.sum) {
            *c = s / weight;
        }
    }

    /// Corner of the bounding box lying farthest in the direction `toward - from`.
    #[must_use]
    pub fn extreme_vertex(&self, from: &[f64], toward: &[f64]) -> Vec<f64> {
        from.iter()
            .zip(toward)
            .enumerate()
            .map(|(i, (f, t))| if f - t < 0.0 { self.max[i] } else { self.min[i] })
            .collect()
    }
}

pub fn weight(count: usize) -> f64 {
    f64::value_from(count).unwrap_or(f64::MAX)
}
