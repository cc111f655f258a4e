//! 2D k-d tree for spatial indexing
//!
//! Provides O(log n) nearest-neighbor and k-nearest-neighbor queries
//! for scattered point data, replacing the O(n·m) brute-force scan in the
//! interpolators.
//!
//! Equidistant candidates are ordered by their index in the input slice, so
//! every query has a single well-defined answer: among points at the same
//! distance, the one that came first in the input wins.
//!
//! Reference:
//! Bentley, J.L. (1975). Multidimensional binary search trees used
//! for associative searching. CACM, 18(9).

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use pointgrid_core::SamplePoint;

/// A 2D k-d tree for efficient spatial queries on sample points.
#[derive(Debug)]
pub struct KdTree {
    nodes: Vec<KdNode>,
    /// Points in input order; `KdNode::point_idx` indexes into this
    points: Vec<SamplePoint>,
}

#[derive(Debug)]
struct KdNode {
    point_idx: usize,
    /// Split dimension: 0 = x, 1 = y
    split_dim: u8,
    left: Option<usize>,
    right: Option<usize>,
}

/// Result of a nearest-neighbor query
#[derive(Debug, Clone, Copy)]
pub struct NearestResult {
    pub point: SamplePoint,
    pub distance_sq: f64,
    /// Position of the point in the slice the tree was built from
    pub index: usize,
}

/// Heap entry ordered by (distance, input index)
#[derive(Debug, Clone, Copy, PartialEq)]
struct Candidate {
    distance_sq: f64,
    index: usize,
}

impl Eq for Candidate {}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.distance_sq
            .total_cmp(&other.distance_sq)
            .then(self.index.cmp(&other.index))
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl KdTree {
    /// Build a k-d tree from sample points.
    ///
    /// Construction is O(n log² n) using median-of-coordinate splitting.
    pub fn build(points: &[SamplePoint]) -> Self {
        if points.is_empty() {
            return Self {
                nodes: Vec::new(),
                points: Vec::new(),
            };
        }

        let mut indices: Vec<usize> = (0..points.len()).collect();
        let mut nodes = Vec::with_capacity(points.len());

        build_recursive(points, &mut indices, 0, &mut nodes);

        Self {
            nodes,
            points: points.to_vec(),
        }
    }

    /// Number of points in the tree.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the tree is empty.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Find the single nearest point to (qx, qy).
    ///
    /// Returns `None` if the tree is empty.
    pub fn nearest(&self, qx: f64, qy: f64) -> Option<NearestResult> {
        if self.nodes.is_empty() {
            return None;
        }

        let mut best = Candidate {
            distance_sq: f64::INFINITY,
            index: usize::MAX,
        };
        self.nearest_recursive(0, qx, qy, &mut best);

        Some(self.result(best))
    }

    /// Find the k nearest points to (qx, qy).
    ///
    /// Returns up to k results sorted by ascending distance, then input order.
    pub fn k_nearest(&self, qx: f64, qy: f64, k: usize) -> Vec<NearestResult> {
        if self.nodes.is_empty() || k == 0 {
            return Vec::new();
        }

        // Max-heap: the farthest of the current k sits on top
        let mut heap: BinaryHeap<Candidate> = BinaryHeap::with_capacity(k + 1);
        self.knn_recursive(0, qx, qy, k, &mut heap);

        heap.into_sorted_vec()
            .into_iter()
            .map(|c| self.result(c))
            .collect()
    }

    fn result(&self, c: Candidate) -> NearestResult {
        NearestResult {
            point: self.points[c.index],
            distance_sq: c.distance_sq,
            index: c.index,
        }
    }

    fn nearest_recursive(&self, node_idx: usize, qx: f64, qy: f64, best: &mut Candidate) {
        let node = &self.nodes[node_idx];
        let p = &self.points[node.point_idx];

        let dx = qx - p.x;
        let dy = qy - p.y;
        let here = Candidate {
            distance_sq: dx * dx + dy * dy,
            index: node.point_idx,
        };
        if here < *best {
            *best = here;
        }

        // Determine which side to search first
        let diff = if node.split_dim == 0 { dx } else { dy };
        let (first, second) = if diff < 0.0 {
            (node.left, node.right)
        } else {
            (node.right, node.left)
        };

        if let Some(child) = first {
            self.nearest_recursive(child, qx, qy, best);
        }

        // `<=` keeps equidistant points on the far side reachable for the tie-break
        if diff * diff <= best.distance_sq {
            if let Some(child) = second {
                self.nearest_recursive(child, qx, qy, best);
            }
        }
    }

    fn knn_recursive(
        &self,
        node_idx: usize,
        qx: f64,
        qy: f64,
        k: usize,
        heap: &mut BinaryHeap<Candidate>,
    ) {
        let node = &self.nodes[node_idx];
        let p = &self.points[node.point_idx];

        let dx = qx - p.x;
        let dy = qy - p.y;
        let here = Candidate {
            distance_sq: dx * dx + dy * dy,
            index: node.point_idx,
        };

        if heap.len() < k {
            heap.push(here);
        } else if heap.peek().is_some_and(|worst| here < *worst) {
            heap.pop();
            heap.push(here);
        }

        let diff = if node.split_dim == 0 { dx } else { dy };
        let (first, second) = if diff < 0.0 {
            (node.left, node.right)
        } else {
            (node.right, node.left)
        };

        if let Some(child) = first {
            self.knn_recursive(child, qx, qy, k, heap);
        }

        let threshold = match heap.peek() {
            Some(worst) if heap.len() >= k => worst.distance_sq,
            _ => f64::INFINITY,
        };

        if diff * diff <= threshold {
            if let Some(child) = second {
                self.knn_recursive(child, qx, qy, k, heap);
            }
        }
    }
}

/// Recursively build the k-d tree.
fn build_recursive(
    points: &[SamplePoint],
    indices: &mut [usize],
    depth: usize,
    nodes: &mut Vec<KdNode>,
) -> usize {
    let n = indices.len();
    let split_dim = (depth % 2) as u8;

    let coord = |i: usize| if split_dim == 0 { points[i].x } else { points[i].y };
    indices.sort_by(|&a, &b| coord(a).total_cmp(&coord(b)));

    let median = n / 2;
    let node_idx = nodes.len();
    nodes.push(KdNode {
        point_idx: indices[median],
        split_dim,
        left: None,
        right: None,
    });

    let (left, rest) = indices.split_at_mut(median);
    let right = &mut rest[1..];

    if !left.is_empty() {
        let left_idx = build_recursive(points, left, depth + 1, nodes);
        nodes[node_idx].left = Some(left_idx);
    }

    if !right.is_empty() {
        let right_idx = build_recursive(points, right, depth + 1, nodes);
        nodes[node_idx].right = Some(right_idx);
    }

    node_idx
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_points() -> Vec<SamplePoint> {
        vec![
            SamplePoint::new(2.0, 3.0, 10.0),
            SamplePoint::new(5.0, 4.0, 20.0),
            SamplePoint::new(9.0, 6.0, 30.0),
            SamplePoint::new(4.0, 7.0, 40.0),
            SamplePoint::new(8.0, 1.0, 50.0),
            SamplePoint::new(7.0, 2.0, 60.0),
            SamplePoint::new(1.0, 8.0, 70.0),
            SamplePoint::new(6.0, 5.0, 80.0),
        ]
    }

    /// Brute-force nearest with first-in-input-order tie-break
    fn brute_nearest(pts: &[SamplePoint], qx: f64, qy: f64) -> usize {
        let mut best = 0;
        for (i, p) in pts.iter().enumerate() {
            if p.dist_sq(qx, qy) < pts[best].dist_sq(qx, qy) {
                best = i;
            }
        }
        best
    }

    #[test]
    fn test_empty_tree() {
        let tree = KdTree::build(&[]);
        assert!(tree.is_empty());
        assert!(tree.nearest(0.0, 0.0).is_none());
        assert!(tree.k_nearest(0.0, 0.0, 3).is_empty());
    }

    #[test]
    fn test_nearest_exact() {
        let tree = KdTree::build(&sample_points());
        assert_eq!(tree.len(), 8);

        let result = tree.nearest(5.0, 4.0).unwrap();
        assert_eq!(result.distance_sq, 0.0);
        assert_eq!(result.index, 1);
        assert_eq!(result.point.value, 20.0);
    }

    #[test]
    fn test_nearest_matches_brute_force() {
        let pts = sample_points();
        let tree = KdTree::build(&pts);

        // Integer and half-integer queries hit plenty of exact ties
        for qx in 0..20 {
            for qy in 0..20 {
                let qx = qx as f64 * 0.5;
                let qy = qy as f64 * 0.5;
                let result = tree.nearest(qx, qy).unwrap();
                assert_eq!(result.index, brute_nearest(&pts, qx, qy), "at ({}, {})", qx, qy);
            }
        }
    }

    #[test]
    fn test_tie_prefers_first_input_point() {
        // Four corners, queried at the center: all equidistant
        let pts = vec![
            SamplePoint::new(10.0, 10.0, 40.0),
            SamplePoint::new(0.0, 0.0, 10.0),
            SamplePoint::new(10.0, 0.0, 20.0),
            SamplePoint::new(0.0, 10.0, 30.0),
        ];
        let tree = KdTree::build(&pts);
        assert_eq!(tree.nearest(5.0, 5.0).unwrap().index, 0);

        // Duplicated coordinates
        let dup = vec![
            SamplePoint::new(1.0, 1.0, 5.0),
            SamplePoint::new(3.0, 3.0, 6.0),
            SamplePoint::new(3.0, 3.0, 7.0),
        ];
        let tree = KdTree::build(&dup);
        assert_eq!(tree.nearest(3.0, 3.0).unwrap().point.value, 6.0);
    }

    #[test]
    fn test_k_nearest() {
        let pts = sample_points();
        let tree = KdTree::build(&pts);

        let results = tree.k_nearest(5.0, 5.0, 3);
        assert_eq!(results.len(), 3);

        let mut dists: Vec<(f64, usize)> = pts
            .iter()
            .enumerate()
            .map(|(i, p)| (p.dist_sq(5.0, 5.0), i))
            .collect();
        dists.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

        for (r, (d, i)) in results.iter().zip(dists) {
            assert_eq!(r.index, i);
            assert_eq!(r.distance_sq, d);
        }
    }

    #[test]
    fn test_k_nearest_more_than_points() {
        let pts = sample_points();
        let tree = KdTree::build(&pts);
        assert_eq!(tree.k_nearest(5.0, 5.0, 100).len(), pts.len());
        assert!(tree.k_nearest(5.0, 5.0, 0).is_empty());
    }

    #[test]
    fn test_collinear_points() {
        let pts: Vec<SamplePoint> = (0..10)
            .map(|i| SamplePoint::new(i as f64, 0.0, i as f64))
            .collect();
        let tree = KdTree::build(&pts);

        // 4.5 is equidistant from 4 and 5
        let result = tree.nearest(4.5, 0.0).unwrap();
        assert_eq!(result.index, 4);

        let knn = tree.k_nearest(4.5, 0.0, 3);
        let idx: Vec<usize> = knn.iter().map(|r| r.index).collect();
        assert_eq!(idx, vec![4, 5, 3]);
    }

    #[test]
    fn test_large_dataset() {
        let pts: Vec<SamplePoint> = (0..1000)
            .map(|i| {
                let x = ((i * 7 + 13) % 100) as f64;
                let y = ((i * 11 + 37) % 100) as f64;
                SamplePoint::new(x, y, i as f64)
            })
            .collect();
        let tree = KdTree::build(&pts);
        assert_eq!(tree.len(), 1000);

        for (qx, qy) in [(50.0, 50.0), (0.0, 0.0), (99.5, 12.25), (33.0, 71.0)] {
            let result = tree.nearest(qx, qy).unwrap();
            assert_eq!(result.index, brute_nearest(&pts, qx, qy));
        }
    }
}
