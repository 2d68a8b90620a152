use std::ops::Range;

use crate::aabb::Aabb;
use crate::intersect::{Intersect, Intersection, Ray};
use crate::stats;
use crate::triangle::TriangleSoup;
use crate::Float;

pub const MAX_TRIANGLES_IN_LEAF: usize = 4;

enum Indices {
    Inner(u32, u32),
    Leaf(u32, u32),
}

#[repr(align(64))]
pub struct BvhNode {
    aabb: Aabb,
    indices: Indices,
}

impl BvhNode {
    pub fn aabb(&self) -> &Aabb {
        &self.aabb
    }

    pub fn is_leaf(&self) -> bool {
        match self.indices {
            Indices::Leaf(_, _) => true,
            Indices::Inner(_, _) => false,
        }
    }

    /// Window into the triangle index array for leaf nodes
    pub fn range(&self) -> Option<Range<usize>> {
        match self.indices {
            Indices::Leaf(start_i, end_i) => Some(start_i as usize..end_i as usize),
            Indices::Inner(_, _) => None,
        }
    }

    pub fn children(&self) -> Option<(usize, usize)> {
        match self.indices {
            Indices::Inner(left_i, right_i) => Some((left_i as usize, right_i as usize)),
            Indices::Leaf(_, _) => None,
        }
    }
}

impl Intersect<'_, Float> for BvhNode {
    fn intersect(&self, ray: &Ray) -> Option<Float> {
        self.aabb.intersect(ray)
    }
}

/// Binary bounding volume hierarchy over a triangle soup.
/// Nodes live in a flat arena and refer to their children by index.
/// Built once before rendering and immutable afterwards.
pub struct Bvh {
    nodes: Vec<BvhNode>,
    triangle_indices: Vec<usize>,
}

impl Bvh {
    pub fn build(soup: &TriangleSoup) -> Bvh {
        Bvh::build_with_max_leaf(soup, MAX_TRIANGLES_IN_LEAF)
    }

    pub fn build_with_max_leaf(soup: &TriangleSoup, max_leaf: usize) -> Bvh {
        assert!(!soup.is_empty(), "Mesh doesn't contain any triangles!");
        assert!(max_leaf > 0, "Leaves cannot be empty!");
        stats::start_bvh();
        let n_tris = soup.num_triangles();
        let mut bvh = Bvh {
            nodes: Vec::with_capacity(2 * n_tris / max_leaf.max(1) + 1),
            triangle_indices: (0..n_tris).collect(),
        };
        bvh.build_node(soup, 0, n_tris, 0, max_leaf);
        bvh.nodes.shrink_to_fit();
        stats::stop_bvh(bvh.size(), n_tris);
        bvh
    }

    /// Recursively build the node covering
    /// triangle_indices[first_i, first_i + count) at the given depth.
    /// Returns the arena index of the built node.
    fn build_node(
        &mut self,
        soup: &TriangleSoup,
        first_i: usize,
        count: usize,
        depth: usize,
        max_leaf: usize,
    ) -> usize {
        debug_assert!(count > 0, "Tried to build an empty node!");
        // The aabb is always computed from the actual triangles
        // so parent boxes stay tight
        let mut aabb = Aabb::empty();
        for &tri in &self.triangle_indices[first_i..first_i + count] {
            aabb.add_aabb(&soup.aabb(tri));
        }
        let node_i = self.nodes.len();
        self.nodes.push(BvhNode {
            aabb,
            indices: Indices::Leaf(first_i as u32, (first_i + count) as u32),
        });
        if count > max_leaf {
            // Cycle the split axis x, y, z, x, ... by depth
            let axis = depth % 3;
            let count_left = self.reorder_triangles_median(soup, first_i, count, axis);
            let left_i = self.build_node(soup, first_i, count_left, depth + 1, max_leaf);
            let right_i = self.build_node(
                soup,
                first_i + count_left,
                count - count_left,
                depth + 1,
                max_leaf,
            );
            self.nodes[node_i].indices = Indices::Inner(left_i as u32, right_i as u32);
        }
        node_i
    }

    /// Sort the index range by triangle bounding box center along the axis
    /// and split at the median rank. Returns the size of the left half.
    fn reorder_triangles_median(
        &mut self,
        soup: &TriangleSoup,
        first_i: usize,
        count: usize,
        axis: usize,
    ) -> usize {
        self.triangle_indices[first_i..first_i + count].sort_unstable_by(|&i1, &i2| {
            let c1 = soup.aabb(i1).center()[axis];
            let c2 = soup.aabb(i2).center()[axis];
            c1.partial_cmp(&c2).unwrap()
        });
        count / 2
    }

    /// Find the nearest hit that is closer than the current intersection.
    /// Returns true if any triangle was hit by the ray.
    pub fn intersect(&self, soup: &TriangleSoup, ray: &Ray, isect: &mut Intersection) -> bool {
        self.intersect_node(soup, ray, 0, isect)
    }

    fn intersect_node(
        &self,
        soup: &TriangleSoup,
        ray: &Ray,
        node_i: usize,
        isect: &mut Intersection,
    ) -> bool {
        match self.nodes[node_i].indices {
            Indices::Leaf(start_i, end_i) => {
                let mut hit = false;
                for &tri in &self.triangle_indices[start_i as usize..end_i as usize] {
                    if let Some((t, u, v)) = soup.intersect_triangle(ray, tri) {
                        hit = true;
                        if t < isect.t {
                            soup.fill_intersection(isect, tri, t, u, v);
                        }
                    }
                }
                hit
            }
            Indices::Inner(left_i, right_i) => {
                let left_i = left_i as usize;
                let right_i = right_i as usize;
                let t_left = self.nodes[left_i].intersect(ray);
                let t_right = self.nodes[right_i].intersect(ray);
                match (t_left, t_right) {
                    (None, None) => false,
                    (Some(_), None) => self.intersect_node(soup, ray, left_i, isect),
                    (None, Some(_)) => self.intersect_node(soup, ray, right_i, isect),
                    (Some(t_left), Some(t_right)) => {
                        // Visit the closer box first. Subtrees can overlap so
                        // the farther box is skipped only once its entry
                        // distance can no longer beat the best hit.
                        let (near_i, far_i, t_far) = if t_left < t_right {
                            (left_i, right_i, t_right)
                        } else {
                            (right_i, left_i, t_left)
                        };
                        let near_hit = self.intersect_node(soup, ray, near_i, isect);
                        if !near_hit || t_far < isect.t {
                            let far_hit = self.intersect_node(soup, ray, far_i, isect);
                            near_hit || far_hit
                        } else {
                            true
                        }
                    }
                }
            }
        }
    }

    pub fn root(&self) -> &BvhNode {
        &self.nodes[0]
    }

    pub fn node(&self, i: usize) -> &BvhNode {
        &self.nodes[i]
    }

    pub fn size(&self) -> usize {
        self.nodes.len()
    }

    pub fn triangle_indices(&self) -> &[usize] {
        &self.triangle_indices
    }
}
