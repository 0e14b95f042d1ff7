//! Bounding volume hierarchy over the primitives of a committed scene.
//!
//! Built top-down by splitting every node at the object median of its
//! primitive centers along the widest axis.

use std::ops::Range;

use crate::math::{Bounds, Vec3};

use super::ray::RayHit;

/// Reference to one primitive of one geometry, by the geometry's position
/// in its scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct PrimitiveRef {
    pub slot: usize,
    pub prim_id: u32,
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct BuildPrimitive {
    pub reference: PrimitiveRef,
    pub bounds: Bounds,
}

#[derive(Clone, Copy, Debug)]
enum BvhNode {
    Internal { bounds: Bounds, left: usize, right: usize },
    Leaf { bounds: Bounds, primitives: (usize, usize) },
}

impl BvhNode {
    fn bounds(&self) -> &Bounds {
        match self {
            BvhNode::Internal { bounds, .. } | BvhNode::Leaf { bounds, .. } => bounds,
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct Bvh {
    nodes: Vec<BvhNode>,
    primitives: Vec<PrimitiveRef>,
}

impl Bvh {
    pub fn build(mut primitives: Vec<BuildPrimitive>, max_leaf_size: usize) -> Self {
        // Primitives with empty or non-finite bounds can never be hit.
        primitives.retain(|primitive| {
            !primitive.bounds.is_empty()
                && primitive.bounds.min.is_finite()
                && primitive.bounds.max.is_finite()
        });

        let mut nodes = Vec::with_capacity(primitives.len() * 2);

        if !primitives.is_empty() {
            let len = primitives.len();
            build_node(&mut nodes, &mut primitives, 0..len, max_leaf_size.max(1));
        }

        Self {
            nodes,
            primitives: primitives.into_iter().map(|p| p.reference).collect(),
        }
    }

    pub fn bounds(&self) -> Option<Bounds> {
        self.nodes.first().map(|node| *node.bounds())
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Visits every primitive whose node the ray overlaps, nearest nodes
    /// first. `visit` may shrink `ray_hit.ray.t_far`, which prunes the rest
    /// of the traversal.
    pub fn traverse(&self, ray_hit: &mut RayHit, mut visit: impl FnMut(PrimitiveRef, &mut RayHit)) {
        let origin = ray_hit.ray.origin;
        let inv_direction = ray_hit.ray.direction.recip();

        let entry = |node: usize, ray_hit: &RayHit| {
            self.nodes[node].bounds().intersect(
                origin,
                inv_direction,
                ray_hit.ray.t_near,
                ray_hit.ray.t_far,
            )
        };

        if self.nodes.is_empty() {
            return;
        }

        let mut stack = vec![0];

        while let Some(node) = stack.pop() {
            // The ray may have shrunk since this node was pushed.
            if entry(node, ray_hit).is_none() {
                continue;
            }

            match self.nodes[node] {
                BvhNode::Leaf { primitives: (first, last), .. } => {
                    for &primitive in &self.primitives[first..last] {
                        visit(primitive, &mut *ray_hit);
                    }
                }

                BvhNode::Internal { left, right, .. } => {
                    match (entry(left, ray_hit), entry(right, ray_hit)) {
                        // Farther child first, so the nearer one is popped next
                        (Some(l), Some(r)) if l <= r => stack.extend([right, left]),
                        (Some(_), Some(_)) => stack.extend([left, right]),
                        (Some(_), None) => stack.push(left),
                        (None, Some(_)) => stack.push(right),
                        (None, None) => {}
                    }
                }
            }
        }
    }
}

fn build_node(
    nodes: &mut Vec<BvhNode>,
    primitives: &mut [BuildPrimitive],
    range: Range<usize>,
    max_leaf_size: usize,
) -> usize {
    let slice = &mut primitives[range.clone()];
    let bounds = slice
        .iter()
        .fold(Bounds::default(), |bounds, primitive| bounds.union(primitive.bounds));

    let node = nodes.len();

    nodes.push(BvhNode::Leaf {
        bounds,
        primitives: (range.start, range.end),
    });

    if slice.len() <= max_leaf_size {
        return node;
    }

    let centers = Bounds::from_points(slice.iter().map(|primitive| primitive.bounds.center()));
    let axis = widest_axis(centers.extent());
    let mid = slice.len() / 2;

    slice.select_nth_unstable_by(mid, |a, b| {
        a.bounds.center()[axis].total_cmp(&b.bounds.center()[axis])
    });

    let mid = range.start + mid;
    let left = build_node(nodes, primitives, range.start..mid, max_leaf_size);
    let right = build_node(nodes, primitives, mid..range.end, max_leaf_size);

    nodes[node] = BvhNode::Internal {
        bounds,
        left,
        right,
    };

    node
}

fn widest_axis(extent: Vec3) -> usize {
    if extent.x >= extent.y && extent.x >= extent.z {
        0
    } else if extent.y >= extent.z {
        1
    } else {
        2
    }
}
