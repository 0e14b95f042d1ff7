use std::sync::Arc;

use crate::error::{AcousticSceneError, Result};
use crate::math::Bounds;

use super::bvh::{BuildPrimitive, Bvh, PrimitiveRef};
use super::geometry::Geometry;
use super::ray::RayHit;
use super::{Device, GeometryId};

/// Lifecycle of a [`Scene`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneState {
    /// No geometry attached, never committed
    Empty,
    /// Geometry changed since the last commit
    Building,
    /// Query-ready
    Committed,
}

/// A set of geometries plus the BVH built over them on commit.
///
/// Geometries are only added before a commit; a committed scene is read-only
/// and may be queried from several threads at once. Dropping the scene drops
/// every attached geometry together with its user data.
pub struct Scene {
    device: Arc<Device>,
    /// Sorted by id, since the device hands ids out in increasing order
    geometries: Vec<(GeometryId, Geometry)>,
    bvh: Bvh,
    state: SceneState,
}

impl Scene {
    pub fn new(device: &Arc<Device>) -> Self {
        device.scene_created();

        Self {
            device: Arc::clone(device),
            geometries: Vec::new(),
            bvh: Bvh::default(),
            state: SceneState::Empty,
        }
    }

    pub fn device(&self) -> &Arc<Device> {
        &self.device
    }

    pub fn state(&self) -> SceneState {
        self.state
    }

    pub fn is_committed(&self) -> bool {
        self.state == SceneState::Committed
    }

    /// Attaches a geometry and returns its id.
    pub fn attach_geometry(&mut self, geometry: impl Into<Geometry>) -> GeometryId {
        self.attach_geometry_with(|_| geometry.into())
    }

    /// Attaches the geometry produced by `make`, which receives the id the
    /// geometry is about to be attached under.
    ///
    /// Useful when the geometry's user data has to record its own id.
    pub fn attach_geometry_with(
        &mut self,
        make: impl FnOnce(GeometryId) -> Geometry,
    ) -> GeometryId {
        let id = self.device.new_geometry_id();

        self.geometries.push((id, make(id)));
        self.state = SceneState::Building;

        id
    }

    pub fn geometry(&self, id: GeometryId) -> Option<&Geometry> {
        self.geometries
            .binary_search_by_key(&id, |(geometry_id, _)| *geometry_id)
            .ok()
            .map(|slot| &self.geometries[slot].1)
    }

    /// Ids of the attached geometries, in attach order.
    pub fn geometry_ids(&self) -> impl Iterator<Item = GeometryId> + '_ {
        self.geometries.iter().map(|(id, _)| *id)
    }

    pub fn geometry_count(&self) -> usize {
        self.geometries.len()
    }

    /// Total number of primitives over all attached geometries.
    pub fn primitive_count(&self) -> usize {
        self.geometries
            .iter()
            .map(|(_, geometry)| geometry.primitive_count())
            .sum()
    }

    /// Bounds of everything the committed BVH contains.
    pub fn bounds(&self) -> Option<Bounds> {
        self.bvh.bounds()
    }

    /// Validates every geometry and builds the BVH.
    ///
    /// On error the scene keeps its previous BVH and state.
    pub fn commit(&mut self) -> Result<()> {
        let mut primitives = Vec::with_capacity(self.primitive_count());

        for (slot, (id, geometry)) in self.geometries.iter().enumerate() {
            geometry.validate(*id)?;

            for prim_id in 0..primitive_id_limit(geometry.primitive_count())? {
                primitives.push(BuildPrimitive {
                    reference: PrimitiveRef { slot, prim_id },
                    bounds: geometry.primitive_bounds(prim_id),
                });
            }
        }

        let primitive_count = primitives.len();

        self.bvh = Bvh::build(primitives, self.device.config().max_leaf_size);
        self.state = SceneState::Committed;

        log::debug!(
            "Committed scene ({} geometries, {} primitives, {} BVH nodes)",
            self.geometries.len(),
            primitive_count,
            self.bvh.node_count()
        );

        Ok(())
    }

    /// Finds the closest hit along the ray.
    ///
    /// On a hit `ray_hit.ray.t_far` holds the hit distance and `ray_hit.hit`
    /// the hit record; on a miss the record is left untouched.
    pub fn intersect(&self, ray_hit: &mut RayHit) {
        debug_assert!(self.is_committed(), "querying a scene that is not committed");

        self.bvh.traverse(ray_hit, |primitive, ray_hit| {
            let (id, geometry) = &self.geometries[primitive.slot];
            geometry.intersect(*id, primitive.prim_id, ray_hit);
        });
    }
}

/// Primitive ids are 32-bit; a geometry may not hold more primitives.
fn primitive_id_limit(count: usize) -> Result<u32> {
    u32::try_from(count).map_err(|_| AcousticSceneError::TooManyPrimitives {
        what: "primitives in one geometry",
        count,
    })
}

impl Drop for Scene {
    fn drop(&mut self) {
        self.device.scene_released();
    }
}

impl std::fmt::Debug for Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scene")
            .field("state", &self.state)
            .field("geometries", &self.geometries.len())
            .field("bvh_nodes", &self.bvh.node_count())
            .finish()
    }
}
