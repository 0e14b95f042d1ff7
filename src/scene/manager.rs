use std::sync::Arc;

use fxhash::FxHashMap;

use crate::accel::{Device, GeometryId, Scene, TriangleMesh, UserGeometry};
use crate::config::SceneManagerConfig;
use crate::error::{AcousticSceneError, Result};
use crate::geometry::{
    Sphere, SphereArray, SphereBoundsAdapter, SphereIntersectAdapter, Triangle, Vertex,
};

use super::listener::AcousticListener;
use super::reflection::ReflectionKernel;
use super::registry::ReflectionKernelRegistry;

/// Owns the ray-traceable world and listener scenes of an acoustic simulation.
///
/// - The **world scene** holds the room mesh. It is rebuilt whenever the mesh
///   changes; reflection kernels are associated with its triangles afterwards.
/// - The **listener scene** holds one detection sphere per listener. It is
///   thrown away and rebuilt from scratch every time listeners move.
///
/// Both scenes share one [`Device`].
///
/// # Threading
///
/// Building scenes and associating kernels take `&mut self` and must not
/// overlap with ray queries. Once built, the scenes can be queried from any
/// number of threads through `&self`.
///
/// # Example
///
/// ```
/// use petalsonic_acoustic_scene::*;
///
/// let mut manager = SceneManager::new(SceneManagerConfig::default())?;
///
/// let vertices = [
///     Vertex::new(0.0, 0.0, 0.0),
///     Vertex::new(1.0, 0.0, 0.0),
///     Vertex::new(0.0, 1.0, 0.0),
/// ];
/// manager.build_scene(&vertices, &[Triangle::new(0, 1, 2)])?;
/// manager.associate_reflection_kernel_to_triangles(&ReflectionKernel::CONCRETE, [0])?;
///
/// manager.build_listener_scene(&[AcousticListener::new(Vec3::new(5.0, 0.0, 0.0))], 0.5)?;
/// assert_eq!(manager.listener_count(), 1);
/// # Ok::<(), AcousticSceneError>(())
/// ```
pub struct SceneManager {
    config: SceneManagerConfig,
    device: Arc<Device>,
    world_scene: Scene,
    listener_scene: Scene,
    num_vertices: usize,
    num_triangles: usize,
    reflections: ReflectionKernelRegistry,
    sphere_to_listener: FxHashMap<GeometryId, usize>,
}

impl SceneManager {
    /// Creates the device and two empty scenes.
    ///
    /// # Errors
    ///
    /// Fails with [`AcousticSceneError::DeviceCreation`] if the device cannot
    /// be created; nothing else can work without it.
    pub fn new(config: SceneManagerConfig) -> Result<Self> {
        let device = Arc::new(Device::new(config.device.clone())?);
        Ok(Self::with_device(device, config))
    }

    /// Creates a scene manager on top of an existing device.
    pub fn with_device(device: Arc<Device>, config: SceneManagerConfig) -> Self {
        log::info!("Created scene manager");

        Self {
            world_scene: Scene::new(&device),
            listener_scene: Scene::new(&device),
            config,
            device,
            num_vertices: 0,
            num_triangles: 0,
            reflections: ReflectionKernelRegistry::new(),
            sphere_to_listener: FxHashMap::default(),
        }
    }

    pub fn config(&self) -> &SceneManagerConfig {
        &self.config
    }

    pub fn device(&self) -> &Arc<Device> {
        &self.device
    }

    /// Builds the world scene from a triangle mesh and commits it.
    ///
    /// Triangles are given in right-handed (counter-clockwise) winding, while
    /// the acceleration structure is left-handed, so every triangle is stored
    /// as `{v0, v2, v1}`.
    ///
    /// Replacing the mesh discards all reflection kernel associations, since
    /// they referred to the old triangles.
    ///
    /// # Errors
    ///
    /// Fails with [`AcousticSceneError::InvalidVertexIndex`] if a triangle
    /// refers to a vertex that does not exist; the previous world scene is
    /// kept in that case.
    pub fn build_scene(&mut self, vertices: &[Vertex], triangles: &[Triangle]) -> Result<()> {
        let mut mesh = TriangleMesh::new();

        for (dst, src) in mesh
            .set_new_vertex_buffer(vertices.len())
            .iter_mut()
            .zip(vertices)
        {
            dst.x = src.x;
            dst.y = src.y;
            dst.z = src.z;
        }

        for (dst, src) in mesh
            .set_new_index_buffer(triangles.len())
            .iter_mut()
            .zip(triangles)
        {
            *dst = [src.v0, src.v2, src.v1];
        }

        let mut scene = Scene::new(&self.device);
        scene.attach_geometry(mesh);

        if let Err(err) = scene.commit() {
            log::warn!("Rejected world mesh: {}", err);
            return Err(err);
        }

        self.world_scene = scene;
        self.num_vertices = vertices.len();
        self.num_triangles = triangles.len();

        if !self.reflections.is_empty() {
            log::debug!(
                "Discarding {} reflection kernels of the previous mesh",
                self.reflections.len()
            );
            self.reflections.clear();
        }

        log::info!(
            "Built world scene ({} vertices, {} triangles)",
            self.num_vertices,
            self.num_triangles
        );

        Ok(())
    }

    /// Associates a copy of `kernel` with the given world triangles.
    ///
    /// # Errors
    ///
    /// Fails with [`AcousticSceneError::InvalidReflectionKernel`] if a
    /// coefficient of `kernel` is outside `[0, 1]`, and with
    /// [`AcousticSceneError::InvalidTriangleIndex`] if any index is not a
    /// triangle of the current world scene. No kernel or association is
    /// recorded in either case.
    pub fn associate_reflection_kernel_to_triangles(
        &mut self,
        kernel: &ReflectionKernel,
        triangle_indices: impl IntoIterator<Item = u32>,
    ) -> Result<()> {
        match self
            .reflections
            .associate(*kernel, triangle_indices, self.num_triangles)
        {
            Ok(kernel_index) => {
                log::debug!("Registered reflection kernel {}", kernel_index);
                Ok(())
            }
            Err(err) => {
                log::warn!("Rejected reflection kernel association: {}", err);
                Err(err)
            }
        }
    }

    /// Rebuilds the listener scene with one detection sphere of
    /// `listener_sphere_radius` per listener, then commits it.
    ///
    /// The previous listener scene is released first, together with every
    /// geometry id it handed out.
    ///
    /// # Errors
    ///
    /// Fails with [`AcousticSceneError::InvalidRadius`] unless the radius is
    /// finite and positive; the previous listener scene is kept in that case.
    pub fn build_listener_scene(
        &mut self,
        listeners: &[AcousticListener],
        listener_sphere_radius: f32,
    ) -> Result<()> {
        if !(listener_sphere_radius.is_finite() && listener_sphere_radius > 0.0) {
            log::warn!("Rejected listener sphere radius {}", listener_sphere_radius);
            return Err(AcousticSceneError::InvalidRadius(listener_sphere_radius));
        }

        self.sphere_to_listener.clear();
        self.listener_scene = Scene::new(&self.device);

        for (listener_index, listener) in listeners.iter().enumerate() {
            let sphere_id = self.listener_scene.attach_geometry_with(|geometry_id| {
                let sphere = Sphere {
                    geometry_id,
                    ..Sphere::new(listener.position, listener_sphere_radius)
                };

                let mut geometry = UserGeometry::new(1);
                geometry.set_time_step_count(1);
                geometry.set_user_data::<SphereArray>(Box::new([sphere]));
                geometry.set_bounds_function(SphereBoundsAdapter);
                geometry.set_intersect_function(SphereIntersectAdapter);
                geometry.into()
            });

            self.sphere_to_listener.insert(sphere_id, listener_index);
        }

        self.listener_scene.commit()?;

        log::debug!(
            "Built listener scene ({} listeners, radius {})",
            listeners.len(),
            listener_sphere_radius
        );

        Ok(())
    }

    /// Rebuilds the listener scene using the configured default radius.
    pub fn build_listener_scene_default(&mut self, listeners: &[AcousticListener]) -> Result<()> {
        self.build_listener_scene(listeners, self.config.default_listener_radius)
    }

    /// The committed world scene, `None` before `build_scene()` succeeded.
    pub fn world_scene(&self) -> Option<&Scene> {
        self.world_scene
            .is_committed()
            .then_some(&self.world_scene)
    }

    /// The committed listener scene, `None` before `build_listener_scene()`
    /// succeeded.
    pub fn listener_scene(&self) -> Option<&Scene> {
        self.listener_scene
            .is_committed()
            .then_some(&self.listener_scene)
    }

    pub fn is_scene_committed(&self) -> bool {
        self.world_scene.is_committed()
    }

    pub fn is_listener_scene_committed(&self) -> bool {
        self.listener_scene.is_committed()
    }

    pub fn num_vertices(&self) -> usize {
        self.num_vertices
    }

    pub fn num_triangles(&self) -> usize {
        self.num_triangles
    }

    pub fn reflection_kernels(&self) -> &ReflectionKernelRegistry {
        &self.reflections
    }

    pub fn reflection_kernel_for_triangle(&self, triangle_index: u32) -> Option<&ReflectionKernel> {
        self.reflections.kernel_for_triangle(triangle_index)
    }

    pub fn reflection_kernel_index_for_triangle(&self, triangle_index: u32) -> Option<usize> {
        self.reflections.kernel_index_for_triangle(triangle_index)
    }

    /// Resolves a geometry id hit in the listener scene to the index of the
    /// listener in the list passed to the latest `build_listener_scene()`.
    pub fn listener_index_for_geometry(&self, geometry_id: GeometryId) -> Option<usize> {
        self.sphere_to_listener.get(&geometry_id).copied()
    }

    /// Number of listeners in the current listener scene.
    pub fn listener_count(&self) -> usize {
        self.sphere_to_listener.len()
    }
}

impl std::fmt::Debug for SceneManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneManager")
            .field("world_scene", &self.world_scene)
            .field("listener_scene", &self.listener_scene)
            .field("num_vertices", &self.num_vertices)
            .field("num_triangles", &self.num_triangles)
            .field("reflection_kernels", &self.reflections.len())
            .field("listeners", &self.sphere_to_listener.len())
            .finish()
    }
}
