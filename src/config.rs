//! Configuration for the acceleration device and the scene manager

/// Configuration of an acceleration [`Device`](crate::accel::Device).
#[derive(Debug, Clone)]
pub struct DeviceConfig {
    /// Maximum number of primitives stored in a single BVH leaf
    pub max_leaf_size: usize,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self { max_leaf_size: 4 }
    }
}

impl DeviceConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_leaf_size(mut self, size: usize) -> Self {
        self.max_leaf_size = size;
        self
    }
}

/// Configuration of a [`SceneManager`](crate::scene::SceneManager).
#[derive(Debug, Clone)]
pub struct SceneManagerConfig {
    /// Configuration of the device created by `SceneManager::new()`
    pub device: DeviceConfig,
    /// Detection sphere radius (meters) used by `build_listener_scene_default()`
    pub default_listener_radius: f32,
}

impl Default for SceneManagerConfig {
    fn default() -> Self {
        Self {
            device: DeviceConfig::default(),
            default_listener_radius: 0.1,
        }
    }
}

impl SceneManagerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn device(mut self, device: DeviceConfig) -> Self {
        self.device = device;
        self
    }

    pub fn default_listener_radius(mut self, radius: f32) -> Self {
        self.default_listener_radius = radius;
        self
    }
}
