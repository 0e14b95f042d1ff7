use crate::config::DeviceConfig;
use crate::error::{AcousticSceneError, Result};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use super::GeometryId;

/// Acceleration-structure context shared by every scene built from it.
///
/// A device is created once, wrapped in an `Arc` and handed to each
/// [`Scene`](super::Scene); scenes keep their own clone, so the device always
/// outlives them. It carries no interior locking beyond the live-scene counter:
/// building scenes must be serialized by the owner.
#[derive(Debug)]
pub struct Device {
    config: DeviceConfig,
    live_scenes: AtomicUsize,
    next_geometry_id: AtomicU64,
}

impl Device {
    /// Creates a new device.
    ///
    /// # Errors
    ///
    /// Returns [`AcousticSceneError::DeviceCreation`] if the configuration
    /// cannot produce a usable acceleration structure.
    pub fn new(config: DeviceConfig) -> Result<Self> {
        if config.max_leaf_size == 0 {
            return Err(AcousticSceneError::DeviceCreation(
                "max_leaf_size must be at least 1".into(),
            ));
        }

        log::info!(
            "Created acceleration device (max_leaf_size: {})",
            config.max_leaf_size
        );

        Ok(Self {
            config,
            live_scenes: AtomicUsize::new(0),
            next_geometry_id: AtomicU64::new(0),
        })
    }

    pub fn config(&self) -> &DeviceConfig {
        &self.config
    }

    /// Number of scenes created from this device that are still alive.
    pub fn live_scene_count(&self) -> usize {
        self.live_scenes.load(Ordering::Acquire)
    }

    pub(crate) fn new_geometry_id(&self) -> GeometryId {
        self.next_geometry_id.fetch_add(1, Ordering::Relaxed)
    }

    pub(crate) fn scene_created(&self) {
        self.live_scenes.fetch_add(1, Ordering::AcqRel);
    }

    pub(crate) fn scene_released(&self) {
        self.live_scenes.fetch_sub(1, Ordering::AcqRel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_creation() {
        let device = Device::new(DeviceConfig::default()).unwrap();
        assert_eq!(device.config().max_leaf_size, 4);
        assert_eq!(device.live_scene_count(), 0);
    }

    #[test]
    fn test_zero_leaf_size_is_rejected() {
        let result = Device::new(DeviceConfig::new().max_leaf_size(0));
        assert!(matches!(result, Err(AcousticSceneError::DeviceCreation(_))));
    }

    #[test]
    fn test_geometry_ids_are_unique() {
        let device = Device::new(DeviceConfig::default()).unwrap();
        let ids: Vec<_> = (0..4).map(|_| device.new_geometry_id()).collect();
        assert_eq!(ids, vec![0, 1, 2, 3]);
    }
}
