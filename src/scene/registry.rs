use fxhash::FxHashMap;

use crate::error::{AcousticSceneError, Result};

use super::reflection::ReflectionKernel;

/// Reflection kernels plus the map from world triangles to kernels.
///
/// Kernels are identified by their position in the registry. A triangle
/// without an entry has no kernel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReflectionKernelRegistry {
    kernels: Vec<ReflectionKernel>,
    triangle_to_kernel: FxHashMap<u32, usize>,
}

impl ReflectionKernelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `kernel` and maps every triangle in `triangle_indices` to it.
    ///
    /// The kernel's coefficients and all indices (against `triangle_count`)
    /// are checked before anything is written: on error the registry is left
    /// exactly as it was. A triangle that already had a kernel is remapped to
    /// the new one.
    ///
    /// Returns the index of the appended kernel.
    pub fn associate(
        &mut self,
        kernel: ReflectionKernel,
        triangle_indices: impl IntoIterator<Item = u32>,
        triangle_count: usize,
    ) -> Result<usize> {
        kernel.validate()?;

        let triangle_indices: Vec<u32> = triangle_indices.into_iter().collect();

        if let Some(&index) = triangle_indices
            .iter()
            .find(|&&index| index as usize >= triangle_count)
        {
            return Err(AcousticSceneError::InvalidTriangleIndex {
                index,
                triangle_count,
            });
        }

        let kernel_index = self.kernels.len();
        self.kernels.push(kernel);

        self.triangle_to_kernel.extend(
            triangle_indices
                .into_iter()
                .map(|triangle_index| (triangle_index, kernel_index)),
        );

        Ok(kernel_index)
    }

    pub fn kernel(&self, index: usize) -> Option<&ReflectionKernel> {
        self.kernels.get(index)
    }

    pub fn kernel_index_for_triangle(&self, triangle_index: u32) -> Option<usize> {
        self.triangle_to_kernel.get(&triangle_index).copied()
    }

    pub fn kernel_for_triangle(&self, triangle_index: u32) -> Option<&ReflectionKernel> {
        self.kernel_index_for_triangle(triangle_index)
            .and_then(|index| self.kernel(index))
    }

    pub fn kernels(&self) -> &[ReflectionKernel] {
        &self.kernels
    }

    /// Number of triangles with a kernel.
    pub fn mapped_triangle_count(&self) -> usize {
        self.triangle_to_kernel.len()
    }

    pub fn len(&self) -> usize {
        self.kernels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kernels.is_empty()
    }

    pub fn clear(&mut self) {
        self.kernels.clear();
        self.triangle_to_kernel.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_associate() {
        let mut registry = ReflectionKernelRegistry::new();
        assert!(registry.is_empty());

        let concrete = registry
            .associate(ReflectionKernel::CONCRETE, [0, 2], 4)
            .unwrap();
        let carpet = registry.associate(ReflectionKernel::CARPET, [3], 4).unwrap();

        assert_eq!((concrete, carpet), (0, 1));
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.kernel_for_triangle(0), Some(&ReflectionKernel::CONCRETE));
        assert_eq!(registry.kernel_for_triangle(2), Some(&ReflectionKernel::CONCRETE));
        assert_eq!(registry.kernel_for_triangle(3), Some(&ReflectionKernel::CARPET));
        assert_eq!(registry.kernel_for_triangle(1), None);
    }

    #[test]
    fn test_later_association_wins() {
        let mut registry = ReflectionKernelRegistry::new();
        registry.associate(ReflectionKernel::BRICK, [1], 2).unwrap();
        registry.associate(ReflectionKernel::WOOD, [1], 2).unwrap();

        assert_eq!(registry.kernel_index_for_triangle(1), Some(1));
        assert_eq!(registry.mapped_triangle_count(), 1);
    }

    #[test]
    fn test_out_of_range_is_atomic() {
        let mut registry = ReflectionKernelRegistry::new();
        registry.associate(ReflectionKernel::BRICK, [0, 1], 3).unwrap();
        let before = registry.clone();

        let result = registry.associate(ReflectionKernel::GLASS, [2, 1, 3], 3);

        assert_eq!(
            result,
            Err(AcousticSceneError::InvalidTriangleIndex {
                index: 3,
                triangle_count: 3
            })
        );
        assert_eq!(registry.kernels(), before.kernels());
        assert_eq!(registry.mapped_triangle_count(), before.mapped_triangle_count());
        assert_eq!(registry.kernel_for_triangle(1), Some(&ReflectionKernel::BRICK));
        assert_eq!(registry.kernel_for_triangle(2), None);
    }

    #[test]
    fn test_invalid_kernel_is_rejected() {
        let mut registry = ReflectionKernelRegistry::new();
        registry.associate(ReflectionKernel::BRICK, [0], 2).unwrap();
        let before = registry.clone();

        for kernel in [
            ReflectionKernel::uniform(1.5, 0.0),
            ReflectionKernel::uniform(0.5, -0.1),
            ReflectionKernel::uniform(f32::NAN, 0.0),
        ] {
            assert!(matches!(
                registry.associate(kernel, [0, 1], 2),
                Err(AcousticSceneError::InvalidReflectionKernel(_))
            ));
            assert_eq!(registry, before);
        }
    }

    #[test]
    fn test_empty_index_set() {
        let mut registry = ReflectionKernelRegistry::new();
        assert_eq!(registry.associate(ReflectionKernel::RIGID, [], 0), Ok(0));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.mapped_triangle_count(), 0);
    }

    #[test]
    fn test_clear() {
        let mut registry = ReflectionKernelRegistry::new();
        registry.associate(ReflectionKernel::RIGID, [0], 1).unwrap();
        registry.clear();

        assert!(registry.is_empty());
        assert_eq!(registry.kernel_for_triangle(0), None);
    }
}
