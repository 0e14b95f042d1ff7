//! Reflection kernels: acoustic surface properties attached to triangles.
//!
//! Kernels describe how much energy a surface reflects in each octave band
//! and how diffuse that reflection is. The values are carried as-is; how they
//! are applied to a reflected ray is up to the propagation code.

use crate::error::{AcousticSceneError, Result};

/// Number of octave bands, centered from 31.25 Hz to 8 kHz.
pub const NUM_OCTAVE_BANDS: usize = 9;

/// Acoustic reflection properties of a surface.
///
/// # Example
///
/// ```
/// use petalsonic_acoustic_scene::scene::ReflectionKernel;
///
/// // Use a preset surface
/// let wall = ReflectionKernel::CONCRETE;
///
/// // Or derive one from low/mid/high absorption
/// let panel = ReflectionKernel::from_band_absorption([0.30, 0.60, 0.75], 0.10);
/// assert!(panel.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReflectionKernel {
    /// Fraction of energy reflected in each octave band (0.0 - 1.0)
    ///
    /// 0.0 = fully absorbing, 1.0 = perfectly reflecting
    pub reflection_coefficients: [f32; NUM_OCTAVE_BANDS],

    /// Fraction of reflected energy scattered diffusely (0.0 - 1.0)
    ///
    /// 0.0 = pure specular (mirror-like), 1.0 = pure diffuse
    pub scattering_coefficient: f32,
}

impl ReflectionKernel {
    /// Absorbs everything
    pub const TRANSPARENT: Self = Self::uniform(0.0, 0.0);

    /// Reflects everything specularly
    pub const RIGID: Self = Self::uniform(1.0, 0.0);

    /// Moderate absorption, the default surface
    pub const GENERIC: Self = Self::from_band_absorption([0.10, 0.20, 0.30], 0.05);

    /// Bare brick
    pub const BRICK: Self = Self::from_band_absorption([0.03, 0.04, 0.07], 0.05);

    /// Concrete - very reflective
    pub const CONCRETE: Self = Self::from_band_absorption([0.05, 0.07, 0.08], 0.05);

    /// Carpet - highly absorptive, especially at high frequencies
    pub const CARPET: Self = Self::from_band_absorption([0.24, 0.69, 0.73], 0.05);

    /// Glass
    pub const GLASS: Self = Self::from_band_absorption([0.06, 0.03, 0.02], 0.05);

    /// Smooth plaster
    pub const PLASTER: Self = Self::from_band_absorption([0.12, 0.06, 0.04], 0.05);

    /// Wood panelling
    pub const WOOD: Self = Self::from_band_absorption([0.11, 0.07, 0.06], 0.05);

    pub const fn new(reflection_coefficients: [f32; NUM_OCTAVE_BANDS], scattering_coefficient: f32) -> Self {
        Self {
            reflection_coefficients,
            scattering_coefficient,
        }
    }

    /// Same reflection coefficient in every band.
    pub const fn uniform(reflection_coefficient: f32, scattering_coefficient: f32) -> Self {
        Self::new([reflection_coefficient; NUM_OCTAVE_BANDS], scattering_coefficient)
    }

    /// Builds a kernel from per-band absorption (`reflection = 1 - absorption`).
    pub const fn from_absorption(absorption: [f32; NUM_OCTAVE_BANDS], scattering_coefficient: f32) -> Self {
        let mut reflection_coefficients = [0.0; NUM_OCTAVE_BANDS];
        let mut band = 0;

        while band < NUM_OCTAVE_BANDS {
            reflection_coefficients[band] = 1.0 - absorption[band];
            band += 1;
        }

        Self::new(reflection_coefficients, scattering_coefficient)
    }

    /// Builds a kernel from absorption at three reference frequencies
    /// (400 Hz, 2.5 kHz, 15 kHz).
    ///
    /// Bands up to 250 Hz take the low value, 500 Hz - 2 kHz the mid value,
    /// and 4 kHz - 8 kHz the high value.
    pub const fn from_band_absorption(absorption: [f32; 3], scattering_coefficient: f32) -> Self {
        let [low, mid, high] = absorption;

        Self::from_absorption(
            [low, low, low, low, mid, mid, mid, high, high],
            scattering_coefficient,
        )
    }

    /// Validates that all coefficients are within [0.0, 1.0]
    pub fn validate(&self) -> Result<()> {
        if !self
            .reflection_coefficients
            .iter()
            .all(|val| (0.0..=1.0).contains(val))
        {
            return Err(AcousticSceneError::InvalidReflectionKernel(
                "Reflection coefficients must be between 0.0 and 1.0",
            ));
        }

        if !(0.0..=1.0).contains(&self.scattering_coefficient) {
            return Err(AcousticSceneError::InvalidReflectionKernel(
                "Scattering coefficient must be between 0.0 and 1.0",
            ));
        }

        Ok(())
    }
}

impl Default for ReflectionKernel {
    fn default() -> Self {
        Self::GENERIC
    }
}
