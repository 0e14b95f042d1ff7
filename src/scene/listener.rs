use crate::math::Vec3;

/// A point in the scene where sound energy is collected.
///
/// In the listener scene every listener is represented by a detection sphere
/// centered at its position.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AcousticListener {
    pub position: Vec3,
}

impl AcousticListener {
    pub fn new(position: Vec3) -> Self {
        Self { position }
    }
}

impl From<Vec3> for AcousticListener {
    fn from(position: Vec3) -> Self {
        Self::new(position)
    }
}
