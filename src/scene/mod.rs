//! Acoustic scene management: world and listener scenes, reflection kernels,
//! and the ray queries propagation code runs against them.

mod listener;
mod manager;
mod ray_tracer;
mod reflection;
mod registry;

pub use listener::AcousticListener;
pub use manager::SceneManager;
pub use ray_tracer::{AcousticRayHit, ListenerHit, RayTracer};
pub use reflection::{NUM_OCTAVE_BANDS, ReflectionKernel};
pub use registry::ReflectionKernelRegistry;
