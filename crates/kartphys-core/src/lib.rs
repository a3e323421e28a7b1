pub mod scalar;
pub mod types;
pub mod step_ctx;
pub mod host;
pub mod hash;
pub mod angles;

pub use scalar::Scalar;
pub use types::{Vec3, Mat3, Isometry, Velocity, vec3, iso, quat_identity};
pub use step_ctx::StepCtx;
pub use host::{DriverInput, RayHit, VehicleBody, GroundProbe};
pub use hash::{StepHasher, hash_scalar, hash_vec3, hash_quat, hex32};
pub use angles::wrap_angle;
pub use glam::Quat;
