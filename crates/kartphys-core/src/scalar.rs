/// Simulation scalar. All per-tick arithmetic stays f32 so state digests
/// compare across builds.
pub type Scalar = f32;
