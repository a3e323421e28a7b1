use crate::Scalar;

/// Per-tick context handed into the fixed-rate phase.
///
/// The scheduler that owns the physics clock fills this in; models never
/// assume a rate of their own.
#[derive(Copy, Clone, Debug)]
pub struct StepCtx {
    pub dt: Scalar,
    pub tick: u64,
}
