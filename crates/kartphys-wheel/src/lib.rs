#![deny(missing_docs)]
//! Single-wheel suspension and tire model.
//!
//! Every wheel runs two decoupled phases against a host chassis:
//! - `Wheel::advance_physics` on the fixed clock probes the ground and
//!   accumulates suspension/drive/brake/lateral forces on the body;
//! - `Wheel::advance_visual` on the frame clock eases the steering angle
//!   and rolls the mesh for rendering.
//!
//! The one value crossing between the phases is the eased steering angle,
//! which the next fixed step takes as its tire heading. The wheel owns no
//! clock and reads no globals: input, body, probe and timestep all arrive
//! as arguments.

mod wheel;

pub use wheel::{
    ContactSample,
    Wheel,
    WheelConfigError,
    WheelParams,
    WheelPose,
    WheelState,
    WheelStepOutput,
};
