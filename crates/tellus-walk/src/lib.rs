//! First-person walking on the surface of a spinning, irregular body.
//!
//! "Up" is not a world axis here: it is recomputed every frame as the
//! direction from the body's center to the walker. The walker rides a
//! rotating spin frame so the body's rotation carries it along, and is kept
//! on the ground by ray queries against the body's collision mesh.
//!
//! [`SurfaceWalker`] is driven by the host:
//!
//! - input events go to the `handle_*` methods and only touch input state,
//!   yaw/pitch and the cursor capture flags;
//! - [`SurfaceWalker::update`] runs once per frame and does all integration,
//!   grounding and camera writes.
//!
//! Scene, camera and cursor are lent to each call through [`WalkWorld`]; the
//! walker keeps only [`NodeId`](tellus_scene::NodeId) handles.

mod basis;
mod body;
mod camera_sync;
mod controller;
mod ground;
mod physics;
mod session;
mod state;

pub use basis::{TangentBasis, ViewFrame, DEFAULT_UP};
pub use body::BodyInfo;
pub use controller::{SurfaceWalker, WalkTelemetry};
pub use ground::GroundQuery;
pub use physics::{Grounding, StepParams};
pub use session::{EnterOptions, EnterRefusal, SessionContext, WalkWorld};
pub use state::{InputState, PlayerState};
