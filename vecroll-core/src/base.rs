//! Core functionalities.
mod context;
mod encoder;
mod env;
mod policy;
mod step;
pub use context::RollingContext;
pub use encoder::{IdentityEncoder, ObsEncoder};
pub use env::VecEnv;
pub use policy::{Configurable, Policy};
pub use step::{Info, VecStep};
