// ── Domain model ──

pub mod device;
pub mod variable;

pub use device::{DeviceHandle, Member};
pub use variable::VariableType;
