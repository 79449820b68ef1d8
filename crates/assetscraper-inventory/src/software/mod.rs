//! Installed software providers

pub mod dpkg;
pub mod registry;
pub mod rpm;
pub mod system_profiler;

pub use dpkg::DpkgProvider;
pub use registry::{PartialFailurePolicy, RegistryProvider};
pub use rpm::RpmProvider;
pub use system_profiler::SystemProfilerProvider;
