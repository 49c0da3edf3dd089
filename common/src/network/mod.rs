pub mod device;
pub mod subnet;
pub mod target;
