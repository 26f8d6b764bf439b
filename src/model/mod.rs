pub mod loader;
pub mod network;
