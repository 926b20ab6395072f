pub mod actions;
pub mod clip_ops;
pub mod gesture;
pub mod transport;
