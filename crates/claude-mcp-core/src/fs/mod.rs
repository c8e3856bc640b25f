//! Filesystem primitives shared across features.

pub mod atomic;
pub mod path;

pub use atomic::atomic_write;
pub use path::{absolutize, normalize_path};
