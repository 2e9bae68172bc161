//! Image file ingestion

mod loader;

pub use loader::{ImageError, ImageLoader, MAX_IMAGE_BYTES};
