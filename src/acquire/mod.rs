/// Image acquisition module
///
/// This module handles:
/// - Picking an image with the native file dialog
/// - Reading the image bytes from disk (size-checked before reading)
/// - Generating the downscaled preview shown before analysis

pub mod loader;
pub mod preview;

pub use loader::{load_image, pick_image};
pub use preview::generate_preview;
