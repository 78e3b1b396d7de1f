/// Reads user-selected images from disk
use std::path::{Path, PathBuf};

use rfd::AsyncFileDialog;

use crate::error::{AcquireError, InputError};
use crate::state::data::ImagePayload;

/// File extensions offered in the picker
const IMAGE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Show the native file picker, filtered to supported images
pub async fn pick_image() -> Option<PathBuf> {
    AsyncFileDialog::new()
        .set_title("Select Coral Reef Image")
        .add_filter("Images", &IMAGE_EXTENSIONS)
        .pick_file()
        .await
        .map(|handle| handle.path().to_path_buf())
}

/// Load an image file into memory
///
/// The size limit is checked against file metadata first so that an
/// oversized file is never read. Format checks happen later in the
/// controller, against the bytes themselves.
pub async fn load_image(path: PathBuf, max_bytes: u64) -> Result<ImagePayload, AcquireError> {
    let io_err = |e: std::io::Error| AcquireError::Io {
        path: path.clone(),
        message: e.to_string(),
    };

    let metadata = tokio::fs::metadata(&path).await.map_err(io_err)?;
    if metadata.len() > max_bytes {
        return Err(InputError::TooLarge {
            size: metadata.len(),
            limit: max_bytes,
        }
        .into());
    }

    let bytes = tokio::fs::read(&path).await.map_err(io_err)?;
    let payload = ImagePayload::new(file_name(&path), bytes);

    tracing::info!(
        "📷 Loaded {} ({} KB, {:?})",
        payload.file_name(),
        payload.len() / 1024,
        payload.kind()
    );

    Ok(payload)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string()
}
