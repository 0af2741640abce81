use std::io;

use thiserror::Error;

/// Everything that can go wrong between picking a source and writing the
/// cropped PNG. All variants are handled where they occur; none of them
/// tears down the view.
#[derive(Debug, Error)]
pub enum CropError {
    #[error("failed to read {path}: {source}")]
    FileRead {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("fetch failed: {0}")]
    Fetch(String),

    #[error("server answered HTTP {0}")]
    HttpStatus(u16),

    #[error("response is not an image: {0}")]
    NotAnImage(String),

    #[error("could not decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("crop selection covers no source pixels")]
    EmptySelection,

    #[error("failed to encode PNG: {0}")]
    Encode(image::ImageError),

    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: io::Error,
    },
}
