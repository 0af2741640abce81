//! Image source acquisition: local files, fetched URLs, and the worker
//! threads that keep reading and decoding off the UI thread.

use std::path::{Path, PathBuf};
use std::sync::mpsc::SyncSender;
use std::time::Duration;

use eframe::egui;

use crate::error::CropError;
use crate::state::SourceImage;

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// One pending acquisition, from either input surface.
pub enum LoadRequest {
    File(PathBuf),
    Url(String),
}

impl LoadRequest {
    fn label(&self) -> String {
        match self {
            LoadRequest::File(path) => path.display().to_string(),
            LoadRequest::Url(url) => url.clone(),
        }
    }
}

/// Result of one background load, delivered to the view over a channel.
pub type LoadOutcome = Result<SourceImage, CropError>;

/// Read and decode a local image file.
pub fn load_file(path: &Path) -> Result<SourceImage, CropError> {
    let bytes = std::fs::read(path).map_err(|source| CropError::FileRead {
        path: path.display().to_string(),
        source,
    })?;
    decode(&bytes)
}

/// Fetch an image over HTTP and decode the response body.
///
/// A non-success status is an error, and so is a `Content-Type` that is
/// present but not `image/*` — decoding an HTML error page would only fail
/// later with a less useful message.
pub fn fetch_url(url: &str) -> Result<SourceImage, CropError> {
    let client = reqwest::blocking::Client::builder()
        .timeout(FETCH_TIMEOUT)
        .build()
        .map_err(|e| CropError::Fetch(e.to_string()))?;

    let response = client
        .get(url)
        .send()
        .map_err(|e| CropError::Fetch(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(CropError::HttpStatus(status.as_u16()));
    }

    if let Some(content_type) = response.headers().get(reqwest::header::CONTENT_TYPE) {
        if let Ok(content_type) = content_type.to_str() {
            if !is_image_content_type(content_type) {
                return Err(CropError::NotAnImage(content_type.to_string()));
            }
        }
    }

    let bytes = response.bytes().map_err(|e| CropError::Fetch(e.to_string()))?;
    decode(&bytes)
}

fn decode(bytes: &[u8]) -> Result<SourceImage, CropError> {
    let image = image::load_from_memory(bytes)?;
    Ok(SourceImage::new(image))
}

fn is_image_content_type(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .map(|base| base.trim().to_ascii_lowercase().starts_with("image/"))
        .unwrap_or(false)
}

/// Kick off a background load; the outcome lands on `tx` and the context is
/// repainted so the next frame drains it.
///
/// Overlapping loads are not cancelled — whichever resolves last wins. For a
/// single-user tool that race is accepted rather than sequenced away.
pub fn spawn_load(request: LoadRequest, tx: SyncSender<LoadOutcome>, ctx: egui::Context) {
    std::thread::spawn(move || {
        let origin = request.label();
        let result = match request {
            LoadRequest::File(path) => load_file(&path),
            LoadRequest::Url(url) => fetch_url(&url),
        };
        match &result {
            Ok(image) => {
                log::info!(
                    "loaded {} ({}x{})",
                    origin,
                    image.natural.0,
                    image.natural.1
                );
            }
            Err(err) => log::warn!("image load failed ({origin}): {err}"),
        }
        let _ = tx.send(result);
        ctx.request_repaint();
    });
}
