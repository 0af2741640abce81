//! Shared view state behind explicit mutation entry points.

use image::DynamicImage;

use crate::geometry::{CropRect, DisplaySize};
use crate::ratio::RatioChoice;

/// The currently loaded image. Replaced wholesale on each successful load,
/// never mutated in place.
pub struct SourceImage {
    pub image: DynamicImage,
    /// True pixel dimensions as encoded in the source bytes.
    pub natural: (u32, u32),
}

impl SourceImage {
    pub fn new(image: DynamicImage) -> Self {
        let natural = (image.width(), image.height());
        Self { image, natural }
    }
}

/// Everything the view mutates — image, crop selection, ratio choice — in
/// one place, so the invariant that a crop rectangle never outlives the
/// image it was drawn on is enforced here and nowhere else.
#[derive(Default)]
pub struct CropperState {
    image: Option<SourceImage>,
    crop: Option<CropRect>,
    ratio: RatioChoice,
    /// Rendered size the current crop was drawn against.
    display: Option<DisplaySize>,
}

impl CropperState {
    pub fn image(&self) -> Option<&SourceImage> {
        self.image.as_ref()
    }

    pub fn natural(&self) -> Option<(u32, u32)> {
        self.image.as_ref().map(|img| img.natural)
    }

    pub fn crop(&self) -> Option<CropRect> {
        self.crop
    }

    pub fn display(&self) -> Option<DisplaySize> {
        self.display
    }

    pub fn ratio(&self) -> RatioChoice {
        self.ratio
    }

    /// Install a freshly loaded image. Any selection drawn on the previous
    /// image is dropped unconditionally — its coordinates mean nothing for
    /// the new one.
    pub fn set_image(&mut self, image: SourceImage) {
        self.image = Some(image);
        self.crop = None;
        self.display = None;
    }

    /// Latest rectangle pushed by the interactive editor, together with the
    /// rendered size it refers to.
    pub fn set_crop(&mut self, crop: CropRect, display: DisplaySize) {
        self.crop = Some(crop);
        self.display = Some(display);
    }

    pub fn clear_crop(&mut self) {
        self.crop = None;
        self.display = None;
    }

    /// Pure selection change. An already-drawn rectangle keeps its shape;
    /// the new constraint applies from the next drag.
    pub fn select_ratio(&mut self, ratio: RatioChoice) {
        self.ratio = ratio;
    }

    /// Ratio constraint for the next drag, resolved against whatever image
    /// is loaded right now.
    pub fn active_ratio(&self) -> Option<f32> {
        self.ratio.resolve(self.natural())
    }

    /// Keep the selection anchored to the same image region when the
    /// rendered size changes between frames (window resize).
    pub fn sync_display(&mut self, display: DisplaySize) {
        if let (Some(crop), Some(old)) = (self.crop, self.display) {
            if old != display {
                self.crop = Some(crop.rescaled(old, display).clamped(display));
            }
        }
        if self.crop.is_some() {
            self.display = Some(display);
        }
    }

    /// Export is offered only once there is an image and a usable selection.
    pub fn can_export(&self) -> bool {
        self.image.is_some() && self.crop.is_some_and(|c| !c.is_empty())
    }
}
