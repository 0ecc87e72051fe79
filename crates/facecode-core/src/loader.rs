//! Image decoding into the RGB pixel array the encoder consumes.
//!
//! The primary loader trusts the file extension; the fallback sniffs the
//! format from the file contents. [`ChainedLoader`] tries them in order.

use image::{DynamicImage, ImageReader, RgbImage};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    #[error("{0}")]
    Decode(String),
    #[error("image dimensions are zero")]
    ZeroDimensions,
    /// Both loaders failed. Displays as `"<primary>; <fallback>"`.
    #[error("{primary}; {fallback}")]
    Exhausted {
        primary: Box<LoadError>,
        fallback: Box<LoadError>,
    },
}

/// Decodes an image file into an RGB pixel array.
pub trait ImageLoader {
    fn load(&self, path: &Path) -> Result<RgbImage, LoadError>;
}

/// Decodes by file extension via [`image::open`].
#[derive(Debug, Default, Clone, Copy)]
pub struct ExtensionLoader;

impl ImageLoader for ExtensionLoader {
    fn load(&self, path: &Path) -> Result<RgbImage, LoadError> {
        let image = image::open(path).map_err(|e| LoadError::Decode(e.to_string()))?;
        to_rgb(image)
    }
}

/// Decodes by sniffing the format from the file's leading bytes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SniffingLoader;

impl ImageLoader for SniffingLoader {
    fn load(&self, path: &Path) -> Result<RgbImage, LoadError> {
        let image = ImageReader::open(path)
            .map_err(|e| LoadError::Decode(e.to_string()))?
            .with_guessed_format()
            .map_err(|e| LoadError::Decode(e.to_string()))?
            .decode()
            .map_err(|e| LoadError::Decode(e.to_string()))?;
        to_rgb(image)
    }
}

/// Tries `primary`, then `fallback` if the primary fails.
#[derive(Debug, Default, Clone)]
pub struct ChainedLoader<P = ExtensionLoader, F = SniffingLoader> {
    primary: P,
    fallback: F,
}

impl<P: ImageLoader, F: ImageLoader> ChainedLoader<P, F> {
    pub fn new(primary: P, fallback: F) -> Self {
        Self { primary, fallback }
    }
}

impl<P: ImageLoader, F: ImageLoader> ImageLoader for ChainedLoader<P, F> {
    fn load(&self, path: &Path) -> Result<RgbImage, LoadError> {
        let primary = match self.primary.load(path) {
            Ok(image) => return Ok(image),
            Err(e) => e,
        };
        tracing::debug!(
            path = %path.display(),
            error = %primary,
            "primary decode failed, trying fallback"
        );

        self.fallback.load(path).map_err(|fallback| LoadError::Exhausted {
            primary: Box::new(primary),
            fallback: Box::new(fallback),
        })
    }
}

fn to_rgb(image: DynamicImage) -> Result<RgbImage, LoadError> {
    if image.width() == 0 || image.height() == 0 {
        return Err(LoadError::ZeroDimensions);
    }
    Ok(image.into_rgb8())
}
