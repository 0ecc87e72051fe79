//! Face descriptor extraction: load → detect → encode.

use crate::encoder::{EncoderError, FaceEncoder};
use crate::loader::{ChainedLoader, ImageLoader, LoadError};
use crate::types::FaceEncoding;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use thiserror::Error;

pub const NO_FACE_MESSAGE: &str = "No face found";

/// Why an extraction produced no encoding.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExtractError {
    /// Wrong command-line usage. Produced by the CLI shell, never by the pipeline.
    #[error("{0}")]
    Usage(String),
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error("No face found")]
    NoFace,
    #[error("{0}")]
    Unexpected(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Usage,
    Load,
    NoFace,
    Unexpected,
}

impl ExtractError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ExtractError::Usage(_) => ErrorKind::Usage,
            ExtractError::Load(_) => ErrorKind::Load,
            ExtractError::NoFace => ErrorKind::NoFace,
            ExtractError::Unexpected(_) => ErrorKind::Unexpected,
        }
    }
}

impl From<EncoderError> for ExtractError {
    fn from(e: EncoderError) -> Self {
        ExtractError::Unexpected(e.to_string())
    }
}

/// The first face's encoding in transport form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedFace {
    /// Base64 (standard alphabet, padded) of the little-endian `f32` bytes.
    pub encoding: String,
    pub shape: Vec<usize>,
}

impl From<&FaceEncoding> for EncodedFace {
    fn from(face: &FaceEncoding) -> Self {
        Self {
            encoding: STANDARD.encode(face.to_le_bytes()),
            shape: face.shape(),
        }
    }
}

/// Runs one image through an [`ImageLoader`] and a [`FaceEncoder`].
pub struct FaceExtractor<E, L = ChainedLoader> {
    loader: L,
    encoder: E,
}

impl<E: FaceEncoder> FaceExtractor<E> {
    /// Extractor with the default extension-then-sniffing loader chain.
    pub fn new(encoder: E) -> Self {
        Self::with_loader(ChainedLoader::default(), encoder)
    }
}

impl<E: FaceEncoder, L: ImageLoader> FaceExtractor<E, L> {
    pub fn with_loader(loader: L, encoder: E) -> Self {
        Self { loader, encoder }
    }

    /// Encode the first face found in the image at `image_path`.
    ///
    /// Panics raised inside the loader or encoder are reported as
    /// [`ExtractError::Unexpected`].
    pub fn encode_face(
        &mut self,
        image_path: impl AsRef<Path>,
    ) -> Result<EncodedFace, ExtractError> {
        let path = image_path.as_ref();
        panic::catch_unwind(AssertUnwindSafe(|| self.run(path))).unwrap_or_else(|payload| {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "face extraction panicked".to_string());
            tracing::error!(path = %path.display(), %message, "panic during extraction");
            Err(ExtractError::Unexpected(message))
        })
    }

    fn run(&mut self, path: &Path) -> Result<EncodedFace, ExtractError> {
        tracing::debug!(path = %path.display(), "attempting to load");
        let image = self.loader.load(path)?;
        tracing::debug!(width = image.width(), height = image.height(), "image decoded");

        let encodings = self.encoder.encode(&image)?;
        let first = encodings.first().ok_or(ExtractError::NoFace)?;

        let encoded = EncodedFace::from(first);
        tracing::info!(
            path = %path.display(),
            shape = ?encoded.shape,
            faces = encodings.len(),
            "face encoded"
        );
        Ok(encoded)
    }
}
