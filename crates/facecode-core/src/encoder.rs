//! Face encoding capability: pixel array in, zero or more encodings out.

use crate::detector::{DetectorError, FaceDetector, SCRFD_DEFAULT_CONFIDENCE};
use crate::recognizer::{FaceRecognizer, RecognizerError};
use crate::types::FaceEncoding;
use image::RgbImage;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EncoderError {
    #[error(transparent)]
    Detector(#[from] DetectorError),
    #[error(transparent)]
    Recognizer(#[from] RecognizerError),
}

/// Produces one encoding per detected face, in a deterministic order.
pub trait FaceEncoder {
    fn encode(&mut self, image: &RgbImage) -> Result<Vec<FaceEncoding>, EncoderError>;
}

/// Where to find the ONNX models and how to run them.
#[derive(Debug, Clone)]
pub struct OnnxEncoderOptions {
    pub detector_model: PathBuf,
    pub recognizer_model: PathBuf,
    pub confidence_threshold: f32,
    pub intra_threads: usize,
    /// Faces past this many (in detector order) are not run through the recognizer.
    pub max_faces: usize,
}

impl OnnxEncoderOptions {
    pub fn new(detector_model: impl Into<PathBuf>, recognizer_model: impl Into<PathBuf>) -> Self {
        Self {
            detector_model: detector_model.into(),
            recognizer_model: recognizer_model.into(),
            confidence_threshold: SCRFD_DEFAULT_CONFIDENCE,
            intra_threads: 2,
            max_faces: 1,
        }
    }
}

struct Models {
    detector: FaceDetector,
    recognizer: FaceRecognizer,
}

/// SCRFD detection + ArcFace recognition.
///
/// Models are loaded on the first call to [`FaceEncoder::encode`].
pub struct OnnxFaceEncoder {
    options: OnnxEncoderOptions,
    models: Option<Models>,
}

impl OnnxFaceEncoder {
    pub fn new(options: OnnxEncoderOptions) -> Self {
        Self { options, models: None }
    }

    fn models(&mut self) -> Result<&mut Models, EncoderError> {
        let opts = &self.options;
        match &mut self.models {
            Some(models) => Ok(models),
            slot @ None => {
                let detector = FaceDetector::load(&opts.detector_model, opts.intra_threads)?
                    .with_confidence_threshold(opts.confidence_threshold);
                let recognizer = FaceRecognizer::load(&opts.recognizer_model, opts.intra_threads)?;
                Ok(slot.insert(Models { detector, recognizer }))
            }
        }
    }
}

impl FaceEncoder for OnnxFaceEncoder {
    fn encode(&mut self, image: &RgbImage) -> Result<Vec<FaceEncoding>, EncoderError> {
        let max_faces = self.options.max_faces;
        let models = self.models()?;

        let faces = models.detector.detect(image)?;
        tracing::debug!(detected = faces.len(), max_faces, "faces detected");

        faces
            .iter()
            .take(max_faces)
            .map(|face| {
                tracing::debug!(
                    confidence = face.confidence,
                    x = face.x,
                    y = face.y,
                    "encoding face"
                );
                models.recognizer.extract(image, face).map_err(EncoderError::from)
            })
            .collect()
    }
}
