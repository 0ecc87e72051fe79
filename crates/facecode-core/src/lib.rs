//! facecode-core: face descriptor extraction.
//!
//! Decodes an image, finds faces with SCRFD, encodes the first one with
//! ArcFace (both via ONNX Runtime) and renders the outcome as a JSON record.

pub mod alignment;
pub mod detector;
pub mod encoder;
pub mod extractor;
pub mod loader;
pub mod recognizer;
pub mod report;
pub mod types;

pub use detector::FaceDetector;
pub use encoder::{FaceEncoder, OnnxEncoderOptions, OnnxFaceEncoder};
pub use extractor::{EncodedFace, ErrorKind, ExtractError, FaceExtractor};
pub use loader::{ChainedLoader, ImageLoader, LoadError};
pub use recognizer::FaceRecognizer;
pub use report::EncodeReport;
pub use types::{BoundingBox, FaceEncoding};
