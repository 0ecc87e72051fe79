//! The JSON record printed for every invocation, and its consumer-side decoding.
//!
//! Success: `{"success":true,"encoding":"<base64>","shape":[512]}`
//! Failure: `{"success":false,"error":"No face found"}`

use crate::extractor::{EncodedFace, ExtractError};
use crate::types::FaceEncoding;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("encoding failed: {0}")]
    Failed(String),
    #[error("malformed report: {0}")]
    Malformed(&'static str),
    #[error("invalid base64 encoding: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("encoding has {bytes} bytes, expected {expected} for shape {shape:?}")]
    Length {
        bytes: usize,
        expected: usize,
        shape: Vec<usize>,
    },
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncodeReport {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<Vec<usize>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl EncodeReport {
    pub fn success(encoding: String, shape: Vec<usize>) -> Self {
        Self {
            success: true,
            encoding: Some(encoding),
            shape: Some(shape),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            encoding: None,
            shape: None,
            error: Some(error.into()),
        }
    }

    /// Record for a wrong argument count, carried as [`ExtractError::Usage`].
    pub fn usage(program: &str) -> Self {
        Self::from(Err(ExtractError::Usage(usage_message(program))))
    }

    /// Single-line JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parse a record and check that exactly one of the success/failure shapes is present.
    pub fn from_json(text: &str) -> Result<Self, ReportError> {
        let report: Self = serde_json::from_str(text.trim())?;
        let present = (
            report.encoding.is_some(),
            report.shape.is_some(),
            report.error.is_some(),
        );
        match (report.success, present) {
            (true, (true, true, false)) | (false, (false, false, true)) => Ok(report),
            (true, ..) => Err(ReportError::Malformed("success requires encoding and shape only")),
            (false, ..) => Err(ReportError::Malformed("failure requires an error only")),
        }
    }

    /// Recover the face encoding from a successful record.
    ///
    /// The decoded byte count must equal 4 × the product of `shape`.
    pub fn decode_encoding(&self) -> Result<FaceEncoding, ReportError> {
        if !self.success {
            return Err(ReportError::Failed(self.error.clone().unwrap_or_default()));
        }
        let (Some(encoding), Some(shape)) = (&self.encoding, &self.shape) else {
            return Err(ReportError::Malformed("success requires encoding and shape only"));
        };

        let bytes = STANDARD.decode(encoding)?;
        let expected = shape
            .iter()
            .try_fold(std::mem::size_of::<f32>(), |acc, &dim| acc.checked_mul(dim))
            .ok_or(ReportError::Malformed("shape too large"))?;
        if bytes.len() != expected {
            return Err(ReportError::Length {
                bytes: bytes.len(),
                expected,
                shape: shape.clone(),
            });
        }

        FaceEncoding::from_le_bytes(&bytes).ok_or(ReportError::Length {
            bytes: bytes.len(),
            expected,
            shape: shape.clone(),
        })
    }
}

impl From<Result<EncodedFace, ExtractError>> for EncodeReport {
    fn from(result: Result<EncodedFace, ExtractError>) -> Self {
        match result {
            Ok(face) => Self::success(face.encoding, face.shape),
            Err(e) => Self::failure(e.to_string()),
        }
    }
}

pub fn usage_message(program: &str) -> String {
    format!("Usage: {program} <image_path>")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::ErrorKind;
    use serde_json::{json, Value};

    #[test]
    fn test_success_json_shape() {
        let report = EncodeReport::success("AACAPw==".into(), vec![1]);
        let value: Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(value, json!({"success": true, "encoding": "AACAPw==", "shape": [1]}));
    }

    #[test]
    fn test_no_face_json_is_exact() {
        let report = EncodeReport::from(Err(ExtractError::NoFace));
        assert_eq!(report.to_json().unwrap(), r#"{"success":false,"error":"No face found"}"#);
    }

    #[test]
    fn test_usage_message() {
        let report = EncodeReport::usage("facecode");
        assert!(!report.success);
        assert_eq!(report.error.as_deref(), Some("Usage: facecode <image_path>"));
    }

    #[test]
    fn test_usage_goes_through_extract_error() {
        let err = ExtractError::Usage(usage_message("facecode"));
        assert_eq!(err.kind(), ErrorKind::Usage);
        assert_eq!(EncodeReport::from(Err(err)), EncodeReport::usage("facecode"));
    }

    #[test]
    fn test_json_is_single_line() {
        let report = EncodeReport::failure("line one\nline two");
        assert!(!report.to_json().unwrap().contains('\n'));
    }

    #[test]
    fn test_decode_reproduces_bits() {
        let original = FaceEncoding::new(vec![0.1, -2.5e-7, 3.75, f32::EPSILON]);
        let report = EncodeReport::from(Ok(EncodedFace::from(&original)));
        let text = report.to_json().unwrap();

        let decoded = EncodeReport::from_json(&text).unwrap().decode_encoding().unwrap();
        let bits = |e: &FaceEncoding| e.values.iter().map(|v| v.to_bits()).collect::<Vec<_>>();
        assert_eq!(bits(&decoded), bits(&original));
    }

    #[test]
    fn test_decode_failure_report() {
        let report = EncodeReport::failure("No face found");
        let err = report.decode_encoding().unwrap_err();
        assert!(matches!(err, ReportError::Failed(ref m) if m == "No face found"));
    }

    #[test]
    fn test_decode_length_mismatch() {
        // 1 float of data, shape claims 2
        let report = EncodeReport::success("AACAPw==".into(), vec![2]);
        assert!(matches!(
            report.decode_encoding(),
            Err(ReportError::Length { bytes: 4, expected: 8, .. })
        ));
    }

    #[test]
    fn test_decode_rejects_overflowing_shape() {
        let report = EncodeReport::success("AACAPw==".into(), vec![usize::MAX, 2]);
        assert!(matches!(
            report.decode_encoding(),
            Err(ReportError::Malformed("shape too large"))
        ));
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn test_decode_rejects_overflowing_shape_from_json() {
        let text = r#"{"success":true,"encoding":"AACAPw==","shape":[4294967296,4294967296]}"#;
        let report = EncodeReport::from_json(text).unwrap();
        assert!(matches!(
            report.decode_encoding(),
            Err(ReportError::Malformed("shape too large"))
        ));
    }

    #[test]
    fn test_decode_bad_base64() {
        let report = EncodeReport::success("not base64!".into(), vec![1]);
        assert!(matches!(report.decode_encoding(), Err(ReportError::Base64(_))));
    }

    #[test]
    fn test_from_json_rejects_both_shapes() {
        let text = r#"{"success":true,"encoding":"AACAPw==","shape":[1],"error":"x"}"#;
        assert!(matches!(EncodeReport::from_json(text), Err(ReportError::Malformed(_))));

        let text = r#"{"success":false}"#;
        assert!(matches!(EncodeReport::from_json(text), Err(ReportError::Malformed(_))));
    }
}
