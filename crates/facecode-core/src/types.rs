/// Bounding box for a detected face, with optional facial landmarks.
#[derive(Debug, Clone)]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub confidence: f32,
    /// Five-point facial landmarks: [left_eye, right_eye, nose, left_mouth, right_mouth].
    pub landmarks: Option<[(f32, f32); 5]>,
}

/// Fixed-length descriptor of one detected face (512-dimensional for ArcFace).
#[derive(Debug, Clone, PartialEq)]
pub struct FaceEncoding {
    pub values: Vec<f32>,
}

impl FaceEncoding {
    pub fn new(values: Vec<f32>) -> Self {
        Self { values }
    }

    /// Dimensions of the encoding. Always one-dimensional: `[len]`.
    pub fn shape(&self) -> Vec<usize> {
        vec![self.values.len()]
    }

    /// Raw little-endian `f32` bytes, 4 per value.
    pub fn to_le_bytes(&self) -> Vec<u8> {
        self.values.iter().flat_map(|v| v.to_le_bytes()).collect()
    }

    /// Reinterpret little-endian bytes as `f32` values.
    ///
    /// Returns `None` if the length is not a multiple of 4.
    pub fn from_le_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() % 4 != 0 {
            return None;
        }
        let values = bytes
            .chunks_exact(4)
            .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
            .collect();
        Some(Self::new(values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_is_length() {
        let enc = FaceEncoding::new(vec![0.5; 128]);
        assert_eq!(enc.shape(), vec![128]);
    }

    #[test]
    fn test_le_bytes_layout() {
        let enc = FaceEncoding::new(vec![1.0]);
        // 1.0f32 = 0x3F800000, little-endian on the wire
        assert_eq!(enc.to_le_bytes(), vec![0x00, 0x00, 0x80, 0x3F]);
    }

    #[test]
    fn test_le_bytes_preserves_bits() {
        let values = vec![f32::MIN_POSITIVE, -0.0, 1.5e-8, f32::MAX, -123.456];
        let enc = FaceEncoding::new(values.clone());
        let back = FaceEncoding::from_le_bytes(&enc.to_le_bytes()).unwrap();
        for (a, b) in values.iter().zip(back.values.iter()) {
            assert_eq!(a.to_bits(), b.to_bits());
        }
    }

    #[test]
    fn test_from_le_bytes_rejects_partial_value() {
        assert!(FaceEncoding::from_le_bytes(&[0, 0, 0]).is_none());
    }
}
