use facecode_core::OnnxEncoderOptions;
use std::path::PathBuf;
use std::str::FromStr;

/// CLI configuration, loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory containing ONNX model files.
    pub model_dir: PathBuf,
    /// SCRFD model file name inside `model_dir`.
    pub detector_model: String,
    /// ArcFace model file name inside `model_dir`.
    pub recognizer_model: String,
    /// Minimum SCRFD score for a detection to count as a face.
    pub confidence_threshold: f32,
    /// ONNX Runtime intra-op thread count.
    pub intra_threads: usize,
    /// Debug logging (the load path is logged to stderr).
    pub debug: bool,
}

impl Config {
    /// Load configuration from `FACECODE_*` environment variables with defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Self {
        let model_dir = var("FACECODE_MODEL_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                var("XDG_DATA_HOME")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| {
                        let home = var("HOME").unwrap_or_else(|| "/tmp".to_string());
                        PathBuf::from(home).join(".local/share")
                    })
                    .join("facecode/models")
            });

        Self {
            model_dir,
            detector_model: var("FACECODE_DETECTOR_MODEL")
                .unwrap_or_else(|| "det_10g.onnx".to_string()),
            recognizer_model: var("FACECODE_RECOGNIZER_MODEL")
                .unwrap_or_else(|| "w600k_r50.onnx".to_string()),
            confidence_threshold: parse_var(&var, "FACECODE_CONFIDENCE_THRESHOLD").unwrap_or(0.5),
            intra_threads: parse_var(&var, "FACECODE_INTRA_THREADS")
                .filter(|&n: &usize| n > 0)
                .unwrap_or(2),
            debug: var("FACECODE_DEBUG").is_some_and(|v| is_truthy(&v)),
        }
    }

    pub fn encoder_options(&self) -> OnnxEncoderOptions {
        OnnxEncoderOptions {
            confidence_threshold: self.confidence_threshold,
            intra_threads: self.intra_threads,
            ..OnnxEncoderOptions::new(
                self.model_dir.join(&self.detector_model),
                self.model_dir.join(&self.recognizer_model),
            )
        }
    }
}

/// `1`, `true`, `yes` or `on`, ignoring case and surrounding whitespace.
fn is_truthy(value: &str) -> bool {
    let value = value.trim();
    ["1", "true", "yes", "on"]
        .iter()
        .any(|t| value.eq_ignore_ascii_case(t))
}

fn parse_var<T: FromStr>(var: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T> {
    var(key).and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Config {
        let map: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let cfg = config(&[("HOME", "/home/alice")]);
        assert_eq!(cfg.model_dir, PathBuf::from("/home/alice/.local/share/facecode/models"));
        assert_eq!(cfg.detector_model, "det_10g.onnx");
        assert_eq!(cfg.recognizer_model, "w600k_r50.onnx");
        assert!((cfg.confidence_threshold - 0.5).abs() < 1e-6);
        assert_eq!(cfg.intra_threads, 2);
        assert!(!cfg.debug);
    }

    #[test]
    fn test_xdg_data_home() {
        let cfg = config(&[("XDG_DATA_HOME", "/data"), ("HOME", "/home/alice")]);
        assert_eq!(cfg.model_dir, PathBuf::from("/data/facecode/models"));
    }

    #[test]
    fn test_overrides() {
        let cfg = config(&[
            ("FACECODE_MODEL_DIR", "/opt/models"),
            ("FACECODE_DETECTOR_MODEL", "scrfd_2.5g.onnx"),
            ("FACECODE_CONFIDENCE_THRESHOLD", "0.7"),
            ("FACECODE_INTRA_THREADS", "4"),
            ("FACECODE_DEBUG", "1"),
        ]);
        let opts = cfg.encoder_options();
        assert_eq!(opts.detector_model, PathBuf::from("/opt/models/scrfd_2.5g.onnx"));
        assert_eq!(opts.recognizer_model, PathBuf::from("/opt/models/w600k_r50.onnx"));
        assert!((opts.confidence_threshold - 0.7).abs() < 1e-6);
        assert_eq!(opts.intra_threads, 4);
        assert_eq!(opts.max_faces, 1);
        assert!(cfg.debug);
    }

    #[test]
    fn test_invalid_numbers_fall_back() {
        let cfg = config(&[
            ("FACECODE_CONFIDENCE_THRESHOLD", "high"),
            ("FACECODE_INTRA_THREADS", "0"),
            ("FACECODE_DEBUG", "0"),
        ]);
        assert!((cfg.confidence_threshold - 0.5).abs() < 1e-6);
        assert_eq!(cfg.intra_threads, 2);
        assert!(!cfg.debug);
    }

    #[test]
    fn test_debug_accepts_only_truthy_values() {
        for on in ["1", "true", "TRUE", "Yes", " on "] {
            assert!(config(&[("FACECODE_DEBUG", on)]).debug, "{on:?} should enable debug");
        }
        for off in ["", "0", "false", "False", "no", "off", "2"] {
            assert!(!config(&[("FACECODE_DEBUG", off)]).debug, "{off:?} should not enable debug");
        }
    }
}
