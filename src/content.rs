//! Document loading and slice dispatch
//!
//! Reads slice documents from disk and decodes envelopes into concrete
//! slice payloads. Shape validation happens here, at the loading boundary
//! — the renderers downstream are total over whatever this module hands
//! them.

use crate::types::{SliceDocument, SliceEnvelope, TestimonialSlice};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Bundled sample document shown on first launch.
pub const SAMPLE_DOCUMENT: &str = include_str!("../assets/sample-document.json");

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid slice document: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Load and parse a slice document from disk.
pub fn load_file(path: &Path) -> Result<SliceDocument, ContentError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ContentError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let doc = parse_document(&raw)?;
    debug!(path = %path.display(), slices = doc.slices.len(), "Document loaded");
    Ok(doc)
}

/// Parse a slice document from a JSON string.
pub fn parse_document(raw: &str) -> Result<SliceDocument, ContentError> {
    Ok(serde_json::from_str(raw)?)
}

/// The bundled sample document. The asset is compiled in, so parsing it
/// can only fail at development time.
pub fn sample_document() -> SliceDocument {
    serde_json::from_str(SAMPLE_DOCUMENT).unwrap()
}

/// Decode a testimonial envelope into its concrete payload. The envelope's
/// `slice_type` and `variation` carry over verbatim.
pub fn decode_testimonial(env: &SliceEnvelope) -> Result<TestimonialSlice, serde_json::Error> {
    Ok(TestimonialSlice {
        slice_type: env.slice_type.clone(),
        variation: env.variation.clone(),
        primary: serde_json::from_value(env.primary.clone())?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sample_document_parses() {
        let doc = sample_document();
        assert!(!doc.slices.is_empty());
        assert!(doc.slices.iter().any(|s| s.slice_type == "testimonial"));
    }

    #[test]
    fn envelope_fields_carry_over_verbatim() {
        let env: SliceEnvelope = serde_json::from_value(json!({
            "slice_type": "testimonial",
            "variation": "withDarkBackground",
            "primary": { "author_name": "Jane Doe" },
        }))
        .unwrap();

        let slice = decode_testimonial(&env).unwrap();
        assert_eq!(slice.slice_type, "testimonial");
        assert_eq!(slice.variation, "withDarkBackground");
        assert_eq!(slice.primary.author_name, "Jane Doe");
    }

    #[test]
    fn malformed_primary_is_a_decode_error() {
        let env: SliceEnvelope = serde_json::from_value(json!({
            "slice_type": "testimonial",
            "primary": { "quote": 42 },
        }))
        .unwrap();

        assert!(decode_testimonial(&env).is_err());
    }

    #[test]
    fn document_parse_rejects_garbage() {
        assert!(parse_document("not json").is_err());
        assert!(parse_document("{\"slices\": {}}").is_err());
    }

    #[test]
    fn empty_document_is_valid() {
        let doc = parse_document("{}").unwrap();
        assert!(doc.slices.is_empty());
        assert!(doc.title.is_none());
    }
}
