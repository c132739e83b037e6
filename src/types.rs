//! Content payload types
//!
//! Serde model for the slice documents the previewer consumes. The shape
//! mirrors what a headless CMS delivers: a document is an ordered list of
//! slices, each tagged with `slice_type`/`variation` and carrying its
//! fields under `primary`. All fields are optional from the renderer's
//! perspective; absent values decode to well-defined empty sentinels.

use serde::Deserialize;

/// A slice document: ordered, independently authored content blocks.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SliceDocument {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub slices: Vec<SliceEnvelope>,
}

/// Envelope common to every slice. `primary` stays raw JSON until dispatch
/// decides which concrete payload type it decodes into.
#[derive(Debug, Clone, Deserialize)]
pub struct SliceEnvelope {
    pub slice_type: String,
    #[serde(default)]
    pub variation: String,
    #[serde(default)]
    pub primary: serde_json::Value,
}

/// Testimonial slice payload.
#[derive(Debug, Clone, Deserialize)]
pub struct TestimonialSlice {
    pub slice_type: String,
    #[serde(default)]
    pub variation: String,
    #[serde(default)]
    pub primary: TestimonialPrimary,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TestimonialPrimary {
    #[serde(default)]
    pub logo: ImageField,
    #[serde(default)]
    pub quote: RichText,
    #[serde(default)]
    pub avatar: ImageField,
    #[serde(default)]
    pub author_name: String,
    #[serde(default)]
    pub author_position: String,
    #[serde(default)]
    pub author_company: String,
}

/// Image reference. An absent field, an empty object or an empty `url`
/// string all count as the "no image" sentinel.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ImageField {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub alt: Option<String>,
    #[serde(default)]
    pub dimensions: Option<ImageDimensions>,
}

impl ImageField {
    pub fn is_empty(&self) -> bool {
        self.url.as_deref().map_or(true, str::is_empty)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ImageDimensions {
    pub width: u32,
    pub height: u32,
}

/// Rich text document: an ordered sequence of block-level nodes.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct RichText {
    pub blocks: Vec<RichTextBlock>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RichTextBlock {
    #[serde(rename = "type")]
    pub kind: BlockKind,
    #[serde(default)]
    pub text: String,
}

/// Block-level node kinds. Unknown kinds decode to `Other` and render
/// with the plain default presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlockKind {
    Paragraph,
    Heading1,
    Heading2,
    Heading3,
    Heading4,
    Heading5,
    Heading6,
    ListItem,
    OListItem,
    Preformatted,
    #[serde(other)]
    Other,
}

impl BlockKind {
    pub fn is_heading(self) -> bool {
        matches!(
            self,
            BlockKind::Heading1
                | BlockKind::Heading2
                | BlockKind::Heading3
                | BlockKind::Heading4
                | BlockKind::Heading5
                | BlockKind::Heading6
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_object_is_image_sentinel() {
        let img: ImageField = serde_json::from_value(json!({})).unwrap();
        assert!(img.is_empty());

        let img: ImageField = serde_json::from_value(json!({ "url": "" })).unwrap();
        assert!(img.is_empty());

        let img: ImageField =
            serde_json::from_value(json!({ "url": "https://cdn.example/logo.png" })).unwrap();
        assert!(!img.is_empty());
    }

    #[test]
    fn primary_fields_default_when_absent() {
        let primary: TestimonialPrimary = serde_json::from_value(json!({})).unwrap();
        assert!(primary.logo.is_empty());
        assert!(primary.avatar.is_empty());
        assert!(primary.quote.blocks.is_empty());
        assert_eq!(primary.author_name, "");
        assert_eq!(primary.author_position, "");
        assert_eq!(primary.author_company, "");
    }

    #[test]
    fn block_kinds_decode_from_cms_names() {
        let blocks: Vec<RichTextBlock> = serde_json::from_value(json!([
            { "type": "paragraph", "text": "a" },
            { "type": "heading2", "text": "b" },
            { "type": "list-item", "text": "c" },
            { "type": "o-list-item", "text": "d" },
            { "type": "preformatted", "text": "e" },
            { "type": "embed", "text": "f" },
        ]))
        .unwrap();

        let kinds: Vec<BlockKind> = blocks.iter().map(|b| b.kind).collect();
        assert_eq!(
            kinds,
            vec![
                BlockKind::Paragraph,
                BlockKind::Heading2,
                BlockKind::ListItem,
                BlockKind::OListItem,
                BlockKind::Preformatted,
                BlockKind::Other,
            ]
        );
        assert!(blocks[1].kind.is_heading());
        assert!(!blocks[0].kind.is_heading());
    }

    #[test]
    fn image_dimensions_decode() {
        let img: ImageField = serde_json::from_value(json!({
            "url": "https://cdn.example/avatar.jpg",
            "alt": "Jane",
            "dimensions": { "width": 128, "height": 96 },
        }))
        .unwrap();
        assert_eq!(img.dimensions, Some(ImageDimensions { width: 128, height: 96 }));
        assert_eq!(img.alt.as_deref(), Some("Jane"));
    }
}
