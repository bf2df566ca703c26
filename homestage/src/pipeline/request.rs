//! Request types for staging and refinement.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::catalog::{find_room, find_style, InteriorStyle, RoomType};
use crate::errors::ValidationError;

/// Source image for a staging run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceImage {
    /// An already-hosted image.
    Url {
        /// The image location.
        url: String,
    },
    /// Raw uploaded bytes, sent inline as a data URI.
    Bytes {
        /// The image bytes.
        data: Vec<u8>,
        /// The MIME type of the bytes.
        mime_type: String,
    },
}

impl SourceImage {
    /// Wraps a hosted image URL.
    #[must_use]
    pub fn url(url: impl Into<String>) -> Self {
        Self::Url { url: url.into() }
    }

    /// Wraps raw uploaded bytes.
    #[must_use]
    pub fn bytes(data: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self::Bytes {
            data,
            mime_type: mime_type.into(),
        }
    }

    /// The value handed to the capability payload: hosted URLs pass
    /// through, bytes are inlined as a data URI.
    #[must_use]
    pub fn to_payload_value(&self) -> String {
        match self {
            Self::Url { url } => url.clone(),
            Self::Bytes { data, mime_type } => {
                format!("data:{mime_type};base64,{}", BASE64.encode(data))
            }
        }
    }
}

/// Input bundle for a full staging run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagingRequest {
    /// The uploaded room photo.
    pub source: SourceImage,
    /// Selected room type id, resolved against the catalog.
    pub room_type_id: String,
    /// Selected interior style id, resolved against the catalog.
    pub style_id: String,
    /// Optional free-text instruction, subordinate to the stage prompts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_instruction: Option<String>,
}

impl StagingRequest {
    /// Creates a request for the given source and selectors.
    #[must_use]
    pub fn new(
        source: SourceImage,
        room_type_id: impl Into<String>,
        style_id: impl Into<String>,
    ) -> Self {
        Self {
            source,
            room_type_id: room_type_id.into(),
            style_id: style_id.into(),
            user_instruction: None,
        }
    }

    /// Attaches a free-text user instruction.
    #[must_use]
    pub fn with_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.user_instruction = Some(instruction.into());
        self
    }

    /// Resolves the selectors against the catalogs.
    ///
    /// Unresolved selectors are a client error; this runs before any
    /// external call is attempted.
    pub fn resolve(&self) -> Result<ResolvedSelection, ValidationError> {
        let room = find_room(&self.room_type_id)
            .ok_or_else(|| ValidationError::unknown_room(&self.room_type_id))?;
        let style = find_style(&self.style_id)
            .ok_or_else(|| ValidationError::unknown_style(&self.style_id))?;
        Ok(ResolvedSelection { room, style })
    }
}

/// Catalog entries a request resolved to.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedSelection {
    /// The resolved room type.
    pub room: &'static RoomType,
    /// The resolved interior style.
    pub style: &'static InteriorStyle,
}

/// A standalone repair request against an already-staged image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefinementRequest {
    /// The staged image to correct.
    pub image_url: String,
    /// The natural-language correction to apply.
    pub correction: String,
}

impl RefinementRequest {
    /// Creates a refinement request.
    #[must_use]
    pub fn new(image_url: impl Into<String>, correction: impl Into<String>) -> Self {
        Self {
            image_url: image_url.into(),
            correction: correction.into(),
        }
    }

    /// Rejects requests without a usable correction.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.correction.trim().is_empty() {
            return Err(ValidationError::empty_correction());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_source_passes_through() {
        let source = SourceImage::url("https://img.example.com/room.jpg");
        assert_eq!(source.to_payload_value(), "https://img.example.com/room.jpg");
    }

    #[test]
    fn test_bytes_source_encodes_data_uri() {
        let source = SourceImage::bytes(vec![0xff, 0xd8, 0xff], "image/jpeg");
        assert_eq!(source.to_payload_value(), "data:image/jpeg;base64,/9j/");
    }

    #[test]
    fn test_resolve_known_selectors() {
        let request = StagingRequest::new(
            SourceImage::url("https://img.example.com/room.jpg"),
            "bedroom",
            "scandinavian",
        );

        let selection = request.resolve().expect("both selectors resolve");
        assert_eq!(selection.room.staging_room, "Bedroom");
        assert_eq!(selection.style.staging_style, "Scandinavian");
    }

    #[test]
    fn test_resolve_unknown_room() {
        let request = StagingRequest::new(
            SourceImage::url("https://img.example.com/room.jpg"),
            "attic",
            "modern",
        );

        let err = request.resolve().expect_err("unknown room");
        assert_eq!(err.field, "room_type");
    }

    #[test]
    fn test_resolve_unknown_style() {
        let request = StagingRequest::new(
            SourceImage::url("https://img.example.com/room.jpg"),
            "bedroom",
            "brutalist",
        );

        let err = request.resolve().expect_err("unknown style");
        assert_eq!(err.field, "style");
    }

    #[test]
    fn test_refinement_request_validation() {
        let ok = RefinementRequest::new("https://img.example.com/staged.jpg", "remove the rug");
        assert!(ok.validate().is_ok());

        let empty = RefinementRequest::new("https://img.example.com/staged.jpg", "   ");
        let err = empty.validate().expect_err("blank correction");
        assert_eq!(err.field, "correction");
    }
}
