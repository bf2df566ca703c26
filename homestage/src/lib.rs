//! # Homestage
//!
//! Virtual staging pipeline: takes a photo of an empty or unfinished room
//! and produces a photorealistic furnished version through a sequence of
//! external image-transformation calls.
//!
//! The pipeline runs three stages in order:
//!
//! - **Finish**: clean the raw photo and finish its surfaces while
//!   holding the structural geometry invariant
//! - **Stage**: place furniture matching the selected room and style
//! - **Polish**: fix common staging artifacts without altering layout
//!
//! A standalone **refinement** operation applies a single user correction
//! to any previously staged image.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use homestage::prelude::*;
//!
//! let config = StagingConfig::from_env();
//! let pipeline = StagingPipeline::connect(config)?;
//!
//! let request = StagingRequest::new(
//!     SourceImage::url("https://rooms.example.com/raw.jpg"),
//!     "bedroom",
//!     "scandinavian",
//! );
//! let run = pipeline.generate_staged_image(&request).await?;
//! println!("staged: {:?}", run.image_url());
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod cancellation;
pub mod capability;
pub mod catalog;
pub mod config;
pub mod errors;
pub mod observability;
pub mod pipeline;
pub mod prompts;
pub mod testing;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::cancellation::CancellationToken;
    pub use crate::capability::{
        invoke_with_retry, CapabilityInput, CapabilityOutput, ImageCapability,
        ReplicateCapability, RetryPolicy, UrlHandle,
    };
    pub use crate::catalog::{
        find_room, find_style, InteriorStyle, RoomType, INTERIOR_STYLES, ROOM_TYPES,
    };
    pub use crate::config::{StagingBackend, StagingConfig};
    pub use crate::errors::{
        CapabilityError, ExtractionError, StagingError, ValidationError,
    };
    pub use crate::observability::init_tracing;
    pub use crate::pipeline::{
        PipelineRun, PipelineState, RefinementRequest, SourceImage, StageName, StageResult,
        StagingPipeline, StagingRequest,
    };
}

#[cfg(test)]
mod tests {
    #[test]
    fn library_compiles() {
        assert!(true);
    }
}
