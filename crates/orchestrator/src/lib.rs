//! Presentation orchestration over an external content generator.
//!
//! The generator is a trait object so the CLI, tests, and hosted services can
//! plug in their own backend.

pub mod error;
pub mod fixture;
pub mod generator;
pub mod orchestrator;
pub mod outline;

pub use error::{Error, GenerationError, Result};
pub use fixture::FixtureGenerator;
pub use generator::{ContentGenerator, SlideRequest, StructureRequest};
pub use orchestrator::{GeneratedDeck, PresentationOrchestrator, PresentationStructure, Section, SlideSet};
pub use outline::OutlineGenerator;
