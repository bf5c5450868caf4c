// Extraction-and-classification pipeline.
// normalize → independent field extractors + classifier adapter → assembler.
// Everything here is synchronous and CPU-bound; async callers go through
// tokio::task::spawn_blocking.

pub mod assembler;
pub mod classifier;
pub mod extractors;
pub mod normalizer;
pub mod sections;
pub mod skills;

pub use assembler::ResumeAssembler;
pub use classifier::{ClassificationUnavailable, ClassifierAdapter, LinearTextModel};
