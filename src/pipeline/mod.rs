//! Pipeline components: cancellation, walk, ordinal allocation, digesters, coordination.

pub mod cancel;
pub mod context;
pub mod digest;
pub mod orchestrator;
pub mod sequence;
pub mod walk;

pub use cancel::{CancelSignal, CancelToken};
pub use context::{PipelineChannels, create_pipeline_channels};
pub use digest::spawn_digesters;
pub use orchestrator::run_pipeline;
pub use sequence::SequenceAllocator;
pub use walk::{is_candidate, spawn_walk_thread};

/// Digesters pulling from the shared path channel. Each one is mostly waiting
/// on the catalog, so this can sit well above the core count.
pub const DEFAULT_NUM_DIGESTERS: usize = 20;

/// Extension admitted by the walk, without the dot. Matched case-sensitively.
pub const DEFAULT_EXTENSION: &str = "mp3";

/// Length of generated catalog item ids.
pub const ID_LEN: usize = 18;
