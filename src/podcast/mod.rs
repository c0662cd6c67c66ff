mod assemble;
mod config;
mod model;
mod sidecar;

pub use assemble::assemble_podcast;
pub use config::{CONFIG_FILENAME, load_podcast, load_podcast_or_default};
pub use model::{Episode, Metadata, Podcast};
pub use sidecar::{read_metadata, read_metadata_or_default, sidecar_path};
