pub mod download;
pub mod error;
pub mod feed;
pub mod pipeline;
pub mod podcast;
pub mod report;

// Re-export main types for convenience
pub use download::{Downloader, ToolOutput, YtDlp};
pub use error::{ConfigError, DownloadError, MetadataError, WriteError};
pub use feed::{render_feed, strip_query_strings, write_feed};
pub use pipeline::{RunOptions, RunResult, run_pipeline};
pub use podcast::{Episode, Metadata, Podcast, assemble_podcast, load_podcast, read_metadata};
pub use report::{
    NoopReporter, OutputStream, PipelineEvent, Reporter, Severity, SharedReporter,
    TracingReporter,
};
