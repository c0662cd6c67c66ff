mod episode;
mod tool;

pub use episode::{DownloadContext, download_episode, ensure_download_dir};
pub use tool::{Downloader, FALLBACK_EXECUTABLE, ToolOutput, YtDlp};
