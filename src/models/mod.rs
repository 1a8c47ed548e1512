pub mod holder;
pub mod ignored_file;
pub mod repository;
pub mod scan_result;

pub use holder::{DirtyScope, HolderType};
pub use ignored_file::IgnoredFile;
pub use repository::GitRepository;
pub use scan_result::{RepositoryIgnoreStats, RescanSummary};
