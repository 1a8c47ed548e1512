pub mod config;
pub mod error;
pub mod holder;
pub mod models;
pub mod operations;
pub mod scanner;
pub mod utils;

// 重新导出常用模块
pub use error::{HolderError, RescanError};
pub use holder::{FileHolder, IgnoredFilesTracker, IgnoredUpdateListener, VcsIgnoredFilesHolder};
pub use scanner::{GitIgnoreTracker, RepositoryDiscovery, WorkspaceRepositories};
