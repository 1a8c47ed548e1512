pub mod git_ignore_tracker;
pub mod ignored_size;
pub mod repo_discovery;

pub use git_ignore_tracker::GitIgnoreTracker;
pub use ignored_size::IgnoredSizeCalculator;
pub use repo_discovery::{RepositoryDiscovery, WorkspaceRepositories};
