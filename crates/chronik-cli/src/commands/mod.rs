//! CLI commands.

pub mod autorestore;
pub mod topic;

pub use autorestore::AutorestoreCommand;
pub use topic::TopicCommand;
