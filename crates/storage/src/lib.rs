#![forbid(unsafe_code)]

mod store;

pub use store::{BranchRow, ProjectRow, ProjectStats, SqliteStore, StoreError};
