pub mod storage;

pub use storage::{LocalStorage, Storage, STAGING_DIR};
