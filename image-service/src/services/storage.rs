use crate::models::ImageName;
use async_trait::async_trait;
use service_core::error::AppError;
use std::path::PathBuf;
use tokio::fs;
use uuid::Uuid;

/// Subdirectory of the upload directory holding writes in progress.
pub const STAGING_DIR: &str = ".incoming";

#[async_trait]
pub trait Storage: Send + Sync {
    /// Store `data` under `name`, replacing any previous content.
    async fn save(&self, name: &ImageName, data: &[u8]) -> Result<(), AppError>;

    /// Location of the stored file for `name` on the local file system.
    fn path_for(&self, name: &ImageName) -> PathBuf;
}

pub struct LocalStorage {
    base_path: PathBuf,
    staging_path: PathBuf,
}

impl LocalStorage {
    pub async fn new(base_path: impl Into<PathBuf>) -> Result<Self, AppError> {
        let base_path = base_path.into();
        let staging_path = base_path.join(STAGING_DIR);
        // Creates the upload directory too; a no-op when both exist.
        fs::create_dir_all(&staging_path).await?;
        Ok(Self {
            base_path,
            staging_path,
        })
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn save(&self, name: &ImageName, data: &[u8]) -> Result<(), AppError> {
        // Write to a unique staging file and rename it into place, so
        // concurrent uploads of one name never interleave bytes. The staged
        // name is the UUID alone so any valid image name fits NAME_MAX.
        let staged = self.staging_path.join(Uuid::new_v4().to_string());
        let target = self.path_for(name);

        let result = async {
            fs::write(&staged, data).await?;
            fs::rename(&staged, &target).await
        }
        .await;

        if let Err(e) = result {
            let _ = fs::remove_file(&staged).await;
            return Err(e.into());
        }
        Ok(())
    }

    fn path_for(&self, name: &ImageName) -> PathBuf {
        self.base_path.join(name.as_str())
    }
}
