//! Attachment storage
//!
//! Stores files uploaded with charge submissions on the local filesystem.
//! Files live under `<root>/charges/<user_id>/<uuid>[.<ext>]`; the path
//! relative to the root is what gets saved on the charge.

use std::path::{Path, PathBuf};

use uuid::Uuid;

/// Longest file extension kept from the uploaded name
const MAX_EXTENSION_LEN: usize = 10;

#[derive(Debug, Clone)]
pub struct AttachmentStore {
    root: PathBuf,
}

impl AttachmentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write an uploaded file and return its path relative to the root
    pub async fn save(
        &self,
        user_id: i64,
        original_name: &str,
        bytes: &[u8],
    ) -> std::io::Result<String> {
        let relative_dir = format!("charges/{}", user_id);
        let file_name = match extension_of(original_name) {
            Some(ext) => format!("{}.{}", Uuid::new_v4(), ext),
            None => Uuid::new_v4().to_string(),
        };

        let dir = self.root.join(&relative_dir);
        tokio::fs::create_dir_all(&dir).await?;
        tokio::fs::write(dir.join(&file_name), bytes).await?;

        let relative = format!("{}/{}", relative_dir, file_name);
        tracing::debug!("Stored attachment {} ({} bytes)", relative, bytes.len());

        Ok(relative)
    }

    /// Remove a stored file, used when the charge row could not be written
    pub async fn discard(&self, relative: &str) -> std::io::Result<()> {
        tokio::fs::remove_file(self.root.join(relative)).await
    }
}

/// Lowercased extension of an uploaded file name, if it is a plain one
fn extension_of(name: &str) -> Option<String> {
    let (_, ext) = name.rsplit_once('.')?;
    if ext.is_empty()
        || ext.len() > MAX_EXTENSION_LEN
        || !ext.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}
