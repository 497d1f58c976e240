//! Storage for uploaded rule files.
//!
//! Files are kept under `rules_dir`, one subdirectory per source id. An
//! upload never overwrites an existing file; a numeric suffix is added
//! instead.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use scirius_core::{SciriusError, SciriusResult};
use scirius_forms::UploadedFile;
use tokio::io::AsyncWriteExt;

/// Filesystem storage for the rule files of local sources.
#[derive(Debug, Clone)]
pub struct RuleFileStorage {
    /// The root directory.
    pub location: PathBuf,
}

impl RuleFileStorage {
    pub fn new(location: impl Into<PathBuf>) -> Self {
        Self {
            location: location.into(),
        }
    }

    /// Directory holding the files of `source_id`.
    pub fn source_dir(&self, source_id: i64) -> PathBuf {
        self.location.join(source_id.to_string())
    }

    /// Writes `file` into the directory of `source_id` and returns the path
    /// it was stored at.
    ///
    /// Each candidate name is opened with `create_new`, so two concurrent
    /// uploads of the same name land in different files.
    pub async fn save(&self, source_id: i64, file: &UploadedFile) -> SciriusResult<PathBuf> {
        let dir = self.source_dir(source_id);
        tokio::fs::create_dir_all(&dir).await?;
        let name = base_name(&file.name);

        for i in 0..=MAX_SUFFIX {
            let path = dir.join(candidate_name(&name, i));
            let mut out = match tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(out) => out,
                Err(err) if err.kind() == ErrorKind::AlreadyExists => continue,
                Err(err) => return Err(err.into()),
            };
            out.write_all(&file.content).await?;
            out.flush().await?;
            tracing::info!(source_id, path = %path.display(), size = file.size, "Rule file stored");
            return Ok(path);
        }

        Err(SciriusError::OperationalError(format!(
            "could not find an available name for {name}"
        )))
    }
}

const MAX_SUFFIX: usize = 1000;

/// Strips any directory part a client may have sent with the name.
fn base_name(name: &str) -> String {
    Path::new(name)
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !n.is_empty())
        .unwrap_or("upload.rules")
        .to_string()
}

/// `name` itself for `i == 0`, otherwise `name` with `_i` before the extension.
fn candidate_name(name: &str, i: usize) -> String {
    if i == 0 {
        return name.to_string();
    }
    let path = Path::new(name);
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or(name);
    match path.extension().and_then(|s| s.to_str()) {
        Some(ext) => format!("{stem}_{i}.{ext}"),
        None => format!("{stem}_{i}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_name() {
        assert_eq!(base_name("local.rules"), "local.rules");
        assert_eq!(base_name("../../etc/passwd"), "passwd");
        assert_eq!(base_name(""), "upload.rules");
    }

    #[test]
    fn test_candidate_name() {
        assert_eq!(candidate_name("local.rules", 0), "local.rules");
        assert_eq!(candidate_name("local.rules", 2), "local_2.rules");
        assert_eq!(candidate_name("README", 1), "README_1");
    }

    #[tokio::test]
    async fn test_concurrent_saves_get_distinct_files() {
        let dir = tempfile::tempdir().unwrap();
        let storage = RuleFileStorage::new(dir.path());
        let tasks: Vec<_> = (0..8u8)
            .map(|n| {
                let storage = storage.clone();
                tokio::spawn(async move {
                    let file = UploadedFile::new("local.rules", vec![b'0' + n]);
                    storage.save(3, &file).await.unwrap()
                })
            })
            .collect();

        let mut contents = Vec::new();
        for task in tasks {
            let path = task.await.unwrap();
            contents.push(std::fs::read(path).unwrap()[0]);
        }
        contents.sort_unstable();
        assert_eq!(contents, (0..8u8).map(|n| b'0' + n).collect::<Vec<_>>());
        assert_eq!(std::fs::read_dir(dir.path().join("3")).unwrap().count(), 8);
    }

    #[tokio::test]
    async fn test_save_does_not_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let storage = RuleFileStorage::new(dir.path());
        let file = UploadedFile::new("local.rules", b"alert ip any any".to_vec());

        let first = storage.save(7, &file).await.unwrap();
        let second = storage.save(7, &file).await.unwrap();

        assert_eq!(first, dir.path().join("7").join("local.rules"));
        assert_eq!(second, dir.path().join("7").join("local_1.rules"));
        assert_eq!(std::fs::read(&second).unwrap(), b"alert ip any any");
    }
}
