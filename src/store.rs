//! Durable history of finished matches.

use alloc::vec::Vec;

use crate::game::MatchResult;

/// Append-only sink for match results.
pub trait ResultStore {
    /// Durably record one finished match.
    fn append(&mut self, result: MatchResult) -> anyhow::Result<()>;

    /// Every recorded result, oldest first.
    fn list_all(&self) -> anyhow::Result<Vec<MatchResult>>;
}

impl<S: ResultStore + ?Sized> ResultStore for &mut S {
    fn append(&mut self, result: MatchResult) -> anyhow::Result<()> {
        (**self).append(result)
    }

    fn list_all(&self) -> anyhow::Result<Vec<MatchResult>> {
        (**self).list_all()
    }
}

/// Store that keeps results in memory only.
#[derive(Debug, Clone, Default)]
pub struct InMemoryResultStore {
    results: Vec<MatchResult>,
}

impl InMemoryResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn results(&self) -> &[MatchResult] {
        &self.results
    }
}

impl ResultStore for InMemoryResultStore {
    fn append(&mut self, result: MatchResult) -> anyhow::Result<()> {
        self.results.push(result);
        Ok(())
    }

    fn list_all(&self) -> anyhow::Result<Vec<MatchResult>> {
        Ok(self.results.clone())
    }
}

#[cfg(feature = "std")]
pub use file::FileResultStore;

#[cfg(feature = "std")]
mod file {
    use std::fs;
    use std::path::{Path, PathBuf};

    use anyhow::Context;
    use log::debug;

    use super::ResultStore;
    use crate::config::StoreFormat;
    use crate::game::MatchResult;

    /// Results kept in a single file, rewritten on every append.
    #[derive(Debug, Clone)]
    pub struct FileResultStore {
        path: PathBuf,
        format: StoreFormat,
    }

    impl FileResultStore {
        pub fn new(path: impl Into<PathBuf>, format: StoreFormat) -> Self {
            Self {
                path: path.into(),
                format,
            }
        }

        pub fn path(&self) -> &Path {
            &self.path
        }

        fn load(&self) -> anyhow::Result<Vec<MatchResult>> {
            let bytes = match fs::read(&self.path) {
                Ok(bytes) => bytes,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
                Err(e) => {
                    return Err(e).with_context(|| format!("reading {}", self.path.display()))
                }
            };
            if bytes.is_empty() {
                return Ok(Vec::new());
            }
            let results: Vec<MatchResult> = match self.format {
                StoreFormat::Json => serde_json::from_slice(&bytes)
                    .with_context(|| format!("decoding {}", self.path.display()))?,
                StoreFormat::Bincode => bincode::deserialize(&bytes)
                    .with_context(|| format!("decoding {}", self.path.display()))?,
            };
            Ok(results)
        }

        fn save(&self, results: &[MatchResult]) -> anyhow::Result<()> {
            if let Some(dir) = self.path.parent() {
                if !dir.as_os_str().is_empty() {
                    fs::create_dir_all(dir)
                        .with_context(|| format!("creating {}", dir.display()))?;
                }
            }
            let bytes = match self.format {
                StoreFormat::Json => serde_json::to_vec_pretty(results)?,
                StoreFormat::Bincode => bincode::serialize(results)?,
            };
            let mut tmp = self.path.clone().into_os_string();
            tmp.push(".tmp");
            let tmp = PathBuf::from(tmp);
            fs::write(&tmp, bytes).with_context(|| format!("writing {}", tmp.display()))?;
            fs::rename(&tmp, &self.path)
                .with_context(|| format!("replacing {}", self.path.display()))?;
            Ok(())
        }
    }

    impl ResultStore for FileResultStore {
        fn append(&mut self, result: MatchResult) -> anyhow::Result<()> {
            let mut all = self.load()?;
            all.push(result);
            self.save(&all)?;
            debug!("store: {} results in {}", all.len(), self.path.display());
            Ok(())
        }

        fn list_all(&self) -> anyhow::Result<Vec<MatchResult>> {
            self.load()
        }
    }
}
