use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::SystemTime;

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};

use super::loader::{SourceInput, load_source, upload_format};
use super::model::RawTable;

/// Identity of a parsed source.
///
/// Uploads are addressed by content and the format their name selects,
/// files by path plus size and modification time so an edited file is read
/// again.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SourceKey {
    Content { digest: String, format: String },
    File {
        path: PathBuf,
        len: u64,
        modified: Option<SystemTime>,
    },
}

impl SourceKey {
    pub fn for_input(input: &SourceInput) -> Result<SourceKey> {
        match input {
            SourceInput::Upload { name, bytes } => Ok(SourceKey::Content {
                digest: content_digest(bytes),
                format: upload_format(name),
            }),
            SourceInput::Path(path) => {
                let path = path
                    .canonicalize()
                    .with_context(|| format!("opening {}", path.display()))?;
                let meta = std::fs::metadata(&path)
                    .with_context(|| format!("reading metadata of {}", path.display()))?;
                Ok(SourceKey::File {
                    path,
                    len: meta.len(),
                    modified: meta.modified().ok(),
                })
            }
        }
    }
}

/// SHA-256 of uploaded bytes, hex encoded.
pub fn content_digest(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Parsed tables kept across interactions.
///
/// Nothing is evicted implicitly; callers drop entries with
/// [`SourceCache::retain`] when the source set changes.
#[derive(Debug, Default)]
pub struct SourceCache {
    entries: HashMap<SourceKey, Arc<RawTable>>,
}

impl SourceCache {
    /// Return the cached table for `input`, parsing it on a miss.
    /// Failed loads are not cached.
    pub fn get_or_load(&mut self, input: &SourceInput) -> Result<(SourceKey, Arc<RawTable>)> {
        let key = SourceKey::for_input(input)?;
        if let Some(table) = self.entries.get(&key) {
            log::debug!("cache hit for {}", input.display_name());
            return Ok((key, Arc::clone(table)));
        }
        let table = Arc::new(load_source(input)?);
        if table.is_empty() {
            log::warn!("{} has a header but no rows", input.display_name());
        }
        log::info!(
            "Loaded {} with {} rows and columns {:?}",
            input.display_name(),
            table.len(),
            table.columns
        );
        self.entries.insert(key.clone(), Arc::clone(&table));
        Ok((key, table))
    }

    pub fn invalidate(&mut self, key: &SourceKey) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Keep only the entries for `keys`.
    pub fn retain(&mut self, keys: &[SourceKey]) {
        self.entries.retain(|k, _| keys.contains(k));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(bytes: &str) -> SourceInput {
        SourceInput::Upload {
            name: "benin.csv".into(),
            bytes: bytes.as_bytes().to_vec(),
        }
    }

    #[test]
    fn digest_is_stable_and_content_sensitive() {
        assert_eq!(content_digest(b"GHI\n1\n"), content_digest(b"GHI\n1\n"));
        assert_ne!(content_digest(b"GHI\n1\n"), content_digest(b"GHI\n2\n"));
        assert_eq!(content_digest(b"").len(), 64);
    }

    #[test]
    fn same_content_is_served_from_cache() {
        let mut cache = SourceCache::default();
        let (k1, t1) = cache.get_or_load(&upload("GHI\n1\n")).unwrap();
        let (k2, t2) = cache.get_or_load(&upload("GHI\n1\n")).unwrap();
        assert_eq!(k1, k2);
        assert!(Arc::ptr_eq(&t1, &t2));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn same_bytes_under_another_format_are_parsed_again() {
        let json = r#"[{"GHI": 1.0, "DNI": 2.0}]"#;
        let as_csv = SourceInput::Upload {
            name: "benin.csv".into(),
            bytes: json.as_bytes().to_vec(),
        };
        let as_json = SourceInput::Upload {
            name: "benin.JSON".into(),
            bytes: json.as_bytes().to_vec(),
        };

        let mut cache = SourceCache::default();
        let (k1, _) = cache.get_or_load(&as_csv).unwrap();
        let (k2, table) = cache.get_or_load(&as_json).unwrap();
        assert_ne!(k1, k2);
        assert_eq!(table.columns, vec!["GHI", "DNI"]);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn renamed_upload_of_same_format_hits_cache() {
        let bytes = b"GHI\n1\n".to_vec();
        let a = SourceInput::Upload { name: "benin.csv".into(), bytes: bytes.clone() };
        let b = SourceInput::Upload { name: "benin_clean.csv".into(), bytes };
        assert_eq!(SourceKey::for_input(&a).unwrap(), SourceKey::for_input(&b).unwrap());
    }

    #[test]
    fn failed_loads_are_not_cached() {
        let mut cache = SourceCache::default();
        assert!(cache.get_or_load(&upload("")).is_err());
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn invalidate_and_retain_drop_entries() {
        let mut cache = SourceCache::default();
        let (a, _) = cache.get_or_load(&upload("GHI\n1\n")).unwrap();
        let (b, _) = cache.get_or_load(&upload("GHI\n2\n")).unwrap();
        assert_eq!(cache.len(), 2);

        cache.retain(std::slice::from_ref(&b));
        assert_eq!(cache.len(), 1);
        assert!(!cache.invalidate(&a));
        assert!(cache.invalidate(&b));
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn edited_file_gets_new_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("togo_clean.csv");
        std::fs::write(&path, "GHI\n1\n").unwrap();

        let mut cache = SourceCache::default();
        let input = SourceInput::Path(path.clone());
        let (k1, t1) = cache.get_or_load(&input).unwrap();
        assert_eq!(t1.len(), 1);

        std::fs::write(&path, "GHI\n1\n2\n").unwrap();
        let (k2, t2) = cache.get_or_load(&input).unwrap();
        assert_ne!(k1, k2);
        assert_eq!(t2.len(), 2);
    }

    #[test]
    fn missing_path_is_an_error() {
        let mut cache = SourceCache::default();
        let input = SourceInput::Path(PathBuf::from("/no/such/benin.csv"));
        assert!(cache.get_or_load(&input).is_err());
    }
}
