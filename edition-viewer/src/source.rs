use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("request for {url} failed: {source}")]
    Http {
        url: String,
        source: reqwest::Error,
    },

    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Where the bytes of an issue come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentSource {
    Remote(String),
    Local(PathBuf),
}

impl DocumentSource {
    /// `http(s)://` goes over the network, `file://` and bare paths are read from disk
    pub fn parse(url: &str) -> Self {
        if url.starts_with("http://") || url.starts_with("https://") {
            DocumentSource::Remote(url.to_string())
        } else {
            let path = url.strip_prefix("file://").unwrap_or(url);
            DocumentSource::Local(PathBuf::from(path))
        }
    }

    pub async fn fetch(&self) -> Result<Vec<u8>, SourceError> {
        match self {
            DocumentSource::Remote(url) => {
                let http = |source| SourceError::Http {
                    url: url.clone(),
                    source,
                };
                let response = reqwest::get(url.as_str())
                    .await
                    .and_then(|r| r.error_for_status())
                    .map_err(http)?;
                let bytes = response.bytes().await.map_err(http)?;
                tracing::debug!("fetched {} bytes from {}", bytes.len(), url);
                Ok(bytes.to_vec())
            }
            DocumentSource::Local(path) => {
                tokio::fs::read(path).await.map_err(|source| SourceError::Io {
                    path: path.clone(),
                    source,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parse_distinguishes_remote_and_local() {
        assert_eq!(
            DocumentSource::parse("https://cdn.example.com/issues/2024-05-01.pdf"),
            DocumentSource::Remote("https://cdn.example.com/issues/2024-05-01.pdf".to_string())
        );
        assert_eq!(
            DocumentSource::parse("file:///srv/issues/latest.pdf"),
            DocumentSource::Local(PathBuf::from("/srv/issues/latest.pdf"))
        );
        assert_eq!(
            DocumentSource::parse("../test.pdf"),
            DocumentSource::Local(PathBuf::from("../test.pdf"))
        );
    }

    #[tokio::test]
    async fn fetch_reads_local_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"%PDF-1.7 issue").unwrap();

        let source = DocumentSource::Local(file.path().to_path_buf());
        assert_eq!(source.fetch().await.unwrap(), b"%PDF-1.7 issue".to_vec());
    }

    #[tokio::test]
    async fn fetch_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let source = DocumentSource::Local(dir.path().join("missing.pdf"));
        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, SourceError::Io { .. }));
        assert!(err.to_string().contains("missing.pdf"));
    }
}
