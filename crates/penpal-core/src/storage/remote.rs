//! HTTP client for the remote letter service.

use super::{
    BoxFuture, CreatedLetter, LetterRow, NewLetterRow, Store, StorageError, StorageResult,
    is_valid_store_id,
};
use crate::letter::SavedLetterState;
use reqwest::StatusCode;
use url::Url;

/// Talks to a letter service exposing `POST /api/letters` and
/// `GET /api/letters/{id}`.
#[derive(Debug, Clone)]
pub struct RemoteStore {
    base_url: Url,
    http: reqwest::Client,
}

impl RemoteStore {
    pub fn new(base_url: &str) -> StorageResult<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("penpal/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| StorageError::Remote(format!("HTTP client error: {}", e)))?;
        Self::with_client(base_url, http)
    }

    /// Use an existing client (shared connection pool).
    pub fn with_client(base_url: &str, http: reqwest::Client) -> StorageResult<Self> {
        let mut base_url = Url::parse(base_url)
            .map_err(|e| StorageError::Other(format!("Invalid store URL {}: {}", base_url, e)))?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self { base_url, http })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn letters_url(&self, id: Option<&str>) -> StorageResult<Url> {
        let path = match id {
            Some(id) => format!("api/letters/{}", id),
            None => "api/letters".to_string(),
        };
        self.base_url
            .join(&path)
            .map_err(|e| StorageError::Other(format!("Invalid letter URL: {}", e)))
    }
}

fn remote_error(e: reqwest::Error) -> StorageError {
    StorageError::Remote(e.to_string())
}

impl Store for RemoteStore {
    fn create(&self, letter: &SavedLetterState) -> BoxFuture<'_, StorageResult<String>> {
        let row = NewLetterRow::from_letter(letter);
        Box::pin(async move {
            let row = row?;
            let url = self.letters_url(None)?;
            let response = self.http.post(url).json(&row).send().await.map_err(remote_error)?;
            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                log::warn!("letter insert rejected: {} {}", status, body);
                return Err(StorageError::Remote(format!("insert failed with {}", status)));
            }
            let created: CreatedLetter = response.json().await.map_err(remote_error)?;
            Ok(created.id)
        })
    }

    fn fetch(&self, id: &str) -> BoxFuture<'_, StorageResult<SavedLetterState>> {
        let id = id.to_string();
        Box::pin(async move {
            if !is_valid_store_id(&id) {
                return Err(StorageError::NotFound(id));
            }
            let url = self.letters_url(Some(&id))?;
            let response = self.http.get(url).send().await.map_err(remote_error)?;
            match response.status() {
                StatusCode::NOT_FOUND => return Err(StorageError::NotFound(id)),
                status if !status.is_success() => {
                    return Err(StorageError::Remote(format!("select failed with {}", status)));
                }
                _ => {}
            }
            let row: LetterRow = response.json().await.map_err(remote_error)?;
            row.letter().map_err(|e| {
                log::warn!("remote letter {} is malformed: {}", id, e);
                StorageError::Serialization(e.to_string())
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letter_urls() {
        let store = RemoteStore::new("http://localhost:3030").unwrap();
        assert_eq!(store.letters_url(None).unwrap().as_str(), "http://localhost:3030/api/letters");
        assert_eq!(
            store.letters_url(Some("abc123")).unwrap().as_str(),
            "http://localhost:3030/api/letters/abc123"
        );

        let nested = RemoteStore::new("https://example.com/penpal").unwrap();
        assert_eq!(
            nested.letters_url(Some("x")).unwrap().as_str(),
            "https://example.com/penpal/api/letters/x"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(RemoteStore::new("not a url"), Err(StorageError::Other(_))));
    }
}
