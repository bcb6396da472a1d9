use std::error::Error as StdError;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::Response;
use bytes::Bytes;
use http_body_util::LengthLimitError;
use uuid::Uuid;

use crate::application::ports::{FileAcquisition, FileAcquisitionError, LlmClient};
use crate::application::services::ExtractionError;
use crate::domain::{FileDescriptor, FileHandle};
use crate::infrastructure::storage::LocalFileStore;
use crate::presentation::state::AppState;

use super::error::{error_response, extraction_error_response};

/// An upload held in the file store for one request.
///
/// The store key is generated per request, so two requests carrying the same
/// client handle never share an object. The object is deleted by
/// [`StoredUpload::discard`] or, if the request is dropped first, by a task
/// spawned from `Drop`.
pub(super) struct StoredUpload {
    store: Arc<LocalFileStore>,
    key: Option<FileHandle>,
    descriptor: FileDescriptor,
}

impl StoredUpload {
    pub(super) fn descriptor(&self) -> &FileDescriptor {
        &self.descriptor
    }

    pub(super) async fn discard(mut self) {
        if let Some(key) = self.key.take() {
            delete_stored(&self.store, &key).await;
        }
    }
}

#[async_trait]
impl FileAcquisition for StoredUpload {
    async fn acquire(&self, descriptor: &FileDescriptor) -> Result<Bytes, FileAcquisitionError> {
        match &self.key {
            Some(key) => self.store.get(key).await,
            None => Err(FileAcquisitionError::NotFound(descriptor.id.to_string())),
        }
    }
}

impl Drop for StoredUpload {
    fn drop(&mut self) {
        let Some(key) = self.key.take() else {
            return;
        };
        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                let store = Arc::clone(&self.store);
                tracing::debug!(
                    file_id = %self.descriptor.id,
                    key = %key,
                    "Request dropped, deleting stored upload"
                );
                runtime.spawn(async move { delete_stored(&store, &key).await });
            }
            Err(_) => {
                tracing::warn!(key = %key, "No runtime available to delete stored upload");
            }
        }
    }
}

async fn delete_stored(store: &LocalFileStore, key: &FileHandle) {
    match store.delete(key).await {
        Ok(()) | Err(FileAcquisitionError::NotFound(_)) => {}
        Err(e) => tracing::warn!(key = %key, error = %e, "Failed to delete stored upload"),
    }
}

/// Checks the declared upload against the router, then reads the body into the
/// file store. Nothing is read when the extension or declared size is rejected.
pub(super) async fn receive_upload<L>(
    state: &AppState<L>,
    filename: &str,
    file_handle: Option<&str>,
    headers: &HeaderMap,
    body: Body,
) -> Result<StoredUpload, Response>
where
    L: LlmClient + 'static,
{
    let key = FileHandle::new(Uuid::new_v4().to_string());
    let handle = file_handle
        .map(FileHandle::new)
        .unwrap_or_else(|| key.clone());

    let declared_size = headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(0);

    let router = state.extraction_service.router();
    let declared = FileDescriptor::new(handle.clone(), filename, declared_size);
    if let Err(e) = router.route(&declared) {
        tracing::warn!(filename, error = %e, "Upload rejected before reading body");
        return Err(extraction_error_response(&e));
    }

    let limit = router.max_file_size_bytes();
    let bytes = match axum::body::to_bytes(body, limit as usize).await {
        Ok(bytes) => bytes,
        Err(e) if exceeded_limit(&e) => {
            tracing::warn!(filename, limit, "Upload body exceeds the size limit");
            return Err(extraction_error_response(&ExtractionError::SizeExceeded {
                size: declared_size.max(limit + 1),
                limit,
            }));
        }
        Err(e) => {
            tracing::warn!(filename, error = %e, "Failed to read upload body");
            return Err(error_response(
                StatusCode::BAD_REQUEST,
                format!("Failed to read upload body: {}", e),
                Some("Try uploading the file again."),
            ));
        }
    };

    let upload = StoredUpload {
        store: Arc::clone(&state.file_store),
        key: Some(key.clone()),
        descriptor: FileDescriptor::new(handle, filename, bytes.len() as u64),
    };
    if let Err(e) = state.file_store.put(&key, bytes).await {
        tracing::error!(error = %e, "Failed to store upload");
        return Err(error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to store upload: {}", e),
            Some("Try uploading the file again in a few minutes."),
        ));
    }

    Ok(upload)
}

fn exceeded_limit(error: &axum::Error) -> bool {
    let mut current: Option<&(dyn StdError + 'static)> = Some(error);
    while let Some(e) = current {
        if e.is::<LengthLimitError>() {
            return true;
        }
        current = e.source();
    }
    false
}
