use bytes::Bytes;

use lexdoc::application::ports::{FileAcquisition, FileAcquisitionError};
use lexdoc::domain::{FileDescriptor, FileHandle};
use lexdoc::infrastructure::storage::LocalFileStore;

fn create_test_store() -> (tempfile::TempDir, LocalFileStore) {
    let dir = tempfile::TempDir::new().unwrap();
    let store = LocalFileStore::new(dir.path().to_path_buf()).unwrap();
    (dir, store)
}

#[tokio::test]
async fn given_uploaded_bytes_when_storing_then_size_is_reported() {
    let (_dir, store) = create_test_store();
    let handle = FileHandle::new("upload-1");

    let size = store
        .put(&handle, Bytes::from_static(b"hello world"))
        .await
        .unwrap();

    assert_eq!(size, 11);
    assert_eq!(store.head(&handle).await.unwrap(), 11);
}

#[tokio::test]
async fn given_stored_file_when_acquiring_then_bytes_match_original() {
    let (_dir, store) = create_test_store();
    let handle = FileHandle::new("upload-2");
    store
        .put(&handle, Bytes::from_static(b"contract text"))
        .await
        .unwrap();

    let descriptor = FileDescriptor::new(handle, "contract.pdf", 13);
    let fetched = store.acquire(&descriptor).await.unwrap();

    assert_eq!(fetched, Bytes::from_static(b"contract text"));
}

#[tokio::test]
async fn given_unknown_handle_when_acquiring_then_not_found() {
    let (_dir, store) = create_test_store();
    let descriptor = FileDescriptor::new(FileHandle::new("missing"), "contract.pdf", 10);

    let result = store.acquire(&descriptor).await;

    assert!(matches!(result, Err(FileAcquisitionError::NotFound(h)) if h == "missing"));
}

#[tokio::test]
async fn given_stored_file_when_deleting_then_it_is_gone() {
    let (dir, store) = create_test_store();
    let handle = FileHandle::new("upload-3");
    store.put(&handle, Bytes::from_static(b"data")).await.unwrap();

    store.delete(&handle).await.unwrap();

    assert!(matches!(
        store.head(&handle).await,
        Err(FileAcquisitionError::NotFound(_))
    ));
    assert!(!dir.path().join("upload-3").exists());
}
