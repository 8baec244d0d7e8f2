use blob_thumbnailer::{
    models::StorageCredentials, naming::ObjectLocation, storage::S3Storage,
    storage::StorageService, Error,
};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn storage_for(server: &MockServer) -> S3Storage {
    S3Storage::new(
        server.uri(),
        "us-east-1".to_string(),
        Some(StorageCredentials {
            access_key_id: "test-access-key".to_string(),
            secret_access_key: "test-secret-key".to_string(),
        }),
    )
    .await
    .unwrap()
}

#[tokio::test]
async fn test_write_object_puts_with_content_type() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/thumbnails/photo_100.png"))
        .and(header("content-type", "image/png"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let storage = storage_for(&server).await;
    let location = storage
        .write_object("thumbnails", "photo_100.png", b"png bytes", "image/png")
        .await
        .unwrap();

    assert_eq!(location, format!("{}/thumbnails/photo_100.png", server.uri()));
}

#[tokio::test]
async fn test_write_object_rejection_is_upload_error() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(403).set_body_string(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
             <Error><Code>AccessDenied</Code><Message>Access Denied</Message></Error>",
        ))
        .mount(&server)
        .await;

    let storage = storage_for(&server).await;
    let result = storage
        .write_object("thumbnails", "photo_100.png", b"png bytes", "image/png")
        .await;

    match result {
        Err(Error::Upload { name, .. }) => assert_eq!(name, "photo_100.png"),
        other => panic!("expected upload error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_read_object_gets_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/images/dir/photo.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"source image".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let storage = storage_for(&server).await;
    let location = ObjectLocation {
        container: "images".to_string(),
        key: "dir/photo.png".to_string(),
    };

    let data = storage.read_object(&location).await.unwrap();
    assert_eq!(data, b"source image");
}

#[tokio::test]
async fn test_read_missing_object_is_storage_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_string(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
             <Error><Code>NoSuchKey</Code><Message>The specified key does not exist.</Message></Error>",
        ))
        .mount(&server)
        .await;

    let storage = storage_for(&server).await;
    let location = ObjectLocation {
        container: "images".to_string(),
        key: "missing.png".to_string(),
    };

    let result = storage.read_object(&location).await;
    assert!(matches!(result, Err(Error::Storage(_))));
}
