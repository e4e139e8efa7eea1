mod common;

use common::TestApp;
use image_service::dtos::UploadResponse;
use reqwest::multipart;
use std::path::Path;

#[tokio::test]
async fn upload_image_works() {
    let app = TestApp::spawn().await;
    let data = vec![0x89, b'P', b'N', b'G', 0, 1, 2, 3];

    let response = app.upload("cat.png", data.clone()).await;

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["status"], "uploaded ✅");
    assert_eq!(body["file"], "cat.png");

    let stored = tokio::fs::read(Path::new(&app.upload_dir).join("cat.png"))
        .await
        .expect("uploaded file should be on disk");
    assert_eq!(stored, data);

    app.cleanup().await;
}

#[tokio::test]
async fn upload_counts_successful_uploads() {
    let app = TestApp::spawn().await;
    assert_eq!(app.upload_count().await, 0);

    for i in 0..3 {
        let response = app.upload(&format!("img-{}.jpg", i), vec![i; 16]).await;
        assert_eq!(response.status(), 200);
    }

    assert_eq!(app.upload_count().await, 3);

    app.cleanup().await;
}

#[tokio::test]
async fn second_upload_overwrites_first() {
    let app = TestApp::spawn().await;

    assert_eq!(app.upload("dup.gif", b"first".to_vec()).await.status(), 200);
    assert_eq!(app.upload("dup.gif", b"second".to_vec()).await.status(), 200);

    let response = app.get_image("dup.gif").await;
    assert_eq!(response.status(), 200);
    assert_eq!(response.bytes().await.unwrap().as_ref(), b"second");
    assert_eq!(app.upload_count().await, 2);

    app.cleanup().await;
}

#[tokio::test]
async fn concurrent_uploads_of_one_name_do_not_interleave() {
    let app = TestApp::spawn().await;
    let contents: Vec<Vec<u8>> = (0..8u8).map(|i| vec![i; 256 * 1024]).collect();

    let uploads = contents
        .iter()
        .map(|data| app.upload("race.bin", data.clone()));
    for response in futures::future::join_all(uploads).await {
        assert_eq!(response.status(), 200);
    }

    assert_eq!(app.upload_count().await, contents.len() as u64);

    let stored = app.get_image("race.bin").await.bytes().await.unwrap();
    assert!(
        contents.iter().any(|data| data.as_slice() == stored.as_ref()),
        "stored content should equal exactly one of the uploads"
    );

    app.cleanup().await;
}

#[tokio::test]
async fn upload_returns_typed_response() {
    let app = TestApp::spawn().await;

    let body: UploadResponse = app
        .upload("typed.webp", b"webp".to_vec())
        .await
        .json()
        .await
        .expect("Failed to parse JSON");

    assert_eq!(body.status, "uploaded ✅");
    assert_eq!(body.file, "typed.webp");

    app.cleanup().await;
}

#[tokio::test]
async fn traversal_filenames_are_rejected() {
    let app = TestApp::spawn().await;

    for filename in ["../escape.png", "nested/cat.png", "..", ".incoming"] {
        let response = app.upload(filename, b"nope".to_vec()).await;
        assert_eq!(response.status(), 400, "filename {:?}", filename);
    }

    assert_eq!(app.upload_count().await, 0);
    assert!(!Path::new(&app.upload_dir)
        .parent()
        .unwrap()
        .join("escape.png")
        .exists());

    app.cleanup().await;
}

#[tokio::test]
async fn upload_without_file_field_is_rejected() {
    let app = TestApp::spawn().await;

    let form = multipart::Form::new().text("description", "no file here");
    let response = app
        .client
        .post(format!("{}/upload", app.address))
        .multipart(form)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), 400);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "No file uploaded");
    assert_eq!(app.upload_count().await, 0);

    app.cleanup().await;
}

#[tokio::test]
async fn upload_ignores_fields_before_file() {
    let app = TestApp::spawn().await;

    let form = multipart::Form::new()
        .percent_encode_noop()
        .text("description", "a cat")
        .part(
            "file",
            multipart::Part::bytes(b"meow".to_vec()).file_name("cat.png"),
        );
    let response = app
        .client
        .post(format!("{}/upload", app.address))
        .multipart(form)
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), 200);
    assert_eq!(app.get_image("cat.png").await.bytes().await.unwrap().as_ref(), b"meow");

    app.cleanup().await;
}

#[tokio::test]
async fn non_multipart_body_is_a_client_error() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .post(format!("{}/upload", app.address))
        .body("plain text")
        .send()
        .await
        .expect("Failed to execute request");

    assert!(response.status().is_client_error());
    assert_eq!(app.upload_count().await, 0);

    app.cleanup().await;
}

#[tokio::test]
async fn write_failure_returns_server_error_and_is_not_counted() {
    let app = TestApp::spawn().await;
    tokio::fs::remove_dir_all(&app.upload_dir).await.unwrap();

    let response = app.upload("lost.png", b"data".to_vec()).await;

    assert_eq!(response.status(), 500);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Internal server error");
    assert_eq!(app.upload_count().await, 0);
}

#[tokio::test]
async fn oversized_upload_is_rejected() {
    let app = TestApp::spawn_with(|config| config.storage.max_upload_bytes = 1024).await;

    let response = app.upload("big.png", vec![7; 8 * 1024]).await;

    assert_eq!(response.status(), 413);
    assert_eq!(app.upload_count().await, 0);

    app.cleanup().await;
}

#[tokio::test]
async fn dotfile_names_round_trip() {
    let app = TestApp::spawn().await;

    for filename in [".hidden.png", ".png"] {
        let response = app.upload(filename, b"dotfile".to_vec()).await;
        assert_eq!(response.status(), 200, "filename {:?}", filename);

        let response = app.get_image(filename).await;
        assert_eq!(response.status(), 200, "filename {:?}", filename);
        assert_eq!(response.bytes().await.unwrap().as_ref(), b"dotfile");
    }
    assert_eq!(app.upload_count().await, 2);

    app.cleanup().await;
}

#[tokio::test]
async fn long_filenames_round_trip() {
    let app = TestApp::spawn().await;
    let filename = format!("{}.png", "x".repeat(246));
    assert_eq!(filename.len(), 250);

    let response = app.upload(&filename, b"long name".to_vec()).await;
    assert_eq!(response.status(), 200);

    let response = app.get_image(&filename).await;
    assert_eq!(response.status(), 200);
    assert_eq!(response.bytes().await.unwrap().as_ref(), b"long name");

    app.cleanup().await;
}
