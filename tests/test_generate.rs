mod common;

use axum::http::StatusCode;
use carousel_studio::db::content_repository::ContentRepository;
use carousel_studio::models::content::ContentKind;

#[tokio::test]
async fn generate_riddle_from_form() {
    let env = common::TestEnv::start().await;
    let server = env.server();

    let id = env.create_riddle(&server, "Teka-teki Jam").await;

    let response = server.get(&format!("/api/riddles/{id}")).await;
    let body: serde_json::Value = response.json();
    let data = &body["data"];

    assert_eq!(body["success"], true);
    assert_eq!(data["kind"], "riddle");
    assert_eq!(data["solution"], "Jam");
    assert!(data.get("videoSlides").is_none());

    let kinds: Vec<&str> = data["carouselData"]["slides"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["tipe_slide"].as_str().unwrap())
        .collect();
    assert_eq!(kinds, vec!["COVER", "MISTERI", "SOLUSI", "CLOSING"]);

    let hashtags = data["carouselData"]["hashtags"].as_array().unwrap();
    assert_eq!(hashtags[0], "#jam");
    assert_eq!(hashtags[1], "#waktu");
    assert!(hashtags.iter().any(|h| h == "#tekateki"));
}

#[tokio::test]
async fn generate_returns_created() {
    let env = common::TestEnv::start().await;
    let server = env.server();

    let response = server
        .post("/api/generate-tutorial")
        .json(&serde_json::json!({
            "title": "Git dasar",
            "description": "Mulai pakai git",
            "steps": "git init\ngit add .\ngit commit",
            "tools": ["git"]
        }))
        .await;

    response.assert_status(StatusCode::CREATED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["data"]["steps"].as_array().unwrap().len(), 3);
    assert_eq!(body["data"]["carouselData"]["slides"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn generate_rejects_missing_fields_without_writing() {
    let env = common::TestEnv::start().await;
    let server = env.server_permissive();

    let response = server
        .post("/api/generate-site")
        .json(&serde_json::json!({ "title": "Excalidraw", "description": "" }))
        .await;

    response.assert_status_bad_request();
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Missing required field(s): url, description");

    let count = env.content_repo.count(ContentKind::Site, None).await.unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn generate_rejects_invalid_json() {
    let env = common::TestEnv::start().await;
    let server = env.server_permissive();

    let response = server
        .post("/api/generate-topic")
        .text("{ \"title\": ")
        .await;

    response.assert_status_bad_request();
    let body: serde_json::Value = response.json();
    assert!(body["error"].as_str().unwrap().starts_with("Invalid JSON"));
}

#[tokio::test]
async fn generate_json_mode_keeps_custom_slides() {
    let env = common::TestEnv::start().await;
    let server = env.server();

    let response = server
        .post("/api/generate-site")
        .json(&serde_json::json!({
            "title": "Situs Belajar",
            "carouselData": {
                "slides": [
                    { "tipe_slide": "COVER", "title": "Situs Belajar" },
                    { "tipe_slide": "BONUS", "title": "Extra" }
                ],
                "caption": "Cek!",
                "hashtags": ["belajar"]
            }
        }))
        .await;

    let body: serde_json::Value = response.json();
    let data = &body["data"]["carouselData"];
    assert_eq!(data["slides"][1]["tipe_slide"], "BONUS");
    assert_eq!(data["caption"], "Cek!");
    assert_eq!(data["hashtags"][0], "#belajar");
}

#[tokio::test]
async fn create_endpoint_requires_json_mode() {
    let env = common::TestEnv::start().await;
    let server = env.server_permissive();

    let response = server
        .post("/api/topics")
        .json(&serde_json::json!({ "title": "Laut", "description": "x", "points": ["a"] }))
        .await;
    response.assert_status_bad_request();

    let response = server
        .post("/api/topics")
        .json(&serde_json::json!({
            "title": "Laut",
            "carouselData": { "slides": [ { "tipe_slide": "COVER", "title": "Laut" } ] }
        }))
        .await;
    response.assert_status(StatusCode::CREATED);
}
