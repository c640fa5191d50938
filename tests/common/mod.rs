//! Common test utilities for creator-dl integration tests

use creator_dl::Config;
use creator_dl::config::PacingConfig;
use std::path::Path;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Config pointing at a mock backend and writing into `root`
pub fn config_for(server: &MockServer, root: &Path) -> Config {
    let mut config = Config::default();
    config.api.base_url = server.uri();
    config.pacing = PacingConfig::immediate();
    config.download.download_dir = root.join("downloads");
    config.export.output_dir = root.join("exports");
    config.export.slug = Some("@creator".to_string());
    config
}

/// Cached video list served by `/api/videos`
pub fn video_list() -> serde_json::Value {
    serde_json::json!({
        "videos": [
            {
                "shortcode": "direct1",
                "url": "https://www.instagram.com/reel/direct1/",
                "video_url": "https://cdn.example/direct1.mp4",
                "caption": "Sunset, \"golden\" hour",
                "views": 2500000,
                "likes": 1200,
                "comments": 3,
                "duration": 31.4,
                "timestamp": "2024-05-01T18:30:00",
                "thumbnail": "https://cdn.example/direct1.jpg",
                "type": "reel"
            },
            {
                "shortcode": "extract2",
                "url": "https://www.instagram.com/reel/extract2/",
                "caption": "",
                "views": 950,
                "likes": null,
                "duration": null,
                "timestamp": "20240502",
                "type": "video"
            },
            {
                "shortcode": "broken3",
                "url": "https://www.instagram.com/reel/broken3/",
                "caption": "Will fail",
                "views": 12000
            }
        ],
        "lastUpdate": "2024-05-03T08:00:00"
    })
}

/// Mount the backend endpoints a full run touches
pub async fn mount_backend(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/videos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(video_list()))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/download-direct"))
        .and(query_param("url", "https://cdn.example/direct1.mp4"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"direct-bytes".to_vec()))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/download"))
        .and(query_param("url", "https://www.instagram.com/reel/extract2/"))
        .and(query_param("quality", "1080"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header(
                    "content-disposition",
                    "attachment; filename=\"extract2%20server.mp4\"",
                )
                .set_body_bytes(b"extracted-bytes".to_vec()),
        )
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/download"))
        .and(query_param("url", "https://www.instagram.com/reel/broken3/"))
        .respond_with(ResponseTemplate::new(502))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/comments/direct1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "comments": [
                {
                    "id": 1791,
                    "text": "line one\nline two",
                    "author": "fan_one",
                    "author_verified": true,
                    "likes": 7,
                    "timestamp": "2024-05-01T19:00:00",
                    "answers_count": 2
                }
            ],
            "fetched_comments": 1
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/comments/extract2"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "error": "rate limited" })),
        )
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/comments/broken3"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "comments": [], "fetched_comments": 0 })),
        )
        .mount(server)
        .await;
}
