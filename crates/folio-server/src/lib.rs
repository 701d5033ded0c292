mod auth;
mod media;
pub mod protocol;
pub mod server;

pub use protocol::ApiError;
pub use server::{AppState, FolioServer};

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Router;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use folio_core::{ContentPatch, ContentType, Credentials, NewContent};
    use folio_storage::{BlobStore, Storage};
    use serde_json::{Value, json};
    use std::sync::Arc;
    use tempfile::TempDir;
    use tower::ServiceExt;

    struct TestApp {
        _dir: TempDir,
        storage: Storage,
        router: Router,
    }

    async fn create_test_app(read_only: bool) -> TestApp {
        let dir = TempDir::new().unwrap();
        let storage = Storage::new(Some(dir.path().join("test.db"))).await.unwrap();
        let media_root = dir.path().join("media");
        let blobs = BlobStore::new(media_root.clone(), "portfolio-media", "http://localhost").unwrap();

        let server = FolioServer::new(
            Arc::new(storage.clone()),
            Arc::new(storage.clone()),
            Arc::new(blobs),
            media_root,
        )
        .with_read_only(read_only);
        server.warm().await;

        TestApp {
            router: server.router(),
            storage,
            _dir: dir,
        }
    }

    async fn token_for(storage: &Storage, email: &str, admin: bool) -> String {
        let credentials = Credentials {
            email: email.to_string(),
            password: "secret123".to_string(),
        };
        storage.create_user(&credentials).await.unwrap();
        if admin {
            storage.set_admin(email, true).await.unwrap();
        }
        storage.create_session(&credentials).await.unwrap().token
    }

    async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn get(uri: &str, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        builder.body(Body::empty()).unwrap()
    }

    fn with_json(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let app = create_test_app(false).await;
        let (status, body) = send(&app.router, get("/health", None)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "folio");
    }

    #[tokio::test]
    async fn test_projects_fall_back_to_certificates() {
        let app = create_test_app(false).await;

        let (status, body) = send(&app.router, get("/api/projects", None)).await;
        assert_eq!(status, StatusCode::OK);
        let cards = body.as_array().unwrap();
        assert_eq!(cards.len(), 8);
        assert!(cards.iter().all(|card| card["category"] == "certificate"));

        let (_, body) = send(&app.router, get("/api/projects?category=website", None)).await;
        assert!(body.as_array().unwrap().is_empty());

        let (status, _) = send(&app.router, get("/api/projects?category=podcast", None)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_public_listing_sees_writes_from_other_processes() {
        let app = create_test_app(false).await;

        let item = app
            .storage
            .insert_content(&NewContent::new(ContentType::Video, "Soon hidden"))
            .await
            .unwrap();
        let (_, body) = send(&app.router, get("/api/content", None)).await;
        assert_eq!(body.as_array().unwrap().len(), 1);

        app.storage
            .update_content(&item.id, &ContentPatch::visibility(false))
            .await
            .unwrap();
        let (status, body) = send(&app.router, get("/api/content", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.as_array().unwrap().is_empty());

        // With nothing visible the cards fall back to the seed certificates
        let (_, cards) = send(&app.router, get("/api/projects", None)).await;
        assert_eq!(cards.as_array().unwrap().len(), 8);
    }

    #[tokio::test]
    async fn test_categories() {
        let app = create_test_app(false).await;
        let (status, body) = send(&app.router, get("/api/categories", None)).await;

        assert_eq!(status, StatusCode::OK);
        let ids: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|c| c["id"].as_str())
            .collect();
        assert_eq!(ids, vec!["all", "website", "video", "certificate"]);
    }

    #[tokio::test]
    async fn test_sign_up_and_sign_in() {
        let app = create_test_app(false).await;

        let (status, body) = send(
            &app.router,
            with_json(
                "POST",
                "/api/auth/sign-up",
                None,
                json!({"email": "bob@", "password": "abc"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["errors"]["email"], "Please enter a valid email address");
        assert_eq!(body["errors"]["password"], "Password must be at least 6 characters");

        let login = json!({"email": "bob@x.com", "password": "abc123"});
        let (status, body) = send(
            &app.router,
            with_json("POST", "/api/auth/sign-up", None, login.clone()),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["user"]["is_admin"], false);

        let (status, body) = send(
            &app.router,
            with_json("POST", "/api/auth/sign-up", None, login.clone()),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "This email is already registered. Please sign in.");

        let (status, body) = send(
            &app.router,
            with_json("POST", "/api/auth/sign-in", None, login),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let token = body["token"].as_str().unwrap().to_string();

        let (status, body) = send(&app.router, get("/api/auth/me", Some(&token))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["email"], "bob@x.com");

        let (status, _) = send(
            &app.router,
            with_json("POST", "/api/auth/sign-out", Some(&token), json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(&app.router, get("/api/auth/me", Some(&token))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_wrong_password_is_friendly() {
        let app = create_test_app(false).await;
        token_for(&app.storage, "ann@x.com", false).await;

        let (status, body) = send(
            &app.router,
            with_json(
                "POST",
                "/api/auth/sign-in",
                None,
                json!({"email": "ann@x.com", "password": "wrong-password"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Invalid email or password");
    }

    #[tokio::test]
    async fn test_admin_routes_require_admin() {
        let app = create_test_app(false).await;

        let (status, _) = send(&app.router, get("/api/admin/content", None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let token = token_for(&app.storage, "visitor@x.com", false).await;
        let (status, _) = send(&app.router, get("/api/admin/content", Some(&token))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_admin_content_flow() {
        let app = create_test_app(false).await;
        let token = token_for(&app.storage, "admin@x.com", true).await;

        let (status, created) = send(
            &app.router,
            with_json(
                "POST",
                "/api/admin/content",
                Some(&token),
                json!({
                    "type": "website",
                    "title": "Shop",
                    "external_link": "https://shop.example.com",
                    "tags": ["rust", "sqlite"]
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["is_visible"], true);
        let id = created["id"].as_str().unwrap().to_string();

        // Public page picks up the new item and drops the fallback
        let (_, body) = send(&app.router, get("/api/projects", None)).await;
        let cards = body.as_array().unwrap();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0]["title"], "Shop");
        assert_eq!(cards[0]["description"], "");
        assert_eq!(cards[0]["tech"], json!(["rust", "sqlite"]));

        let (status, updated) = send(
            &app.router,
            with_json(
                "PATCH",
                &format!("/api/admin/content/{}", id),
                Some(&token),
                json!({"title": "Shop v2", "tags": null}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["title"], "Shop v2");
        assert!(updated["tags"].is_null());

        let (status, hidden) = send(
            &app.router,
            with_json(
                "PUT",
                &format!("/api/admin/content/{}/visibility", id),
                Some(&token),
                json!({"is_visible": false}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(hidden["is_visible"], false);

        let (_, public) = send(&app.router, get("/api/content", None)).await;
        assert!(public.as_array().unwrap().is_empty());

        let (_, admin) = send(&app.router, get("/api/admin/content", Some(&token))).await;
        assert_eq!(admin.as_array().unwrap().len(), 1);

        let (_, videos) = send(&app.router, get("/api/admin/content?type=video", Some(&token))).await;
        assert!(videos.as_array().unwrap().is_empty());

        let delete = Request::builder()
            .method("DELETE")
            .uri(format!("/api/admin/content/{}", id))
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(&app.router, delete).await;
        assert_eq!(status, StatusCode::OK);

        let (_, admin) = send(&app.router, get("/api/admin/content", Some(&token))).await;
        assert!(admin.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_admin_errors() {
        let app = create_test_app(false).await;
        let token = token_for(&app.storage, "admin@x.com", true).await;

        let (status, _) = send(
            &app.router,
            with_json(
                "POST",
                "/api/admin/content",
                Some(&token),
                json!({"type": "website", "title": "   "}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, body) = send(
            &app.router,
            with_json("POST", "/api/admin/content", Some(&token), json!({"type": "website"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "Title is required");

        let (status, body) = send(
            &app.router,
            with_json("POST", "/api/admin/content", Some(&token), json!({"title": "No type"})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["error"].is_string());

        let (status, _) = send(
            &app.router,
            with_json(
                "PUT",
                "/api/admin/content/missing/visibility",
                Some(&token),
                json!({"is_visible": true}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app.router, get("/api/admin/content?type=podcast", Some(&token))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_read_only_blocks_writes() {
        let app = create_test_app(true).await;
        let token = token_for(&app.storage, "admin@x.com", true).await;

        let (status, _) = send(
            &app.router,
            with_json(
                "POST",
                "/api/admin/content",
                Some(&token),
                json!({"type": "video", "title": "Reel"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        // Reads still work
        let (status, _) = send(&app.router, get("/api/admin/content", Some(&token))).await;
        assert_eq!(status, StatusCode::OK);
    }

    fn multipart_request(token: &str, kind: &str, file_name: &str, mime: &str) -> Request<Body> {
        let boundary = "folio-test-boundary";
        let body = format!(
            "--{b}\r\n\
             Content-Disposition: form-data; name=\"type\"\r\n\r\n\
             {kind}\r\n\
             --{b}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\n\
             Content-Type: {mime}\r\n\r\n\
             not really a video\r\n\
             --{b}--\r\n",
            b = boundary,
        );

        Request::builder()
            .method("POST")
            .uri("/api/admin/media")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", boundary),
            )
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_media_upload() {
        let app = create_test_app(false).await;
        let token = token_for(&app.storage, "admin@x.com", true).await;

        let (status, body) = send(
            &app.router,
            multipart_request(&token, "video", "reel.mp4", "video/mp4"),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let path = body["path"].as_str().unwrap();
        assert!(path.starts_with("videos/"));
        assert!(path.ends_with(".mp4"));
        assert_eq!(
            body["url"].as_str().unwrap(),
            format!("http://localhost/media/portfolio-media/{}", path)
        );

        // Served back from the bucket
        let response = app
            .router
            .clone()
            .oneshot(get(&format!("/media/portfolio-media/{}", path), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"not really a video");
    }

    #[tokio::test]
    async fn test_media_upload_rejects_wrong_mime() {
        let app = create_test_app(false).await;
        let token = token_for(&app.storage, "admin@x.com", true).await;

        let (status, _) = send(
            &app.router,
            multipart_request(&token, "video", "notes.txt", "text/plain"),
        )
        .await;
        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    }
}
