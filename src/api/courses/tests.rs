use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use crate::test_support::{
    self, json_request, multipart_request, png_bytes, send, stored_files, Part, TestContext,
};

async fn create_course(ctx: &TestContext, parts: Vec<Part<'_>>) -> (StatusCode, Value) {
    send(&ctx.app, multipart_request(Method::POST, "/courses", parts)).await
}

async fn fetch_course(ctx: &TestContext, id: &str) -> Value {
    let (status, body) =
        send(&ctx.app, json_request(Method::GET, &format!("/courses/{id}"), None, None)).await;
    assert_eq!(status, StatusCode::OK, "response: {body}");
    body
}

#[tokio::test]
async fn listing_without_courses_is_not_found() {
    let Some(ctx) = test_support::setup_test_context().await else {
        return;
    };

    let (status, body) = send(&ctx.app, json_request(Method::GET, "/courses", None, None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "No courses found");
}

#[tokio::test]
async fn create_stores_cover_and_attachments() {
    let Some(ctx) = test_support::setup_test_context().await else {
        return;
    };

    let (status, body) = create_course(
        &ctx,
        vec![
            Part::Text("title", "Rust basics"),
            Part::Text("description", "Ownership and borrowing"),
            Part::Text("videoLink", "https://video.example/rust"),
            Part::Text("createdBy", "teacher-1"),
            Part::Text("publish", "yes"),
            Part::File("img", "cover image.png", png_bytes(1200, 600)),
            Part::File("files", "notes.pdf", b"%PDF-1.4".to_vec()),
            Part::File("files", "slides.pdf", b"%PDF-1.5".to_vec()),
        ],
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "response: {body}");
    assert_eq!(body["message"], "Course added successfully");
    let id = body["id"].as_str().expect("id").to_string();

    let course = fetch_course(&ctx, &id).await;
    assert_eq!(course["title"], "Rust basics");
    assert_eq!(course["article"], "");
    assert_eq!(course["publish"], "yes");
    assert_eq!(course["created_by"], "teacher-1");

    let img = course["img"].as_str().expect("img");
    assert!(img.ends_with("_cover_image.png"), "img: {img}");
    assert_eq!(stored_files(ctx.state.media().covers_dir()), vec![img.to_string()]);

    let files: Vec<&str> = course["files"].as_str().expect("files").split(',').collect();
    assert_eq!(files.len(), 2);
    assert!(files[0].ends_with("_notes.pdf"));
    assert!(files[1].ends_with("_slides.pdf"));
    assert_eq!(stored_files(ctx.state.media().files_dir()).len(), 2);
}

#[tokio::test]
async fn narrow_cover_is_rejected_before_anything_is_written() {
    let Some(ctx) = test_support::setup_test_context().await else {
        return;
    };

    let (status, body) = create_course(
        &ctx,
        vec![
            Part::Text("title", "Rust basics"),
            Part::File("img", "cover.png", png_bytes(640, 480)),
            Part::File("files", "notes.pdf", b"%PDF-1.4".to_vec()),
        ],
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "The image width must be at least 850px");
    assert_nothing_stored(&ctx).await;
}

#[tokio::test]
async fn unreadable_cover_is_a_server_error() {
    let Some(ctx) = test_support::setup_test_context().await else {
        return;
    };

    let (status, body) = create_course(
        &ctx,
        vec![
            Part::Text("title", "Rust basics"),
            Part::File("img", "cover.png", b"not an image".to_vec()),
        ],
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Image validation failed");
    assert!(stored_files(ctx.state.media().covers_dir()).is_empty());
}

#[tokio::test]
async fn create_requires_title_and_known_publish() {
    let Some(ctx) = test_support::setup_test_context().await else {
        return;
    };

    let (status, body) = create_course(&ctx, vec![Part::Text("description", "x")]).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Title is required");

    let (status, body) = create_course(
        &ctx,
        vec![Part::Text("title", "Rust basics"), Part::Text("publish", "draft")],
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid publish status");
}

#[tokio::test]
async fn second_cover_image_is_rejected() {
    let Some(ctx) = test_support::setup_test_context().await else {
        return;
    };

    let (status, body) = create_course(
        &ctx,
        vec![
            Part::Text("title", "Rust basics"),
            Part::File("img", "a.png", png_bytes(900, 10)),
            Part::File("img", "b.png", png_bytes(900, 10)),
        ],
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Only one cover image is allowed");
}

#[tokio::test]
async fn update_replaces_cover_and_keeps_other_fields() {
    let Some(ctx) = test_support::setup_test_context().await else {
        return;
    };

    let (status, body) = create_course(
        &ctx,
        vec![
            Part::Text("title", "Rust basics"),
            Part::Text("description", "Ownership"),
            Part::Text("createdBy", "teacher-1"),
            Part::File("img", "old.png", png_bytes(900, 10)),
            Part::File("files", "notes.pdf", b"%PDF".to_vec()),
        ],
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "response: {body}");
    let id = body["id"].as_str().expect("id").to_string();
    let before = fetch_course(&ctx, &id).await;

    let (status, body) = send(
        &ctx.app,
        multipart_request(
            Method::PUT,
            &format!("/courses/{id}"),
            vec![Part::Text("title", "Missing id")],
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "ID and title are required");

    let (status, body) = send(
        &ctx.app,
        multipart_request(
            Method::PUT,
            &format!("/courses/{id}"),
            vec![
                Part::Text("_id", &id),
                Part::Text("title", "Advanced Rust"),
                Part::File("img", "new.png", png_bytes(1000, 10)),
            ],
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "response: {body}");
    assert_eq!(body["message"], "Course updated successfully");

    let after = fetch_course(&ctx, &id).await;
    assert_eq!(after["title"], "Advanced Rust");
    assert_eq!(after["description"], "Ownership");
    assert_eq!(after["created_by"], "teacher-1");
    assert_eq!(after["files"], before["files"]);
    assert!(after["img"].as_str().expect("img").ends_with("_new.png"));

    let (status, body) = send(
        &ctx.app,
        multipart_request(
            Method::PUT,
            "/courses/missing",
            vec![Part::Text("_id", "missing"), Part::Text("title", "Ghost")],
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Course not found");
}

#[tokio::test]
async fn delete_removes_media_and_tolerates_missing_files() {
    let Some(ctx) = test_support::setup_test_context().await else {
        return;
    };

    let (status, body) = create_course(
        &ctx,
        vec![
            Part::Text("title", "Rust basics"),
            Part::File("img", "cover.png", png_bytes(900, 10)),
            Part::File("files", "notes.pdf", b"%PDF".to_vec()),
        ],
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "response: {body}");
    let id = body["id"].as_str().expect("id").to_string();

    // The cover disappears out of band; deletion still succeeds.
    for name in stored_files(ctx.state.media().covers_dir()) {
        std::fs::remove_file(ctx.state.media().covers_dir().join(name)).expect("remove cover");
    }

    let uri = format!("/courses/{id}");
    let (status, body) = send(&ctx.app, json_request(Method::DELETE, &uri, None, None)).await;
    assert_eq!(status, StatusCode::OK, "response: {body}");
    assert_eq!(body["message"], "Course deleted successfully along with associated files");
    assert!(stored_files(ctx.state.media().files_dir()).is_empty());

    let (status, _) = send(&ctx.app, json_request(Method::DELETE, &uri, None, None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&ctx.app, json_request(Method::GET, &uri, None, None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn teacher_courses_are_filtered_by_creator() {
    let Some(ctx) = test_support::setup_test_context().await else {
        return;
    };

    for (title, creator) in [("One", "teacher-1"), ("Two", "teacher-2"), ("Three", "teacher-1")] {
        let (status, _) = create_course(
            &ctx,
            vec![Part::Text("title", title), Part::Text("createdBy", creator)],
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) =
        send(&ctx.app, json_request(Method::GET, "/courses/teacher/teacher-1", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    let titles: Vec<&str> =
        body.as_array().expect("courses").iter().filter_map(|c| c["title"].as_str()).collect();
    assert_eq!(titles, vec!["One", "Three"]);

    let (status, body) =
        send(&ctx.app, json_request(Method::GET, "/courses/teacher/nobody", None, None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "No courses found for this teacher");

    let (status, body) = send(&ctx.app, json_request(Method::GET, "/courses", None, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(3));
}

#[tokio::test]
async fn uploaded_files_are_served_under_public() {
    let Some(ctx) = test_support::setup_test_context().await else {
        return;
    };

    let (status, body) = create_course(
        &ctx,
        vec![
            Part::Text("title", "Rust basics"),
            Part::File("files", "notes.txt", b"hello learners".to_vec()),
        ],
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "response: {body}");
    let id = body["id"].as_str().expect("id").to_string();
    let course = fetch_course(&ctx, &id).await;
    let file = course["files"].as_str().expect("files").to_string();

    let request = Request::builder()
        .uri(format!("/public/files/{file}"))
        .body(Body::empty())
        .expect("request");
    let response = ctx.app.clone().oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    assert_eq!(&bytes[..], b"hello learners");
}

async fn assert_nothing_stored(ctx: &TestContext) {
    assert!(stored_files(ctx.state.media().covers_dir()).is_empty());
    assert!(stored_files(ctx.state.media().files_dir()).is_empty());
    let courses = crate::repositories::courses::list(ctx.state.db()).await.expect("list");
    assert!(courses.is_empty());
}

#[tokio::test]
async fn attachment_count_is_capped() {
    let Some(ctx) = test_support::setup_test_context().await else {
        return;
    };
    let max = ctx.state.settings().storage().max_attachments;

    let names: Vec<String> = (0..=max).map(|i| format!("part-{i}.txt")).collect();
    let mut parts = vec![Part::Text("title", "Rust basics")];
    parts.extend(names.iter().map(|name| Part::File("files", name, b"x".to_vec())));

    let (status, body) = create_course(&ctx, parts).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], format!("At most {max} files are allowed"));
    assert_nothing_stored(&ctx).await;
}

#[tokio::test]
async fn oversized_file_is_rejected() {
    let Some(ctx) = test_support::setup_test_context().await else {
        return;
    };
    let storage = ctx.state.settings().storage();
    let too_big = vec![0u8; storage.max_upload_bytes() as usize + 1];

    let (status, body) = create_course(
        &ctx,
        vec![
            Part::Text("title", "Rust basics"),
            Part::File("files", "small.txt", b"ok".to_vec()),
            Part::File("files", "huge.bin", too_big),
        ],
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        format!("File size exceeds {}MB limit", storage.max_upload_size_mb)
    );
    assert_nothing_stored(&ctx).await;
}
