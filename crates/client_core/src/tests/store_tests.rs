use super::*;
use std::{sync::Arc, time::Duration};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use serde_json::json;
use shared::domain::BlogStatus;
use tokio::{net::TcpListener, sync::Mutex};

type Scripted = Arc<Mutex<(StatusCode, String)>>;

#[derive(Clone)]
struct BlogServerState {
    list_response: Scripted,
    mutation_response: Scripted,
    deleted: Arc<Mutex<Vec<String>>>,
    updated: Arc<Mutex<Vec<(String, Value)>>>,
}

impl BlogServerState {
    async fn script_list(&self, status: StatusCode, body: Value) {
        *self.list_response.lock().await = (status, body.to_string());
    }

    async fn script_mutation(&self, status: StatusCode, body: &str) {
        *self.mutation_response.lock().await = (status, body.to_string());
    }
}

async fn handle_list(State(state): State<BlogServerState>) -> (StatusCode, String) {
    state.list_response.lock().await.clone()
}

async fn handle_delete(
    State(state): State<BlogServerState>,
    Path(id): Path<String>,
) -> (StatusCode, String) {
    state.deleted.lock().await.push(id);
    state.mutation_response.lock().await.clone()
}

async fn handle_update(
    State(state): State<BlogServerState>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> (StatusCode, String) {
    state.updated.lock().await.push((id, body));
    state.mutation_response.lock().await.clone()
}

async fn spawn_blog_server() -> (String, BlogServerState) {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let state = BlogServerState {
        list_response: Arc::new(Mutex::new((StatusCode::OK, "[]".to_string()))),
        mutation_response: Arc::new(Mutex::new((
            StatusCode::OK,
            json!({ "ok": true }).to_string(),
        ))),
        deleted: Arc::new(Mutex::new(Vec::new())),
        updated: Arc::new(Mutex::new(Vec::new())),
    };
    let app = Router::new()
        .route("/api/blogs", get(handle_list))
        .route("/api/blogs/:id", put(handle_update).delete(handle_delete))
        .with_state(state.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (format!("http://{addr}"), state)
}

fn store_for(server_url: &str) -> HttpBlogStore {
    let config = BlogApiConfig::new(server_url)
        .expect("config")
        .with_request_timeout(Duration::from_secs(5));
    HttpBlogStore::new(config).expect("store")
}

fn post_json(id: &str, status: &str) -> Value {
    json!({
        "id": id,
        "title": format!("Post {id}"),
        "category": "web-dev",
        "status": status,
        "author": { "name": "Kayease Team" },
        "tags": ["react", "seo"],
        "image": format!("/uploads/{id}.png"),
        "featured": false,
        "excerpt": "Short summary",
    })
}

#[tokio::test]
async fn list_decodes_posts_and_counts_unknown_status() {
    let (server_url, state) = spawn_blog_server().await;
    state
        .script_list(
            StatusCode::OK,
            json!([
                post_json("p1", "published"),
                post_json("p2", "archived"),
                post_json("p3", "draft"),
            ]),
        )
        .await;

    let listing = store_for(&server_url).list_blogs().await.expect("list");
    assert_eq!(listing.skipped, 1);
    let posts = listing.posts;

    let ids: Vec<&str> = posts.iter().map(|post| post.id.as_str()).collect();
    assert_eq!(ids, ["p1", "p3"]);
    assert_eq!(posts[0].status, BlogStatus::Published);
    assert_eq!(posts[0].author_name(), "Kayease Team");
    assert_eq!(posts[1].source.get("excerpt"), Some(&json!("Short summary")));
}

#[tokio::test]
async fn list_non_success_is_rejected_with_server_reason() {
    let (server_url, state) = spawn_blog_server().await;
    state
        .script_list(
            StatusCode::SERVICE_UNAVAILABLE,
            json!({ "error": "Database offline" }),
        )
        .await;

    let err = store_for(&server_url)
        .list_blogs()
        .await
        .expect_err("must fail");

    assert!(
        matches!(&err, StoreError::Rejected { status: 503, message: Some(m) } if m == "Database offline"),
        "unexpected error: {err}"
    );
    assert_eq!(err.user_message("Failed to fetch blogs"), "Database offline");
}

#[tokio::test]
async fn list_with_non_array_body_is_malformed() {
    let (server_url, state) = spawn_blog_server().await;
    state
        .script_list(StatusCode::OK, json!({ "blogs": [] }))
        .await;

    let err = store_for(&server_url)
        .list_blogs()
        .await
        .expect_err("must fail");

    assert!(matches!(err, StoreError::MalformedBody(_)), "got {err}");
    assert_eq!(
        err.user_message("Failed to fetch blogs"),
        "Failed to fetch blogs"
    );
}

#[tokio::test]
async fn delete_targets_item_route_and_ignores_success_body() {
    let (server_url, state) = spawn_blog_server().await;
    state.script_mutation(StatusCode::NO_CONTENT, "").await;
    let store = store_for(&server_url);
    let id = BlogId::from("abc123");

    store.delete_blog(&id).await.expect("delete");

    assert_eq!(*state.deleted.lock().await, vec!["abc123".to_string()]);
    assert_eq!(store.config().blog_url(&id).path(), "/api/blogs/abc123");
}

#[tokio::test]
async fn delete_failure_with_plain_text_body_has_no_reason() {
    let (server_url, state) = spawn_blog_server().await;
    state
        .script_mutation(StatusCode::INTERNAL_SERVER_ERROR, "upstream exploded")
        .await;

    let err = store_for(&server_url)
        .delete_blog(&BlogId::from("abc123"))
        .await
        .expect_err("must fail");

    assert!(matches!(
        err,
        StoreError::Rejected {
            status: 500,
            message: None
        }
    ));
    assert_eq!(
        err.user_message("Failed to delete blog"),
        "Failed to delete blog"
    );
}

#[tokio::test]
async fn update_puts_full_post_body() {
    let (server_url, state) = spawn_blog_server().await;
    let original: BlogPost =
        serde_json::from_value(post_json("p9", "draft")).expect("decode post");
    let payload = original.with_status(BlogStatus::Published);

    store_for(&server_url)
        .update_blog(&payload)
        .await
        .expect("update");

    let updated = state.updated.lock().await.clone();
    assert_eq!(updated.len(), 1);
    let (id, body) = &updated[0];
    assert_eq!(id, "p9");
    assert_eq!(body, &post_json("p9", "published"));
}

#[tokio::test]
async fn update_sends_sparse_post_back_with_only_status_changed() {
    let (server_url, state) = spawn_blog_server().await;
    let received = json!({
        "id": "p1",
        "title": "t",
        "category": "mobile",
        "status": "draft",
        "author": null,
    });
    let post: BlogPost = serde_json::from_value(received.clone()).expect("decode");

    store_for(&server_url)
        .update_blog(&post.with_status(BlogStatus::Published))
        .await
        .expect("update");

    let mut expected = received;
    expected["status"] = json!("published");
    let updated = state.updated.lock().await.clone();
    assert_eq!(updated, vec![("p1".to_string(), expected)]);
}

#[tokio::test]
async fn update_rejection_carries_error_field() {
    let (server_url, state) = spawn_blog_server().await;
    state
        .script_mutation(
            StatusCode::UNPROCESSABLE_ENTITY,
            &json!({ "error": "Title is required" }).to_string(),
        )
        .await;
    let post: BlogPost = serde_json::from_value(post_json("p1", "draft")).expect("decode");

    let err = store_for(&server_url)
        .update_blog(&post)
        .await
        .expect_err("must fail");
    assert_eq!(err.user_message("Failed to update blog status"), "Title is required");
}

#[tokio::test]
async fn unreachable_api_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let err = store_for(&format!("http://{addr}"))
        .list_blogs()
        .await
        .expect_err("must fail");

    assert!(matches!(err, StoreError::Transport(_)), "got {err}");
    assert_eq!(
        err.user_message("Failed to fetch blogs"),
        "Failed to fetch blogs"
    );
}
