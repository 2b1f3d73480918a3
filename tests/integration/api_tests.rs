//! JSON API integration tests

use serde_json::{json, Value};

use crate::common::{spawn_app, ADMIN_USERNAME};

#[tokio::test]
async fn test_health_check() {
    let app = spawn_app().await;

    let (status, body) = app.get_json("/api/health").await;
    assert_eq!(status, 200);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_openapi_document() {
    let app = spawn_app().await;

    let (status, body) = app.get_json("/api/openapi.json").await;
    assert_eq!(status, 200);
    assert!(body["paths"]["/posts/"].is_object());
    assert!(body["components"]["securitySchemes"]["token_auth"].is_object());
}

// =============================================================================
// ACCOUNTS
// =============================================================================

#[tokio::test]
async fn test_register_creates_one_profile_and_one_token() {
    let app = spawn_app().await;

    let user = app.register("alice", "s3cret-pass").await;
    assert_eq!(user.token.len(), 40);

    assert_eq!(app.repository.accounts.count_profiles(user.id).await.unwrap(), 1);
    assert_eq!(app.repository.accounts.count_tokens(user.id).await.unwrap(), 1);

    let profile = app.repository.accounts.get_profile(user.id).await.unwrap();
    assert_eq!(profile.role.as_str(), "Member");

    let stored = app.repository.accounts.get_by_id(user.id).await.unwrap();
    assert_ne!(stored.password, "s3cret-pass");
}

#[tokio::test]
async fn test_register_response_hides_password() {
    let app = spawn_app().await;

    let response = app
        .client
        .post(app.url("/api/accounts/register/"))
        .json(&json!({ "username": "bob", "password": "pw-bob-123", "bio": "hi" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["username"], "bob");
    assert_eq!(body["bio"], "hi");
    assert!(body.get("password").is_none());
    assert!(body["token"].is_string());
}

#[tokio::test]
async fn test_register_rejects_duplicate_and_invalid_usernames() {
    let app = spawn_app().await;
    app.register("alice", "pw-alice-1").await;

    let response = app
        .client
        .post(app.url("/api/accounts/register/"))
        .json(&json!({ "username": "alice", "password": "other" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["fields"]["username"][0], "A user with that username already exists.");

    let response = app
        .client
        .post(app.url("/api/accounts/register/"))
        .json(&json!({ "username": "has space", "password": "pw" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    let response = app
        .client
        .post(app.url("/api/accounts/register/"))
        .json(&json!({ "username": "nopass" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["fields"]["password"][0], "This field is required.");
}

#[tokio::test]
async fn test_login_returns_same_token_each_time() {
    let app = spawn_app().await;
    let user = app.register("carol", "pw-carol-1").await;

    let mut tokens = Vec::new();
    for _ in 0..2 {
        let response = app
            .client
            .post(app.url("/api/accounts/login/"))
            .json(&json!({ "username": "carol", "password": "pw-carol-1" }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["user_id"], user.id);
        assert_eq!(body["username"], "carol");
        tokens.push(body["token"].as_str().unwrap().to_string());
    }

    assert_eq!(tokens[0], tokens[1]);
    assert_eq!(tokens[0], user.token);
    assert_eq!(app.repository.accounts.count_tokens(user.id).await.unwrap(), 1);
}

#[tokio::test]
async fn test_login_invalid_credentials() {
    let app = spawn_app().await;
    app.register("dave", "pw-dave-1").await;

    let response = app
        .client
        .post(app.url("/api/accounts/login/"))
        .json(&json!({ "username": "dave", "password": "wrong" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 401);

    let response = app
        .client
        .post(app.url("/api/accounts/login/"))
        .json(&json!({ "username": "nobody", "password": "wrong" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn test_profile_requires_token_and_updates() {
    let app = spawn_app().await;
    let user = app.register("erin", "pw-erin-1").await;

    let response = app.client.get(app.url("/api/accounts/profile/")).send().await.unwrap();
    assert_eq!(response.status(), 401);

    let response = app
        .client
        .put(app.url("/api/accounts/profile/"))
        .header("Authorization", format!("Bearer {}", user.token))
        .json(&json!({ "bio": "Writes about Rust" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["bio"], "Writes about Rust");
    assert_eq!(body["email"], "erin@example.com");
}

#[tokio::test]
async fn test_invalid_token_is_rejected_even_on_reads() {
    let app = spawn_app().await;

    let response = app
        .client
        .get(app.url("/api/posts/"))
        .header("Authorization", "Token not-a-real-token")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn test_follow_counts_and_idempotence() {
    let app = spawn_app().await;
    let u = app.register("u", "pw-u-1234").await;
    let v = app.register("v", "pw-v-1234").await;

    for _ in 0..2 {
        let response = app
            .client
            .post(app.url(&format!("/api/accounts/follow/{}/", v.id)))
            .header("Authorization", format!("Token {}", u.token))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
    }

    let (_, v_detail) = app.get_json(&format!("/api/accounts/{}/", v.id)).await;
    assert_eq!(v_detail["followers_count"], 1);
    assert_eq!(v_detail["following_count"], 0);
    let (_, u_detail) = app.get_json(&format!("/api/accounts/{}/", u.id)).await;
    assert_eq!(u_detail["following_count"], 1);

    let response = app
        .client
        .post(app.url(&format!("/api/accounts/follow/{}/", u.id)))
        .header("Authorization", format!("Token {}", u.token))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    let response = app
        .client
        .post(app.url("/api/accounts/follow/9999/"))
        .header("Authorization", format!("Token {}", u.token))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);

    let response = app
        .client
        .post(app.url(&format!("/api/accounts/unfollow/{}/", v.id)))
        .header("Authorization", format!("Token {}", u.token))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["followers_count"], 0);
}

#[tokio::test]
async fn test_role_and_permission_changes_need_admin() {
    let app = spawn_app().await;
    let member = app.register("member", "pw-member-1").await;
    let admin_token = app.admin_token().await;

    let response = app
        .client
        .put(app.url(&format!("/api/accounts/{}/role/", member.id)))
        .header("Authorization", format!("Token {}", member.token))
        .json(&json!({ "role": "Admin" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 403);

    let response = app
        .client
        .put(app.url(&format!("/api/accounts/{}/role/", member.id)))
        .header("Authorization", format!("Token {}", admin_token))
        .json(&json!({ "role": "Librarian" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["role"], "Librarian");

    let response = app
        .client
        .post(app.url(&format!("/api/accounts/{}/permissions/", member.id)))
        .header("Authorization", format!("Token {}", admin_token))
        .json(&json!({ "codename": "can_add_book" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!(["can_add_book"]));

    let response = app
        .client
        .delete(app.url(&format!("/api/accounts/{}/permissions/can_add_book/", member.id)))
        .header("Authorization", format!("Token {}", admin_token))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!([]));

    let (_, admin) = app.get_json("/api/accounts/1/").await;
    assert_eq!(admin["username"], ADMIN_USERNAME);
    assert_eq!(admin["role"], "Admin");
}

// =============================================================================
// POSTS
// =============================================================================

#[tokio::test]
async fn test_create_post_binds_author_to_caller() {
    let app = spawn_app().await;
    let u = app.register("writer", "pw-writer-1").await;
    let other = app.register("other", "pw-other-1").await;

    let response = app
        .client
        .post(app.url("/api/posts/"))
        .header("Authorization", format!("Token {}", u.token))
        .json(&json!({ "title": "Hello", "content": "World", "author": other.id }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);

    let post: Value = response.json().await.unwrap();
    assert_eq!(post["author"], u.id);
    assert_eq!(post["author_username"], "writer");
    assert_eq!(post["title"], "Hello");
    assert!(post["created_at"].is_string());
    assert!(post["updated_at"].is_string());
}

#[tokio::test]
async fn test_create_post_requires_authentication_and_fields() {
    let app = spawn_app().await;
    let u = app.register("writer", "pw-writer-1").await;

    let response = app
        .client
        .post(app.url("/api/posts/"))
        .json(&json!({ "title": "Hello", "content": "World" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 401);

    let response = app
        .client
        .post(app.url("/api/posts/"))
        .header("Authorization", format!("Token {}", u.token))
        .json(&json!({ "content": "No title" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["fields"]["title"][0], "This field is required.");

    let (_, page) = app.get_json("/api/posts/").await;
    assert_eq!(page["count"], 0);
}

#[tokio::test]
async fn test_whitespace_only_text_is_rejected() {
    let app = spawn_app().await;
    let u = app.register("blank", "pw-blank-123").await;

    let response = app
        .client
        .post(app.url("/api/posts/"))
        .header("Authorization", format!("Token {}", u.token))
        .json(&json!({ "title": "   ", "content": "Body" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert!(body["fields"]["title"].is_array());

    let post = app.create_post(&u, "  Kept  ", "Body").await;
    assert_eq!(post["title"], "Kept");
    let id = post["id"].as_i64().unwrap();

    let response = app
        .client
        .patch(app.url(&format!("/api/posts/{}/", id)))
        .header("Authorization", format!("Token {}", u.token))
        .json(&json!({ "content": "  \n " }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["fields"]["content"][0], "This field may not be blank.");

    let response = app
        .client
        .post(app.url("/api/comments/"))
        .header("Authorization", format!("Token {}", u.token))
        .json(&json!({ "post": id, "content": "   " }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    let (_, unchanged) = app.get_json(&format!("/api/posts/{}/", id)).await;
    assert_eq!(unchanged["content"], "Body");
    let (_, comments) = app.get_json("/api/comments/").await;
    assert_eq!(comments["count"], 0);

    let admin_token = app.admin_token().await;
    let response = app
        .client
        .post(app.url("/api/authors/"))
        .header("Authorization", format!("Token {}", admin_token))
        .json(&json!({ "name": "   " }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
    let (_, authors) = app.get_json("/api/authors/").await;
    assert_eq!(authors, json!([]));
}

#[tokio::test]
async fn test_non_author_cannot_modify_post() {
    let app = spawn_app().await;
    let author = app.register("author", "pw-author-1").await;
    let stranger = app.register("stranger", "pw-stranger-1").await;
    let post = app.create_post(&author, "Original", "Body").await;
    let id = post["id"].as_i64().unwrap();

    let response = app
        .client
        .patch(app.url(&format!("/api/posts/{}/", id)))
        .header("Authorization", format!("Token {}", stranger.token))
        .json(&json!({ "title": "Hijacked" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 403);

    let response = app
        .client
        .delete(app.url(&format!("/api/posts/{}/", id)))
        .header("Authorization", format!("Token {}", stranger.token))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 403);

    let response = app
        .client
        .put(app.url(&format!("/api/posts/{}/", id)))
        .json(&json!({ "title": "Anon", "content": "Anon" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 401);

    let (status, unchanged) = app.get_json(&format!("/api/posts/{}/", id)).await;
    assert_eq!(status, 200);
    assert_eq!(unchanged, post);
}

#[tokio::test]
async fn test_author_updates_and_deletes_post() {
    let app = spawn_app().await;
    let author = app.register("author", "pw-author-1").await;
    let post = app.create_post(&author, "Draft", "Body").await;
    let id = post["id"].as_i64().unwrap();

    let response = app
        .client
        .patch(app.url(&format!("/api/posts/{}/", id)))
        .header("Authorization", format!("Token {}", author.token))
        .json(&json!({ "title": "Final" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let updated: Value = response.json().await.unwrap();
    assert_eq!(updated["title"], "Final");
    assert_eq!(updated["content"], "Body");

    let response = app
        .client
        .put(app.url(&format!("/api/posts/{}/", id)))
        .header("Authorization", format!("Token {}", author.token))
        .json(&json!({ "title": "Replaced" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    let response = app
        .client
        .delete(app.url(&format!("/api/posts/{}/", id)))
        .header("Authorization", format!("Token {}", author.token))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 204);

    let (status, _) = app.get_json(&format!("/api/posts/{}/", id)).await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn test_post_search_filter_and_ordering() {
    let app = spawn_app().await;
    let alice = app.register("alice", "pw-alice-1").await;
    let bob = app.register("bob", "pw-bob-123").await;
    app.create_post(&alice, "Rust ownership", "Borrowing explained").await;
    app.create_post(&alice, "Async web", "Tokio and axum").await;
    app.create_post(&bob, "Gardening", "Tomatoes in rust-colored pots").await;

    let (_, page) = app.get_json("/api/posts/?search=rust").await;
    assert_eq!(page["count"], 2);

    let (_, page) = app.get_json("/api/posts/?search=rust%20borrowing").await;
    assert_eq!(page["count"], 1);
    assert_eq!(page["results"][0]["title"], "Rust ownership");

    let (_, page) = app.get_json("/api/posts/?search=bob").await;
    assert_eq!(page["count"], 1);
    assert_eq!(page["results"][0]["title"], "Gardening");

    let (_, page) = app.get_json(&format!("/api/posts/?author={}", alice.id)).await;
    assert_eq!(page["count"], 2);

    let (_, page) = app.get_json("/api/posts/?ordering=title").await;
    let titles: Vec<&str> = page["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Async web", "Gardening", "Rust ownership"]);

    let (_, page) = app.get_json("/api/posts/").await;
    assert_eq!(page["results"][0]["title"], "Gardening");

    let (_, page) = app.get_json("/api/posts/?ordering=password").await;
    assert_eq!(page["results"][0]["title"], "Gardening");
}

#[tokio::test]
async fn test_created_at_filter() {
    let app = spawn_app().await;
    let alice = app.register("alice", "pw-alice-1").await;
    let post = app.create_post(&alice, "Timed", "Body").await;
    app.create_post(&alice, "Other", "Body").await;

    let created_at = post["created_at"].as_str().unwrap();
    let response = app
        .client
        .get(app.url("/api/posts/"))
        .query(&[("created_at", created_at)])
        .send()
        .await
        .unwrap();
    let page: Value = response.json().await.unwrap();
    assert_eq!(page["count"], 1);
    assert_eq!(page["results"][0]["title"], "Timed");

    let (status, body) = app.get_json("/api/posts/?created_at=yesterday").await;
    assert_eq!(status, 400);
    assert!(body["fields"]["created_at"].is_array());
}

#[tokio::test]
async fn test_pagination_caps_and_empty_pages() {
    let app = spawn_app().await;
    let alice = app.register("alice", "pw-alice-1").await;
    for i in 0..12 {
        app.create_post(&alice, &format!("Post {}", i), "Body").await;
    }

    let (_, page) = app.get_json("/api/posts/").await;
    assert_eq!(page["count"], 12);
    assert_eq!(page["page_size"], 10);
    assert_eq!(page["results"].as_array().unwrap().len(), 10);

    let (_, page) = app.get_json("/api/posts/?page=2").await;
    assert_eq!(page["results"].as_array().unwrap().len(), 2);

    let (_, page) = app.get_json("/api/posts/?page_size=500").await;
    assert_eq!(page["page_size"], 100);
    assert_eq!(page["results"].as_array().unwrap().len(), 12);

    let (status, page) = app.get_json("/api/posts/?page=50").await;
    assert_eq!(status, 200);
    assert_eq!(page["count"], 12);
    assert_eq!(page["results"], json!([]));
}

#[tokio::test]
async fn test_feed_shows_followed_authors_only() {
    let app = spawn_app().await;
    let reader = app.register("reader", "pw-reader-1").await;
    let followed = app.register("followed", "pw-followed-1").await;
    let ignored = app.register("ignored", "pw-ignored-1").await;
    app.create_post(&followed, "Seen", "Body").await;
    app.create_post(&ignored, "Unseen", "Body").await;

    let response = app.client.get(app.url("/api/feed/")).send().await.unwrap();
    assert_eq!(response.status(), 401);

    app.client
        .post(app.url(&format!("/api/accounts/follow/{}/", followed.id)))
        .header("Authorization", format!("Token {}", reader.token))
        .send()
        .await
        .unwrap();

    let response = app
        .client
        .get(app.url("/api/feed/"))
        .header("Authorization", format!("Token {}", reader.token))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let page: Value = response.json().await.unwrap();
    assert_eq!(page["count"], 1);
    assert_eq!(page["results"][0]["title"], "Seen");
}

// =============================================================================
// COMMENTS
// =============================================================================

#[tokio::test]
async fn test_comment_lifecycle() {
    let app = spawn_app().await;
    let author = app.register("author", "pw-author-1").await;
    let commenter = app.register("commenter", "pw-commenter-1").await;
    let post = app.create_post(&author, "Topic", "Body").await;
    let post_id = post["id"].as_i64().unwrap();

    let response = app
        .client
        .post(app.url("/api/comments/"))
        .header("Authorization", format!("Token {}", commenter.token))
        .json(&json!({ "post": 9999, "content": "Lost" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["fields"]["post"][0], "Invalid pk \"9999\" - object does not exist.");

    let response = app
        .client
        .post(app.url("/api/comments/"))
        .header("Authorization", format!("Token {}", commenter.token))
        .json(&json!({ "post": post_id, "content": "Nice post" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);
    let comment: Value = response.json().await.unwrap();
    assert_eq!(comment["post"], post_id);
    assert_eq!(comment["author"], commenter.id);
    let comment_id = comment["id"].as_i64().unwrap();

    let (_, page) = app.get_json(&format!("/api/comments/?post={}", post_id)).await;
    assert_eq!(page["count"], 1);
    let (_, page) = app.get_json("/api/comments/?search=nice").await;
    assert_eq!(page["count"], 1);

    let response = app
        .client
        .patch(app.url(&format!("/api/comments/{}/", comment_id)))
        .header("Authorization", format!("Token {}", author.token))
        .json(&json!({ "content": "Edited by someone else" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 403);

    let response = app
        .client
        .patch(app.url(&format!("/api/comments/{}/", comment_id)))
        .header("Authorization", format!("Token {}", commenter.token))
        .json(&json!({ "content": "Very nice post" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["content"], "Very nice post");

    // Deleting the post removes its comments
    let response = app
        .client
        .delete(app.url(&format!("/api/posts/{}/", post_id)))
        .header("Authorization", format!("Token {}", author.token))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 204);

    let (status, _) = app.get_json(&format!("/api/comments/{}/", comment_id)).await;
    assert_eq!(status, 404);
}

// =============================================================================
// LIBRARY
// =============================================================================

#[tokio::test]
async fn test_library_administration_and_cascades() {
    let app = spawn_app().await;
    let member = app.register("member", "pw-member-1").await;
    let admin_token = app.admin_token().await;

    let response = app
        .client
        .post(app.url("/api/authors/"))
        .header("Authorization", format!("Token {}", member.token))
        .json(&json!({ "name": "Ursula K. Le Guin" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 403);

    let response = app
        .client
        .post(app.url("/api/libraries/"))
        .header("Authorization", format!("Token {}", admin_token))
        .json(&json!({ "name": "Central" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);
    let library: Value = response.json().await.unwrap();
    let library_id = library["id"].as_i64().unwrap();

    let book = app
        .state
        .services
        .library
        .add_book(&quill_server::models::library::BookForm {
            title: "The Dispossessed".to_string(),
            author: "Ursula K. Le Guin".to_string(),
        })
        .await
        .unwrap();

    let response = app
        .client
        .post(app.url(&format!("/api/libraries/{}/books/", library_id)))
        .header("Authorization", format!("Token {}", admin_token))
        .json(&json!({ "book_id": book.id }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let response = app
        .client
        .put(app.url(&format!("/api/libraries/{}/librarian/", library_id)))
        .header("Authorization", format!("Token {}", admin_token))
        .json(&json!({ "name": "Mira" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let (_, detail) = app.get_json(&format!("/api/libraries/{}/", library_id)).await;
    assert_eq!(detail["library"]["name"], "Central");
    assert_eq!(detail["books"][0]["title"], "The Dispossessed");
    assert_eq!(detail["librarian"]["name"], "Mira");

    // Deleting the library removes its librarian, not the book
    let response = app
        .client
        .delete(app.url(&format!("/api/libraries/{}/", library_id)))
        .header("Authorization", format!("Token {}", admin_token))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 204);

    let librarians: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM librarians")
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(librarians, 0);
    let (_, books) = app.get_json("/api/books/").await;
    assert_eq!(books.as_array().unwrap().len(), 1);

    // Deleting the author removes their books
    let response = app
        .client
        .delete(app.url(&format!("/api/authors/{}/", book.author_id)))
        .header("Authorization", format!("Token {}", admin_token))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 204);

    let (_, books) = app.get_json("/api/books/").await;
    assert_eq!(books, json!([]));
}
