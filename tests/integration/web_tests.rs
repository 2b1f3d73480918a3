//! Server-rendered page tests, driven through a cookie-keeping client

use reqwest::Client;
use serde_json::json;

use crate::common::{location, spawn_app, TestApp, ADMIN_PASSWORD, ADMIN_USERNAME};

async fn register_page(app: &TestApp, browser: &Client, username: &str, password: &str) {
    let response = browser
        .post(app.url("/register/"))
        .form(&[
            ("username", username),
            ("email", &format!("{}@example.com", username)),
            ("password1", password),
            ("password2", password),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 303);
    assert_eq!(location(&response), "/profile/");
}

async fn publish(app: &TestApp, browser: &Client, title: &str, content: &str, tags: &str) -> String {
    let response = browser
        .post(app.url("/post/new/"))
        .form(&[("title", title), ("content", content), ("tags", tags)])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 303);
    location(&response)
}

#[tokio::test]
async fn test_protected_page_redirects_to_login_with_next() {
    let app = spawn_app().await;
    let browser = app.browser();

    let response = browser.get(app.url("/post/new/")).send().await.unwrap();
    assert_eq!(response.status(), 303);
    assert_eq!(location(&response), "/login/?next=/post/new/");

    let response = browser.get(app.url("/profile/")).send().await.unwrap();
    assert_eq!(response.status(), 303);
    assert!(location(&response).starts_with("/login/"));
}

#[tokio::test]
async fn test_register_page_logs_in_and_shows_profile() {
    let app = spawn_app().await;
    let browser = app.browser();
    register_page(&app, &browser, "pagewriter", "pw-page-123").await;

    let response = browser.get(app.url("/profile/")).send().await.unwrap();
    assert_eq!(response.status(), 200);
    let body = response.text().await.unwrap();
    assert!(body.contains("pagewriter"));
    assert!(body.contains("Member"));

    let account = app
        .repository
        .accounts
        .get_by_username("pagewriter")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(app.repository.accounts.count_profiles(account.id).await.unwrap(), 1);
}

#[tokio::test]
async fn test_register_page_rejects_mismatched_passwords() {
    let app = spawn_app().await;
    let browser = app.browser();

    let response = browser
        .post(app.url("/register/"))
        .form(&[
            ("username", "mismatch"),
            ("email", "mismatch@example.com"),
            ("password1", "first-pass"),
            ("password2", "second-pass"),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body = response.text().await.unwrap();
    assert!(body.contains("The two password fields didn"));

    let account = app.repository.accounts.get_by_username("mismatch").await.unwrap();
    assert!(account.is_none());
}

#[tokio::test]
async fn test_login_honors_next_and_logout_ends_session() {
    let app = spawn_app().await;
    app.register("returning", "pw-returning-1").await;
    let browser = app.browser();

    let response = browser
        .post(app.url("/login/"))
        .form(&[
            ("username", "returning"),
            ("password", "pw-returning-1"),
            ("next", "/post/new/"),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 303);
    assert_eq!(location(&response), "/post/new/");

    let response = browser.get(app.url("/post/new/")).send().await.unwrap();
    assert_eq!(response.status(), 200);

    let response = browser.post(app.url("/logout/")).send().await.unwrap();
    assert_eq!(response.status(), 303);
    assert_eq!(location(&response), "/login/");

    let response = browser.get(app.url("/profile/")).send().await.unwrap();
    assert_eq!(response.status(), 303);
}

#[tokio::test]
async fn test_login_page_rejects_bad_password_and_foreign_next() {
    let app = spawn_app().await;
    app.register("careful", "pw-careful-1").await;
    let browser = app.browser();

    let response = app.page_login(&browser, "careful", "wrong").await;
    assert_eq!(response.status(), 200);
    let body = response.text().await.unwrap();
    assert!(body.contains("Unable to log in with provided credentials."));

    let response = browser
        .post(app.url("/login/"))
        .form(&[
            ("username", "careful"),
            ("password", "pw-careful-1"),
            ("next", "https://evil.example.com/"),
        ])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 303);
    assert_eq!(location(&response), "/profile/");
}

// =============================================================================
// BLOG
// =============================================================================

#[tokio::test]
async fn test_tagged_post_appears_in_listing_search_and_tag_pages() {
    let app = spawn_app().await;
    let browser = app.browser();
    register_page(&app, &browser, "blogger", "pw-blogger-1").await;

    let target = publish(&app, &browser, "Learning Django", "Views and templates", "Django, web").await;
    assert!(target.starts_with("/post/"));
    assert!(target.ends_with('/'));

    let response = browser.get(app.url(&target)).send().await.unwrap();
    assert_eq!(response.status(), 200);
    let body = response.text().await.unwrap();
    assert!(body.contains("Views and templates"));

    let body = browser.get(app.url("/")).send().await.unwrap().text().await.unwrap();
    assert!(body.contains("Learning Django"));

    let body = browser
        .get(app.url("/search/?q=DJANGO"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(body.contains("Learning Django"));

    let body = browser
        .get(app.url("/search/?q=flask"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(!body.contains("Learning Django"));

    let body = browser
        .get(app.url("/tags/Django/"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(body.contains("Learning Django"));

    let body = browser
        .get(app.url("/tags/rust/"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(!body.contains("Learning Django"));
}

#[tokio::test]
async fn test_only_author_can_edit_or_delete_blog_post() {
    let app = spawn_app().await;
    let author = app.browser();
    register_page(&app, &author, "owner", "pw-owner-123").await;
    let target = publish(&app, &author, "Mine", "Only mine", "").await;
    let id = target.trim_start_matches("/post/").trim_end_matches('/').to_string();

    let intruder = app.browser();
    register_page(&app, &intruder, "intruder", "pw-intruder-1").await;

    let response = intruder
        .get(app.url(&format!("/post/{}/update/", id)))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 403);

    let response = intruder
        .post(app.url(&format!("/post/{}/update/", id)))
        .form(&[("title", "Taken"), ("content", "Taken"), ("tags", "")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 403);

    let response = intruder
        .post(app.url(&format!("/post/{}/delete/", id)))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 403);

    let body = author.get(app.url(&target)).send().await.unwrap().text().await.unwrap();
    assert!(body.contains("Only mine"));

    let response = author
        .post(app.url(&format!("/post/{}/update/", id)))
        .form(&[("title", "Mine, edited"), ("content", "Still mine"), ("tags", "")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 303);
    assert_eq!(location(&response), target);

    let response = author
        .post(app.url(&format!("/post/{}/delete/", id)))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 303);

    let response = author.get(app.url(&target)).send().await.unwrap();
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_comment_form_errors_rerender_post() {
    let app = spawn_app().await;
    let browser = app.browser();
    register_page(&app, &browser, "commenter", "pw-commenter-1").await;
    let target = publish(&app, &browser, "Discuss", "Talk here", "").await;

    let response = browser
        .post(app.url(&format!("{}comments/new/", target)))
        .form(&[("content", "")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body = response.text().await.unwrap();
    assert!(body.contains("This field is required."));
    assert!(body.contains("Talk here"));

    let response = browser
        .post(app.url(&format!("{}comments/new/", target)))
        .form(&[("content", "First!")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 303);
    assert_eq!(location(&response), target);

    let body = browser.get(app.url(&target)).send().await.unwrap().text().await.unwrap();
    assert!(body.contains("First!"));
}

#[tokio::test]
async fn test_only_author_can_edit_or_delete_comment() {
    let app = spawn_app().await;
    let author = app.browser();
    register_page(&app, &author, "talker", "pw-talker-123").await;
    let target = publish(&app, &author, "Open thread", "Say something", "").await;

    let response = author
        .post(app.url(&format!("{}comments/new/", target)))
        .form(&[("content", "My own words")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 303);

    let post_id: i64 = target.trim_start_matches("/post/").trim_end_matches('/').parse().unwrap();
    let detail = app.state.services.blog.detail(post_id).await.unwrap();
    let comment_id = detail.comments[0].id;

    let intruder = app.browser();
    register_page(&app, &intruder, "meddler", "pw-meddler-1").await;

    let response = intruder
        .get(app.url(&format!("/comment/{}/update/", comment_id)))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 403);

    let response = intruder
        .post(app.url(&format!("/comment/{}/update/", comment_id)))
        .form(&[("content", "Rewritten")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 403);

    let response = intruder
        .post(app.url(&format!("/comment/{}/delete/", comment_id)))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 403);

    let body = author.get(app.url(&target)).send().await.unwrap().text().await.unwrap();
    assert!(body.contains("My own words"));
    assert!(!body.contains("Rewritten"));

    let response = author
        .post(app.url(&format!("/comment/{}/update/", comment_id)))
        .form(&[("content", "My edited words")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 303);
    assert_eq!(location(&response), target);

    let response = author
        .post(app.url(&format!("/comment/{}/delete/", comment_id)))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 303);
    let detail = app.state.services.blog.detail(post_id).await.unwrap();
    assert!(detail.comments.is_empty());
}

#[tokio::test]
async fn test_whitespace_only_blog_input_is_rejected() {
    let app = spawn_app().await;
    let browser = app.browser();
    register_page(&app, &browser, "spacey", "pw-spacey-123").await;

    let response = browser
        .post(app.url("/post/new/"))
        .form(&[("title", "   "), ("content", "Body"), ("tags", "")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body = response.text().await.unwrap();
    assert!(body.contains("Enter a title of at most 200 characters."));
    assert!(app.state.services.blog.list().await.unwrap().is_empty());

    let target = publish(&app, &browser, "  Padded title  ", "Body", "").await;
    let post_id: i64 = target.trim_start_matches("/post/").trim_end_matches('/').parse().unwrap();
    let post = app.state.services.blog.get(post_id).await.unwrap();
    assert_eq!(post.title, "Padded title");

    let response = browser
        .post(app.url(&format!("{}comments/new/", target)))
        .form(&[("content", "   ")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body = response.text().await.unwrap();
    assert!(body.contains("This field is required."));

    let detail = app.state.services.blog.detail(post_id).await.unwrap();
    assert!(detail.comments.is_empty());
}

// =============================================================================
// LIBRARY
// =============================================================================

#[tokio::test]
async fn test_book_management_needs_capability_flag() {
    let app = spawn_app().await;
    let member = app.register("clerk", "pw-clerk-123").await;
    let browser = app.browser();
    let response = app.page_login(&browser, "clerk", "pw-clerk-123").await;
    assert_eq!(response.status(), 303);

    let response = browser.get(app.url("/add_book/")).send().await.unwrap();
    assert_eq!(response.status(), 403);

    let admin_token = app.admin_token().await;
    let response = app
        .client
        .post(app.url(&format!("/api/accounts/{}/permissions/", member.id)))
        .header("Authorization", format!("Token {}", admin_token))
        .json(&json!({ "codename": "can_add_book" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let response = browser.get(app.url("/add_book/")).send().await.unwrap();
    assert_eq!(response.status(), 200);

    let response = browser
        .post(app.url("/add_book/"))
        .form(&[("title", "A Wizard of Earthsea"), ("author", "Ursula K. Le Guin")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 303);

    let body = browser.get(app.url("/books/")).send().await.unwrap().text().await.unwrap();
    assert!(body.contains("A Wizard of Earthsea"));
    assert!(body.contains("Ursula K. Le Guin"));

    let books = app.state.services.library.list_books().await.unwrap();
    let response = browser
        .post(app.url(&format!("/delete_book/{}/", books[0].id)))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 403);
}

#[tokio::test]
async fn test_dashboards_match_role_exactly() {
    let app = spawn_app().await;
    app.register("regular", "pw-regular-1").await;

    let member = app.browser();
    app.page_login(&member, "regular", "pw-regular-1").await;
    let response = member.get(app.url("/member-dashboard/")).send().await.unwrap();
    assert_eq!(response.status(), 200);
    let response = member.get(app.url("/admin-dashboard/")).send().await.unwrap();
    assert_eq!(response.status(), 403);
    let response = member.get(app.url("/librarian-dashboard/")).send().await.unwrap();
    assert_eq!(response.status(), 403);

    let admin = app.browser();
    app.page_login(&admin, ADMIN_USERNAME, ADMIN_PASSWORD).await;
    let response = admin.get(app.url("/admin-dashboard/")).send().await.unwrap();
    assert_eq!(response.status(), 200);
    let response = admin.get(app.url("/member-dashboard/")).send().await.unwrap();
    assert_eq!(response.status(), 403);

    let anonymous = app.browser();
    let response = anonymous.get(app.url("/member-dashboard/")).send().await.unwrap();
    assert_eq!(response.status(), 303);
    assert_eq!(location(&response), "/login/?next=/member-dashboard/");
}

#[tokio::test]
async fn test_whitespace_only_book_fields_are_rejected() {
    let app = spawn_app().await;
    let admin = app.browser();
    app.page_login(&admin, ADMIN_USERNAME, ADMIN_PASSWORD).await;

    let response = admin
        .post(app.url("/add_book/"))
        .form(&[("title", "   "), ("author", "  ")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body = response.text().await.unwrap();
    assert!(body.contains("Enter a title of at most 200 characters."));
    assert!(body.contains("Enter an author name of at most 200 characters."));

    assert!(app.state.services.library.list_books().await.unwrap().is_empty());
    assert!(app.state.services.library.list_authors().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_profile_blank_email_keeps_current_address() {
    let app = spawn_app().await;
    let browser = app.browser();
    register_page(&app, &browser, "steady", "pw-steady-123").await;

    let response = browser
        .post(app.url("/profile/"))
        .form(&[("email", "  ")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 303);
    assert_eq!(location(&response), "/profile/");

    let account = app
        .repository
        .accounts
        .get_by_username("steady")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(account.email, "steady@example.com");

    let response = browser
        .post(app.url("/profile/"))
        .form(&[("email", "not-an-address")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body = response.text().await.unwrap();
    assert!(body.contains("Enter a valid email address."));
}
