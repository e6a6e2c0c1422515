use super::*;

// =============================================================================
// CmsEndpoint
// =============================================================================

#[test]
fn endpoint_trims_trailing_slash() {
    let endpoint = CmsEndpoint::new("http://cms.test/", None);
    assert_eq!(endpoint.base_url(), "http://cms.test");
    assert_eq!(endpoint.login_url(), "http://cms.test/api/auth/local");
}

#[test]
fn endpoint_formats_user_lookup_with_relations() {
    let endpoint = CmsEndpoint::default();
    assert_eq!(endpoint.user_url(UserId(5)), "http://localhost:1337/api/users/5?populate=*");
}

#[test]
fn endpoint_formats_article_paths() {
    let endpoint = CmsEndpoint::new("http://cms.test", None);
    assert_eq!(endpoint.create_article_url(), "http://cms.test/api/articles");
    assert_eq!(endpoint.article_url(9), "http://cms.test/api/articles/9");
    assert_eq!(endpoint.upload_url(), "http://cms.test/api/upload");
    assert!(endpoint.articles_url().starts_with("http://cms.test/api/articles?populate=*"));
}

#[test]
fn endpoint_authorization_requires_non_blank_token() {
    assert_eq!(CmsEndpoint::new("http://x", Some("abc".into())).authorization().as_deref(), Some("Bearer abc"));
    assert!(CmsEndpoint::new("http://x", Some("  ".into())).authorization().is_none());
    assert!(CmsEndpoint::new("http://x", None).authorization().is_none());
}

#[test]
fn endpoint_media_url_resolves_relative_paths() {
    let endpoint = CmsEndpoint::new("http://cms.test", None);
    assert_eq!(endpoint.media_url("/uploads/a.png"), "http://cms.test/uploads/a.png");
    assert_eq!(endpoint.media_url("https://cdn.test/a.png"), "https://cdn.test/a.png");
}

// =============================================================================
// request bodies
// =============================================================================

#[test]
fn create_article_body_includes_derived_slug() {
    let draft = ArticleDraft {
        title: "Hello Big World".to_owned(),
        body: "body".to_owned(),
        short_description: "short".to_owned(),
        category: Some(2),
    };
    let body = create_article_body(&draft);
    assert_eq!(body["data"]["Title"], "Hello Big World");
    assert_eq!(body["data"]["Slug"], "hello-big-world");
    assert_eq!(body["data"]["shortDescription"], "short");
    assert!(body["data"].get("Category").is_none());
}

#[test]
fn relations_body_wraps_ids_in_lists() {
    let body = relations_body(2, UserId(5));
    assert_eq!(body, json!({ "data": { "Category": [2], "author": [5] } }));
}

// =============================================================================
// error decoding
// =============================================================================

#[test]
fn check_status_passes_2xx() {
    assert!(check_status(200, "").is_ok());
    assert!(check_status(204, "").is_ok());
}

#[test]
fn parse_error_body_extracts_validation_field() {
    let body = r#"{
        "data": null,
        "error": {
            "status": 400,
            "name": "ValidationError",
            "message": "This attribute must be unique",
            "details": { "errors": [{ "path": ["Title"], "message": "This attribute must be unique", "name": "ValidationError" }] }
        }
    }"#;
    let err = parse_error_body(400, body);
    assert_eq!(err.field(), Some("Title"));
    assert!(matches!(err, CmsError::Validation { status: 400, .. }));
}

#[test]
fn parse_error_body_maps_other_errors_to_status() {
    let body = r#"{"data":null,"error":{"status":404,"name":"NotFoundError","message":"Not Found","details":{}}}"#;
    assert_eq!(parse_error_body(404, body), CmsError::Status { status: 404, message: "Not Found".to_owned() });
}

#[test]
fn parse_error_body_tolerates_non_json() {
    assert_eq!(
        parse_error_body(502, "Bad Gateway"),
        CmsError::Status { status: 502, message: "Bad Gateway".to_owned() }
    );
    assert_eq!(parse_error_body(500, ""), CmsError::Status { status: 500, message: "HTTP 500".to_owned() });
}

// =============================================================================
// response parsing
// =============================================================================

#[test]
fn parse_auth_returns_jwt() {
    let body = r#"{"jwt":"a.b.c","user":{"id":5,"username":"ada"}}"#;
    assert_eq!(parse_auth(body).unwrap(), "a.b.c");
}

#[test]
fn parse_auth_rejects_missing_or_empty_jwt() {
    assert!(matches!(parse_auth(r#"{"user":{}}"#), Err(CmsError::Parse(_))));
    assert!(matches!(parse_auth(r#"{"jwt":""}"#), Err(CmsError::Parse(_))));
}

#[test]
fn parse_user_projects_fields() {
    let body = r#"{"id":5,"email":"a@b.com","username":"ada","avatarurl":null,"about":"hi","articles":[]}"#;
    let profile = parse_user(body).unwrap();
    assert_eq!(profile.id, UserId(5));
    assert_eq!(profile.email, "a@b.com");
}

#[test]
fn parse_user_rejects_non_user_body() {
    assert!(matches!(parse_user("[]"), Err(CmsError::Parse(_))));
}

#[test]
fn parse_collection_reads_categories() {
    let body = r#"{"data":[{"id":1,"attributes":{"Title":"Rust"}},{"id":2,"attributes":{"Title":"Web"}}],"meta":{}}"#;
    let categories: Vec<Category> = parse_collection(body).unwrap();
    assert_eq!(categories.len(), 2);
    assert_eq!(categories[1].title, "Web");
}

#[test]
fn parse_created_id_reads_entry_id() {
    assert_eq!(parse_created_id(r#"{"data":{"id":17,"attributes":{}},"meta":{}}"#).unwrap(), 17);
}

#[test]
fn parse_upload_takes_first_file() {
    let body = r#"[{"id":3,"url":"/uploads/a.png","name":"a.png"}]"#;
    assert_eq!(parse_upload(body).unwrap(), UploadedFile { id: 3, url: "/uploads/a.png".to_owned() });
    assert!(matches!(parse_upload("[]"), Err(CmsError::Parse(_))));
}
