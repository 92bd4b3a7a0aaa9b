use super::*;

#[test]
fn user_deserializes_camel_case() {
    let json = r#"{"id":"u1","email":"a@b.com","username":"ann","avatarUrl":"https://img/1.png"}"#;
    let user: User = serde_json::from_str(json).unwrap();
    assert_eq!(user.id, "u1");
    assert_eq!(user.email.as_deref(), Some("a@b.com"));
    assert_eq!(user.username.as_deref(), Some("ann"));
    assert_eq!(user.avatar_url.as_deref(), Some("https://img/1.png"));
}

#[test]
fn user_with_only_id() {
    let user: User = serde_json::from_str(r#"{"id":"u2"}"#).unwrap();
    assert_eq!(user, User::with_id("u2"));
}

#[test]
fn user_omits_absent_optional_fields() {
    let json = serde_json::to_string(&User::with_id("u3")).unwrap();
    assert_eq!(json, r#"{"id":"u3"}"#);
}

#[test]
fn user_null_optionals_are_accepted() {
    let user: User = serde_json::from_str(r#"{"id":"u4","email":null,"avatarUrl":null}"#).unwrap();
    assert!(user.email.is_none());
    assert!(user.avatar_url.is_none());
}

#[test]
fn auth_response_from_login_body() {
    let json = r#"{"user":{"id":"u1","email":"a@b.com"},"token":"eyJ.x.y"}"#;
    let resp: AuthResponse = serde_json::from_str(json).unwrap();
    assert_eq!(resp.user.id, "u1");
    assert_eq!(resp.token, "eyJ.x.y");
}
