use shared_models::auth::Role;
use shared_utils::jwt::{issue_token, validate_token};
use shared_utils::test_utils::{JwtTestUtils, TestConfig, TestUser};

#[test]
fn issued_token_validates_back_to_same_identity() {
    let config = TestConfig::default();
    let user = TestUser::new("bookingtest", &[Role::Patient, Role::Provider]);

    let token = issue_token(&user.to_auth_user(), &config.jwt_secret, 24).unwrap();
    let resolved = validate_token(&token, &config.jwt_secret).unwrap();

    assert_eq!(resolved.id, user.id);
    assert_eq!(resolved.username, "bookingtest");
    assert!(resolved.has_role(Role::Patient));
    assert!(resolved.has_role(Role::Provider));
    assert!(!resolved.has_role(Role::Admin));
}

#[test]
fn expired_token_is_rejected() {
    let config = TestConfig::default();
    let user = TestUser::patient("latecomer");

    let token = JwtTestUtils::create_expired_token(&user, &config.jwt_secret);

    let err = validate_token(&token, &config.jwt_secret).unwrap_err();
    assert_eq!(err, "Token expired");
}

#[test]
fn tampered_signature_is_rejected() {
    let config = TestConfig::default();
    let user = TestUser::patient("mallory");

    let token = JwtTestUtils::create_invalid_signature_token(&user);

    let err = validate_token(&token, &config.jwt_secret).unwrap_err();
    assert_eq!(err, "Invalid token signature");
}

#[test]
fn malformed_token_is_rejected() {
    let config = TestConfig::default();

    assert!(validate_token("not-a-jwt", &config.jwt_secret).is_err());
    assert!(validate_token("a.b", &config.jwt_secret).is_err());
}

#[test]
fn empty_secret_is_refused() {
    let user = TestUser::patient("nosecret");
    let token = JwtTestUtils::create_test_token(&user, "some-secret", None);

    let err = validate_token(&token, "").unwrap_err();
    assert_eq!(err, "JWT secret is not set");
}
