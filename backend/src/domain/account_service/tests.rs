//! Tests for the account service.

use std::sync::Arc;

use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{
    MockPaymentGateway, MockUserRepository, PaymentGatewayError, UserPersistenceError,
};
use crate::domain::service_fixtures::{self, FixtureClock, fixture_now};
use crate::domain::{ErrorCode, RegistrationParts};

/// Reversible stand-in so tests can assert on what was stored.
struct PrefixHasher;

impl PasswordHasher for PrefixHasher {
    fn hash(&self, password: &Password) -> Result<HashedPassword, PasswordHashError> {
        Ok(HashedPassword::new(format!("hashed:{}", password.expose())))
    }

    fn verify(
        &self,
        password: &Password,
        hash: &HashedPassword,
    ) -> Result<bool, PasswordHashError> {
        Ok(hash.as_str() == format!("hashed:{}", password.expose()))
    }
}

struct SubjectTokens;

impl TokenIssuer for SubjectTokens {
    fn issue(&self, user: &UserId) -> Result<String, TokenError> {
        Ok(format!("token-for-{user}"))
    }

    fn verify(&self, token: &str) -> Result<UserId, TokenError> {
        let raw = token
            .strip_prefix("token-for-")
            .ok_or_else(|| TokenError::invalid("unknown prefix"))?;
        UserId::new(raw).map_err(|err| TokenError::invalid(err.to_string()))
    }
}

fn make_service(users: MockUserRepository, gateway: MockPaymentGateway) -> AccountServiceImpl {
    AccountServiceImpl::new(
        Arc::new(users),
        Arc::new(PrefixHasher),
        Arc::new(SubjectTokens),
        Arc::new(gateway),
        Arc::new(FixtureClock),
    )
}

#[fixture]
fn account() -> UserAccount {
    service_fixtures::account(service_fixtures::user("Asha Menon", "asha@example.com", true))
}

fn registration() -> Registration {
    Registration::try_from_parts(RegistrationParts {
        name: "Ravi Kumar",
        email: "Ravi@Example.com",
        phone: "9847012345",
        password: "Secret1!",
        avatar: None,
        is_host: false,
    })
    .expect("valid registration")
}

fn credentials(password: &str) -> LoginCredentials {
    LoginCredentials::try_from_parts("asha@example.com", password).expect("credentials")
}

#[tokio::test]
async fn register_stores_hash_and_issues_token() {
    let mut users = MockUserRepository::new();
    users
        .expect_insert()
        .withf(|account| {
            account.password_hash.as_str() == "hashed:Secret1!"
                && account.user.email.as_ref() == "ravi@example.com"
                && !account.user.is_host
        })
        .times(1)
        .return_once(|_| Ok(()));

    let session = make_service(users, MockPaymentGateway::new())
        .register(registration())
        .await
        .expect("registration succeeds");

    assert_eq!(session.token, format!("token-for-{}", session.user.id));
    assert_eq!(session.user.created_at, fixture_now());
}

#[tokio::test]
async fn register_reports_duplicate_email_as_conflict() {
    let mut users = MockUserRepository::new();
    users
        .expect_insert()
        .times(1)
        .return_once(|_| Err(UserPersistenceError::duplicate_email()));

    let err = make_service(users, MockPaymentGateway::new())
        .register(registration())
        .await
        .expect_err("duplicate");

    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[tokio::test]
async fn register_maps_connection_failures_to_service_unavailable() {
    let mut users = MockUserRepository::new();
    users
        .expect_insert()
        .times(1)
        .return_once(|_| Err(UserPersistenceError::connection("pool exhausted")));

    let err = make_service(users, MockPaymentGateway::new())
        .register(registration())
        .await
        .expect_err("unavailable");

    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
}

#[rstest]
#[case("Secret1!", true)]
#[case("Wrong1!", false)]
#[tokio::test]
async fn login_checks_the_stored_hash(
    account: UserAccount,
    #[case] password: &str,
    #[case] ok: bool,
) {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email()
        .times(1)
        .return_once(move |_| Ok(Some(account)));

    let result = make_service(users, MockPaymentGateway::new())
        .login(&credentials(password), None)
        .await;

    match (ok, result) {
        (true, Ok(session)) => assert!(session.user.is_host),
        (false, Err(err)) => assert_eq!(err.code(), ErrorCode::Unauthorized),
        (expected, other) => panic!("expected success = {expected}, got {other:?}"),
    }
}

#[tokio::test]
async fn login_with_unknown_email_is_unauthorized() {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email()
        .times(1)
        .return_once(|_| Ok(None));

    let err = make_service(users, MockPaymentGateway::new())
        .login(&credentials("Secret1!"), None)
        .await
        .expect_err("unknown account");

    assert_eq!(err.code(), ErrorCode::Unauthorized);
    assert_eq!(err.message(), INVALID_CREDENTIALS);
}

#[rstest]
#[case(LoginRole::Guest, false)]
#[case(LoginRole::Host, true)]
#[tokio::test]
async fn login_role_changes_only_the_reported_flag(
    account: UserAccount,
    #[case] role: LoginRole,
    #[case] expected: bool,
) {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_email()
        .times(1)
        .return_once(move |_| Ok(Some(account)));
    users.expect_update().never();

    let session = make_service(users, MockPaymentGateway::new())
        .login(&credentials("Secret1!"), Some(role))
        .await
        .expect("login succeeds");

    assert_eq!(session.user.is_host, expected);
}

#[tokio::test]
async fn empty_profile_update_is_rejected() {
    let err = make_service(MockUserRepository::new(), MockPaymentGateway::new())
        .update_profile(&UserId::random(), ProfileUpdate::default())
        .await
        .expect_err("empty update");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[tokio::test]
async fn profile_update_overwrites_supplied_fields(account: UserAccount) {
    let id = account.user.id;
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(account)));
    users
        .expect_update()
        .withf(|user| user.name.as_ref() == "Asha M" && user.phone.as_ref() == "+91 98470 12345")
        .times(1)
        .return_once(|_| Ok(true));

    let update = ProfileUpdate::try_from_parts(Some("Asha M"), None, None).expect("update");
    let user = make_service(users, MockPaymentGateway::new())
        .update_profile(&id, update)
        .await
        .expect("update succeeds");

    assert_eq!(user.name.as_ref(), "Asha M");
}

#[rstest]
#[tokio::test]
async fn password_change_requires_current_password(account: UserAccount) {
    let id = account.user.id;
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(account)));
    users.expect_update_password().never();

    let change = PasswordChange::try_from_parts("Guess1!", "Better2@").expect("change");
    let err = make_service(users, MockPaymentGateway::new())
        .change_password(&id, change)
        .await
        .expect_err("wrong current password");

    assert_eq!(err.code(), ErrorCode::Unauthorized);
}

#[rstest]
#[tokio::test]
async fn password_change_stores_new_hash(account: UserAccount) {
    let id = account.user.id;
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(account)));
    users
        .expect_update_password()
        .withf(|_, hash| hash.as_str() == "hashed:Better2@")
        .times(1)
        .return_once(|_, _| Ok(true));

    let change = PasswordChange::try_from_parts("Secret1!", "Better2@").expect("change");
    make_service(users, MockPaymentGateway::new())
        .change_password(&id, change)
        .await
        .expect("password changed");
}

#[tokio::test]
async fn deleting_a_missing_account_is_not_found() {
    let mut users = MockUserRepository::new();
    users.expect_delete().times(1).return_once(|_| Ok(false));

    let err = make_service(users, MockPaymentGateway::new())
        .delete_account(&UserId::random())
        .await
        .expect_err("missing");

    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn linking_a_payment_account_makes_the_user_a_host(account: UserAccount) {
    let mut account = account;
    account.user.is_host = false;
    let id = account.user.id;
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(account)));
    users
        .expect_update()
        .withf(|user| user.is_host && user.has_payment_account())
        .times(1)
        .return_once(|_| Ok(true));

    let linked = PaymentAccountId::new("acc_Hx81").expect("account id");
    let user = make_service(users, MockPaymentGateway::new())
        .link_payment_account(&id, linked.clone())
        .await
        .expect("linked");

    assert_eq!(user.payment_account, Some(linked));
}

#[tokio::test]
async fn onboarding_requires_a_business_name() {
    let err = make_service(MockUserRepository::new(), MockPaymentGateway::new())
        .start_onboarding(&UserId::random(), "  ", None)
        .await
        .expect_err("blank business name");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[tokio::test]
async fn onboarding_falls_back_to_the_stored_phone(account: UserAccount) {
    let id = account.user.id;
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(account)));
    let mut gateway = MockPaymentGateway::new();
    gateway
        .expect_onboarding_link()
        .withf(|request| {
            request.phone.as_ref() == "+91 98470 12345" && request.business_name == "Backwater Stays"
        })
        .times(1)
        .return_once(|_| Ok("https://pay.example/onboard?merchant=x".to_owned()));

    let url = make_service(users, gateway)
        .start_onboarding(&id, " Backwater Stays ", None)
        .await
        .expect("link issued");

    assert!(url.starts_with("https://pay.example/onboard"));
}

#[rstest]
#[tokio::test]
async fn onboarding_without_gateway_is_unavailable(account: UserAccount) {
    let id = account.user.id;
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(account)));
    let mut gateway = MockPaymentGateway::new();
    gateway
        .expect_onboarding_link()
        .times(1)
        .return_once(|_| Err(PaymentGatewayError::not_configured()));

    let err = make_service(users, gateway)
        .start_onboarding(&id, "Backwater Stays", None)
        .await
        .expect_err("no gateway");

    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
}
