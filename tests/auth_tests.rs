mod common;

use async_trait::async_trait;
use mockall::mock;
use uuid::Uuid;

use resumecraft_backend::{
    auth::jwt::JwtService,
    entities::user::{LoginUser, NewUser, User, UserInsert},
    errors::{AppError, AuthError},
    repositories::{token::TokenServiceRepository, user::UserRepository},
    use_cases::auth::AuthHandler,
};

use common::{test_config, TestUser};

mock! {
    pub UserRepo {}

    #[async_trait]
    impl UserRepository for UserRepo {
        async fn check_connection(&self) -> Result<(), AppError>;
        async fn user_exists(&self, email: &str) -> Result<bool, AppError>;
        async fn create_user(&self, user: &UserInsert) -> Result<Uuid, AppError>;
        async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
        async fn get_user_by_id(&self, id: &Uuid) -> Result<Option<User>, AppError>;
        async fn mark_verified(&self, id: &Uuid) -> Result<(), AppError>;
        async fn delete_user(&self, id: &Uuid, deleted_by: &Uuid) -> Result<(), AppError>;
    }
}

fn handler(repo: MockUserRepo) -> AuthHandler<MockUserRepo, JwtService> {
    let config = test_config();
    AuthHandler::new(
        repo,
        JwtService::new(&config),
        None,
        config.base_url.clone(),
    )
}

fn new_user(email: &str) -> NewUser {
    NewUser {
        email: email.to_string(),
        password: "Tr4ck#Glacier!92".to_string(),
        username: None,
    }
}

#[tokio::test]
async fn register_creates_the_user_and_reports_the_verification_mail() {
    let mut repo = MockUserRepo::new();
    repo.expect_user_exists()
        .withf(|email| email == "new@test.com")
        .returning(|_| Ok(false));
    repo.expect_create_user()
        .withf(|insert| insert.email == "new@test.com" && !insert.is_verified)
        .times(1)
        .returning(|_| Ok(Uuid::new_v4()));

    let result = handler(repo).register(new_user("New@Test.com")).await.unwrap();
    assert!(result.message.contains("verification email"));
}

#[tokio::test]
async fn register_rejects_a_duplicate_email() {
    let mut repo = MockUserRepo::new();
    repo.expect_user_exists().returning(|_| Ok(true));

    let err = handler(repo).register(new_user("exists@test.com")).await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));
}

#[tokio::test]
async fn register_rejects_a_weak_password_before_hashing() {
    // No expectations: the repository must never be reached.
    let repo = MockUserRepo::new();

    let request = NewUser {
        email: "new@test.com".to_string(),
        password: "password".to_string(),
        username: None,
    };
    let err = handler(repo).register(request).await.unwrap_err();
    assert!(matches!(err, AppError::ValidationError(_)));
}

#[tokio::test]
async fn login_returns_a_token_pair_for_valid_credentials() {
    let user = TestUser::with_password("valid@test.com", "Tr4ck#Glacier!92");
    let user_clone = user.clone();

    let mut repo = MockUserRepo::new();
    repo.expect_get_user_by_email()
        .withf(|email| email == "valid@test.com")
        .returning(move |_| Ok(Some(user_clone.clone())));

    let auth = handler(repo);
    let tokens = auth
        .login(LoginUser {
            email: "valid@test.com".to_string(),
            password: "Tr4ck#Glacier!92".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(tokens.token_type, "Bearer");
    let decoded = auth.token_service.decode_jwt(&tokens.access_token).unwrap();
    assert_eq!(decoded.claims.sub, user.id.to_string());
    assert_eq!(decoded.claims.email, "valid@test.com");
}

#[tokio::test]
async fn login_rejects_a_wrong_password() {
    let user = TestUser::with_password("valid@test.com", "Tr4ck#Glacier!92");

    let mut repo = MockUserRepo::new();
    repo.expect_get_user_by_email()
        .returning(move |_| Ok(Some(user.clone())));

    let err = handler(repo)
        .login(LoginUser {
            email: "valid@test.com".to_string(),
            password: "not-the-password1!A".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::WrongCredentials));
}

#[tokio::test]
async fn login_does_not_reveal_whether_the_account_exists() {
    let mut repo = MockUserRepo::new();
    repo.expect_get_user_by_email().returning(|_| Ok(None));

    let err = handler(repo)
        .login(LoginUser {
            email: "ghost@test.com".to_string(),
            password: "Tr4ck#Glacier!92".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::WrongCredentials));
}

#[tokio::test]
async fn refresh_token_round_trips_into_a_new_pair() {
    let user = TestUser::with_password("valid@test.com", "Tr4ck#Glacier!92");
    let user_id = user.id;
    let user_clone = user.clone();

    let mut repo = MockUserRepo::new();
    repo.expect_get_user_by_id()
        .withf(move |id| *id == user_id)
        .returning(move |_| Ok(Some(user_clone.clone())));

    let auth = handler(repo);
    let refresh = auth.token_service.create_refresh_jwt(&user.id).unwrap();
    let tokens = auth.refresh_token(&refresh).await.unwrap();
    assert!(!tokens.access_token.is_empty());
    assert!(!tokens.refresh_token.is_empty());
}

#[tokio::test]
async fn an_access_token_is_not_accepted_as_a_refresh_token() {
    let user = TestUser::with_password("valid@test.com", "Tr4ck#Glacier!92");

    let repo = MockUserRepo::new();
    let auth = handler(repo);
    let access = auth.token_service.create_jwt(&user).unwrap();

    let err = auth.refresh_token(&access).await.unwrap_err();
    assert!(matches!(err, AuthError::InvalidToken | AuthError::WrongCredentials));
}

#[tokio::test]
async fn verify_email_marks_the_user_verified_once() {
    let user = TestUser::unverified("new@test.com");
    let user_id = user.id;
    let user_clone = user.clone();

    let mut repo = MockUserRepo::new();
    repo.expect_get_user_by_id()
        .returning(move |_| Ok(Some(user_clone.clone())));
    repo.expect_mark_verified()
        .withf(move |id| *id == user_id)
        .times(1)
        .returning(|_| Ok(()));

    let auth = handler(repo);
    let token = auth.token_service.create_verification_jwt(&user.id).unwrap();
    let message = auth.verify_email(&token).await.unwrap();
    assert!(message.contains("verified"));
}

#[tokio::test]
async fn verify_email_is_idempotent_for_an_already_verified_user() {
    let user = TestUser::with_password("done@test.com", "Tr4ck#Glacier!92");
    let user_clone = user.clone();

    let mut repo = MockUserRepo::new();
    repo.expect_get_user_by_id()
        .returning(move |_| Ok(Some(user_clone.clone())));
    // mark_verified must not be called again.

    let auth = handler(repo);
    let token = auth.token_service.create_verification_jwt(&user.id).unwrap();
    let message = auth.verify_email(&token).await.unwrap();
    assert!(message.contains("already verified"));
}

#[tokio::test]
async fn verify_email_rejects_garbage_tokens() {
    let repo = MockUserRepo::new();
    let err = handler(repo).verify_email("not-a-jwt").await.unwrap_err();
    assert!(matches!(err, AppError::InvalidInput(_)));
}
