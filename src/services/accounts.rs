//! Account service: registration, credentials, sessions, roles and follows

use std::collections::HashSet;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::RngCore;
use sqlx::SqliteConnection;
use validator::Validate;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult, FieldErrors},
    models::account::{
        check_username, Account, AccountDetail, Actor, GrantPermission, LoginRequest, LoginResponse, NewAccount,
        ProfileForm, RegisterForm, RegisterRequest, RegisterResponse, Role, SessionClaims, UpdateAccount,
        UserProfile,
    },
    repository::{accounts::AccountsRepository, Repository},
};

const BAD_CREDENTIALS: &str = "Unable to log in with provided credentials.";
const USERNAME_TAKEN: &str = "A user with that username already exists.";

/// Bytes of entropy in an API token (hex-encoded to 40 characters)
const TOKEN_BYTES: usize = 20;

#[derive(Clone)]
pub struct AccountsService {
    repository: Repository,
    config: AuthConfig,
}

impl AccountsService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    // =========================================================================
    // REGISTRATION
    // =========================================================================

    /// Username format and uniqueness, recorded into `errors`
    async fn check_new_username(&self, username: &str, errors: &mut FieldErrors) -> AppResult<()> {
        check_username(username, errors);
        if errors.get("username").is_empty() && self.repository.accounts.username_exists(username).await? {
            errors.add("username", USERNAME_TAKEN);
        }
        Ok(())
    }

    /// Create an account with its profile, and a token when asked, in one transaction
    pub async fn create_account(&self, data: NewAccount, role: Role, issue_token: bool) -> AppResult<(Account, Option<String>)> {
        let password_hash = hash_password(&data.password)?;

        let mut tx = self.repository.pool.begin().await?;

        let account = AccountsRepository::insert(&mut *tx, &data, &password_hash)
            .await
            .map_err(unique_username)?;
        self.on_account_created(&mut *tx, &account, role).await?;

        let token = if issue_token {
            let key = generate_token();
            AccountsRepository::insert_token(&mut *tx, account.id, &key).await?;
            Some(key)
        } else {
            None
        };

        tx.commit().await?;

        tracing::info!("Account created: id={} username={} role={}", account.id, account.username, role);
        Ok((account, token))
    }

    /// Post-creation hook: every account gets exactly one profile
    async fn on_account_created(&self, conn: &mut SqliteConnection, account: &Account, role: Role) -> AppResult<UserProfile> {
        AccountsRepository::insert_profile(conn, account.id, role).await
    }

    /// API registration: account, profile and token
    pub async fn register_api(&self, mut request: RegisterRequest) -> AppResult<RegisterResponse> {
        if request.email.as_deref().map(str::trim) == Some("") {
            request.email = None;
        }

        let mut errors = match request.validate() {
            Ok(()) => FieldErrors::new(),
            Err(e) => e.into(),
        };
        if let Some(username) = request.username.as_deref() {
            self.check_new_username(username, &mut errors).await?;
        }
        errors.into_result()?;

        let data = NewAccount {
            username: request.username.unwrap_or_default(),
            email: request.email.unwrap_or_default(),
            password: request.password.unwrap_or_default(),
            bio: request.bio.unwrap_or_default(),
            profile_picture: request.profile_picture,
        };

        let (account, token) = self.create_account(data, Role::Member, true).await?;
        let token = token.ok_or_else(|| AppError::Internal("Token was not issued".to_string()))?;

        Ok(RegisterResponse {
            id: account.id,
            username: account.username,
            email: account.email,
            bio: account.bio,
            profile_picture: account.profile_picture,
            token,
        })
    }

    /// Registration page: confirmed password, no API token
    pub async fn register_page(&self, form: &RegisterForm) -> AppResult<Account> {
        let mut errors = match form.validate() {
            Ok(()) => FieldErrors::new(),
            Err(e) => e.into(),
        };
        if !form.password2.is_empty() && form.password1 != form.password2 {
            errors.add("password2", "The two password fields didn't match.");
        }
        self.check_new_username(&form.username, &mut errors).await?;
        errors.into_result()?;

        let data = NewAccount {
            username: form.username.clone(),
            email: form.email.clone(),
            password: form.password1.clone(),
            bio: String::new(),
            profile_picture: None,
        };

        let (account, _) = self.create_account(data, Role::Member, false).await?;
        Ok(account)
    }

    /// Create the configured administrator, or restore its role
    pub async fn ensure_bootstrap_admin(&self) -> AppResult<()> {
        let Some(admin) = self.config.bootstrap_admin.clone() else {
            return Ok(());
        };

        if let Some(existing) = self.repository.accounts.get_by_username(&admin.username).await? {
            self.repository.accounts.set_role(existing.id, Role::Admin).await?;
            tracing::debug!("Bootstrap admin {} already present", admin.username);
            return Ok(());
        }

        let data = NewAccount {
            username: admin.username,
            email: admin.email,
            password: admin.password,
            bio: String::new(),
            profile_picture: None,
        };
        let (account, _) = self.create_account(data, Role::Admin, false).await?;
        tracing::info!("Bootstrap admin created: {}", account.username);
        Ok(())
    }

    // =========================================================================
    // CREDENTIALS & SESSIONS
    // =========================================================================

    /// Check a username/password pair
    pub async fn authenticate(&self, username: &str, password: &str) -> AppResult<Account> {
        let account = match self.repository.accounts.get_by_username(username).await? {
            Some(account) => account,
            None => {
                tracing::warn!("Login rejected: unknown username {}", username);
                return Err(AppError::Authentication(BAD_CREDENTIALS.to_string()));
            }
        };

        if !verify_password(&account.password, password)? {
            tracing::warn!("Login rejected: wrong password for {}", username);
            return Err(AppError::Authentication(BAD_CREDENTIALS.to_string()));
        }

        tracing::info!("Login: {}", account.username);
        Ok(account)
    }

    /// API login returns the account's single token, creating it if missing
    pub async fn login_api(&self, request: &LoginRequest) -> AppResult<LoginResponse> {
        request.validate()?;
        let account = self.authenticate(&request.username, &request.password).await?;
        let token = self
            .repository
            .accounts
            .get_or_create_token(account.id, &generate_token())
            .await?;

        Ok(LoginResponse {
            token,
            user_id: account.id,
            username: account.username,
        })
    }

    /// Signed session cookie value for the pages
    pub fn start_session(&self, account: &Account) -> AppResult<String> {
        SessionClaims::new(account, self.config.session_hours)
            .create_token(&self.config.session_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create session: {}", e)))
    }

    /// Resolve a session cookie; a bad, expired or orphaned session is anonymous
    pub async fn actor_from_session(&self, token: &str) -> AppResult<Option<Actor>> {
        let claims = match SessionClaims::from_token(token, &self.config.session_secret) {
            Ok(claims) => claims,
            Err(e) => {
                tracing::debug!("Ignoring invalid session: {}", e);
                return Ok(None);
            }
        };

        match self.load_actor(claims.account_id).await {
            Ok(actor) => Ok(Some(actor)),
            Err(AppError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Resolve an API token; unknown tokens are rejected
    pub async fn actor_from_api_token(&self, key: &str) -> AppResult<Actor> {
        let account_id = self
            .repository
            .accounts
            .account_id_for_token(key)
            .await?
            .ok_or_else(|| AppError::Authentication("Invalid token.".to_string()))?;
        self.load_actor(account_id).await
    }

    /// Account with role and capability flags
    pub async fn load_actor(&self, account_id: i64) -> AppResult<Actor> {
        let account = self.repository.accounts.get_by_id(account_id).await?;
        let role = match self.repository.accounts.get_profile(account_id).await {
            Ok(profile) => profile.role,
            Err(AppError::NotFound(_)) => Role::default(),
            Err(e) => return Err(e),
        };
        let permissions: HashSet<String> = self
            .repository
            .accounts
            .get_permissions(account_id)
            .await?
            .into_iter()
            .collect();

        Ok(Actor {
            id: account.id,
            username: account.username,
            role,
            permissions,
        })
    }

    // =========================================================================
    // PROFILE
    // =========================================================================

    pub async fn get_account(&self, id: i64) -> AppResult<Account> {
        self.repository.accounts.get_by_id(id).await
    }

    pub async fn get_detail(&self, id: i64) -> AppResult<AccountDetail> {
        self.repository.accounts.get_detail(id).await
    }

    pub async fn update_account(&self, actor: &Actor, request: &UpdateAccount) -> AppResult<AccountDetail> {
        request.validate()?;
        self.repository.accounts.update(actor.id, request).await?;
        self.repository.accounts.get_detail(actor.id).await
    }

    /// Profile page: only the email is editable, and a blank one leaves
    /// the account unchanged
    pub async fn update_email(&self, actor: &Actor, form: &ProfileForm) -> AppResult<Account> {
        if form.email.is_empty() {
            return self.repository.accounts.get_by_id(actor.id).await;
        }
        form.validate()?;
        let update = UpdateAccount {
            email: Some(form.email.clone()),
            bio: None,
            profile_picture: None,
        };
        self.repository.accounts.update(actor.id, &update).await
    }

    // =========================================================================
    // FOLLOWS
    // =========================================================================

    pub async fn follow(&self, actor: &Actor, target_id: i64) -> AppResult<AccountDetail> {
        if actor.id == target_id {
            return Err(AppError::BadRequest("You cannot follow yourself.".to_string()));
        }
        self.repository.accounts.get_by_id(target_id).await?;

        if self.repository.accounts.follow(actor.id, target_id).await? {
            tracing::info!("Follow: {} -> {}", actor.id, target_id);
        }
        self.repository.accounts.get_detail(target_id).await
    }

    pub async fn unfollow(&self, actor: &Actor, target_id: i64) -> AppResult<AccountDetail> {
        if actor.id == target_id {
            return Err(AppError::BadRequest("You cannot unfollow yourself.".to_string()));
        }
        self.repository.accounts.get_by_id(target_id).await?;

        if self.repository.accounts.unfollow(actor.id, target_id).await? {
            tracing::info!("Unfollow: {} -> {}", actor.id, target_id);
        }
        self.repository.accounts.get_detail(target_id).await
    }

    // =========================================================================
    // ROLES & CAPABILITY FLAGS
    // =========================================================================

    pub async fn set_role(&self, target_id: i64, role: Role) -> AppResult<AccountDetail> {
        self.repository.accounts.get_by_id(target_id).await?;
        self.repository.accounts.set_role(target_id, role).await?;
        tracing::info!("Role of account {} set to {}", target_id, role);
        self.repository.accounts.get_detail(target_id).await
    }

    pub async fn grant_permission(&self, target_id: i64, request: &GrantPermission) -> AppResult<Vec<String>> {
        request.validate()?;
        self.repository.accounts.get_by_id(target_id).await?;
        self.repository.accounts.grant_permission(target_id, &request.codename).await?;
        tracing::info!("Permission {} granted to account {}", request.codename, target_id);
        self.repository.accounts.get_permissions(target_id).await
    }

    pub async fn revoke_permission(&self, target_id: i64, codename: &str) -> AppResult<Vec<String>> {
        self.repository.accounts.get_by_id(target_id).await?;
        self.repository.accounts.revoke_permission(target_id, codename).await?;
        tracing::info!("Permission {} revoked from account {}", codename, target_id);
        self.repository.accounts.get_permissions(target_id).await
    }
}

/// A concurrent insert of the same username loses on the unique index
fn unique_username(error: AppError) -> AppError {
    match &error {
        AppError::Database(sqlx::Error::Database(db)) if db.is_unique_violation() => {
            let mut fields = FieldErrors::new();
            fields.add("username", USERNAME_TAKEN);
            AppError::InvalidFields(fields)
        }
        _ => error,
    }
}

/// Hash a password using Argon2
fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}

fn verify_password(hash: &str, password: &str) -> AppResult<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Random API token, 40 hex characters
fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}
