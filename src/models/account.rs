//! Account model, profiles, roles and session claims

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::{Decode, FromRow, Sqlite};
use utoipa::ToSchema;
use validator::Validate;

use crate::error::FieldErrors;

static USERNAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\w.@+-]+$").expect("valid regex"));

pub const USERNAME_MAX_LEN: usize = 150;

/// Record username rules the derive cannot express
pub fn check_username(username: &str, errors: &mut FieldErrors) {
    if username.is_empty() {
        errors.add("username", "This field is required.");
    } else if username.chars().count() > USERNAME_MAX_LEN {
        errors.add(
            "username",
            format!("Ensure this field has no more than {} characters.", USERNAME_MAX_LEN),
        );
    } else if !USERNAME_RE.is_match(username) {
        errors.add(
            "username",
            "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.",
        );
    }
}

/// Profile roles. Matching is exact: there is no hierarchy between roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Role {
    Admin,
    Librarian,
    Member,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Librarian => "Librarian",
            Role::Member => "Member",
        }
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::Member
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Admin" => Ok(Role::Admin),
            "Librarian" => Ok(Role::Librarian),
            "Member" => Ok(Role::Member),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }
}

// SQLx conversion for Role (stored as TEXT, bound with `as_str`)
impl sqlx::Type<Sqlite> for Role {
    fn type_info() -> sqlx::sqlite::SqliteTypeInfo {
        <String as sqlx::Type<Sqlite>>::type_info()
    }
}

impl<'r> Decode<'r, Sqlite> for Role {
    fn decode(value: sqlx::sqlite::SqliteValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s: String = Decode::<Sqlite>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

/// Full account record
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Account {
    pub id: i64,
    pub username: String,
    pub email: String,
    /// Hashed password (argon2)
    #[serde(skip_serializing)]
    pub password: String,
    pub bio: String,
    /// Reference to externally stored picture content
    pub profile_picture: Option<String>,
    pub date_joined: DateTime<Utc>,
}

/// One-to-one companion of an account, created with it
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct UserProfile {
    pub id: i64,
    pub account_id: i64,
    pub role: Role,
    pub bio: Option<String>,
    pub avatar: Option<String>,
}

/// Public account view with derived follow counts
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct AccountDetail {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub bio: String,
    pub profile_picture: Option<String>,
    pub date_joined: DateTime<Utc>,
    pub role: Role,
    pub followers_count: i64,
    pub following_count: i64,
}

/// The authenticated principal of a request
#[derive(Debug, Clone)]
pub struct Actor {
    pub id: i64,
    pub username: String,
    pub role: Role,
    pub permissions: HashSet<String>,
}

impl Actor {
    /// The Admin role carries every capability flag
    pub fn has_permission(&self, codename: &str) -> bool {
        self.role == Role::Admin || self.permissions.contains(codename)
    }
}

/// Account creation input shared by the API and the registration page
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub password: String,
    pub bio: String,
    pub profile_picture: Option<String>,
}

/// API registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(required(message = "This field is required."))]
    pub username: Option<String>,
    #[validate(email(message = "Enter a valid email address."))]
    pub email: Option<String>,
    #[validate(
        required(message = "This field is required."),
        length(min = 1, message = "This field may not be blank.")
    )]
    pub password: Option<String>,
    pub bio: Option<String>,
    pub profile_picture: Option<String>,
}

/// Registration response: the created account and its token
#[derive(Debug, Serialize, ToSchema)]
pub struct RegisterResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub bio: String,
    pub profile_picture: Option<String>,
    pub token: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "This field may not be blank."))]
    pub username: String,
    #[validate(length(min = 1, message = "This field may not be blank."))]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub user_id: i64,
    pub username: String,
}

/// Update own account request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateAccount {
    #[validate(email(message = "Enter a valid email address."))]
    pub email: Option<String>,
    pub bio: Option<String>,
    pub profile_picture: Option<String>,
}

/// Update role request (admin only)
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateRole {
    pub role: Role,
}

/// Grant a capability flag (admin only)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct GrantPermission {
    #[validate(length(min = 1, max = 100, message = "Enter a permission codename."))]
    pub codename: String,
}

/// Registration page form
#[derive(Debug, Default, Deserialize, Validate)]
pub struct RegisterForm {
    #[serde(default, deserialize_with = "crate::models::trimmed")]
    pub username: String,
    #[serde(default, deserialize_with = "crate::models::trimmed")]
    #[validate(
        length(min = 1, message = "This field is required."),
        email(message = "Enter a valid email address.")
    )]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "This field is required."))]
    pub password1: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "This field is required."))]
    pub password2: String,
}

/// Login page form
#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    pub next: Option<String>,
}

/// Profile page form
#[derive(Debug, Default, Deserialize, Validate)]
pub struct ProfileForm {
    #[serde(default, deserialize_with = "crate::models::trimmed")]
    #[validate(email(message = "Enter a valid email address."))]
    pub email: String,
}

/// Claims of the page session cookie
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub account_id: i64,
    pub exp: i64,
    pub iat: i64,
}

impl SessionClaims {
    pub fn new(account: &Account, hours: i64) -> Self {
        let now = Utc::now();
        Self {
            sub: account.username.clone(),
            account_id: account.id,
            exp: (now + chrono::Duration::hours(hours)).timestamp(),
            iat: now.timestamp(),
        }
    }

    /// Create a signed session token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse and verify a session token (signature and expiry)
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }
}
