//! Accounts repository: accounts, profiles, capability flags, tokens and follows

use chrono::Utc;
use sqlx::{Pool, Sqlite, SqliteConnection};

use crate::{
    error::{AppError, AppResult},
    models::account::{Account, AccountDetail, NewAccount, Role, UpdateAccount, UserProfile},
};

const DETAIL_SELECT: &str = r#"
    SELECT a.id, a.username, a.email, a.bio, a.profile_picture, a.date_joined,
           COALESCE(p.role, 'Member') AS role,
           (SELECT COUNT(*) FROM follows f WHERE f.followed_id = a.id) AS followers_count,
           (SELECT COUNT(*) FROM follows f WHERE f.follower_id = a.id) AS following_count
    FROM accounts a
    LEFT JOIN user_profiles p ON p.account_id = a.id
"#;

#[derive(Clone)]
pub struct AccountsRepository {
    pool: Pool<Sqlite>,
}

impl AccountsRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    // =========================================================================
    // ACCOUNTS
    // =========================================================================

    /// Get account by ID
    pub async fn get_by_id(&self, id: i64) -> AppResult<Account> {
        sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Account with id {} not found", id)))
    }

    /// Get account by username (exact, case-sensitive)
    pub async fn get_by_username(&self, username: &str) -> AppResult<Option<Account>> {
        let account = sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(account)
    }

    pub async fn username_exists(&self, username: &str) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM accounts WHERE username = ?)")
            .bind(username)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    /// Account with role and derived follow counts
    pub async fn get_detail(&self, id: i64) -> AppResult<AccountDetail> {
        sqlx::query_as::<_, AccountDetail>(&format!("{} WHERE a.id = ?", DETAIL_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Account with id {} not found", id)))
    }

    /// Insert an account row; the caller owns the surrounding transaction
    pub async fn insert(conn: &mut SqliteConnection, data: &NewAccount, password_hash: &str) -> AppResult<Account> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            INSERT INTO accounts (username, email, password, bio, profile_picture, date_joined)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&data.username)
        .bind(&data.email)
        .bind(password_hash)
        .bind(&data.bio)
        .bind(&data.profile_picture)
        .bind(Utc::now())
        .fetch_one(&mut *conn)
        .await?;
        Ok(account)
    }

    /// Update own account fields; absent fields keep their value
    pub async fn update(&self, id: i64, data: &UpdateAccount) -> AppResult<Account> {
        sqlx::query_as::<_, Account>(
            r#"
            UPDATE accounts
            SET email = COALESCE(?, email),
                bio = COALESCE(?, bio),
                profile_picture = COALESCE(?, profile_picture)
            WHERE id = ?
            RETURNING *
            "#,
        )
        .bind(&data.email)
        .bind(&data.bio)
        .bind(&data.profile_picture)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Account with id {} not found", id)))
    }

    // =========================================================================
    // PROFILES & CAPABILITY FLAGS
    // =========================================================================

    pub async fn insert_profile(conn: &mut SqliteConnection, account_id: i64, role: Role) -> AppResult<UserProfile> {
        let profile = sqlx::query_as::<_, UserProfile>(
            "INSERT INTO user_profiles (account_id, role) VALUES (?, ?) RETURNING *",
        )
        .bind(account_id)
        .bind(role.as_str())
        .fetch_one(&mut *conn)
        .await?;
        Ok(profile)
    }

    pub async fn get_profile(&self, account_id: i64) -> AppResult<UserProfile> {
        sqlx::query_as::<_, UserProfile>("SELECT * FROM user_profiles WHERE account_id = ?")
            .bind(account_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Profile for account {} not found", account_id)))
    }

    pub async fn count_profiles(&self, account_id: i64) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM user_profiles WHERE account_id = ?")
            .bind(account_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn set_role(&self, account_id: i64, role: Role) -> AppResult<()> {
        let result = sqlx::query("UPDATE user_profiles SET role = ? WHERE account_id = ?")
            .bind(role.as_str())
            .bind(account_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Profile for account {} not found", account_id)));
        }
        Ok(())
    }

    pub async fn get_permissions(&self, account_id: i64) -> AppResult<Vec<String>> {
        let codenames: Vec<String> =
            sqlx::query_scalar("SELECT codename FROM account_permissions WHERE account_id = ? ORDER BY codename")
                .bind(account_id)
                .fetch_all(&self.pool)
                .await?;
        Ok(codenames)
    }

    pub async fn grant_permission(&self, account_id: i64, codename: &str) -> AppResult<()> {
        sqlx::query("INSERT OR IGNORE INTO account_permissions (account_id, codename) VALUES (?, ?)")
            .bind(account_id)
            .bind(codename)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn revoke_permission(&self, account_id: i64, codename: &str) -> AppResult<()> {
        sqlx::query("DELETE FROM account_permissions WHERE account_id = ? AND codename = ?")
            .bind(account_id)
            .bind(codename)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    // =========================================================================
    // TOKENS
    // =========================================================================

    pub async fn insert_token(conn: &mut SqliteConnection, account_id: i64, key: &str) -> AppResult<()> {
        sqlx::query("INSERT INTO auth_tokens (key, account_id, created_at) VALUES (?, ?, ?)")
            .bind(key)
            .bind(account_id)
            .bind(Utc::now())
            .execute(&mut *conn)
            .await?;
        Ok(())
    }

    /// Keep the existing token or store `candidate`, returning the account's token
    pub async fn get_or_create_token(&self, account_id: i64, candidate: &str) -> AppResult<String> {
        sqlx::query("INSERT OR IGNORE INTO auth_tokens (key, account_id, created_at) VALUES (?, ?, ?)")
            .bind(candidate)
            .bind(account_id)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        let key: String = sqlx::query_scalar("SELECT key FROM auth_tokens WHERE account_id = ?")
            .bind(account_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(key)
    }

    pub async fn account_id_for_token(&self, key: &str) -> AppResult<Option<i64>> {
        let id: Option<i64> = sqlx::query_scalar("SELECT account_id FROM auth_tokens WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(id)
    }

    pub async fn count_tokens(&self, account_id: i64) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM auth_tokens WHERE account_id = ?")
            .bind(account_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    // =========================================================================
    // FOLLOWS
    // =========================================================================

    /// Returns false when the edge already existed
    pub async fn follow(&self, follower_id: i64, followed_id: i64) -> AppResult<bool> {
        let result = sqlx::query(
            "INSERT OR IGNORE INTO follows (follower_id, followed_id, created_at) VALUES (?, ?, ?)",
        )
        .bind(follower_id)
        .bind(followed_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Returns false when there was no edge
    pub async fn unfollow(&self, follower_id: i64, followed_id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM follows WHERE follower_id = ? AND followed_id = ?")
            .bind(follower_id)
            .bind(followed_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
