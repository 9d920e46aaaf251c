//! Session resolvers: login with lockout, refresh-token rotation, logout,
//! and the `me` query.

use std::sync::Arc;

use async_graphql::{Context, Object, SimpleObject};
use chrono::{Duration, Utc};

use agrireg_core::audit::{actions, entity_types};
use agrireg_core::error::CoreError;
use agrireg_core::types::{RecordUuid, Timestamp};
use agrireg_db::models::user::User;
use agrireg_db::repositories::{SessionRepo, UserRepo};
use agrireg_db::DbPool;

use crate::auth::jwt::{generate_access_token, generate_refresh_token, hash_refresh_token};
use crate::auth::password::verify_password;
use crate::auth::AuthUser;
use crate::config::ServerConfig;
use crate::error::{gql_db_error, gql_error, GqlResult};
use crate::graphql::audit::record_activity;
use crate::graphql::guard::require_auth;

/// Consecutive failed logins before the account is locked.
const MAX_FAILED_LOGINS: i32 = 5;
/// Lockout duration after too many failures.
const LOCKOUT_MINS: i64 = 15;

/// The authenticated user's own account view. Never exposes the password
/// hash or lockout counters.
#[derive(Debug, SimpleObject)]
#[graphql(name = "User")]
pub struct UserObject {
    /// Database id as a string (the raw value exceeds the JS safe-integer
    /// range).
    pub id: String,
    pub uuid: RecordUuid,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub role: String,
    pub is_active: bool,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl From<User> for UserObject {
    fn from(user: User) -> Self {
        Self {
            id: user.id.to_string(),
            uuid: user.uuid,
            username: user.username,
            email: user.email,
            full_name: user.full_name,
            role: user.role,
            is_active: user.is_active,
            last_login_at: user.last_login_at,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, SimpleObject)]
pub struct AuthPayload {
    pub access_token: String,
    pub refresh_token: String,
    /// Access-token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserObject,
}

fn invalid_credentials() -> async_graphql::Error {
    // Same message whether the username or the password was wrong.
    gql_error(CoreError::Unauthorized("Invalid username or password".into()))
}

#[derive(Default)]
pub struct AuthQuery;

#[Object]
impl AuthQuery {
    /// The currently authenticated user.
    async fn me(&self, ctx: &Context<'_>) -> GqlResult<UserObject> {
        let auth = require_auth(ctx)?;
        let pool = ctx.data::<DbPool>()?;
        let user = UserRepo::find_by_uuid(pool, auth.user_uuid)
            .await
            .map_err(gql_db_error)?
            .ok_or_else(|| {
                gql_error(CoreError::Unauthorized("Unknown user".into()))
            })?;
        Ok(user.into())
    }
}

#[derive(Default)]
pub struct AuthMutation;

#[Object]
impl AuthMutation {
    /// Authenticate with username and password. Five consecutive failures
    /// lock the account for fifteen minutes.
    async fn login(
        &self,
        ctx: &Context<'_>,
        username: String,
        password: String,
    ) -> GqlResult<AuthPayload> {
        let pool = ctx.data::<DbPool>()?;
        let config = ctx.data::<Arc<ServerConfig>>()?;

        let user = UserRepo::find_by_username(pool, &username)
            .await
            .map_err(gql_db_error)?
            .ok_or_else(invalid_credentials)?;

        if !user.is_active {
            return Err(gql_error(CoreError::Unauthorized(
                "Account is disabled".into(),
            )));
        }
        if let Some(locked_until) = user.locked_until {
            if locked_until > Utc::now() {
                tracing::warn!(user = %user.username, "login attempt on locked account");
                return Err(gql_error(CoreError::Unauthorized(
                    "Account is temporarily locked, try again later".into(),
                )));
            }
        }

        let verified = verify_password(&password, &user.password_hash)
            .map_err(|e| gql_error(CoreError::Internal(format!("password verify failed: {e}"))))?;
        if !verified {
            UserRepo::increment_failed_login(pool, user.uuid)
                .await
                .map_err(gql_db_error)?;
            if user.failed_login_count + 1 >= MAX_FAILED_LOGINS {
                let locked_until = Utc::now() + Duration::minutes(LOCKOUT_MINS);
                UserRepo::lock_account(pool, user.uuid, locked_until)
                    .await
                    .map_err(gql_db_error)?;
                tracing::warn!(user = %user.username, "account locked after repeated failures");
            }
            return Err(invalid_credentials());
        }

        UserRepo::record_successful_login(pool, user.uuid)
            .await
            .map_err(gql_db_error)?;

        let access_token = generate_access_token(user.uuid, &user.username, &user.role, &config.jwt)
            .map_err(|e| gql_error(CoreError::Internal(format!("token generation failed: {e}"))))?;
        let (refresh_token, refresh_hash) = generate_refresh_token();
        let expires_at = Utc::now() + Duration::days(config.jwt.refresh_token_expiry_days);
        SessionRepo::create(pool, user.uuid, &refresh_hash, expires_at)
            .await
            .map_err(gql_db_error)?;

        let actor = AuthUser {
            user_uuid: user.uuid,
            username: user.username.clone(),
            role: user.role.clone(),
        };
        record_activity(
            pool,
            &actor,
            actions::LOGIN,
            entity_types::USER,
            Some(user.uuid),
            None,
        )
        .await?;
        tracing::info!(user = %user.username, "login succeeded");

        Ok(AuthPayload {
            access_token,
            refresh_token,
            expires_in: config.jwt.access_token_expiry_mins * 60,
            user: user.into(),
        })
    }

    /// Exchange a refresh token for a new access token. The presented
    /// refresh token is revoked and replaced (rotation).
    async fn refresh_session(
        &self,
        ctx: &Context<'_>,
        refresh_token: String,
    ) -> GqlResult<AuthPayload> {
        let pool = ctx.data::<DbPool>()?;
        let config = ctx.data::<Arc<ServerConfig>>()?;

        let hash = hash_refresh_token(&refresh_token);
        let session = SessionRepo::find_active_by_token_hash(pool, &hash)
            .await
            .map_err(gql_db_error)?
            .ok_or_else(|| {
                gql_error(CoreError::Unauthorized(
                    "Invalid or expired refresh token".into(),
                ))
            })?;

        let user = UserRepo::find_by_uuid(pool, session.user_uuid)
            .await
            .map_err(gql_db_error)?
            .filter(|u| u.is_active)
            .ok_or_else(|| gql_error(CoreError::Unauthorized("Unknown user".into())))?;

        SessionRepo::revoke(pool, session.id)
            .await
            .map_err(gql_db_error)?;
        let (new_refresh_token, new_hash) = generate_refresh_token();
        let expires_at = Utc::now() + Duration::days(config.jwt.refresh_token_expiry_days);
        SessionRepo::create(pool, user.uuid, &new_hash, expires_at)
            .await
            .map_err(gql_db_error)?;

        let access_token = generate_access_token(user.uuid, &user.username, &user.role, &config.jwt)
            .map_err(|e| gql_error(CoreError::Internal(format!("token generation failed: {e}"))))?;
        tracing::debug!(user = %user.username, "session refreshed");

        Ok(AuthPayload {
            access_token,
            refresh_token: new_refresh_token,
            expires_in: config.jwt.access_token_expiry_mins * 60,
            user: user.into(),
        })
    }

    /// Revoke all of the current user's sessions. Returns the number of
    /// sessions revoked.
    async fn logout(&self, ctx: &Context<'_>) -> GqlResult<i64> {
        let user = require_auth(ctx)?;
        let pool = ctx.data::<DbPool>()?;
        let revoked = SessionRepo::revoke_all_for_user(pool, user.user_uuid)
            .await
            .map_err(gql_db_error)?;
        record_activity(
            pool,
            user,
            actions::LOGOUT,
            entity_types::USER,
            Some(user.user_uuid),
            None,
        )
        .await?;
        tracing::info!(user = %user.username, revoked, "logout");
        Ok(i64::try_from(revoked).unwrap_or(i64::MAX))
    }
}
