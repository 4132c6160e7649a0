//! Registration, login, refresh and logout.

use quire_core::CoreError;
use quire_core::auth::password::{hash_password, verify_password};
use quire_core::models::{NewIdentity, TokenClaims, TokenKind};
use quire_core::notify::{RegistrationNotice, enqueue_or_warn};
use quire_core::store::identities;
use quire_core::validation;
use tracing::{debug, info};

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::models::{
    AccessTokenResponse, LoginRequest, LogoutRequest, MessageResponse, RegisterRequest,
    RegisterResponse, TokenResponse, UserResponse,
};

const TOKEN_TYPE: &str = "Bearer";

/// Create an account and queue a welcome notice. Notice failures are logged
/// and never fail the registration.
pub async fn register(state: &AppState, req: &RegisterRequest) -> AppResult<RegisterResponse> {
    validation::username(&req.username)?;
    validation::email(&req.email)?;
    validation::password(&req.password)?;

    let password_hash = hash_password(&req.password)?;
    let identity = state
        .coordinator
        .create_identity(&NewIdentity::new(&req.username, &req.email, password_hash))
        .await?;

    enqueue_or_warn(
        state.notifier.as_ref(),
        RegistrationNotice {
            user_id: identity.id,
            username: identity.username.clone(),
            email: identity.email.clone(),
        },
    );

    Ok(RegisterResponse {
        user: identity.into(),
        message: "User registered successfully".into(),
    })
}

/// Verify credentials and issue a fresh access token plus a refresh token.
pub async fn login(state: &AppState, req: &LoginRequest) -> AppResult<TokenResponse> {
    let Some(found) = identities::find_by_login(&state.pool, &req.username).await? else {
        debug!("login for unknown user");
        return Err(AppError::InvalidCredentials);
    };
    if !verify_password(&req.password, &found.password_hash)? {
        debug!(user_id = %found.identity.id, "login with wrong password");
        return Err(AppError::InvalidCredentials);
    }

    let identity = found.identity;
    let pair = state.tokens.issue_pair(identity.id, identity.role)?;
    info!(user_id = %identity.id, "user logged in");

    Ok(TokenResponse {
        access_token: pair.access_token,
        refresh_token: pair.refresh_token,
        expires_in: pair.expires_in,
        token_type: TOKEN_TYPE.into(),
        user: UserResponse::from(identity),
    })
}

/// Exchange a refresh token for a non-fresh access token.
pub fn refresh(state: &AppState, refresh_token: &str) -> AppResult<AccessTokenResponse> {
    let access_token = state.tokens.refresh(refresh_token)?;
    Ok(AccessTokenResponse {
        access_token,
        expires_in: state.tokens.config().access_ttl.num_seconds(),
        token_type: TOKEN_TYPE.into(),
    })
}

/// Revoke the calling access token and, if given, the caller's refresh token.
pub fn logout(
    state: &AppState,
    claims: &TokenClaims,
    req: &LogoutRequest,
) -> AppResult<MessageResponse> {
    let refresh_claims = match req.refresh_token.as_deref() {
        Some(token) => {
            let parsed = state.tokens.parse(token)?;
            if parsed.kind != TokenKind::Refresh {
                return Err(CoreError::InvalidToken("refresh token required".into()).into());
            }
            if parsed.sub != claims.sub {
                return Err(AppError::Forbidden(
                    "refresh token belongs to another user".into(),
                ));
            }
            Some(parsed)
        }
        None => None,
    };

    state.tokens.revoke(claims);
    if let Some(refresh_claims) = refresh_claims {
        state.tokens.revoke(&refresh_claims);
    }
    info!(user_id = %claims.sub, "user logged out");
    Ok(MessageResponse::new("Successfully logged out"))
}
