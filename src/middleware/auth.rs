//! Middleware de autenticación JWT
//!
//! Valida el token, carga la cuenta y deja un principal tipado en las
//! extensions del request. Las verificaciones de rol se hacen con los
//! helpers `require_*` al entrar a cada handler, antes de tocar la lógica
//! de negocio.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::{
    models::account::AccountRole,
    repositories::account_repository::AccountRepository,
    state::AppState,
    utils::errors::AppError,
    utils::jwt::{extract_token_from_header, verify_token, JwtConfig},
};

/// Principal autenticado que se inyecta en las requests
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub account_id: Uuid,
    pub role: AccountRole,
}

/// Middleware de autenticación JWT
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|auth_str| auth_str.to_str().ok())
        .ok_or_else(|| {
            AppError::Unauthorized("No authentication token, access denied".to_string())
        })?;

    let token = extract_token_from_header(auth_header)?;
    let claims = verify_token(token, &JwtConfig::from(&state.config))?;

    let account_id = Uuid::parse_str(&claims.sub)
        .map_err(|_| AppError::Unauthorized("Token is invalid or expired".to_string()))?;

    // Verificar que la cuenta existe y sigue activa
    let account = AccountRepository::new(state.pool.clone())
        .find_by_id(account_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User not found".to_string()))?;

    if !account.is_active {
        return Err(AppError::Forbidden("User account is deactivated".to_string()));
    }

    let authenticated_user = AuthenticatedUser {
        account_id: account.id,
        role: account.role,
    };

    request.extensions_mut().insert(authenticated_user);

    Ok(next.run(request).await)
}

/// Verificar que el principal sea un rider
pub fn require_rider(user: &AuthenticatedUser) -> Result<(), AppError> {
    if user.role != AccountRole::Rider {
        return Err(AppError::Forbidden(
            "Access denied. Rider privileges required.".to_string(),
        ));
    }
    Ok(())
}

/// Verificar que el principal sea un conductor
pub fn require_driver(user: &AuthenticatedUser) -> Result<(), AppError> {
    if user.role != AccountRole::Driver {
        return Err(AppError::Forbidden(
            "Access denied. Driver privileges required.".to_string(),
        ));
    }
    Ok(())
}

/// Verificar que el principal sea un admin
pub fn require_admin(user: &AuthenticatedUser) -> Result<(), AppError> {
    if user.role != AccountRole::Admin {
        return Err(AppError::Forbidden(
            "Access denied. Admin privileges required.".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(role: AccountRole) -> AuthenticatedUser {
        AuthenticatedUser {
            account_id: Uuid::new_v4(),
            role,
        }
    }

    #[test]
    fn test_role_guards() {
        assert!(require_rider(&principal(AccountRole::Rider)).is_ok());
        assert!(require_rider(&principal(AccountRole::Driver)).is_err());

        assert!(require_driver(&principal(AccountRole::Driver)).is_ok());
        assert!(require_driver(&principal(AccountRole::Admin)).is_err());

        assert!(require_admin(&principal(AccountRole::Admin)).is_ok());
        assert!(require_admin(&principal(AccountRole::Rider)).is_err());
    }
}
