use bcrypt::{hash, verify, DEFAULT_COST};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::config::environment::EnvironmentConfig;
use crate::dto::auth_dto::{
    AccountResponse, AuthResponse, ChangePasswordRequest, CreateAdminRequest, LoginRequest,
    RegisterRequest, UpdateProfileRequest,
};
use crate::dto::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::account::{Account, AccountRole};
use crate::repositories::account_repository::AccountRepository;
use crate::utils::errors::AppError;
use crate::utils::jwt::{generate_token, JwtConfig};

pub struct AuthController {
    repository: AccountRepository,
    jwt: JwtConfig,
}

impl AuthController {
    pub fn new(pool: PgPool, config: &EnvironmentConfig) -> Self {
        Self {
            repository: AccountRepository::new(pool),
            jwt: JwtConfig::from(config),
        }
    }

    /// Registro de rider o driver según la ruta que lo invoque
    pub async fn register(
        &self,
        role: AccountRole,
        request: RegisterRequest,
    ) -> Result<ApiResponse<AuthResponse>, AppError> {
        request.validate()?;

        // Un conductor se registra siempre con su vehículo
        if role == AccountRole::Driver && request.vehicle.is_none() {
            return Err(AppError::BadRequest(
                "Vehicle details are required for driver registration".to_string(),
            ));
        }

        if self.repository.email_exists(&request.email).await? {
            return Err(AppError::Conflict(
                "User already exists with this email".to_string(),
            ));
        }

        let password_hash = hash(&request.password, DEFAULT_COST)
            .map_err(|e| AppError::Hash(format!("Error hashing password: {}", e)))?;

        let vehicle = match role {
            AccountRole::Driver => request
                .vehicle
                .map(|v| (v.model, v.plate_number, v.color)),
            _ => None,
        };

        let account = Account::new(
            request.email,
            password_hash,
            request.first_name,
            request.last_name,
            request.phone_number,
            role,
            vehicle,
        );

        let saved = self.repository.create(&account).await?;
        let token = generate_token(saved.id, saved.role, &self.jwt)?;

        Ok(ApiResponse::success_with_message(
            AuthResponse {
                token,
                user: saved.into(),
            },
            "User registered successfully".to_string(),
        ))
    }

    /// Login de rider o driver según la ruta que lo invoque
    pub async fn login(
        &self,
        role: AccountRole,
        request: LoginRequest,
    ) -> Result<ApiResponse<AuthResponse>, AppError> {
        let account = self
            .repository
            .find_by_email(&request.email)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Invalid email or password".to_string()))?;

        if !account.is_active {
            return Err(AppError::Forbidden(
                "Your account has been deactivated".to_string(),
            ));
        }

        let valid = verify(&request.password, &account.password_hash)
            .map_err(|e| AppError::Hash(format!("Error verifying password: {}", e)))?;

        // El rol equivocado se reporta igual que una credencial inválida
        if !valid || account.role != role {
            return Err(AppError::Unauthorized(
                "Invalid email or password".to_string(),
            ));
        }

        let token = generate_token(account.id, account.role, &self.jwt)?;

        Ok(ApiResponse::success_with_message(
            AuthResponse {
                token,
                user: account.into(),
            },
            "Login successful".to_string(),
        ))
    }

    pub async fn profile(&self, account_id: Uuid) -> Result<AccountResponse, AppError> {
        let account = self
            .repository
            .find_by_id(account_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        Ok(account.into())
    }

    pub async fn update_profile(
        &self,
        user: &AuthenticatedUser,
        request: UpdateProfileRequest,
    ) -> Result<ApiResponse<AccountResponse>, AppError> {
        request.validate()?;

        // El vehículo solo lo puede tocar un conductor
        let vehicle = match user.role {
            AccountRole::Driver => request
                .vehicle
                .map(|v| (v.model, v.plate_number, v.color)),
            _ => None,
        };

        let account = self
            .repository
            .update_profile(
                user.account_id,
                request.first_name,
                request.last_name,
                request.phone_number,
                vehicle,
            )
            .await?;

        Ok(ApiResponse::success_with_message(
            account.into(),
            "Profile updated successfully".to_string(),
        ))
    }

    pub async fn change_password(
        &self,
        account_id: Uuid,
        request: ChangePasswordRequest,
    ) -> Result<ApiResponse<()>, AppError> {
        request.validate()?;

        let account = self
            .repository
            .find_by_id(account_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let matches = verify(&request.current_password, &account.password_hash)
            .map_err(|e| AppError::Hash(format!("Error verifying password: {}", e)))?;

        if !matches {
            return Err(AppError::BadRequest(
                "Current password is incorrect".to_string(),
            ));
        }

        let password_hash = hash(&request.new_password, DEFAULT_COST)
            .map_err(|e| AppError::Hash(format!("Error hashing password: {}", e)))?;

        self.repository
            .update_password(account_id, &password_hash)
            .await?;

        Ok(ApiResponse::message_only(
            "Password changed successfully".to_string(),
        ))
    }

    /// Crear una cuenta de administrador (solo admins)
    pub async fn create_admin(
        &self,
        request: CreateAdminRequest,
    ) -> Result<ApiResponse<AccountResponse>, AppError> {
        request.validate()?;

        if self.repository.email_exists(&request.email).await? {
            return Err(AppError::Conflict(
                "User already exists with this email".to_string(),
            ));
        }

        let password_hash = hash(&request.password, DEFAULT_COST)
            .map_err(|e| AppError::Hash(format!("Error hashing password: {}", e)))?;

        let account = Account::new(
            request.email,
            password_hash,
            request.first_name,
            request.last_name,
            request.phone_number,
            AccountRole::Admin,
            None,
        );

        let saved = self.repository.create(&account).await?;

        Ok(ApiResponse::success_with_message(
            saved.into(),
            "Admin user created successfully".to_string(),
        ))
    }
}
