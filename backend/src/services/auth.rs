//! Authentication service for farmer registration, login, and token management

use bcrypt::{hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::services::farmer::{FarmerService, ProfileInput};
use crate::store::{DynStore, StoreError};
use shared::{validate_password, validate_username, User};

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    store: DynStore,
    jwt_secret: String,
    access_token_expiry: i64,
    bcrypt_cost: u32,
}

/// Input for registering a farmer account
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterInput {
    #[validate(length(min = 3, max = 150))]
    pub username: String,
    #[validate(length(min = 8))]
    pub password: String,
    #[validate(length(max = 150))]
    pub full_name: Option<String>,
    #[serde(flatten)]
    pub profile: ProfileInput,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginInput {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// Response after successful registration
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user_id: Uuid,
    pub farmer_id: Uuid,
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // User ID
    pub username: String,
    pub exp: i64,
    pub iat: i64,
}

/// Authentication tokens
#[derive(Debug, Serialize)]
pub struct AuthTokens {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

impl AuthService {
    /// Create a new AuthService instance
    pub fn new(store: DynStore, config: &Config) -> Self {
        Self {
            store,
            jwt_secret: config.jwt.secret.clone(),
            access_token_expiry: config.jwt.access_token_expiry,
            bcrypt_cost: config.jwt.bcrypt_cost,
        }
    }

    /// Create the account and its farmer profile
    pub async fn register(&self, input: RegisterInput) -> AppResult<RegisterResponse> {
        input.validate()?;
        validate_username(&input.username).map_err(|m| AppError::invalid("username", m))?;
        validate_password(&input.password).map_err(|m| AppError::invalid("password", m))?;

        // Reject a bad profile before an account exists for it
        let profile = FarmerService::new(self.store.clone())
            .prepare_profile(input.profile)
            .await?;

        if self
            .store
            .find_user_by_username(&input.username)
            .await?
            .is_some()
        {
            return Err(AppError::DuplicateEntry("username".to_string()));
        }

        let password_hash = hash(&input.password, self.bcrypt_cost)
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?;

        let user = self
            .store
            .insert_user(&input.username, input.full_name.as_deref(), &password_hash)
            .await
            .map_err(|e| match e {
                StoreError::Conflict { .. } => AppError::DuplicateEntry("username".to_string()),
                other => other.into(),
            })?;

        let farmer = self.store.upsert_farmer(user.id, profile).await?;
        let tokens = self.generate_tokens(&user)?;

        tracing::info!(user_id = %user.id, farmer_id = %farmer.id, "Registered farmer");

        Ok(RegisterResponse {
            user_id: user.id,
            farmer_id: farmer.id,
            access_token: tokens.access_token,
            token_type: tokens.token_type,
            expires_in: tokens.expires_in,
        })
    }

    /// Authenticate user with username and password
    pub async fn login(&self, input: LoginInput) -> AppResult<AuthTokens> {
        input.validate()?;

        let user = self
            .store
            .find_user_by_username(&input.username)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let valid = verify(&input.password, &user.password_hash)
            .map_err(|e| AppError::Internal(format!("Password verification failed: {}", e)))?;

        if !valid {
            return Err(AppError::InvalidCredentials);
        }

        self.generate_tokens(&user)
    }

    /// Validate access token and return claims
    pub fn validate_token(&self, token: &str) -> AppResult<Claims> {
        decode_token(token, &self.jwt_secret)
    }

    fn generate_tokens(&self, user: &User) -> AppResult<AuthTokens> {
        let now = Utc::now();
        let access_exp = now + Duration::seconds(self.access_token_expiry);

        let claims = Claims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            exp: access_exp.timestamp(),
            iat: now.timestamp(),
        };

        let access_token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))?;

        Ok(AuthTokens {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.access_token_expiry,
        })
    }
}

/// Decode and verify an HS256 access token
pub fn decode_token(token: &str, secret: &str) -> AppResult<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AppError::TokenExpired,
        _ => AppError::InvalidToken,
    })
}
