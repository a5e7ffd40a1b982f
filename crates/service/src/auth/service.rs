use std::sync::Arc;

use argon2::{
    password_hash::{PasswordHasher, PasswordVerifier, SaltString},
    Argon2, PasswordHash,
};
use rand::rngs::OsRng;
use tracing::{info, instrument};
use uuid::Uuid;

use super::domain::{AuthSession, AuthVendor, LoginInput, RegisterInput, VendorUpdate};
use super::errors::AuthError;
use super::repository::VendorRepository;
use super::token::TokenService;

const MIN_PASSWORD_LEN: usize = 6;

/// Auth business service independent of the web framework.
pub struct AuthService<R: VendorRepository> {
    repo: Arc<R>,
    tokens: TokenService,
}

impl<R: VendorRepository> AuthService<R> {
    pub fn new(repo: Arc<R>, tokens: TokenService) -> Self {
        Self { repo, tokens }
    }

    /// Register a new vendor with a hashed password. The plaintext never
    /// reaches the repository.
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn register(&self, input: RegisterInput) -> Result<AuthVendor, AuthError> {
        models::vendor::validate_email(&input.email)
            .map_err(|e| AuthError::Validation(e.to_string()))?;
        models::vendor::validate_name(&input.name)
            .map_err(|e| AuthError::Validation(e.to_string()))?;
        if input.password.len() < MIN_PASSWORD_LEN {
            return Err(AuthError::Validation(format!(
                "password too short (>={MIN_PASSWORD_LEN})"
            )));
        }

        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(input.password.as_bytes(), &salt)
            .map_err(|e| AuthError::HashError(e.to_string()))?
            .to_string();

        let vendor = self
            .repo
            .insert(&input.name, &input.email, &hash, &input.business_name)
            .await?;
        info!(vendor_id = %vendor.id, email = %vendor.email, "vendor_registered");
        Ok(vendor)
    }

    /// Authenticate a vendor and issue a bearer token. Unknown email and
    /// wrong password collapse into the same `InvalidCredentials` error.
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, AuthError> {
        let record = self
            .repo
            .find_by_email(&input.email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let parsed = PasswordHash::new(&record.password_hash)
            .map_err(|e| AuthError::HashError(e.to_string()))?;
        if Argon2::default()
            .verify_password(input.password.as_bytes(), &parsed)
            .is_err()
        {
            return Err(AuthError::InvalidCredentials);
        }

        let vendor = record.vendor;
        let token = self.tokens.issue(vendor.id, &vendor.email)?;
        info!(vendor_id = %vendor.id, "vendor_logged_in");
        Ok(AuthSession { vendor, token })
    }

    pub async fn get_vendor(&self, id: Uuid) -> Result<AuthVendor, AuthError> {
        self.repo.find_by_id(id).await?.ok_or(AuthError::NotFound)
    }

    /// Apply a partial profile update. An empty update set is a no-op, not
    /// an error; the current profile is returned unchanged.
    #[instrument(skip(self, update), fields(vendor_id = %id))]
    pub async fn update_profile(
        &self,
        id: Uuid,
        update: VendorUpdate,
    ) -> Result<AuthVendor, AuthError> {
        if update.is_empty() {
            return self.get_vendor(id).await;
        }
        if let Some(name) = &update.name {
            models::vendor::validate_name(name)
                .map_err(|e| AuthError::Validation(e.to_string()))?;
        }
        self.repo.update_profile(id, update).await
    }
}
