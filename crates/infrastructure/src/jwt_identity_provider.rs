//! HS256 bearer tokens carrying the account id and role.

use std::str::FromStr;

use campusconnect_application::{IdentityProvider, IssuedAssertion};
use campusconnect_core::{AccountId, AppError, AppResult, Identity, Role};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Minimum accepted signing secret length in bytes.
pub const MIN_SECRET_LENGTH: usize = 32;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    role: String,
    iat: i64,
    exp: i64,
}

/// Signs and verifies identity assertions with a shared secret.
#[derive(Clone)]
pub struct JwtIdentityProvider {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl JwtIdentityProvider {
    /// Creates a provider. Fails when the secret is shorter than
    /// [`MIN_SECRET_LENGTH`] or the lifetime is not positive.
    pub fn new(secret: &str, ttl_seconds: i64) -> AppResult<Self> {
        if secret.len() < MIN_SECRET_LENGTH {
            return Err(AppError::Validation(format!(
                "token signing secret must be at least {MIN_SECRET_LENGTH} bytes"
            )));
        }
        if ttl_seconds <= 0 {
            return Err(AppError::Validation(
                "token lifetime must be positive".to_owned(),
            ));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl: Duration::seconds(ttl_seconds),
        })
    }

    fn issue_at(
        &self,
        subject: AccountId,
        role: Role,
        issued_at: DateTime<Utc>,
    ) -> AppResult<IssuedAssertion> {
        let expires_at = issued_at + self.ttl;
        let claims = Claims {
            sub: subject.to_string(),
            role: role.as_str().to_owned(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|error| AppError::Internal(format!("failed to sign token: {error}")))?;

        Ok(IssuedAssertion { token, expires_at })
    }
}

impl IdentityProvider for JwtIdentityProvider {
    fn issue(&self, subject: AccountId, role: Role) -> AppResult<IssuedAssertion> {
        self.issue_at(subject, role, Utc::now())
    }

    fn verify(&self, assertion: &str) -> AppResult<Identity> {
        let data = decode::<Claims>(assertion, &self.decoding_key, &self.validation).map_err(
            |error| {
                debug!(error = %error, "token rejected");
                match error.kind() {
                    ErrorKind::ExpiredSignature => {
                        AppError::Unauthenticated("token expired".to_owned())
                    }
                    _ => AppError::Unauthenticated("invalid token".to_owned()),
                }
            },
        )?;

        let invalid_claims = || AppError::Unauthenticated("invalid token".to_owned());
        let subject = AccountId::from_str(&data.claims.sub).map_err(|_| invalid_claims())?;
        let role = Role::from_str(&data.claims.role).map_err(|_| invalid_claims())?;

        Ok(Identity::new(subject, role))
    }
}
