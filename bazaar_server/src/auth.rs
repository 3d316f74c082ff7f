use std::future::{ready, Ready};

use actix_web::{dev::Payload, FromRequest, HttpMessage, HttpRequest};
use bazaar_engine::db_types::{SessionUser, UserType};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use log::*;
use serde::{Deserialize, Serialize};

use crate::{
    config::AuthConfig,
    errors::{AuthError, ServerError},
};

fn default_active() -> bool {
    true
}

/// The claims carried by an access token. Tokens are minted elsewhere (or by `issue-token`); this server only checks
/// the signature and expiry and then takes the identity at face value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    /// The user id
    pub sub: i64,
    pub user_type: UserType,
    #[serde(default = "default_active")]
    pub is_active: bool,
    pub exp: i64,
}

impl JwtClaims {
    pub fn session_user(&self) -> SessionUser {
        SessionUser { id: self.sub, user_type: self.user_type, is_active: self.is_active }
    }
}

/// Handlers that take `JwtClaims` as an argument get the claims the JWT middleware attached to the request. Anonymous
/// requests and deactivated accounts are turned away here.
impl FromRequest for JwtClaims {
    type Error = ServerError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let claims = req.extensions().get::<JwtClaims>().cloned();
        let result = match claims {
            None => Err(AuthError::LoginRequired.into()),
            Some(c) if !c.is_active => Err(AuthError::InactiveAccount.into()),
            Some(c) => Ok(c),
        };
        ready(result)
    }
}

pub struct TokenIssuer {
    key: EncodingKey,
    lifetime: Duration,
}

impl TokenIssuer {
    pub fn new(config: &AuthConfig) -> Self {
        let key = EncodingKey::from_secret(config.jwt_secret.reveal().as_bytes());
        Self { key, lifetime: config.token_lifetime }
    }

    pub fn issue_token(&self, user_id: i64, user_type: UserType) -> Result<String, AuthError> {
        let exp = (Utc::now() + self.lifetime).timestamp();
        let claims = JwtClaims { sub: user_id, user_type, is_active: true, exp };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.key)
            .map_err(|e| AuthError::CouldNotIssueToken(e.to_string()))?;
        debug!("🔐️ Issued a {user_type} token for user #{user_id}");
        Ok(token)
    }
}

#[derive(Clone)]
pub struct TokenValidator {
    key: DecodingKey,
    validation: Validation,
}

impl TokenValidator {
    pub fn new(config: &AuthConfig) -> Self {
        let key = DecodingKey::from_secret(config.jwt_secret.reveal().as_bytes());
        let validation = Validation::new(Algorithm::HS256);
        Self { key, validation }
    }

    pub fn validate(&self, token: &str) -> Result<JwtClaims, AuthError> {
        decode::<JwtClaims>(token, &self.key, &self.validation).map(|data| data.claims).map_err(|e| {
            use jsonwebtoken::errors::ErrorKind;
            match e.kind() {
                ErrorKind::InvalidToken | ErrorKind::Base64(_) | ErrorKind::Json(_) | ErrorKind::Utf8(_) => {
                    AuthError::PoorlyFormattedToken(e.to_string())
                },
                _ => AuthError::ValidationError(e.to_string()),
            }
        })
    }
}
