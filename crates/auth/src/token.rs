//! Signed-token issuance and verification.
//!
//! Tokens are compact JWS strings (`header.payload.signature`) signed with a
//! single symmetric key and a single HMAC algorithm per issuer instance.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::Deserialize;
use thiserror::Error;

use crate::claims::{validate_registered, RegisteredClaims, TokenClaims};
use crate::Claims;

/// Default `iss` claim.
pub const DEFAULT_ISSUER: &str = "b16";

/// Creates and verifies signed tokens carrying [`Claims`].
///
/// `decode(create(c)) == c` for every claims value `c`, as long as decoding
/// happens before the token expires.
pub trait TokenIssuer: Send + Sync {
    fn create(&self, claims: &Claims) -> Result<String, TokenError>;

    fn decode(&self, token: &str) -> Result<Claims, TokenError>;
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// The token header declares an algorithm other than the configured one.
    #[error("invalid signing method")]
    InvalidSigningMethod,

    /// Bad structure, bad signature, wrong issuer, or outside its time window.
    #[error("invalid token")]
    InvalidToken,

    #[error("token signing failed: {0}")]
    Signing(String),

    #[error("token issuer misconfigured: {0}")]
    Misconfigured(&'static str),
}

/// Issuer configuration; established once at startup.
#[derive(Clone)]
pub struct JwtIssuerConfig {
    pub secret: Vec<u8>,
    pub issuer: String,
    pub lifetime: Duration,
    pub algorithm: Algorithm,
}

impl JwtIssuerConfig {
    /// HS256, issuer [`DEFAULT_ISSUER`], two hour lifetime.
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: secret.into(),
            issuer: DEFAULT_ISSUER.to_string(),
            lifetime: Duration::hours(2),
            algorithm: Algorithm::HS256,
        }
    }

    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = issuer.into();
        self
    }

    pub fn with_lifetime(mut self, lifetime: Duration) -> Self {
        self.lifetime = lifetime;
        self
    }

    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }
}

impl core::fmt::Debug for JwtIssuerConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("JwtIssuerConfig")
            .field("secret", &"[REDACTED]")
            .field("issuer", &self.issuer)
            .field("lifetime", &self.lifetime)
            .field("algorithm", &self.algorithm)
            .finish()
    }
}

/// HMAC-signed JWT issuer.
pub struct JwtIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    issuer: String,
    lifetime: Duration,
    algorithm: Algorithm,
    validation: Validation,
}

impl JwtIssuer {
    pub fn new(config: JwtIssuerConfig) -> Result<Self, TokenError> {
        if !matches!(
            config.algorithm,
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
        ) {
            return Err(TokenError::Misconfigured("only HMAC algorithms are supported"));
        }
        if config.secret.is_empty() {
            return Err(TokenError::Misconfigured("signing secret is empty"));
        }
        if config.lifetime <= Duration::zero() {
            return Err(TokenError::Misconfigured("token lifetime must be positive"));
        }

        // Expiry is checked by `validate_registered` against the caller's clock.
        let mut validation = Validation::new(config.algorithm);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "iss"]);
        validation.set_issuer(&[config.issuer.as_str()]);

        Ok(Self {
            encoding: EncodingKey::from_secret(&config.secret),
            decoding: DecodingKey::from_secret(&config.secret),
            issuer: config.issuer,
            lifetime: config.lifetime,
            algorithm: config.algorithm,
            validation,
        })
    }

    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Sign `claims` as if issued at `now`.
    pub fn create_at(&self, claims: &Claims, now: DateTime<Utc>) -> Result<String, TokenError> {
        let payload = TokenClaims {
            claims: claims.clone(),
            registered: RegisteredClaims {
                iss: self.issuer.clone(),
                iat: now,
                exp: now + self.lifetime,
            },
        };

        jsonwebtoken::encode(&Header::new(self.algorithm), &payload, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Verify `token` as seen at `now` and return its semantic claims.
    pub fn decode_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        // Reject a foreign algorithm before any key material is involved.
        let header = jsonwebtoken::decode_header(token).map_err(|_| self.unparsed_header_error(token))?;
        if header.alg != self.algorithm {
            return Err(TokenError::InvalidSigningMethod);
        }

        let data = jsonwebtoken::decode::<TokenClaims>(token, &self.decoding, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidAlgorithm => TokenError::InvalidSigningMethod,
                _ => TokenError::InvalidToken,
            })?;

        validate_registered(&data.claims.registered, now).map_err(|_| TokenError::InvalidToken)?;

        Ok(data.claims.claims)
    }

    /// `decode_header` rejects algorithms it does not model (`none` among
    /// them). Such a header still declares a foreign algorithm if its raw
    /// `alg` is readable.
    fn unparsed_header_error(&self, token: &str) -> TokenError {
        match declared_algorithm(token) {
            Some(alg) if alg != hmac_name(self.algorithm) => TokenError::InvalidSigningMethod,
            _ => TokenError::InvalidToken,
        }
    }
}

#[derive(Deserialize)]
struct RawHeader {
    alg: Option<String>,
}

fn declared_algorithm(token: &str) -> Option<String> {
    let (encoded, _) = token.split_once('.')?;
    let bytes = URL_SAFE_NO_PAD.decode(encoded).ok()?;
    serde_json::from_slice::<RawHeader>(&bytes).ok()?.alg
}

fn hmac_name(algorithm: Algorithm) -> &'static str {
    match algorithm {
        Algorithm::HS384 => "HS384",
        Algorithm::HS512 => "HS512",
        // Construction only admits HMAC algorithms.
        _ => "HS256",
    }
}

impl TokenIssuer for JwtIssuer {
    fn create(&self, claims: &Claims) -> Result<String, TokenError> {
        self.create_at(claims, Utc::now())
    }

    fn decode(&self, token: &str) -> Result<Claims, TokenError> {
        self.decode_at(token, Utc::now())
    }
}

impl core::fmt::Debug for JwtIssuer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("JwtIssuer")
            .field("issuer", &self.issuer)
            .field("lifetime", &self.lifetime)
            .field("algorithm", &self.algorithm)
            .finish_non_exhaustive()
    }
}
