//! Access Token Codec
//! Mission: Mint and parse the self-describing bearer tokens
//!
//! Wire form: base64(STANDARD) of `subject|issued-at|validity-days|nonce`.
//! Tokens carry no signature; anyone holding one is trusted until it expires.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use chrono::{DateTime, Days, NaiveDateTime, SubsecRound, Utc};
use rand::{distributions::Alphanumeric, Rng};
use std::fmt;

pub const TOKEN_DELIMITER: char = '|';
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";
pub const ACCESS_TOKEN_VALIDITY_DAYS: u32 = 1;
pub const NONCE_LENGTH: usize = 5;
pub const REFRESH_TOKEN_LENGTH: usize = 20;

/// Decoded access token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    pub subject: String,
    pub issued_at: DateTime<Utc>,
    pub validity_days: u32,
    pub nonce: String,
}

impl AccessToken {
    /// New token for `subject`, issued now, valid for the standard period
    pub fn issue(subject: &str) -> Self {
        Self {
            subject: subject.to_string(),
            issued_at: Utc::now().trunc_subsecs(0),
            validity_days: ACCESS_TOKEN_VALIDITY_DAYS,
            nonce: random_alphanumeric(NONCE_LENGTH),
        }
    }

    pub fn encode(&self) -> String {
        let raw = format!(
            "{subject}{d}{issued}{d}{days}{d}{nonce}",
            subject = self.subject,
            issued = self.issued_at.format(TIMESTAMP_FORMAT),
            days = self.validity_days,
            nonce = self.nonce,
            d = TOKEN_DELIMITER,
        );
        BASE64.encode(raw)
    }

    pub fn decode(encoded: &str) -> Result<Self, TokenError> {
        let bytes = BASE64
            .decode(encoded.trim())
            .map_err(|_| TokenError::Encoding)?;
        let raw = String::from_utf8(bytes).map_err(|_| TokenError::Encoding)?;

        let parts: Vec<&str> = raw.split(TOKEN_DELIMITER).collect();
        let [subject, issued_at, validity_days, nonce] = parts[..] else {
            return Err(TokenError::FieldCount(parts.len()));
        };

        let validity_days = validity_days
            .parse::<u32>()
            .map_err(|_| TokenError::Validity(validity_days.to_string()))?;
        let issued_at = NaiveDateTime::parse_from_str(issued_at, TIMESTAMP_FORMAT)
            .map_err(|_| TokenError::Timestamp(issued_at.to_string()))?
            .and_utc();

        let token = Self {
            subject: subject.to_string(),
            issued_at,
            validity_days,
            nonce: nonce.to_string(),
        };

        // reject tokens whose expiry cannot be represented
        if token.expires_at().is_none() {
            return Err(TokenError::Validity(validity_days.to_string()));
        }

        Ok(token)
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.issued_at
            .checked_add_days(Days::new(u64::from(self.validity_days)))
    }

    /// Expired once `now` is strictly past issued-at + validity.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at() {
            Some(expiry) => now > expiry,
            None => true,
        }
    }
}

/// Random string over `[A-Za-z0-9]`
pub fn random_alphanumeric(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// New refresh token
pub fn generate_refresh_token() -> String {
    random_alphanumeric(REFRESH_TOKEN_LENGTH)
}

/// Why a token could not be decoded. Every variant is a malformed token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    Encoding,
    FieldCount(usize),
    Validity(String),
    Timestamp(String),
}

impl fmt::Display for TokenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenError::Encoding => write!(f, "malformed token: not base64 text"),
            TokenError::FieldCount(n) => write!(f, "malformed token: expected 4 fields, got {}", n),
            TokenError::Validity(v) => write!(f, "malformed token: bad validity '{}'", v),
            TokenError::Timestamp(t) => write!(f, "malformed token: bad timestamp '{}'", t),
        }
    }
}

impl std::error::Error for TokenError {}
