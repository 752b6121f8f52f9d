//! HS256 JSON Web Tokens for API sessions.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use super::CryptoError;
use crate::models::User;

type HmacSha256 = Hmac<Sha256>;

#[derive(Serialize, Deserialize)]
struct JwtHeader {
    alg: String,
    typ: String,
}

/// Token payload. `sub` is the user's email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub uid: i64,
    pub role: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}

/// Issues and verifies tokens with a shared secret.
#[derive(Clone)]
pub struct JwtService {
    secret: Vec<u8>,
    ttl: Duration,
}

impl JwtService {
    pub fn new(secret: impl AsRef<[u8]>, ttl_secs: i64) -> Self {
        Self {
            secret: secret.as_ref().to_vec(),
            ttl: Duration::seconds(ttl_secs),
        }
    }

    pub fn issue(&self, user: &User) -> Result<String, CryptoError> {
        self.issue_at(user, Utc::now())
    }

    fn issue_at(&self, user: &User, now: DateTime<Utc>) -> Result<String, CryptoError> {
        let claims = Claims {
            sub: user.email.clone(),
            uid: user.id,
            role: user.role.as_str().to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
            jti: uuid::Uuid::new_v4().to_string(),
        };
        let header = JwtHeader {
            alg: "HS256".to_string(),
            typ: "JWT".to_string(),
        };

        let header_json =
            serde_json::to_vec(&header).map_err(|e| CryptoError::Encoding(e.to_string()))?;
        let claims_json =
            serde_json::to_vec(&claims).map_err(|e| CryptoError::Encoding(e.to_string()))?;

        let message = format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(header_json),
            URL_SAFE_NO_PAD.encode(claims_json)
        );
        let signature = self.mac(&message)?.finalize().into_bytes();

        Ok(format!("{message}.{}", URL_SAFE_NO_PAD.encode(signature)))
    }

    /// Check signature and expiry, returning the claims.
    pub fn verify(&self, token: &str) -> Result<Claims, CryptoError> {
        self.verify_at(token, Utc::now())
    }

    fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, CryptoError> {
        let parts: Vec<&str> = token.split('.').collect();
        let [header_b64, claims_b64, signature_b64] = parts.as_slice() else {
            return Err(CryptoError::MalformedToken);
        };

        let signature = URL_SAFE_NO_PAD
            .decode(signature_b64)
            .map_err(|_| CryptoError::MalformedToken)?;
        self.mac(&format!("{header_b64}.{claims_b64}"))?
            .verify_slice(&signature)
            .map_err(|_| CryptoError::BadSignature)?;

        let header: JwtHeader = URL_SAFE_NO_PAD
            .decode(header_b64)
            .ok()
            .and_then(|bytes| serde_json::from_slice(&bytes).ok())
            .ok_or(CryptoError::MalformedToken)?;
        if header.alg != "HS256" {
            return Err(CryptoError::MalformedToken);
        }

        let claims: Claims = URL_SAFE_NO_PAD
            .decode(claims_b64)
            .ok()
            .and_then(|bytes| serde_json::from_slice(&bytes).ok())
            .ok_or(CryptoError::MalformedToken)?;

        if claims.exp <= now.timestamp() {
            return Err(CryptoError::TokenExpired);
        }
        Ok(claims)
    }

    fn mac(&self, message: &str) -> Result<HmacSha256, CryptoError> {
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .map_err(|e| CryptoError::InvalidKey(e.to_string()))?;
        mac.update(message.as_bytes());
        Ok(mac)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    fn user() -> User {
        User {
            id: 7,
            firstname: "Ana".into(),
            lastname: "Lopez".into(),
            email: "admin@clinic.com".into(),
            password_hash: String::new(),
            role: Role::Admin,
        }
    }

    fn service() -> JwtService {
        JwtService::new("test-secret-key-with-enough-bytes", 3600)
    }

    #[test]
    fn issued_token_verifies() {
        let svc = service();
        let token = svc.issue(&user()).unwrap();
        assert_eq!(token.split('.').count(), 3);

        let claims = svc.verify(&token).unwrap();
        assert_eq!(claims.sub, "admin@clinic.com");
        assert_eq!(claims.uid, 7);
        assert_eq!(claims.role, "ROLE_ADMIN");
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn tokens_are_unique() {
        let svc = service();
        assert_ne!(svc.issue(&user()).unwrap(), svc.issue(&user()).unwrap());
    }

    #[test]
    fn expired_token_is_reported_as_expired() {
        let svc = service();
        let issued = Utc::now() - Duration::hours(2);
        let token = svc.issue_at(&user(), issued).unwrap();
        assert_eq!(svc.verify(&token), Err(CryptoError::TokenExpired));
    }

    #[test]
    fn token_from_other_secret_is_rejected() {
        let token = JwtService::new("another-secret", 3600).issue(&user()).unwrap();
        assert_eq!(service().verify(&token), Err(CryptoError::BadSignature));
    }

    #[test]
    fn tampered_claims_are_rejected() {
        let svc = service();
        let token = svc.issue(&user()).unwrap();
        let parts: Vec<&str> = token.split('.').collect();
        let forged_claims = URL_SAFE_NO_PAD.encode(
            br#"{"sub":"x@clinic.com","uid":1,"role":"ROLE_ADMIN","iat":0,"exp":99999999999,"jti":"j"}"#,
        );
        let forged = format!("{}.{}.{}", parts[0], forged_claims, parts[2]);
        assert_eq!(svc.verify(&forged), Err(CryptoError::BadSignature));
    }

    #[test]
    fn garbage_is_malformed() {
        let svc = service();
        assert_eq!(svc.verify("not-a-token"), Err(CryptoError::MalformedToken));
        assert_eq!(svc.verify("a.b.c.d"), Err(CryptoError::MalformedToken));
        assert_eq!(svc.verify("a.b.!!!"), Err(CryptoError::MalformedToken));
    }
}
