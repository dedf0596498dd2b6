use std::sync::Arc;

use anyhow::Context;
use axum::extract::FromRef;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use tracing::{debug, warn};

use super::claims::Claims;
use crate::config::AuthConfig;
use crate::state::AppState;

/// Verifies bearer ID tokens. Without a configured key every token is rejected.
pub struct TokenVerifier {
    key: Option<(DecodingKey, Algorithm)>,
    issuer: String,
    audience: String,
}

impl TokenVerifier {
    pub fn from_config(cfg: &AuthConfig) -> anyhow::Result<Self> {
        let key = if let Some(pem) = &cfg.public_key_pem {
            let key = DecodingKey::from_rsa_pem(pem.as_bytes()).context("parse AUTH_PUBLIC_KEY_PEM")?;
            Some((key, Algorithm::RS256))
        } else if let Some(secret) = &cfg.jwt_secret {
            Some((DecodingKey::from_secret(secret.as_bytes()), Algorithm::HS256))
        } else {
            warn!("no AUTH_PUBLIC_KEY_PEM or AUTH_JWT_SECRET set; authenticated routes will reject all requests");
            None
        };
        Ok(Self {
            key,
            issuer: cfg.issuer.clone(),
            audience: cfg.audience.clone(),
        })
    }

    pub fn verify(&self, token: &str) -> anyhow::Result<Claims> {
        let Some((key, alg)) = &self.key else {
            anyhow::bail!("authentication is not configured");
        };
        let mut validation = Validation::new(*alg);
        validation.set_audience(std::slice::from_ref(&self.audience));
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        let data = decode::<Claims>(token, key, &validation)?;
        if data.claims.sub.is_empty() {
            anyhow::bail!("token has an empty subject");
        }
        debug!(uid = %data.claims.sub, "id token verified");
        Ok(data.claims)
    }
}

impl FromRef<AppState> for Arc<TokenVerifier> {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}
