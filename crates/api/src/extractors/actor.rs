//! Audit actor header extractor.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};

/// The header naming who performs a write.
pub const ACTOR_HEADER: &str = "x-actor";

/// Actor recorded when the header is absent.
pub const DEFAULT_ACTOR: &str = "system";

const MAX_ACTOR_LEN: usize = 100;

/// Identity stamped into `created_by` / `modified_by`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor(pub String);

impl Actor {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Actor {
    fn default() -> Self {
        Actor(DEFAULT_ACTOR.to_string())
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Actor
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(value) = parts.headers.get(ACTOR_HEADER) else {
            return Ok(Actor::default());
        };

        let actor = value
            .to_str()
            .map_err(|_| (StatusCode::BAD_REQUEST, "X-Actor header must be ASCII"))?
            .trim();

        if actor.is_empty() {
            return Ok(Actor::default());
        }
        if actor.len() > MAX_ACTOR_LEN {
            return Err((StatusCode::BAD_REQUEST, "X-Actor header too long"));
        }
        Ok(Actor(actor.to_string()))
    }
}
