//! Actor identification for audit columns and capability gating.
//!
//! Scan stations run on a trusted floor network behind the warehouse
//! gateway, which stamps the operator's badge name into `x-actor` and
//! their granted capabilities into `x-capabilities`. Requests without the
//! headers (health probes, local development) fall back to `anonymous`
//! with no capabilities.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

/// Capability required to reopen a finalized booking.
pub const CAP_UNLOCK: &str = "unlock";

/// The identity behind a request, as asserted by the gateway.
#[derive(Debug, Clone)]
pub struct Actor {
    /// Operator name written into `created_by` / `updated_by` / `scan_by`.
    pub name: String,
    /// Granted capability names, comma-separated on the wire.
    pub capabilities: Vec<String>,
}

impl Actor {
    /// Whether the actor holds the named capability.
    pub fn can(&self, capability: &str) -> bool {
        self.capabilities.iter().any(|c| c == capability)
    }
}

impl<S> FromRequestParts<S> for Actor
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let name = parts
            .headers
            .get("x-actor")
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or("anonymous")
            .to_string();

        let capabilities = parts
            .headers
            .get("x-capabilities")
            .and_then(|v| v.to_str().ok())
            .map(|v| {
                v.split(',')
                    .map(|c| c.trim().to_string())
                    .filter(|c| !c.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Actor { name, capabilities })
    }
}
