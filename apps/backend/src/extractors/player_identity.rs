use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::errors::ErrorCode;

/// Opaque identity injected by the upstream identity gateway.
///
/// The core never authenticates; it trusts `x-player-id` (stable external
/// identity), `x-player-name`, and optional `x-player-avatar` headers the
/// gateway sets after authentication.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerIdentity {
    pub player_id: String,
    pub name: String,
    pub avatar: Option<String>,
}

fn header_string(req: &HttpRequest, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl FromRequest for PlayerIdentity {
    type Error = AppError;
    type Future = std::future::Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let result = match header_string(req, "x-player-id") {
            Some(player_id) => {
                let name = header_string(req, "x-player-name").unwrap_or_else(|| player_id.clone());
                let avatar = header_string(req, "x-player-avatar");
                Ok(PlayerIdentity {
                    player_id,
                    name,
                    avatar,
                })
            }
            None => Err(AppError::bad_request(
                ErrorCode::InvalidIdentity,
                "Missing x-player-id header",
            )),
        };

        std::future::ready(result)
    }
}

#[cfg(test)]
mod tests {
    use actix_web::test::TestRequest;

    use super::*;

    #[actix_web::test]
    async fn extracts_identity_from_headers() {
        let req = TestRequest::default()
            .insert_header(("x-player-id", "user-1"))
            .insert_header(("x-player-name", "Ada"))
            .to_http_request();

        let identity = PlayerIdentity::extract(&req).await.unwrap();
        assert_eq!(identity.player_id, "user-1");
        assert_eq!(identity.name, "Ada");
        assert_eq!(identity.avatar, None);
    }

    #[actix_web::test]
    async fn name_defaults_to_player_id() {
        let req = TestRequest::default()
            .insert_header(("x-player-id", "user-2"))
            .to_http_request();

        let identity = PlayerIdentity::extract(&req).await.unwrap();
        assert_eq!(identity.name, "user-2");
    }

    #[actix_web::test]
    async fn missing_id_header_is_rejected() {
        let req = TestRequest::default().to_http_request();
        let result = PlayerIdentity::extract(&req).await;
        assert!(result.is_err());
    }
}
