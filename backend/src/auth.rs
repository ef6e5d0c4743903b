//! Caller authentication for the HTTP surface.
//!
//! Every endpoint takes a [`Caller`] argument. The extractor reads
//! `Authorization: Bearer <token>` and resolves it against the `[[users]]`
//! table; an absent or unknown token rejects the request with 401 before the
//! handler runs.

use crate::error::ServiceError;
use crate::state::AppState;
use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{web, FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};

#[derive(Debug, Clone)]
pub struct Caller {
    pub email: String,
    pub admin: bool,
}

impl Caller {
    /// Fails with 403 unless the caller is an administrator.
    pub fn require_admin(&self) -> Result<(), ServiceError> {
        if self.admin {
            Ok(())
        } else {
            Err(ServiceError::Forbidden(format!(
                "{} is not allowed to run administrative operations",
                self.email
            )))
        }
    }
}

fn bearer_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

fn authenticate(req: &HttpRequest) -> Result<Caller, ServiceError> {
    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| ServiceError::configuration("application state is not registered"))?;
    let token = bearer_token(req).ok_or(ServiceError::Unauthenticated)?;
    state
        .config
        .users
        .iter()
        .find(|u| u.token == token)
        .map(|u| Caller {
            email: u.email.clone(),
            admin: u.admin,
        })
        .ok_or(ServiceError::Unauthenticated)
}

impl FromRequest for Caller {
    type Error = ServiceError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn extracts_bearer_token() {
        let req = TestRequest::default()
            .insert_header((header::AUTHORIZATION, "Bearer abc "))
            .to_http_request();
        assert_eq!(bearer_token(&req), Some("abc"));

        let req = TestRequest::default()
            .insert_header((header::AUTHORIZATION, "Basic abc"))
            .to_http_request();
        assert_eq!(bearer_token(&req), None);

        let req = TestRequest::default().to_http_request();
        assert_eq!(bearer_token(&req), None);
    }

    #[test]
    fn only_admins_pass_require_admin() {
        let caller = Caller {
            email: "a@example.com".into(),
            admin: false,
        };
        assert!(matches!(
            caller.require_admin(),
            Err(ServiceError::Forbidden(_))
        ));
        let admin = Caller {
            admin: true,
            ..caller
        };
        assert!(admin.require_admin().is_ok());
    }
}
