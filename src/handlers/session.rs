use std::future::{ready, Ready};

use actix_web::cookie::{Cookie, SameSite};
use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest, HttpResponseBuilder};
use uuid::Uuid;

use crate::domain::ports::SessionKey;
use crate::errors::AppError;

pub const SESSION_COOKIE: &str = "cart_session";
pub const USER_HEADER: &str = "X-User-ID";

/// Cart session taken from the `cart_session` cookie, minted when absent.
#[derive(Debug, Clone, Copy)]
pub struct CartSession {
    pub key: SessionKey,
    fresh: bool,
}

impl CartSession {
    /// Sets the session cookie on `builder` if the key was minted for this request.
    pub fn attach(&self, builder: &mut HttpResponseBuilder) {
        if self.fresh {
            builder.cookie(
                Cookie::build(SESSION_COOKIE, self.key.0.to_string())
                    .path("/")
                    .http_only(true)
                    .same_site(SameSite::Lax)
                    .finish(),
            );
        }
    }
}

impl FromRequest for CartSession {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let existing = req
            .cookie(SESSION_COOKIE)
            .and_then(|c| Uuid::parse_str(c.value()).ok());

        let session = match existing {
            Some(id) => CartSession {
                key: SessionKey(id),
                fresh: false,
            },
            None => CartSession {
                key: SessionKey(Uuid::new_v4()),
                fresh: true,
            },
        };
        ready(Ok(session))
    }
}

/// Claimed user id from the `X-User-ID` header. Not yet checked against
/// the user store.
#[derive(Debug, Clone, Copy)]
pub struct Identity(pub Option<Uuid>);

impl FromRequest for Identity {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let Some(raw) = req.headers().get(USER_HEADER) else {
            return ready(Ok(Identity(None)));
        };
        let parsed = raw
            .to_str()
            .ok()
            .and_then(|s| Uuid::parse_str(s.trim()).ok());
        match parsed {
            Some(id) => ready(Ok(Identity(Some(id)))),
            None => {
                log::warn!("malformed {} header", USER_HEADER);
                ready(Err(AppError::Unauthenticated))
            }
        }
    }
}
