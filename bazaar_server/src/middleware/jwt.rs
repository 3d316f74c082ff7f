//! Bearer token middleware.
//!
//! A request with no `Authorization` header passes through untouched; routes that need a user reject it later. A
//! request with a header must carry a valid token, otherwise it is answered with 401. The claims of a valid token are
//! stored in the request extensions for [`crate::auth::JwtClaims`] and the ACL middleware to pick up.

use std::{pin::Pin, rc::Rc};

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header::AUTHORIZATION,
    Error,
    HttpMessage,
};
use futures::{
    future::{ok, Ready},
    Future,
};
use log::*;

use crate::{
    auth::TokenValidator,
    errors::{AuthError, ServerError},
};

pub struct JwtMiddlewareFactory {
    validator: TokenValidator,
}

impl JwtMiddlewareFactory {
    pub fn new(validator: TokenValidator) -> Self {
        Self { validator }
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtMiddlewareFactory
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = JwtMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(JwtMiddlewareService { validator: Rc::new(self.validator.clone()), service: Rc::new(service) })
    }
}

pub struct JwtMiddlewareService<S> {
    validator: Rc<TokenValidator>,
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for JwtMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let validator = Rc::clone(&self.validator);
        Box::pin(async move {
            let header = req.headers().get(AUTHORIZATION).map(|h| h.to_str().map(str::to_string));
            let Some(header) = header else {
                return service.call(req).await;
            };
            let token = header
                .ok()
                .and_then(|h| h.strip_prefix("Bearer ").map(|t| t.trim().to_string()))
                .ok_or_else(|| AuthError::PoorlyFormattedToken("Expected 'Bearer <token>'".into()))
                .map_err(ServerError::from)?;
            let claims = validator.validate(&token).map_err(|e| {
                debug!("🔐️ Rejected access token for {}. {e}", req.path());
                ServerError::from(e)
            })?;
            trace!("🔐️ Request to {} from user #{} ({})", req.path(), claims.sub, claims.user_type);
            req.extensions_mut().insert(claims);
            service.call(req).await
        })
    }
}
