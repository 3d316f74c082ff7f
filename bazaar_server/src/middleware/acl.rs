//! Access control middleware. It can be placed on any route or service below the JWT middleware.
//!
//! The claims attached by [`super::JwtMiddlewareFactory`] are checked against the user types the route allows. A
//! request without claims is told to log in; a request from the wrong kind of account gets a 403 Forbidden.

use std::{pin::Pin, rc::Rc};

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error,
    HttpMessage,
};
use bazaar_engine::db_types::UserType;
use futures::{
    future::{ok, Ready},
    Future,
};
use log::*;

use crate::{
    auth::JwtClaims,
    errors::{AuthError, ServerError},
};

pub struct AclMiddlewareFactory {
    allowed: Vec<UserType>,
}

impl AclMiddlewareFactory {
    pub fn new(allowed: &[UserType]) -> Self {
        AclMiddlewareFactory { allowed: allowed.to_vec() }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AclMiddlewareFactory
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AclMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AclMiddlewareService { allowed: self.allowed.clone(), service: Rc::new(service) })
    }
}

pub struct AclMiddlewareService<S> {
    allowed: Vec<UserType>,
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AclMiddlewareService<S>
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
        let allowed = self.allowed.clone();
        Box::pin(async move {
            let user_type = req.extensions().get::<JwtClaims>().map(|c| c.user_type);
            let Some(user_type) = user_type else {
                debug!("🔐️ No JWT claims found for {}", req.path());
                return Err(ServerError::from(AuthError::LoginRequired).into());
            };
            if allowed.contains(&user_type) {
                service.call(req).await
            } else {
                debug!("🔐️ A {user_type} may not access {}", req.path());
                let msg = if allowed == [UserType::Seller] {
                    "Only for shops".to_string()
                } else {
                    format!("This endpoint is not available to a {user_type}")
                };
                Err(ServerError::InsufficientPermissions(msg).into())
            }
        })
    }
}
