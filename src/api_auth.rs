use std::future::{ready, Ready};
use std::rc::Rc;
use std::task::{Context, Poll};

use actix_web::{
    body::{BoxBody, EitherBody},
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::StatusCode,
    Error, HttpResponse,
};
use futures::future::LocalBoxFuture;

/// Bearer-token guard for the service. Built with the configured key at
/// startup; a `None` key disables the check entirely.
pub struct ApiKey {
    key: Option<Rc<String>>,
}

impl ApiKey {
    pub fn new(key: Option<String>) -> Self {
        Self {
            key: key.map(Rc::new),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for ApiKey
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B, BoxBody>>;
    type Error = Error;
    type Transform = ApiKeyMiddleware<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(ApiKeyMiddleware {
            service,
            key: self.key.clone(),
        }))
    }
}

pub struct ApiKeyMiddleware<S> {
    service: S,
    key: Option<Rc<String>>,
}

impl<S, B> Service<ServiceRequest> for ApiKeyMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B, BoxBody>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let expected = match &self.key {
            Some(key) => key.clone(),
            None => {
                let fut = self.service.call(req);
                return Box::pin(async move {
                    let res: ServiceResponse<B> = fut.await?;
                    Ok(res.map_into_left_body())
                });
            }
        };

        let bearer_token = req
            .headers()
            .get("Authorization")
            .and_then(|header| header.to_str().ok())
            .and_then(|header| header.strip_prefix("Bearer "))
            .map(String::from);

        if bearer_token.as_deref() == Some(expected.as_str()) {
            let fut = self.service.call(req);
            Box::pin(async move {
                let res: ServiceResponse<B> = fut.await?;
                Ok(res.map_into_left_body())
            })
        } else {
            Box::pin(async move {
                let (http_req, _payload) = req.into_parts();
                let res = HttpResponse::new(StatusCode::UNAUTHORIZED);
                Ok(ServiceResponse::new(http_req, res).map_into_right_body())
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, web, App};

    async fn ok_handler() -> HttpResponse {
        HttpResponse::Ok().finish()
    }

    #[actix_web::test]
    async fn missing_bearer_is_unauthorized() {
        let app = test::init_service(
            App::new()
                .wrap(ApiKey::new(Some("secret".to_string())))
                .route("/", web::get().to(ok_handler)),
        )
        .await;

        let request = test::TestRequest::get().uri("/").to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn wrong_bearer_is_unauthorized() {
        let app = test::init_service(
            App::new()
                .wrap(ApiKey::new(Some("secret".to_string())))
                .route("/", web::get().to(ok_handler)),
        )
        .await;

        let request = test::TestRequest::get()
            .uri("/")
            .insert_header(("Authorization", "Bearer wrong"))
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn correct_bearer_passes_through() {
        let app = test::init_service(
            App::new()
                .wrap(ApiKey::new(Some("secret".to_string())))
                .route("/", web::get().to(ok_handler)),
        )
        .await;

        let request = test::TestRequest::get()
            .uri("/")
            .insert_header(("Authorization", "Bearer secret"))
            .to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn unset_key_disables_the_guard() {
        let app = test::init_service(
            App::new()
                .wrap(ApiKey::new(None))
                .route("/", web::get().to(ok_handler)),
        )
        .await;

        let request = test::TestRequest::get().uri("/").to_request();
        let response = test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}
