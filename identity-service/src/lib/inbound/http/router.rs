use std::sync::Arc;
use std::time::Duration;

use auth::Authenticator;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::create_user::create_user;
use super::handlers::current_user::current_user;
use super::handlers::login::login;
use super::middleware::authenticate as auth_middleware;
use crate::config::CookieConfig;
use crate::domain::user::ports::UserRepository;
use crate::domain::user::service::UserService;

pub type UserAuthenticator<UR> = Authenticator<UserService<UR>>;

pub struct AppState<UR: UserRepository> {
    pub user_service: Arc<UserService<UR>>,
    pub authenticator: Arc<UserAuthenticator<UR>>,
    pub cookie: CookieConfig,
}

impl<UR: UserRepository> Clone for AppState<UR> {
    fn clone(&self) -> Self {
        Self {
            user_service: Arc::clone(&self.user_service),
            authenticator: Arc::clone(&self.authenticator),
            cookie: self.cookie.clone(),
        }
    }
}

pub fn create_router<UR: UserRepository>(
    user_service: Arc<UserService<UR>>,
    authenticator: Arc<UserAuthenticator<UR>>,
    cookie: CookieConfig,
) -> Router {
    let state = AppState {
        user_service,
        authenticator,
        cookie,
    };

    let public_routes = Router::new()
        .route("/login", post(login::<UR>))
        .route("/api/users", post(create_user::<UR>));

    let protected_routes = Router::new()
        .route("/api/users/me", get(current_user))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware::<UR>,
        ));

    // Headers are left out of the span: they carry bearer tokens and cookies.
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(
            ServiceBuilder::new()
                .layer(trace_layer)
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
