//! HTTP handlers and route configuration.

mod auth;
mod comments;
mod groups;
mod health;
mod posts;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use actix_web::web;

use quill_core::ports::{RateLimiter, TokenService};

use crate::middleware::error::{json_config, path_config};
use crate::middleware::rate_limit::RateLimitMiddleware;
use crate::state::AppState;

/// Register shared state, extractor configuration and every route.
pub fn configure_app(state: AppState) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        let rate_limiter = state.rate_limiter.clone();
        cfg.app_data(web::Data::<Arc<dyn TokenService>>::new(state.tokens.clone()))
            .app_data(web::Data::new(state))
            .app_data(json_config())
            .app_data(path_config());
        configure_routes(cfg, rate_limiter);
    }
}

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig, rate_limiter: Arc<dyn RateLimiter>) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(health::health_check))
            .service(
                web::scope("/v1")
                    .service(
                        web::resource("/api-token-auth")
                            .wrap(RateLimitMiddleware::new(rate_limiter))
                            .route(web::post().to(auth::obtain_token)),
                    )
                    .service(
                        web::scope("/auth")
                            .route("/register", web::post().to(auth::register))
                            .route("/me", web::get().to(auth::me)),
                    )
                    .service(
                        web::scope("/admin")
                            .route("/groups", web::post().to(groups::create))
                            .route("/groups/{id}", web::delete().to(groups::destroy))
                            .route("/posts/{id}", web::delete().to(posts::admin_destroy)),
                    )
                    .route("/groups", web::get().to(groups::list))
                    .route("/groups/{id}", web::get().to(groups::retrieve))
                    .service(
                        web::resource("/posts")
                            .route(web::get().to(posts::list))
                            .route(web::post().to(posts::create)),
                    )
                    .service(
                        web::resource("/posts/{id}")
                            .route(web::get().to(posts::retrieve))
                            .route(web::put().to(posts::update))
                            .route(web::patch().to(posts::partial_update))
                            .route(web::delete().to(posts::destroy)),
                    )
                    .service(
                        web::resource("/posts/{post_id}/comments")
                            .route(web::get().to(comments::list))
                            .route(web::post().to(comments::create)),
                    )
                    .service(
                        web::resource("/posts/{post_id}/comments/{id}")
                            .route(web::get().to(comments::retrieve))
                            .route(web::put().to(comments::update))
                            .route(web::patch().to(comments::partial_update))
                            .route(web::delete().to(comments::destroy)),
                    ),
            ),
    );
}
