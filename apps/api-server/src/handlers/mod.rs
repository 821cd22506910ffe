//! HTTP handlers and route configuration.

mod analytics;
mod auth;
mod brands;
mod health;
mod posts;
mod publish;
mod scheduling;

#[cfg(test)]
mod tests;

use actix_web::{guard, web};

use crate::middleware::RequireRole;

/// Configure all application routes.
///
/// Reads need any authenticated user of the tenant. Authoring needs an
/// editor; approval decisions, manual dispatch and sweeps need a manager.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            // Auth routes
            .service(
                web::scope("/auth")
                    .route("/register", web::post().to(auth::register))
                    .route("/login", web::post().to(auth::login))
                    .route("/me", web::get().to(auth::me)),
            )
            .service(
                web::scope("/brands")
                    .service(
                        web::resource("")
                            .guard(guard::Post())
                            .wrap(RequireRole::managers())
                            .to(brands::create),
                    )
                    .route("", web::get().to(brands::list)),
            )
            .service(posts_scope())
            .service(
                web::scope("/publish")
                    .route("/publishers", web::get().to(publish::publishers))
                    .route("/health", web::get().to(publish::health))
                    .route("/status/{post_id}", web::get().to(publish::status))
                    .service(
                        web::resource("/dispatch/{post_id}")
                            .wrap(RequireRole::managers())
                            .route(web::post().to(publish::dispatch)),
                    ),
            )
            .service(
                web::scope("/scheduling")
                    .route("/status", web::get().to(scheduling::status))
                    .service(
                        web::resource("/trigger")
                            .wrap(RequireRole::managers())
                            .route(web::post().to(scheduling::trigger)),
                    ),
            )
            .service(
                web::scope("/analytics").service(
                    web::resource("/brand/{brand_id}/pull")
                        .wrap(RequireRole::editors())
                        .route(web::post().to(analytics::pull)),
                ),
            ),
    );
}

fn posts_scope() -> actix_web::Scope {
    let editor = |path: &str| web::resource(path.to_string()).wrap(RequireRole::editors());
    let manager = |path: &str| web::resource(path.to_string()).wrap(RequireRole::managers());

    web::scope("/posts")
        .service(
            web::resource("")
                .guard(guard::Post())
                .wrap(RequireRole::editors())
                .to(posts::create),
        )
        .route("", web::get().to(posts::list))
        .route("/{id}", web::get().to(posts::get))
        .route("/{id}/approvals", web::get().to(posts::approvals))
        .service(editor("/{id}/submit").route(web::post().to(posts::submit)))
        .service(editor("/{id}/reopen").route(web::post().to(posts::reopen)))
        .service(
            editor("/{id}/schedule")
                .route(web::post().to(posts::schedule))
                .route(web::delete().to(posts::cancel_schedule)),
        )
        .service(manager("/{id}/approve").route(web::post().to(posts::approve)))
        .service(manager("/{id}/reject").route(web::post().to(posts::reject)))
        .service(manager("/{id}/request-changes").route(web::post().to(posts::request_changes)))
        .service(manager("/{id}/archive").route(web::post().to(posts::archive)))
}
