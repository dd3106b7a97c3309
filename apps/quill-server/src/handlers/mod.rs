//! HTTP handlers and route configuration.

mod about;
mod accounts;
mod comments;
mod health;
mod posts;

use actix_web::{HttpResponse, web};

use crate::middleware::auth::{HOME_URL, redirect};

/// 200 with an HTML body.
pub(crate) fn page(html: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html)
}

async fn index() -> HttpResponse {
    redirect(HOME_URL)
}

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index))
        .route("/health", web::get().to(health::health_check))
        .route("/about/", web::get().to(about::about))
        .service(
            web::scope("/blog")
                .route("/", web::get().to(posts::list))
                .service(
                    web::resource("/new/")
                        .route(web::get().to(posts::new_form))
                        .route(web::post().to(posts::create)),
                )
                .service(
                    web::resource("/comment/{id}/edit/")
                        .route(web::get().to(comments::edit_form))
                        .route(web::post().to(comments::edit)),
                )
                .service(
                    web::resource("/comment/{id}/delete/")
                        .route(web::get().to(comments::delete_confirm))
                        .route(web::post().to(comments::delete)),
                )
                .route(
                    "/comment/{id}/delete-ajax/",
                    web::post().to(comments::delete_ajax),
                )
                .service(
                    web::resource("/{slug}/")
                        .route(web::get().to(posts::detail))
                        .route(web::post().to(posts::comment)),
                ),
        )
        .service(
            web::scope("/accounts")
                .service(
                    web::resource("/login/")
                        .route(web::get().to(accounts::login_form))
                        .route(web::post().to(accounts::login)),
                )
                .service(
                    web::resource("/register/")
                        .route(web::get().to(accounts::register_form))
                        .route(web::post().to(accounts::register)),
                )
                .route("/logout/", web::post().to(accounts::logout)),
        );
}
