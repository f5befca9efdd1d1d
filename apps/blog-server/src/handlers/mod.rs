//! HTTP handlers and route configuration.

mod admin;
mod health;
mod pages;


use actix_web::web;

use crate::middleware::error::reject_input;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(pages::index))
        .route("/post/{slug}", web::get().to(pages::post_detail))
        .route("/tag/{tag_title}", web::get().to(pages::tag_filter))
        .route("/contacts", web::get().to(pages::contacts))
        .route("/health", web::get().to(health::health_check))
        .service(
            web::scope("/admin/api")
                .app_data(
                    web::JsonConfig::default().error_handler(|err, req| reject_input(err, req)),
                )
                .app_data(
                    web::PathConfig::default().error_handler(|err, req| reject_input(err, req)),
                )
                .app_data(
                    web::QueryConfig::default().error_handler(|err, req| reject_input(err, req)),
                )
                .route("/users", web::post().to(admin::create_user))
                .route("/users/{id}", web::get().to(admin::get_user))
                .route("/tags", web::get().to(admin::list_tags))
                .route("/tags", web::post().to(admin::create_tag))
                .route("/tags/{id}", web::delete().to(admin::delete_tag))
                .route("/posts", web::post().to(admin::create_post))
                .route("/posts/{id}", web::get().to(admin::get_post))
                .route("/posts/{id}", web::put().to(admin::update_post))
                .route("/posts/{id}", web::delete().to(admin::delete_post))
                .route("/posts/{id}/tags", web::put().to(admin::set_post_tags))
                .route("/posts/{id}/likes", web::post().to(admin::like_post))
                .route(
                    "/posts/{id}/likes/{user_id}",
                    web::delete().to(admin::unlike_post),
                )
                .route("/posts/{id}/comments", web::post().to(admin::create_comment))
                .route("/comments/{id}", web::delete().to(admin::delete_comment)),
        );
}
