use actix_web::web;

use crate::routes;

pub fn mount() -> actix_web::Scope {
    web::scope("/auth")
        .service(routes::auth::post_register)
        .service(routes::auth::post_login)
        .service(routes::auth::get_verify_email)
        .service(routes::auth::post_verify_mobile)
}
