use actix_web::web;

use crate::routes;

pub fn mount() -> actix_web::Scope {
    web::scope("/company")
        .service(routes::profile::post_register)
        .service(routes::profile::get_profile)
        .service(routes::profile::put_profile)
        .service(routes::assets::post_upload_logo)
        .service(routes::assets::post_upload_banner)
        .service(routes::assets::put_edit_logo)
        .service(routes::assets::put_edit_banner)
}
