use actix_web::{HttpResponse, Responder, http::header::ContentType};

// One document for every non-API path; the client-side gate interprets the
// path and decides what to render.
const INDEX_HTML: &str = include_str!("../../assets/index.html");

pub async fn index() -> impl Responder {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(INDEX_HTML)
}
