use actix_web::{HttpResponse, Responder, post, web};
use tracing::info;

use crate::application::auth_service::AuthService;
use crate::data::user_repository::PostgresUserRepository;
use crate::domain::error::DomainError;
use crate::presentation::dto::{SignInRequest, SignInResponse};

#[post("/sign-in")]
pub async fn sign_in(
    service: web::Data<AuthService<PostgresUserRepository>>,
    payload: web::Json<SignInRequest>,
) -> Result<impl Responder, DomainError> {
    let signed_in = service.sign_in(&payload.email, &payload.password).await?;

    info!(user_id = %signed_in.user_id, "user signed in");

    Ok(HttpResponse::Ok().json(SignInResponse {
        success: true,
        token: signed_in.token,
        user_id: signed_in.user_id,
    }))
}
