use actix_web::{HttpRequest, HttpResponse, get, post, web};
use tracing::info;

use crate::application::invoice_service::InvoiceService;
use crate::data::invoice_repository::PostgresInvoiceRepository;
use crate::domain::error::DomainError;
use crate::presentation::dto::{CreateInvoiceRequest, InvoiceCreatedResponse, InvoiceListResponse};
use crate::presentation::middleware::RequestId;
use crate::presentation::utils::AuthenticatedUser;

#[post("")]
pub async fn create_invoice(
    req: HttpRequest,
    user: AuthenticatedUser,
    service: web::Data<InvoiceService<PostgresInvoiceRepository>>,
    payload: web::Json<CreateInvoiceRequest>,
) -> Result<HttpResponse, DomainError> {
    let invoice = service.create_invoice(payload.into_inner().into()).await?;

    info!(
        request_id = %request_id(&req),
        user = %user.email,
        invoice_id = %invoice.id,
        sum = invoice.sum,
        "invoice created"
    );

    Ok(HttpResponse::Created().json(InvoiceCreatedResponse {
        success: true,
        invoice,
    }))
}

#[get("")]
pub async fn list_invoices(
    req: HttpRequest,
    user: AuthenticatedUser,
    service: web::Data<InvoiceService<PostgresInvoiceRepository>>,
) -> Result<HttpResponse, DomainError> {
    let invoices = service.list_invoices().await?;

    info!(
        request_id = %request_id(&req),
        user = %user.email,
        count = invoices.len(),
        "invoices listed"
    );

    Ok(HttpResponse::Ok().json(InvoiceListResponse {
        success: true,
        invoices,
    }))
}

fn request_id(req: &HttpRequest) -> String {
    use actix_web::HttpMessage;

    req.extensions()
        .get::<RequestId>()
        .map(|rid| rid.0.clone())
        .unwrap_or_else(|| "unknown".into())
}
