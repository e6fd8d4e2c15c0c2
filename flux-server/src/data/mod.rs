pub mod invoice_repository;
pub mod user_repository;
