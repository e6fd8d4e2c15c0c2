pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod spa;
pub mod utils;
