pub mod backend;
pub mod http_backend;
