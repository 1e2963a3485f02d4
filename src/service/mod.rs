pub mod filter;
pub mod password;
pub mod record_ops;
pub mod seed_loader;
pub mod validation;
