// Job board integrations: per-platform mapping tables, one generic adapter,
// the credential-gated registry and the multi-platform fan-out.

pub mod adapter;
pub mod credentials;
pub mod fanout;
pub mod handlers;
pub mod mapping;
pub mod models;
pub mod registry;
pub mod salary;
