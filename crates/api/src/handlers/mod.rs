//! Request handlers.
//!
//! Handlers parse the HTTP edge (JSON bodies, data URIs), delegate to
//! `passport_pipeline::PassportActions` and map edge errors via
//! [`AppError`](crate::error::AppError).

pub mod passport;
