//! Linear backend for ctw.
//!
//! [`LinearProvider`] implements [`ctw_protocol::TicketProvider`] against
//! Linear's GraphQL API. Each operation is a single POST; responses are
//! flattened into the shared [`ctw_protocol::Issue`] model.
//!
//! # Errors
//!
//! - an `errors` array in the response body is a
//!   [`Backend`](ctw_protocol::ProviderError::Backend) error carrying Linear's
//!   messages, whatever the HTTP status
//! - HTTP 401 is an [`Authentication`](ctw_protocol::ProviderError::Authentication) error
//! - a `null` issue is [`NotFound`](ctw_protocol::ProviderError::NotFound)

pub mod client;
mod node;
pub mod queries;

pub use client::{ENDPOINT, LinearProvider, UNAUTHORIZED_MESSAGE};
