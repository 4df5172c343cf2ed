//! Mason is a terminal chat front end for a hosted code-generation model.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the transcript, the credential store, the session
//!   orchestrator, and configuration.
//! - [`proxy`] is the stateless HTTP route that forwards generation requests
//!   to the external model endpoint with the caller's bearer token.
//! - [`api`] defines the generate payloads, the error taxonomy, and the HTTP
//!   client the session talks to the proxy with.
//! - [`ui`] runs the interactive chat loop and the cosmetic reveal of
//!   assistant replies.
//! - [`auth`] implements interactive token setup and removal.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`], which dispatches into the chat loop, the
//! proxy server, or the auth flows.

pub mod api;
pub mod auth;
pub mod cli;
pub mod core;
pub mod logging;
pub mod proxy;
pub mod ui;
