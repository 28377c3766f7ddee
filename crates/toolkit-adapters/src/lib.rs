//! # toolkit-adapters
//!
//! Presents the allowed catalogue to agent frameworks as framework-native
//! tools.
//!
//! ## Invocation pipeline
//!
//! ```text
//! raw framework input
//!        │  unwrap_envelope      (flat / nested / JSON string / malformed)
//!        ▼
//!   Invocation { arguments, correlation_id }
//!        │  Dispatcher::run      (validate, call provider, serialize)
//!        ▼
//!   Ok(json text) ──▶ wrap_result ──┐
//!   Err(error)    ──▶ wrap_failure ─┴──▶ framework result envelope
//! ```
//!
//! Every stage is infallible from the framework's point of view: errors come
//! back as result envelopes, never as panics or raised errors.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use toolkit_adapters::{Framework, Toolkit};
//! use toolkit_core::{Action, Category, Configuration};
//!
//! let configuration = Configuration::new().allow(Category::Products, Action::Create);
//! let toolkit = Toolkit::new(Arc::new(StripeClient::from_env()?), &configuration);
//!
//! for tool in toolkit.tools(Framework::Strands) {
//!     println!("{}", tool.declaration());
//! }
//! ```

mod adapter;
mod envelope;
mod error;
pub mod frameworks;
mod toolkit;

pub use adapter::{FrameworkAdapter, FrameworkTool, Invocation};
pub use error::{AdapterError, Result};
pub use frameworks::{
    CamelAdapter, CrewAiAdapter, Framework, LangChainAdapter, McpAdapter, OpenAiAdapter, StrandsAdapter,
};
pub use toolkit::Toolkit;
