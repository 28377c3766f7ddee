//! # toolkit-core
//!
//! Configuration-driven catalogue of payment operations, the permission
//! filter that narrows it, and the dispatcher that runs the allowed subset.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         Dispatcher                            │
//! │  ┌─────────────┐  ┌──────────────┐  ┌─────────────────────┐  │
//! │  │  Catalogue  │  │   Argument   │  │   ProviderClient    │  │
//! │  │  (filtered) │──│   Schemas    │──│   (Strategy)        │  │
//! │  └─────────────┘  └──────────────┘  └─────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//!         ▲
//!         │ filter(catalogue, configuration)
//!   Configuration { actions, context }
//! ```
//!
//! The `ProviderClient` trait keeps the Stripe transport out of this crate;
//! `MockProviderClient` backs tests and offline runs.

pub mod catalogue;
pub mod configuration;
pub mod dispatcher;
pub mod error;
pub mod metering;
mod operations;
pub mod provider;
pub mod schema;

pub use catalogue::{Action, Catalogue, Category, Operation, OperationDescriptor};
pub use configuration::{Configuration, Context, Permissions, filter};
pub use dispatcher::Dispatcher;
pub use error::{Result, ToolkitError};
pub use metering::{BillingHooks, BillingMode, MeterEvent, TokenUsage};
pub use provider::{Method, MockProviderClient, ProviderClient, ProviderRequest};
pub use schema::{ArgumentSchema, Arguments, FieldSchema, FieldType};
