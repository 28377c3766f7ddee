//! # toolkit-stripe
//!
//! Stripe implementation of [`toolkit_core::ProviderClient`].
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use toolkit_core::{Catalogue, Context, Dispatcher};
//! use toolkit_stripe::StripeClient;
//!
//! let client = Arc::new(StripeClient::from_env()?);
//! let dispatcher = Dispatcher::new(client, &Catalogue::standard(), Context::default());
//! let balance = dispatcher.run("retrieve_balance", &Default::default()).await?;
//! ```

mod client;
mod error;

pub use client::StripeClient;
pub use error::{PaymentError, Result};
