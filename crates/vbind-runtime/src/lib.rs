#![forbid(unsafe_code)]

//! Bound-view shell for vbind.
//!
//! Ties the reactivity core and the template compiler together: give
//! [`BoundView::new`] a host tree and a [`ViewConfig`] (model, methods,
//! mount selector, optional syntax) and get back a live view whose nodes
//! follow the model.
//!
//! # Feature Flags
//!
//! - `config`: [`config::load_syntax`] / [`config::parse_syntax`] read a
//!   [`vbind_template::TemplateSyntax`] from TOML.

#[cfg(feature = "config")]
pub mod config;
pub mod error;
pub mod view;

pub use error::ViewError;
pub use view::{BoundView, ViewConfig, create_bound_view};
