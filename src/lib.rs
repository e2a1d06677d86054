//! Air Two quote wizard: a terminal front end for requesting private charter
//! quotes, plus the standalone contact form and static fleet/destination pages.

pub mod catalog;
pub mod config;
pub mod contact;
pub mod error;
pub mod i18n;
pub mod logging;
pub mod output;
pub mod pages;
pub mod pricing;
pub mod quote;
pub mod submit;
pub mod tui;
pub mod validate;
pub mod wizard;

pub use error::{Error, Result};
