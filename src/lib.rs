//! Thumbnail generator for newly created storage objects
//!
//! Reacts to an "object created" notification, reads the uploaded PNG, JPEG or
//! GIF once, and writes an aspect-preserving copy for every configured width
//! to a destination container, named `{name}_{width}{ext}`.

pub mod app;
pub mod error;
pub mod format;
pub mod image;
pub mod models;
pub mod naming;
pub mod pipeline;
pub mod resize;
pub mod storage;

pub use error::{Error, Result};
