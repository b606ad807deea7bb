//! Blog content pipeline library.
//!
//! Normalizes raw records from a remote headless-CMS content store into
//! canonical post shapes, renders structured rich text to plain text and
//! escaped HTML, estimates reading time, and drives incremental
//! "load more" pagination as an explicit state machine.

pub mod config;
pub mod pagination;
pub mod post;
pub mod reading_time;
pub mod record;
pub mod richtext;
pub mod store;
