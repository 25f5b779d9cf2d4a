//! Markup access: locating tables and fields, mining inline scripts and
//! reading typed values out of rows.

pub mod extract;
pub mod locator;
pub mod script;

pub use scraper::{ElementRef, Html};
