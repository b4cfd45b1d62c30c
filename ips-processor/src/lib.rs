//! Turns a decoded `.ips` crash report into something a human can read.
//!
//! [`build`] walks a [`Report`][ips::Report] and produces an ordered list of
//! [`Section`]s: process and exception summaries, application specific
//! information, backtraces with resolved addresses, register state and so
//! on. Sections are plain data; [`print_sections`] and
//! [`print_sections_json`] render them, and any other renderer can consume
//! them the same way without ever looking at the raw report.
//!
//! ```
//! let raw = std::fs::read_to_string("../testdata/minimal.ips").unwrap();
//! let (metadata, report) = ips::decode(&raw).unwrap();
//! let sections = ips_processor::build(&report, &metadata);
//!
//! let mut out = Vec::new();
//! ips_processor::print_sections(&sections, &mut out, &Default::default()).unwrap();
//! assert!(String::from_utf8(out).unwrap().starts_with("Process:"));
//! ```

mod print;
mod processor;
pub mod registers;
pub mod sections;
pub mod symbols;

pub use print::*;
pub use processor::*;
pub use sections::*;
pub use symbols::{resolve_frame, resolve_frames};

#[cfg(doctest)]
#[doc = include_str!("../README.md")]
pub struct ReadmeDoctests;
