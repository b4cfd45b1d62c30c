//! A parser for Apple's `.ips` crash report format.
//!
//! An `.ips` file is a newline-delimited pair of JSON documents: a one-line
//! [`Metadata`] header followed by the [`Report`] payload. [`decode`] splits
//! and parses both, and checks that the header announces a crash report.
//!
//! The types in [`report`] mirror the payload schema. It is a large and
//! sparsely populated schema, so nearly every field is an `Option`. Unknown
//! keys, and known ones holding something unexpected, are preserved rather
//! than rejected.
//!
//! To turn a decoded report into something a human wants to read, see the
//! `ips-processor` crate.

mod decoder;
mod lenient;
pub mod report;
pub mod thread_state;

pub use decoder::*;
pub use report::*;
pub use thread_state::{ARM_THREAD_STATE64, X86_THREAD_STATE};

#[cfg(doctest)]
#[doc = include_str!("../README.md")]
pub struct ReadmeDoctests;
