//! Pipeline stages for screening one article.
//!
//! Each submodule implements exactly one step, so each can be tested on its
//! own and swapped (e.g. a different extraction backend) without touching the
//! others.
//!
//! ## Data Flow
//!
//! ```text
//! discover ──▶ extract ──▶ analyze ──▶ (write, in crate::batch)
//! (dir scan)   (pdfium)    (LLM)
//! ```
//!
//! 1. [`discover`] — list, filter and sort the input directory; derive output
//!    paths
//! 2. [`extract`]  — concatenate page text; runs in `spawn_blocking` because
//!    pdfium is a blocking C library
//! 3. [`analyze`]  — wrap the text in the screening prompt and call the LLM;
//!    the only stage with network I/O

pub mod analyze;
pub mod discover;
pub mod extract;
