//! Comparison stages
//!
//! - Range enumeration and flattening (ranges.rs)
//! - Cache warming (warming.rs)
//! - The full comparison run (comparing.rs)

mod comparing;
mod ranges;
mod warming;

pub(crate) use ranges::{collect_ranges, flatten};
pub(crate) use warming::{warm_cache, warm_files};
