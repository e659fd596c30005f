//! Domain models for the block schedule.
//!
//! # Core Concepts
//!
//! - [`Item`]: One schedule entry as loaded from a block resource. Every field is
//!   optional; missing data degrades to fallbacks at render time.
//! - [`DayCode`]: Identifier of a festival day, selecting an ordered subset of blocks.
//! - [`RenderedRecord`]: Display-ready card (heading plus up to two body lines)
//!   derived from one item for one schedule slot. Transient, never persisted.

mod day;
mod item;
mod record;

pub use day::*;
pub use item::*;
pub use record::*;
