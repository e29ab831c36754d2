//! Query construction for rowmap.
//!
//! `rowmap-query` turns `Model` metadata into SQL text plus bind values:
//!
//! - `Where` and `OrderBy` descriptors, built from typed field selectors
//! - builders for SELECT, INSERT (both row identifier shapes), UPDATE,
//!   DELETE and upsert
//!
//! Nothing here touches a connection; `rowmap-sqlite` executes the output.

pub mod builder;
pub mod clause;

#[cfg(test)]
mod test_models;

pub use builder::{DeleteBuilder, InsertBuilder, SelectBuilder, UpdateBuilder, UpsertBuilder};
pub use clause::{Cmp, OrderBy, OrderDirection, OrderParam, Where, WhereParam};
