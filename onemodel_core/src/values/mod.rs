//! Runtime values of the modeling layer and their export as a flat model

mod flatten;
mod model;
mod value;

pub use flatten::{flatten, FlatEntry, FlatModel, FlatValue, FlattenError, Flattener};
pub use model::{Model, ModelBody};
pub use value::Value;
