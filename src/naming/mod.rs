//! Names for generated relationships.

mod generator;
mod inflection;

pub use generator::{unique_name, DefaultNameGenerator, NameGenerator};
pub use inflection::{pluralize, singularize};
