//! Local dependency resolution
//!
//! Turns an import path into the full list of project-owned packages it
//! reaches, memoizing every closure for the rest of the run.

pub mod cache;
pub mod lookup;
pub mod model;
pub mod resolver;

pub use cache::{Closure, DependencyCache};
pub use lookup::{LocalPathResolver, LookupRoot, LookupRoots};
pub use model::{binary_name, is_local, Binary, Dependency, Resolution};
pub use resolver::DependencyResolver;
