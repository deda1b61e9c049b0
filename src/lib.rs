//! binscope - Go binary discovery and local dependency resolution
//!
//! Walks a Go source tree, finds every runnable `package main` entry file and
//! computes the transitive set of project-local packages each one imports.

pub mod affected;
pub mod cli;
pub mod config;
pub mod discover;
pub mod error;
pub mod resolve;
pub mod source;
pub mod ui;

pub use discover::{Discoverer, Discovery};
pub use error::{BinscopeError, BinscopeResult};
pub use resolve::{Binary, Dependency, DependencyResolver, Resolution};
