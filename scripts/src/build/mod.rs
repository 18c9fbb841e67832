//! Access to the compiled contracts of the project.

pub mod artifact;
