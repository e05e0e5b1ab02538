//! Entity and resource definition macros

pub mod macros;
