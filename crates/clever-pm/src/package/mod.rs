// Package model for frontend and backend modules
//
// This module provides the requested-package description handed to the
// installers, the install locations modules live under, and the result of
// locating an already installed module.

mod location;
mod package;

pub use location::{Location, ModuleType, ResolvedModule};
pub use package::{split_name, Dist, Package};
