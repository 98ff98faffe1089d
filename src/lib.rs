//! psnav
//!
//! Terminal navigator for PowerShell modules, their commands and help text.
//!
//! The navigator core (`state`) is pure; providers, the terminal loop and
//! logging form the impure shell around it.

pub mod config;
pub mod logging;
pub mod model;
pub mod provider;
pub mod state;
pub mod view;

#[cfg(test)]
mod test_harness;

#[cfg(test)]
mod tests;
