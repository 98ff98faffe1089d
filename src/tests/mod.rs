//! Internal test modules - whitebox tests with crate access
//!
//! Whole sessions are driven through `TuiApp` with scripted keys, a
//! recording provider and a `TestBackend` terminal.

mod loop_properties;
