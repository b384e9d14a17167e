//! Test modules for the queue system
//!
//! Tests are organized by the property they exercise.

mod capacity;
