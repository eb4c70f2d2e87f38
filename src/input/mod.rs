//! Presentation-to-logic input boundary.

pub mod events;
