//! Intersection Simulation Library
//!
//! A four-way traffic intersection simulated on a virtual clock, with a
//! round-robin signal scheduler and priority preemption.

pub mod simulation;
