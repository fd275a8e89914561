//! Source file handling and location tracking for the Calla programming language.
//!
//! This crate provides the fundamental types for working with source code in the
//! Calla compiler pipeline: file identity, byte-accurate positions, open/closed
//! locations, a line index for offset-to-position queries, and a manager that
//! owns every file of a compilation session.
//!
//! The scanner builds [`types::Location`] values while it walks the bytes of a
//! file; the preparser and every later stage only ever read closed locations
//! attached to tokens and declarations. Precise locations are what make the
//! diagnostic rendering downstream possible.

pub mod types;
