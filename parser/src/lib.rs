//! Action tables and configuration loading for chordtap, a chorded keyboard decoder.

pub mod action;
pub mod cfg;
pub mod functions;
pub mod keys;
pub mod tables;
