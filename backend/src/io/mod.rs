//! # IO Layer
//!
//! Interfaces that expose the domain to the outside world. Only HTTP today.

pub mod rest;
