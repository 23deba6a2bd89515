#![recursion_limit = "256"]

//! Convolutional sequence autoencoder on Burn.
//!
//! The binary drives the `cli` module; training routines plug in from
//! outside through [`ml::coordinator::Trainer`] and report a
//! [`domain::history::TrainHistory`].

pub mod application;
pub mod cli;
pub mod domain;
pub mod infra;
pub mod ml;
