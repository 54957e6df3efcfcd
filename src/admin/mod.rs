//! Banking admin app integration

pub mod client;

pub use client::{AdminClient, SessionTerminator};
