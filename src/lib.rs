//! Library exports for the userman console core, shared between the binary
//! and tests.

pub mod api;
pub mod config;
pub mod models;
pub mod navigation;
pub mod permissions;
pub mod pipeline;
pub mod session;
pub mod startup;
pub mod state;
pub mod utils;
