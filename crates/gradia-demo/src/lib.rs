//! Gradient demo: a controller holding the gradient configuration and pointer
//! interaction, two rendering backends (the gradia GPU renderer and a CPU
//! reference rasterizer) and the control panel that drives it.

pub mod app;
pub mod backend;
pub mod canvas;
pub mod config;
pub mod controller;
pub mod interaction;
pub mod mapping;
pub mod options;
pub mod panel;
pub mod raster;
