//! colony-access - screen-reader access to a grid colony simulation
//!
//! Two halves share one input layer:
//! - `scan`: classifies everything around a point into a category tree
//! - `nav` + `domains`: hierarchical menus driven by a handful of keys

pub mod clipboard;
pub mod config;
pub mod core;
pub mod domains;
pub mod format;
pub mod nav;
pub mod scan;
pub mod sound;
pub mod tts;
pub mod world;
