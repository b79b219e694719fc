//! boxes-datagen - Design metadata extraction for the boxes website.
//!
//! This library queries a `boxes` executable for its version, the list of
//! designs in a config file and the details of each design, normalizes what
//! it finds, and writes the result as a YAML data file.

pub mod ansi;
pub mod catalog;
pub mod config;
pub mod design;
pub mod detail;
pub mod output;
pub mod pipeline;
pub mod probe;
pub mod runner;

pub use catalog::{parse_catalog, read_design_names, Catalog};
pub use config::{Settings, SettingsError};
pub use design::Design;
pub use detail::{add_design_details, apply_details, normalize_sample, strip_email};
pub use output::{render_designs, resolve_output_path, write_designs};
pub use pipeline::{run, PipelineError};
pub use probe::{read_boxes_version, ProbeError};
pub use runner::{Boxes, BoxesExecutable, RunError};
