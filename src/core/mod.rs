//! Core module - sheet reading, section extraction and tree resolution

pub mod config;
pub mod grid;
pub mod registry;
pub mod report;
pub mod resolver;
pub mod section;

pub use config::{Config, ConfigError};
pub use grid::{read_first_sheet, Cell, SheetError, SheetGrid};
pub use registry::{AssemblyRegistry, AssemblyResource};
pub use report::MergedReport;
pub use resolver::{MergeError, Resolution, Resolver, DEFAULT_MAX_DEPTH};
pub use section::{SectionKind, SectionLabels};
