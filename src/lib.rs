//! bommerge: bill-of-materials rollup across assembly spreadsheets
//!
//! An assembly spreadsheet lists the sub-assemblies it uses and the parts it
//! contains directly. Given a root assembly and the spreadsheets of its
//! sub-assemblies, bommerge walks the tree, multiplies quantities along each
//! path, and reports total part quantities with a traceability ledger.

pub mod cli;
pub mod core;
pub mod entities;
