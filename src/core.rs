/*
 * This module consolidates the core, platform-agnostic logic of the launcher.
 * It re-exports the source-tree abstraction and the importer that mirrors it
 * into the private data root, the asset presence check that drives the
 * bootstrap decision, configuration and path utilities, and the small data
 * types exchanged with the import worker.
 */
pub mod asset_check;
pub mod config;
pub mod import_progress;
pub mod import_record;
pub mod importer;
pub mod path_utils;
pub mod source_summary;
pub mod source_tree;

pub use asset_check::{AssetPresence, Decision, check_and_dispatch};

pub use config::{ConfigManagerOperations, CoreConfigManager};

pub use importer::{CoreImporter, ImportError, ImportResult, ImporterOperations};

pub use import_progress::ImportProgress;
pub use import_record::ImportRecord;
pub use source_summary::{SourceSummary, summarize_source};
pub use source_tree::LocalSourceEntry;
