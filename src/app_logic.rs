/*
 * This module provides the application logic layer: the bootstrap and import
 * lifecycles that turn platform events into platform commands, and
 * `LauncherLogic`, which creates fresh lifecycle instances on request.
 * Unit tests for both lifecycles are in `handler_tests.rs`.
 */
pub mod bootstrap_handler;
pub mod handler;
pub mod import_handler;
pub mod ui_constants;


pub use handler::LauncherLogic;
