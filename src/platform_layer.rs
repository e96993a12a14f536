/*
 * This module is the platform layer of the launcher. It runs lifecycle
 * instances, executes their commands against the console, the import worker,
 * and the engine process, and feeds the results back as events.
 */
pub mod app;
pub mod engine;
pub mod error;
pub mod folder_picker;
pub mod surface;
pub mod types;

pub use app::PlatformInterface;
pub use engine::ProcessEngine;
pub use folder_picker::ConsoleFolderPicker;
pub use surface::ConsoleSurface;
pub use types::{
    AppEvent, ExitDisposition, LifecycleEventHandler, LifecycleFactory, LifecycleKind,
    MessageSeverity, PlatformCommand,
};
