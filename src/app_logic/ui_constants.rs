/*
 * Defines the user-facing strings the lifecycle handlers put into platform
 * commands. Keeping them here lets the tests assert on exact commands without
 * repeating literals.
 */

pub const FOLDER_PICKER_TITLE: &str = "Select the folder containing your Fallout game files";

pub const PROGRESS_TITLE: &str = "Loading";

pub const PROGRESS_MESSAGE: &str = "Copying game files, please wait...";

pub const IMPORT_CANCELLED_MESSAGE: &str = "No folder selected. Start the launcher again to import the game files.";
