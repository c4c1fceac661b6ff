pub mod args;
pub mod colors;
pub mod display;
pub mod importer;

// Re-export commonly used items
pub use args::{Args, Command, ImagesArgs, TracklistsArgs};
pub use importer::{
    ImageRun, ImportSummary, TracklistRun, import_images, import_tracklists, select_targets,
    tracklist_targets,
};
