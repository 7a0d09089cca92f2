pub mod camera;
pub mod carousel;
pub mod gallery;
pub mod handlers;
pub mod progress;
pub mod results;
pub mod toast;
pub mod upload;
pub mod utils;
