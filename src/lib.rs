pub mod codec;
pub mod config;
pub mod controller;
pub mod error;
pub mod input;
pub mod listing;
pub mod navigation;
pub mod pipeline;
pub mod screen;
pub mod session;
pub mod settings;
pub mod storage;
pub mod timer;
pub mod render {
    pub mod console;
    pub mod frame;
    pub mod surface;
    pub mod task;
}

pub use config::GalleryConfig;
pub use screen::GalleryScreen;
