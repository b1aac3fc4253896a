// System Layer
pub mod dir_size;
pub mod filesystem;

pub use dir_size::{DirSizeCalculator, DirSizeEvent};
pub use filesystem::FileSystem;
