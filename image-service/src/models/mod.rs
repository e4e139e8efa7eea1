pub mod image_name;

pub use image_name::{ImageName, ImageNameError};
