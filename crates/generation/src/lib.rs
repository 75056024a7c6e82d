//! Client for the external AI image-edit provider.

pub mod api;

pub use api::{EditedImage, ImageEditApi, ImageEditApiError};
