//! LuzhanqiVision — image core for the referee pipeline: frame capture,
//! centered square crop, and fixed-size normalization.

pub mod capture;
pub mod encode;
pub mod normalize;
pub mod types;

pub use capture::{frame_from_base64, frame_from_file};
pub use encode::{to_base64_jpeg, to_data_url, to_jpeg};
pub use normalize::{crop_to_square, normalize, resize_to_fit};
pub use types::*;
