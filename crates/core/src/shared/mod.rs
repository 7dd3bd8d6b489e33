pub mod constants;
pub mod crop_region;
pub mod detection_result;
pub mod frame;
pub mod landmark;
