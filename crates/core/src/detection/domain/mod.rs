pub mod color_heuristic;
pub mod confidence_jitter;
pub mod crop_planner;
pub mod face_estimator;
pub mod landmark_synthesizer;
