pub mod local_estimator;
pub mod remote_estimator;
