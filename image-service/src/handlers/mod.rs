pub mod health;
pub mod images;
pub mod metrics;

pub use health::{health_check, readiness_check};
pub use images::{get_image, upload_image};
pub use self::metrics::metrics_endpoint;
