pub mod logging;
pub mod metrics;
pub mod process;

pub use self::logging::init_tracing;
pub use self::metrics::{MetricsRegistry, PROMETHEUS_CONTENT_TYPE};
pub use self::process::ProcessCollector;
