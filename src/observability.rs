//! This module provides observability and diagnostics for the codec.
//!
//! The `log_metric!` macro emits structured key/value records through the `log`
//! facade. It is compiled out of release builds entirely, so per-frame metrics
//! cost nothing in production.

use log::LevelFilter;
use std::sync::Once;

/// Logs a structured key-value metric at debug level, only in debug builds.
///
/// # Example
/// ```
/// use zdepth::log_metric;
/// let blocks = 4800;
/// log_metric!("event"="encode_frame", "blocks"=&blocks);
/// ```
#[macro_export]
macro_rules! log_metric {
    ($($key:literal = $value:expr),+ $(,)?) => {
        #[cfg(debug_assertions)]
        {
            let mut parts = Vec::new();
            $(
                parts.push(format!("\"{}\": \"{}\"", $key, $value));
            )+
            log::debug!(target: "zdepth::metric", "ZDEPTH_METRIC: {{ {} }}", parts.join(", "));
        }
    };
}

static INIT_LOGGER: Once = Once::new();

/// Installs an `env_logger` backend at `level`. Later calls are no-ops, and an
/// already-installed logger from the host application is left alone.
pub fn enable_verbose_logging(level: LevelFilter) {
    INIT_LOGGER.call_once(|| {
        let mut builder = env_logger::Builder::new();
        builder.is_test(false);
        builder.filter_level(level);

        // Custom formatter: just print the level and message
        builder.format(|buf, record| {
            use std::io::Write;
            writeln!(buf, "[{}] {}", record.level(), record.args())
        });

        let _ = builder.try_init();
    });
}
