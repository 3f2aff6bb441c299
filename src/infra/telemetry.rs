use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Глобальный subscriber для процесса. `RUST_LOG` переопределяет уровень.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

static TEST_INIT: Once = Once::new();

/// Логи в тестах: идемпотентно, через test writer, без времени.
/// Уровень: `TEST_LOG`, затем `RUST_LOG`, по умолчанию `warn`.
pub fn init_test_tracing() {
    TEST_INIT.call_once(|| {
        let filter = std::env::var("TEST_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .map(EnvFilter::new)
            .unwrap_or_else(|_| EnvFilter::new("warn"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .without_time()
            .try_init()
            .ok();
    });
}
