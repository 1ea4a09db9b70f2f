// [libs/shared/heimdall/src/lib.rs]
/*!
 * =================================================================
 * APARATO: TELEMETRY BOOTSTRAP (ESTRATO L4/L6)
 * RESPONSABILIDAD: TRAZADO ESTRUCTURADO Y CAPTURA DE PÁNICOS
 *
 * Development builds get a compact, human-readable subscriber;
 * release builds emit flattened JSON suitable for log aggregation.
 * A panic hook logs the location and payload through the same
 * subscriber before the default hook runs, so a panic on a spawned
 * analysis-job task is never silently swallowed.
 * =================================================================
 */

use std::panic;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt as formatting_layer, EnvFilter};

/// Initializes the global tracing subscriber for `service_name`.
///
/// Panics if a global subscriber has already been installed.
pub fn init_tracing(service_name: &str) {
    let environmental_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "{service_name}={level},tower_http=warn,hyper=warn,libsql=warn",
            level = if cfg!(debug_assertions) { "debug" } else { "info" }
        )
        .into()
    });

    if cfg!(debug_assertions) {
        tracing_subscriber::registry()
            .with(environmental_filter)
            .with(formatting_layer::layer().compact().with_target(false))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(environmental_filter)
            .with(formatting_layer::layer().json().flatten_event(true))
            .init();
    }

    let service_name_owned = service_name.to_string();
    panic::set_hook(Box::new(move |panic_info| {
        let location = panic_info
            .location()
            .map(|l| format!("{}:{}:{}", l.file(), l.line(), l.column()))
            .unwrap_or_else(|| "unknown".to_string());

        let payload = panic_info
            .payload()
            .downcast_ref::<&str>()
            .copied()
            .or_else(|| panic_info.payload().downcast_ref::<String>().map(String::as_str))
            .unwrap_or("<non-string panic payload>");

        tracing::error!(
            service = %service_name_owned,
            %location,
            %payload,
            "panic captured before unwind"
        );
    }));
}
