//! Logging setup: `env_logger`, gated by `-v`/`RUST_LOG`. `-v` raises the default filter
//! one step per repetition; `RUST_LOG` always takes precedence if set.

pub fn init(verbosity: u8) {
    let default_level = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp_millis()
        .init();
}
