use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// ログ出力を初期化する
///
/// `RUST_LOG` があればそれに従う。なければ `--verbose` で debug、通常は warn。
/// 表示（表・件数）は stdout、ログは stderr に出す。
pub fn init_logger(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter_layer = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), default_level)));

    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(verbose)
                .without_time(),
        )
        .with(filter_layer)
        .try_init();
}
