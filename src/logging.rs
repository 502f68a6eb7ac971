//! 日誌初始化
//!
//! 日誌一律寫到 stderr，stdout 只留給表格與計劃輸出。

use tracing_subscriber::{fmt, EnvFilter};

/// 本工具各 crate 的日誌 target
const CRATE_TARGETS: [&str; 3] = ["lotdp", "lotdp_calc", "lotdp_core"];

/// 未設定 `RUST_LOG` 時的過濾規則
///
/// `verbose` 時本工具各 crate 輸出 debug（每階段的可行狀態統計），
/// 其他依賴維持 warn。
pub fn default_filter(verbose: bool) -> String {
    if !verbose {
        return "warn,lotdp=info,lotdp_calc=info".to_string();
    }

    std::iter::once("warn".to_string())
        .chain(CRATE_TARGETS.iter().map(|target| format!("{}=debug", target)))
        .collect::<Vec<_>>()
        .join(",")
}

/// 初始化日誌
///
/// `RUST_LOG` 有設定時優先，例如 `RUST_LOG=lotdp_calc=trace` 可看到無可行決策的狀態。
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    fmt()
        .with_env_filter(filter)
        .with_target(verbose)
        .with_writer(std::io::stderr)
        .init();
}

/// 測試用日誌，可重複呼叫
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new(default_filter(true)))
        .with_test_writer()
        .try_init();
}
