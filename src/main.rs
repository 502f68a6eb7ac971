//! 容量受限排產 DP 命令列工具
//!
//! 用法: `lotdp [--config <path>] [--tables] [--parallel] [--json] [--verbose]`

use std::process::ExitCode;

use anyhow::Result;
use lotdp::cli::{self, CliArgs};
use lotdp::logging;

fn main() -> Result<ExitCode> {
    let args = CliArgs::parse(std::env::args().skip(1))?;
    logging::init(args.verbose);

    let outcome = cli::run(&args, &mut std::io::stdout().lock())?;
    Ok(outcome.exit_code())
}
