//! # Fiado Terminal Entry Point
//!
//! ```text
//! $ fiado                 shell (asks for the PIN)
//! $ fiado <subcommand>    one command, PIN from --pin / FIADO_ACCESS_PIN
//! ```
//!
//! Startup lives in `lib.rs` so it can be tested without a terminal.

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    fiado_cli::run().await
}
