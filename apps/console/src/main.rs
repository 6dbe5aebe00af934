//! # Warehub Console Entry Point
//!
//! ```text
//! warehub-console scan --subtract 1 --repeat   # pick items off a shelf
//! warehub-console lookup ALT-1
//! warehub-console adjust WHW-00001 --add 24
//! warehub-console create --name "Stretch Film" --barcode 5901234123457
//! warehub-console list --query tape
//! ```
//!
//! The setup lives in lib.rs so commands can be tested without a process.

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match warehub_console::run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
