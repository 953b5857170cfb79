pub mod bus;
pub mod config;
pub mod logging;
pub mod server;

use std::process::ExitCode;

fn main() -> ExitCode {
    server::main::server_main()
}
