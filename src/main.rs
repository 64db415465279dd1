use clap::{App, AppSettings};
use std::error::Error;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let matches = App::new("tallycoin")
        .about("TallyCoin single-node ledger simulator CLI tools.")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .subcommand(tallycoin_lib::commands::simulate_command())
        .subcommand(tallycoin_lib::commands::demo_command())
        .get_matches();

    if let Some(ref matches) = matches.subcommand_matches("simulate") {
        tallycoin_lib::commands::run_simulate_command(&matches)
    } else if let Some(ref matches) = matches.subcommand_matches("demo") {
        tallycoin_lib::commands::run_demo_command(&matches)
    } else {
        panic!("Should report help.");
    }
}
