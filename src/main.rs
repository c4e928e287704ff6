use std::io;

use clap::Parser;

use bikeshare_explorer::config::BikeshareArgs;
use bikeshare_explorer::data::loader::DatasetStore;
use bikeshare_explorer::prompt::Prompter;
use bikeshare_explorer::report::Reporter;
use bikeshare_explorer::session::Session;

fn main() {
    env_logger::init();
    let args = BikeshareArgs::parse();

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut session = Session::new(
        DatasetStore::new(&args.data_dir),
        Prompter::new(stdin.lock(), stdout.lock()),
        Reporter::new(!args.no_timing),
    );

    match session.run() {
        Ok(()) => log::info!("finished."),
        Err(e) => {
            log::error!("failed running bikeshare-explorer: {e:#}");
            eprintln!("error: {e:#}");
            std::process::exit(1);
        }
    }
}
