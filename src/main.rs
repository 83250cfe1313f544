use clap::Parser;
use freetype_pixmap::cli::Cli;
use freetype_pixmap::run;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        log::error!("Application error: {}", e);
        std::process::exit(1);
    }
}
