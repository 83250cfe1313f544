pub mod cli;
pub mod commands;
pub mod config;
pub mod constants;
pub mod freetype;
pub mod pixmap;
pub mod raster;

#[cfg(feature = "native")]
pub fn run(cli: cli::Cli) -> Result<(), Box<dyn std::error::Error>> {
    use crate::cli::Command;
    use crate::freetype::Library;

    let config = config::Config::load();
    let library = Library::init()?;
    let mut stdout = std::io::stdout().lock();

    match cli.command {
        Command::Render(args) => {
            let data = std::fs::read(&args.font)?;
            log::info!("Loaded {} ({} bytes)", args.font.display(), data.len());
            commands::render(&library, &data, &args, &config, &mut stdout)?;
        }
        Command::Info(args) => {
            let data = std::fs::read(&args.font)?;
            commands::info(&library, &data, &args, &config, &mut stdout)?;
        }
    }

    library.dispose();
    Ok(())
}
