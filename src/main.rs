use codebreaker::cli::{CliInterface, parse_cli};
use codebreaker::logging::{self, LogTarget};
use codebreaker::tui::TuiInterface;
use codebreaker::{ClueGenerator, game_loop};
use log::{error, info};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::io;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = parse_cli();

    // the terminal UI owns the screen, so its log lines go to a file
    let target = if cli.plain {
        cli.log_file.clone().map_or(LogTarget::Stderr, LogTarget::File)
    } else {
        cli.log_file
            .clone()
            .or_else(logging::default_log_path)
            .map_or(LogTarget::Stderr, LogTarget::File)
    };
    if let Err(e) = logging::init(&target, cli.verbose) {
        eprintln!("Failed to set up logging: {e}");
        return ExitCode::FAILURE;
    }

    let generator = ClueGenerator::new(cli.generator_config());
    let mut rng = match cli.seed {
        Some(seed) => {
            info!("using seed {seed}");
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_rng(&mut rand::rng()),
    };

    if cli.plain {
        let stdin = io::stdin();
        let mut interface = CliInterface::new(stdin.lock());
        game_loop(&generator, &mut rng, &mut interface);
        return ExitCode::SUCCESS;
    }

    match TuiInterface::new() {
        Ok(mut interface) => {
            game_loop(&generator, &mut rng, &mut interface);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("terminal UI failed to start: {e}");
            eprintln!("Failed to start the terminal UI: {e}. Try --plain.");
            ExitCode::FAILURE
        }
    }
}
