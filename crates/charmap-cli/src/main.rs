mod cli;
mod decode_cmd;
mod encode_cmd;
mod load_cmd;
mod menu_cmd;
mod shared;

use clap::Parser;
use cli::Cli;

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        cli::Commands::Load {
            ref map,
            ref format,
            strict,
            max_index,
        } => load_cmd::run(map, format, strict, max_index),
        cli::Commands::Encode {
            ref map,
            ref input,
            ref output,
            ref format,
            strict,
            max_index,
        } => encode_cmd::run(map, input, output, format, strict, max_index),
        cli::Commands::Decode {
            ref map,
            ref input,
            ref output,
            ref format,
            strict,
            max_index,
        } => decode_cmd::run(map, input, output, format, strict, max_index),
        cli::Commands::Menu { strict, max_index } => menu_cmd::run(strict, max_index),
    };

    if let Err(code) = result {
        log::debug!("exiting with status {code}");
        std::process::exit(code);
    }
}
