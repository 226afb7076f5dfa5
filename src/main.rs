//! This crate simulates the BER and WER performance of the (7,4) Hamming code over a binary
//! symmetric channel or a hard-decision BPSK-AWGN channel. Simulation parameters are specified on
//! the command line, and simulation results are saved to a JSON file.
//!
//! Given a data word with `-w`, it instead traces a single word through the encoder, an optional
//! single-bit flip (`-k`), and the decoder.
//!
//! Build the executable with `cargo build --release` and then run `./target/release/hamming74 -h`
//! for help on the command-line interface. Set `RUST_LOG` to adjust the log level.

#![warn(
    clippy::complexity,
    clippy::pedantic,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unused_allocation,
    unused_import_braces,
    unused_qualifications
)]

use anyhow::Result;
use clap::parser::ValueSource;
use clap::{crate_name, crate_version, value_parser, Arg, ArgMatches, Command};
use hamming74::sim::{self, Channel};
use hamming74::{decode, encode, DataWord};
use std::time::Instant;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Main function
fn main() -> Result<()> {
    init_logging();
    let timer = Instant::now();
    let matches = command_line_parser().get_matches();
    if let Some(&data) = matches.get_one::<DataWord>("data_word") {
        trace_word(data, matches.get_one::<u8>("flip_position").copied())?;
    } else {
        let json_filename = &json_filename_from_matches(&matches);
        sim::run_sims(&all_sim_params(&matches), json_filename)?;
        info!("Results saved to {json_filename}");
    }
    info!("Elapsed time: {:.3?}", timer.elapsed());
    Ok(())
}

/// Installs log subscriber writing to standard error, filtered by `RUST_LOG` (default `info`).
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Encodes a data word, flips at most one code bit, decodes, and prints each step.
fn trace_word(data: DataWord, flip_position: Option<u8>) -> Result<()> {
    let code = encode(data);
    println!("data: {data}, encoded: {code}");
    let received = match flip_position {
        Some(position) => code.with_flipped_bit(usize::from(position))?,
        None => code,
    };
    println!("received: {received}");
    let decoded = decode(received);
    println!("decoded data: {}", decoded.data);
    println!("corrected code: {}", decoded.code);
    println!("error position (1-indexed): {}", decoded.error_position);
    Ok(())
}

/// Returns command line parser.
fn command_line_parser() -> Command {
    Command::new(crate_name!())
        .version(crate_version!())
        .about("Evaluates the performance of the (7,4) Hamming code over a noisy channel")
        .arg(channel_name())
        .arg(first_channel_param())
        .arg(channel_param_step())
        .arg(num_channel_params())
        .arg(num_word_errors_min())
        .arg(num_words_per_run())
        .arg(num_runs_min())
        .arg(num_runs_max())
        .arg(json_filename())
        .arg(data_word())
        .arg(flip_position())
}

/// Returns argument for channel name.
fn channel_name() -> Arg {
    Arg::new("channel_name")
        .short('c')
        .value_parser(["BSC", "BPSK-AWGN"])
        .default_value("BSC")
        .help("Channel name")
}

/// Returns argument for first channel parameter.
fn first_channel_param() -> Arg {
    Arg::new("first_channel_param")
        .short('r')
        .value_parser(value_parser!(f64))
        .allow_negative_numbers(true)
        .default_value("0.01")
        .help("First channel parameter (flip probability for BSC, Es/N0 in dB for BPSK-AWGN)")
}

/// Returns argument for channel parameter step.
fn channel_param_step() -> Arg {
    Arg::new("channel_param_step")
        .short('p')
        .value_parser(value_parser!(f64))
        .allow_negative_numbers(true)
        .default_value("0.01")
        .help("Channel parameter step")
}

/// Returns argument for number of channel parameter values.
fn num_channel_params() -> Arg {
    Arg::new("num_channel_params")
        .short('s')
        .value_parser(value_parser!(u32))
        .default_value("4")
        .help("Number of channel parameter values")
}

/// Returns argument for desired minimum number of word errors.
fn num_word_errors_min() -> Arg {
    Arg::new("num_word_errors_min")
        .short('e')
        .value_parser(value_parser!(u32))
        .default_value("500")
        .help("Desired minimum number of word errors")
}

/// Returns argument for number of words to be transmitted per run.
fn num_words_per_run() -> Arg {
    Arg::new("num_words_per_run")
        .short('b')
        .value_parser(value_parser!(u32))
        .default_value("10000")
        .help("Number of words to be transmitted per run")
}

/// Returns argument for minimum number of runs of words to be simulated.
fn num_runs_min() -> Arg {
    Arg::new("num_runs_min")
        .short('n')
        .value_parser(value_parser!(u32))
        .default_value("10")
        .help("Minimum number of runs of words to be simulated")
}

/// Returns argument for maximum number of runs of words to be simulated.
fn num_runs_max() -> Arg {
    Arg::new("num_runs_max")
        .short('x')
        .value_parser(value_parser!(u32))
        .default_value("100")
        .help("Maximum number of runs of words to be simulated")
}

/// Returns argument for name of JSON file to which results must be saved.
fn json_filename() -> Arg {
    Arg::new("json_filename")
        .short('f')
        .default_value("results.json")
        .help("Name of JSON file to which results must be saved")
}

/// Returns argument for data word to be traced through the codec.
fn data_word() -> Arg {
    Arg::new("data_word")
        .short('w')
        .value_parser(|s: &str| s.parse::<DataWord>())
        .help("Data word of 4 binary digits to trace through the codec (skips simulation)")
}

/// Returns argument for position of code bit to be flipped when tracing a data word.
fn flip_position() -> Arg {
    Arg::new("flip_position")
        .short('k')
        .value_parser(value_parser!(u8).range(1 ..= 7))
        .requires("data_word")
        .help("Position (1 to 7) of code bit to flip when tracing a data word")
}

/// Returns simulation parameters based on command-line arguments.
fn all_sim_params(matches: &ArgMatches) -> Vec<sim::SimParams> {
    let mut num_runs_min = num_runs_min_from_matches(matches);
    let mut num_runs_max = num_runs_max_from_matches(matches);
    if num_runs_min > num_runs_max {
        if let Some(ValueSource::DefaultValue) = matches.value_source("num_runs_min") {
            num_runs_min = num_runs_max;
        }
        if let Some(ValueSource::DefaultValue) = matches.value_source("num_runs_max") {
            num_runs_max = num_runs_min;
        }
    }
    all_channels_from_matches(matches)
        .into_iter()
        .map(|channel| sim::SimParams {
            channel,
            num_word_errors_min: num_word_errors_min_from_matches(matches),
            num_words_per_run: num_words_per_run_from_matches(matches),
            num_runs_min,
            num_runs_max,
        })
        .collect()
}

// OK to unwrap in the functions below: All simulation arguments have default values.

/// Returns all channels.
fn all_channels_from_matches(matches: &ArgMatches) -> Vec<Channel> {
    let first_param: f64 = *matches.get_one("first_channel_param").unwrap();
    let param_step: f64 = *matches.get_one("channel_param_step").unwrap();
    let num_params: u32 = *matches.get_one("num_channel_params").unwrap();
    let is_bsc = matches.get_one::<String>("channel_name").unwrap() == "BSC";
    (0 .. num_params)
        .map(|n| first_param + param_step * f64::from(n))
        .map(|param| {
            if is_bsc {
                Channel::Bsc { flip_prob: param }
            } else {
                Channel::BpskAwgn {
                    es_over_n0_db: param,
                }
            }
        })
        .collect()
}

/// Returns desired minimum number of word errors.
fn num_word_errors_min_from_matches(matches: &ArgMatches) -> u32 {
    *matches.get_one("num_word_errors_min").unwrap()
}

/// Returns number of words to be transmitted per run.
fn num_words_per_run_from_matches(matches: &ArgMatches) -> u32 {
    *matches.get_one("num_words_per_run").unwrap()
}

/// Returns minimum number of runs of words to be simulated.
fn num_runs_min_from_matches(matches: &ArgMatches) -> u32 {
    *matches.get_one("num_runs_min").unwrap()
}

/// Returns maximum number of runs of words to be simulated.
fn num_runs_max_from_matches(matches: &ArgMatches) -> u32 {
    *matches.get_one("num_runs_max").unwrap()
}

/// Returns name of JSON file to which simulation results must be saved.
fn json_filename_from_matches(matches: &ArgMatches) -> String {
    matches
        .get_one::<String>("json_filename")
        .unwrap()
        .to_string()
}
