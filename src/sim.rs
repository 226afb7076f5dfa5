//! Simulator to evaluate performance of the (7,4) Hamming code over a noisy channel
//!
//! Each word carries 4 random data bits, is encoded, sent over the channel, hard-decided, and
//! decoded. Words hit by two or more channel flips are tallied separately from words hit by
//! exactly one flip, since only the latter are guaranteed to be corrected.

use std::fmt;
use std::fs::File;
use std::io::BufWriter;

use rand::Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::channel::{self, check_flip_prob};
use crate::{decode, encode, Codeword, DataWord, Error, DATA_LEN};

/// Enumeration of channel models
#[derive(Clone, PartialEq, Debug, Copy, Deserialize, Serialize)]
pub enum Channel {
    /// Binary symmetric channel with given bit flip probability
    Bsc {
        /// Probability with which each code bit is flipped
        flip_prob: f64,
    },
    /// BPSK-AWGN channel followed by a hard-decision slicer
    BpskAwgn {
        /// Ratio (dB) of symbol energy to noise power spectral density
        es_over_n0_db: f64,
    },
}

impl Channel {
    /// Checks validity of channel parameter.
    fn check(&self) -> Result<(), Error> {
        match *self {
            Channel::Bsc { flip_prob } => check_flip_prob(flip_prob),
            Channel::BpskAwgn { es_over_n0_db } => {
                if es_over_n0_db.is_finite() {
                    Ok(())
                } else {
                    Err(Error::InvalidInput(format!(
                        "Es/N0 (dB) must be finite (found {es_over_n0_db})"
                    )))
                }
            }
        }
    }

    /// Returns hard decisions on code bits at channel output.
    fn transmit<R: Rng>(&self, code: &Codeword, rng: &mut R) -> Result<Codeword, Error> {
        let bits_hat = match *self {
            Channel::Bsc { flip_prob } => channel::bsc(&code.bits(), flip_prob, rng)?,
            Channel::BpskAwgn { es_over_n0_db } => channel::hard_decisions(
                &channel::bpsk_awgn_channel(&code.bits(), es_over_n0_db, rng),
            ),
        };
        Codeword::try_from(bits_hat.as_slice())
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::Bsc { flip_prob } => write!(f, "BSC, flip probability {flip_prob}"),
            Channel::BpskAwgn { es_over_n0_db } => write!(f, "BPSK-AWGN, Es/N0 {es_over_n0_db} dB"),
        }
    }
}

/// Parameters for Hamming code simulation
#[derive(Clone, PartialEq, Debug, Copy, Deserialize, Serialize)]
pub struct SimParams {
    /// Channel over which codewords are sent
    pub channel: Channel,
    /// Desired minimum number of word errors
    pub num_word_errors_min: u32,
    /// Number of words to be transmitted per run
    pub num_words_per_run: u32,
    /// Minimum number of runs of words to be simulated
    pub num_runs_min: u32,
    /// Maximum number of runs of words to be simulated
    pub num_runs_max: u32,
}

/// Results from Hamming code simulation
#[derive(Clone, PartialEq, Debug, Copy, Deserialize, Serialize)]
pub struct SimResults {
    /// Simulation parameters
    pub params: SimParams,
    /// Number of runs simulated
    pub num_runs: u32,
    /// Number of words transmitted
    pub num_words: u64,
    /// Number of words with at least one data bit in error after decoding
    pub num_word_errors: u64,
    /// Number of data bits in error after decoding
    pub num_bit_errors: u64,
    /// Number of words with exactly one bit flipped by the channel
    pub num_words_single_flip: u64,
    /// Number of words with two or more bits flipped by the channel (no correction guarantee)
    pub num_words_multi_flip: u64,
    /// Number of single-flip words in which the decoder flipped a bit
    pub num_corrections: u64,
    /// Number of multi-flip words in which the decoder flipped a bit (never a true correction)
    pub num_miscorrections: u64,
}

impl SimResults {
    /// Returns initialized simulation results.
    fn new(params: &SimParams) -> Self {
        Self {
            params: *params,
            num_runs: 0,
            num_words: 0,
            num_word_errors: 0,
            num_bit_errors: 0,
            num_words_single_flip: 0,
            num_words_multi_flip: 0,
            num_corrections: 0,
            num_miscorrections: 0,
        }
    }

    /// Returns number of data bits transmitted.
    #[must_use]
    pub fn num_bits(&self) -> u64 {
        self.num_words * DATA_LEN as u64
    }

    /// Returns bit error rate after decoding.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn ber(&self) -> f64 {
        if self.num_words == 0 {
            0.0
        } else {
            self.num_bit_errors as f64 / self.num_bits() as f64
        }
    }

    /// Returns word error rate after decoding.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn wer(&self) -> f64 {
        if self.num_words == 0 {
            0.0
        } else {
            self.num_word_errors as f64 / self.num_words as f64
        }
    }

    /// Returns `true` iff no more runs are needed.
    fn run_complete(&self) -> bool {
        self.num_runs >= self.params.num_runs_max
            || (self.num_runs >= self.params.num_runs_min
                && self.num_word_errors >= u64::from(self.params.num_word_errors_min))
    }

    /// Updates results with outcome of a word.
    fn update_after_word(&mut self, outcome: &WordOutcome) {
        self.num_words += 1;
        self.num_bit_errors += outcome.num_bit_errors as u64;
        if outcome.num_bit_errors > 0 {
            self.num_word_errors += 1;
        }
        match (outcome.num_channel_flips, outcome.corrected) {
            (0, _) => {}
            (1, corrected) => {
                self.num_words_single_flip += 1;
                self.num_corrections += u64::from(corrected);
            }
            (_, corrected) => {
                self.num_words_multi_flip += 1;
                self.num_miscorrections += u64::from(corrected);
            }
        }
    }
}

/// Outcome of sending a single word over the channel
#[derive(Clone, Eq, PartialEq, Debug, Copy)]
struct WordOutcome {
    /// Number of code bits flipped by the channel
    num_channel_flips: usize,
    /// Number of data bits in error after decoding
    num_bit_errors: usize,
    /// Whether the decoder flipped a bit
    corrected: bool,
}

/// Runs simulations of the Hamming code and saves results to a JSON file.
///
/// # Parameters
///
/// - `all_params`: Parameters for each simulation scenario of interest.
///
/// - `json_filename`: Name of the JSON file to which all simulation results must be written.
///
/// # Errors
///
/// Returns an error if any parameter set is invalid (zero words per run, minimum number of runs
/// exceeding maximum number of runs, or channel parameter out of range), or if the results cannot
/// be written to the JSON file.
///
/// # Examples
///
/// ```no_run
/// use hamming74::sim::{self, Channel, SimParams};
///
/// let params = SimParams {
///     channel: Channel::Bsc { flip_prob: 0.05 },
///     num_word_errors_min: 100,
///     num_words_per_run: 1000,
///     num_runs_min: 1,
///     num_runs_max: 10,
/// };
/// sim::run_sims(&[params], "results.json")?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn run_sims(all_params: &[SimParams], json_filename: &str) -> Result<(), Error> {
    all_params.iter().try_for_each(check_sim_params)?;
    let mut all_results = Vec::with_capacity(all_params.len());
    for params in all_params {
        let results = run_sim(params)?;
        info!(
            "{}: {} words, BER = {:.3e}, WER = {:.3e}, {} words with 2+ channel flips \
            ({} miscorrected)",
            params.channel,
            results.num_words,
            results.ber(),
            results.wer(),
            results.num_words_multi_flip,
            results.num_miscorrections
        );
        all_results.push(results);
    }
    save_all_results(&all_results, json_filename)
}

/// Returns results from a single simulation scenario.
fn run_sim(params: &SimParams) -> Result<SimResults, Error> {
    check_sim_params(params)?;
    let mut results = SimResults::new(params);
    while !results.run_complete() {
        let outcomes: Vec<WordOutcome> = (0 .. params.num_words_per_run)
            .into_par_iter()
            .map_init(rand::rng, |rng, _| simulate_word(&params.channel, rng))
            .collect::<Result<_, _>>()?;
        for outcome in &outcomes {
            results.update_after_word(outcome);
        }
        results.num_runs += 1;
        debug!(
            "Run {}: {} word errors in {} words",
            results.num_runs, results.num_word_errors, results.num_words
        );
    }
    Ok(results)
}

/// Returns outcome of sending one random word over the channel.
fn simulate_word<R: Rng>(channel: &Channel, rng: &mut R) -> Result<WordOutcome, Error> {
    let data = DataWord::try_from(channel::random_bits(DATA_LEN, rng).as_slice())?;
    let code = encode(data);
    let received = channel.transmit(&code, rng)?;
    let decoded = decode(received);
    Ok(WordOutcome {
        num_channel_flips: channel::count_flips(&received.bits(), &code.bits()),
        num_bit_errors: channel::count_flips(&decoded.data.bits(), &data.bits()),
        corrected: decoded.code != received,
    })
}

/// Checks validity of simulation parameters.
fn check_sim_params(params: &SimParams) -> Result<(), Error> {
    if params.num_words_per_run == 0 {
        return Err(Error::InvalidInput(
            "Number of words per run cannot be zero".to_string(),
        ));
    }
    if params.num_runs_min > params.num_runs_max {
        return Err(Error::InvalidInput(format!(
            "Minimum number of runs ({}) exceeds maximum number of runs ({})",
            params.num_runs_min, params.num_runs_max
        )));
    }
    params.channel.check()
}

/// Saves all simulation results to a JSON file.
fn save_all_results(all_results: &[SimResults], json_filename: &str) -> Result<(), Error> {
    let writer = BufWriter::new(File::create(json_filename)?);
    serde_json::to_writer_pretty(writer, all_results)?;
    Ok(())
}

#[cfg(test)]
mod tests_of_functions {
    use float_eq::assert_float_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn bsc_params(flip_prob: f64) -> SimParams {
        SimParams {
            channel: Channel::Bsc { flip_prob },
            num_word_errors_min: 10,
            num_words_per_run: 100,
            num_runs_min: 1,
            num_runs_max: 2,
        }
    }

    #[test]
    fn test_check_sim_params() {
        // Invalid input
        let params = SimParams {
            num_words_per_run: 0,
            ..bsc_params(0.1)
        };
        assert!(check_sim_params(&params).is_err());
        let params = SimParams {
            num_runs_min: 3,
            num_runs_max: 2,
            ..bsc_params(0.1)
        };
        assert!(check_sim_params(&params).is_err());
        assert!(check_sim_params(&bsc_params(-0.1)).is_err());
        assert!(check_sim_params(&bsc_params(1.1)).is_err());
        let params = SimParams {
            channel: Channel::BpskAwgn {
                es_over_n0_db: f64::INFINITY,
            },
            ..bsc_params(0.1)
        };
        assert!(check_sim_params(&params).is_err());
        // Valid input
        assert!(check_sim_params(&bsc_params(0.1)).is_ok());
        let params = SimParams {
            channel: Channel::BpskAwgn {
                es_over_n0_db: -3.0,
            },
            ..bsc_params(0.1)
        };
        assert!(check_sim_params(&params).is_ok());
    }

    #[test]
    fn test_simulate_word() {
        let mut rng = StdRng::seed_from_u64(17);
        for _ in 0 .. 50 {
            let outcome = simulate_word(&Channel::Bsc { flip_prob: 0.0 }, &mut rng).unwrap();
            assert_eq!(
                outcome,
                WordOutcome {
                    num_channel_flips: 0,
                    num_bit_errors: 0,
                    corrected: false
                }
            );
            // Complement of a codeword is a codeword, so nothing is detected
            let outcome = simulate_word(&Channel::Bsc { flip_prob: 1.0 }, &mut rng).unwrap();
            assert_eq!(
                outcome,
                WordOutcome {
                    num_channel_flips: 7,
                    num_bit_errors: 4,
                    corrected: false
                }
            );
        }
    }

    #[test]
    fn test_update_after_word() {
        let mut results = SimResults::new(&bsc_params(0.1));
        results.update_after_word(&WordOutcome {
            num_channel_flips: 1,
            num_bit_errors: 0,
            corrected: true,
        });
        results.update_after_word(&WordOutcome {
            num_channel_flips: 2,
            num_bit_errors: 1,
            corrected: true,
        });
        results.update_after_word(&WordOutcome {
            num_channel_flips: 0,
            num_bit_errors: 0,
            corrected: false,
        });
        assert_eq!(results.num_words, 3);
        assert_eq!(results.num_word_errors, 1);
        assert_eq!(results.num_bit_errors, 1);
        assert_eq!(results.num_words_single_flip, 1);
        assert_eq!(results.num_words_multi_flip, 1);
        assert_eq!(results.num_corrections, 1);
        assert_eq!(results.num_miscorrections, 1);
        assert_float_eq!(results.ber(), 1.0 / 12.0, abs <= 1e-12);
        assert_float_eq!(results.wer(), 1.0 / 3.0, abs <= 1e-12);
    }

    #[test]
    fn test_run_complete() {
        let mut results = SimResults::new(&bsc_params(0.1));
        assert!(!results.run_complete());
        results.num_runs = 1;
        assert!(!results.run_complete());
        results.num_word_errors = 10;
        assert!(results.run_complete());
        results.num_word_errors = 0;
        results.num_runs = 2;
        assert!(results.run_complete());
    }

    #[test]
    fn test_run_sim() {
        // Invalid input
        assert!(run_sim(&bsc_params(2.0)).is_err());
        // Noiseless channel
        let results = run_sim(&bsc_params(0.0)).unwrap();
        assert_eq!(results.num_runs, 2);
        assert_eq!(results.num_words, 200);
        assert_eq!(results.num_bits(), 800);
        assert_eq!(results.num_word_errors, 0);
        assert_eq!(results.num_corrections, 0);
        assert_eq!(results.num_miscorrections, 0);
        assert_float_eq!(results.ber(), 0.0, abs <= 1e-12);
        // Every bit flipped
        let results = run_sim(&bsc_params(1.0)).unwrap();
        assert_eq!(results.num_runs, 1);
        assert_eq!(results.num_words_multi_flip, 100);
        assert_eq!(results.num_corrections + results.num_miscorrections, 0);
        // Noisy channel: every word is corrected, miscorrected, or left untouched
        let params = SimParams {
            num_words_per_run: 2000,
            ..bsc_params(0.3)
        };
        let results = run_sim(&params).unwrap();
        assert_eq!(results.num_corrections, results.num_words_single_flip);
        assert!(results.num_miscorrections > 0);
        assert!(results.num_miscorrections <= results.num_words_multi_flip);
        assert!(results.num_corrections + results.num_miscorrections < results.num_words);
        assert_float_eq!(results.ber(), 1.0, abs <= 1e-12);
        assert_float_eq!(results.wer(), 1.0, abs <= 1e-12);
        // High-SNR BPSK-AWGN channel
        let params = SimParams {
            channel: Channel::BpskAwgn {
                es_over_n0_db: 30.0,
            },
            ..bsc_params(0.0)
        };
        let results = run_sim(&params).unwrap();
        assert_eq!(results.num_word_errors, 0);
        assert_eq!(results.num_words_single_flip + results.num_words_multi_flip, 0);
    }

    #[test]
    fn test_run_sims() {
        let json_path = std::env::temp_dir().join("hamming74_test_run_sims.json");
        let json_filename = json_path.to_str().unwrap();
        let all_params = [bsc_params(0.0), bsc_params(0.05)];
        run_sims(&all_params, json_filename).unwrap();
        let contents = std::fs::read_to_string(&json_path).unwrap();
        let all_results: Vec<SimResults> = serde_json::from_str(&contents).unwrap();
        assert_eq!(all_results.len(), 2);
        assert_eq!(all_results[0].params, all_params[0]);
        assert_eq!(all_results[1].params, all_params[1]);
        std::fs::remove_file(&json_path).unwrap();
    }

    #[test]
    fn test_run_sims_invalid_last_params() {
        let json_path = std::env::temp_dir().join("hamming74_test_run_sims_invalid.json");
        let json_filename = json_path.to_str().unwrap();
        let _ = std::fs::remove_file(&json_path);
        // Valid sets are large enough that running them would be noticeably slow
        let slow_params = SimParams {
            num_words_per_run: 1_000_000,
            num_runs_min: 10,
            num_runs_max: 10,
            ..bsc_params(0.0)
        };
        let all_params = [slow_params, slow_params, bsc_params(1.02)];
        let timer = std::time::Instant::now();
        assert!(matches!(
            run_sims(&all_params, json_filename),
            Err(Error::InvalidInput(_))
        ));
        assert!(timer.elapsed() < std::time::Duration::from_secs(1));
        assert!(!json_path.exists());
    }
}
