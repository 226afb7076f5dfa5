//! # Channel models and helpers for simulating code performance
//!
//! The [`random_bits`] function returns a given number of random bits; the [`bsc`] function
//! passes bits through a binary symmetric channel; the [`bpsk_awgn_channel`] function sends bits as
//! BPSK symbols in Gaussian noise, and [`hard_decisions`] maps the received symbols back to bits;
//! [`count_flips`] counts the positions in which a received word differs from the one sent.
//!
//! # Examples
//!
//! ```
//! use hamming74::channel;
//!
//! let mut rng = rand::rng();
//! let bits = channel::random_bits(7, &mut rng);
//! let bits_hat = channel::bsc(&bits, 0.05, &mut rng)?;
//! let syms = channel::bpsk_awgn_channel(&bits, 10.0, &mut rng);
//! let bits_hat_awgn = channel::hard_decisions(&syms);
//! let num_flips = channel::count_flips::<7>(
//!     bits_hat_awgn.as_slice().try_into()?,
//!     bits.as_slice().try_into()?,
//! );
//! assert!(num_flips <= 7 && bits_hat.len() == 7);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use rand::Rng;
use rand_distr::StandardNormal;

use crate::{Bit, Error};

/// Returns given number of random bits.
///
/// # Parameters
///
/// - `num_bits`: Number of random bits to be generated.
///
/// - `rng`: Random number generator to be used.
pub fn random_bits<R: Rng>(num_bits: usize, rng: &mut R) -> Vec<Bit> {
    (0 .. num_bits).map(|_| Bit::from(rng.random_bool(0.5))).collect()
}

/// Returns output of a binary symmetric channel for given input bits.
///
/// # Parameters
///
/// - `bits`: Bits to be transmitted over the channel.
///
/// - `flip_prob`: Probability with which each bit is flipped, independently of all others.
///
/// - `rng`: Random number generator to be used.
///
/// # Errors
///
/// Returns an error if `flip_prob` is not in the range `[0, 1]`.
pub fn bsc<R: Rng>(bits: &[Bit], flip_prob: f64, rng: &mut R) -> Result<Vec<Bit>, Error> {
    check_flip_prob(flip_prob)?;
    Ok(bits
        .iter()
        .map(|&b| if rng.random_bool(flip_prob) { !b } else { b })
        .collect())
}

/// Checks that a bit flip probability is in the range `[0, 1]`.
pub(crate) fn check_flip_prob(flip_prob: f64) -> Result<(), Error> {
    if (0.0 ..= 1.0).contains(&flip_prob) {
        Ok(())
    } else {
        Err(Error::InvalidInput(format!(
            "Bit flip probability must be in the range [0, 1] (found {flip_prob})"
        )))
    }
}

/// Returns received symbols when given bits are sent as antipodal BPSK symbols in white
/// Gaussian noise.
///
/// `Zero` is sent as `+1.0` and `One` as `-1.0`. Each received symbol is the sent symbol plus a
/// Gaussian sample of variance `0.5 / 10f64.powf(0.1 * es_over_n0_db)`, where `es_over_n0_db` is
/// the symbol energy to noise density ratio in dB.
pub fn bpsk_awgn_channel<R: Rng>(bits: &[Bit], es_over_n0_db: f64, rng: &mut R) -> Vec<f64> {
    let noise_std = (0.5 * 10f64.powf(-0.1 * es_over_n0_db)).sqrt();
    bits.iter()
        .map(|&b| {
            let sym = if b == Bit::Zero { 1.0 } else { -1.0 };
            sym + noise_std * rng.sample::<f64, _>(StandardNormal)
        })
        .collect()
}

/// Returns the bit closest to each received BPSK symbol.
///
/// A symbol of exactly `0.0` is decided as `Zero`. Hard decisions turn the BPSK-AWGN channel into
/// a binary channel whose output the Hamming decoder can correct.
#[must_use]
pub fn hard_decisions(syms: &[f64]) -> Vec<Bit> {
    syms.iter().map(|&y| Bit::from(y < 0.0)).collect()
}

/// Returns number of positions in which two words of equal length differ.
///
/// Used both for channel flips (received against sent code bits) and for residual errors
/// (decoded against sent data bits).
#[must_use]
pub fn count_flips<const N: usize>(received: &[Bit; N], sent: &[Bit; N]) -> usize {
    received
        .iter()
        .zip(sent)
        .map(|(&r, &s)| usize::from((r ^ s).value()))
        .sum()
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use Bit::{One, Zero};

    #[test]
    fn test_random_bits() {
        let mut rng = StdRng::seed_from_u64(7);
        assert!(random_bits(0, &mut rng).is_empty());
        let num_bits = 10000;
        let bits = random_bits(num_bits, &mut rng);
        let num_ones = bits.iter().filter(|&b| *b == One).count();
        assert!(num_ones > 9 * num_bits / 20 && num_ones < 11 * num_bits / 20);
    }

    #[test]
    fn test_bsc() {
        let mut rng = StdRng::seed_from_u64(11);
        let bits = random_bits(10000, &mut rng);
        // Invalid input
        assert!(bsc(&bits, -0.1, &mut rng).is_err());
        assert!(bsc(&bits, 1.5, &mut rng).is_err());
        assert!(bsc(&bits, f64::NAN, &mut rng).is_err());
        // Valid input
        assert_eq!(bsc(&bits, 0.0, &mut rng).unwrap(), bits);
        let flipped = bsc(&bits, 1.0, &mut rng).unwrap();
        assert!(flipped.iter().zip(&bits).all(|(&f, &b)| f == !b));
        let noisy = bsc(&bits, 0.1, &mut rng).unwrap();
        let num_flips = noisy.iter().zip(&bits).filter(|(n, b)| n != b).count();
        assert!(num_flips > 800 && num_flips < 1200);
    }

    #[test]
    #[allow(clippy::cast_precision_loss)]
    fn test_bpsk_awgn_channel() {
        let mut rng = StdRng::seed_from_u64(13);
        assert!(bpsk_awgn_channel(&[], 0.0, &mut rng).is_empty());
        let es_over_n0_db = 3.0;
        let num_bits = 10000;
        let bits = random_bits(num_bits, &mut rng);
        let syms = bpsk_awgn_channel(&bits, es_over_n0_db, &mut rng);
        let noise_var = 0.5 * 10f64.powf(-0.1 * es_over_n0_db);
        let noise_var_est = syms
            .iter()
            .zip(&bits)
            .map(|(y, b)| match b {
                Zero => y - 1.0,
                One => y + 1.0,
            })
            .map(|n| n * n)
            .sum::<f64>()
            / num_bits as f64;
        assert!(noise_var_est > 0.9 * noise_var && noise_var_est < 1.1 * noise_var);
        // Noise small enough that no sign flips
        let syms = bpsk_awgn_channel(&bits, 30.0, &mut rng);
        assert_eq!(hard_decisions(&syms), bits);
    }

    #[test]
    fn test_hard_decisions() {
        assert!(hard_decisions(&[]).is_empty());
        assert_eq!(
            hard_decisions(&[0.0, 0.01, -0.01, 1.3, -0.7]),
            [Zero, Zero, One, Zero, One]
        );
    }

    #[test]
    fn test_check_flip_prob() {
        assert!(check_flip_prob(-1e-9).is_err());
        assert!(check_flip_prob(1.0 + 1e-9).is_err());
        assert!(check_flip_prob(0.0).is_ok());
        assert!(check_flip_prob(1.0).is_ok());
    }

    #[test]
    fn test_count_flips() {
        assert_eq!(count_flips::<0>(&[], &[]), 0);
        let sent = [One, Zero, Zero, One, One, One, Zero];
        assert_eq!(count_flips(&sent, &sent), 0);
        let received = [One, One, Zero, Zero, One, One, Zero];
        assert_eq!(count_flips(&received, &sent), 2);
        assert_eq!(count_flips(&sent.map(|b| !b), &sent), 7);
    }
}
