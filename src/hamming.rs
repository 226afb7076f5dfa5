//! Encoder and decoder for the systematic (7,4) Hamming code
//!
//! A codeword holds 7 bits at positions `1..=7`, laid out as `[p1, p2, d1, p3, d2, d3, d4]`,
//! where `d1, ..., d4` are the data bits and `p1, p2, p3` are the parity bits. Each parity check
//! covers the positions whose binary representation has the corresponding bit set, so the
//! syndrome of a single-bit error is the binary representation of its position.

use std::fmt;
use std::str::FromStr;

use itertools::Itertools;

use crate::{Bit, Error};

/// Number of data bits per codeword
pub const DATA_LEN: usize = 4;

/// Number of bits per codeword
pub const CODEWORD_LEN: usize = 7;

/// Number of parity bits per codeword
pub const NUM_PARITY_BITS: usize = CODEWORD_LEN - DATA_LEN;

/// Codeword positions of the data bits `d1, d2, d3, d4`
const DATA_POSITIONS: [usize; DATA_LEN] = [3, 5, 6, 7];

/// Codeword positions covered by each parity check. The first position in each row holds the
/// parity bit set by that check. Shared by the encoder and the syndrome computation.
const PARITY_CHECKS: [[usize; 4]; NUM_PARITY_BITS] = [[1, 3, 5, 7], [2, 3, 6, 7], [4, 5, 6, 7]];

/// Error position for each syndrome value (see [`Syndrome::value`])
const SYNDROME_TO_POSITION: [Option<usize>; 1 << NUM_PARITY_BITS] = syndrome_table();

/// Returns the syndrome lookup table, built by flipping each codeword position in turn.
const fn syndrome_table() -> [Option<usize>; 1 << NUM_PARITY_BITS] {
    let mut table = [None; 1 << NUM_PARITY_BITS];
    let mut position = 1;
    while position <= CODEWORD_LEN {
        table[syndrome_value_for_flip(position)] = Some(position);
        position += 1;
    }
    table
}

/// Returns the syndrome value produced by flipping the bit at the given position of a valid
/// codeword.
const fn syndrome_value_for_flip(position: usize) -> usize {
    let mut value = 0;
    let mut i_check = 0;
    while i_check < NUM_PARITY_BITS {
        let mut i_pos = 0;
        while i_pos < PARITY_CHECKS[i_check].len() {
            if PARITY_CHECKS[i_check][i_pos] == position {
                value |= 1 << i_check;
            }
            i_pos += 1;
        }
        i_check += 1;
    }
    value
}

/// Word of 4 data bits `[d1, d2, d3, d4]`
#[derive(Clone, Eq, Hash, PartialEq, Debug, Copy)]
pub struct DataWord([Bit; DATA_LEN]);

impl DataWord {
    /// Returns data word holding the given bits.
    #[must_use]
    pub fn new(bits: [Bit; DATA_LEN]) -> Self {
        Self(bits)
    }

    /// Returns data word corresponding to given integer values.
    ///
    /// # Errors
    ///
    /// Returns an error if `values` does not have exactly 4 elements, or if any of them is
    /// neither `0` nor `1`.
    ///
    /// # Examples
    ///
    /// ```
    /// use hamming74::DataWord;
    ///
    /// let data = DataWord::from_values(&[1, 0, 1, 1])?;
    /// assert_eq!(data.to_string(), "1011");
    /// assert!(DataWord::from_values(&[1, 0, 1]).is_err());
    /// assert!(DataWord::from_values(&[1, 0, 2, 1]).is_err());
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn from_values(values: &[u8]) -> Result<Self, Error> {
        bits_from_values(values).map(Self)
    }

    /// Returns the data bits.
    #[must_use]
    pub fn bits(&self) -> [Bit; DATA_LEN] {
        self.0
    }
}

impl TryFrom<&[Bit]> for DataWord {
    type Error = Error;

    fn try_from(bits: &[Bit]) -> Result<Self, Error> {
        bits_from_slice(bits).map(Self)
    }
}

impl TryFrom<&[u8]> for DataWord {
    type Error = Error;

    fn try_from(values: &[u8]) -> Result<Self, Error> {
        Self::from_values(values)
    }
}

impl FromStr for DataWord {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        bits_from_str(s).map(Self)
    }
}

impl fmt::Display for DataWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.iter().join(""))
    }
}

/// Word of 7 code bits `[p1, p2, d1, p3, d2, d3, d4]`, indexed by position `1..=7`
#[derive(Clone, Eq, Hash, PartialEq, Debug, Copy)]
pub struct Codeword([Bit; CODEWORD_LEN]);

impl Codeword {
    /// Returns codeword holding the given bits (not necessarily a valid codeword).
    #[must_use]
    pub fn new(bits: [Bit; CODEWORD_LEN]) -> Self {
        Self(bits)
    }

    /// Returns codeword corresponding to given integer values.
    ///
    /// # Errors
    ///
    /// Returns an error if `values` does not have exactly 7 elements, or if any of them is
    /// neither `0` nor `1`.
    pub fn from_values(values: &[u8]) -> Result<Self, Error> {
        bits_from_values(values).map(Self)
    }

    /// Returns the code bits.
    #[must_use]
    pub fn bits(&self) -> [Bit; CODEWORD_LEN] {
        self.0
    }

    /// Returns the bit at the given position.
    ///
    /// # Errors
    ///
    /// Returns an error if `position` is not in `1..=7`.
    pub fn bit(&self, position: usize) -> Result<Bit, Error> {
        check_position(position)?;
        Ok(self.0[position - 1])
    }

    /// Returns copy of the codeword with the bit at the given position flipped.
    ///
    /// # Errors
    ///
    /// Returns an error if `position` is not in `1..=7`.
    ///
    /// # Examples
    ///
    /// ```
    /// use hamming74::Codeword;
    ///
    /// let code: Codeword = "0110011".parse()?;
    /// assert_eq!(code.with_flipped_bit(5)?.to_string(), "0110111");
    /// assert!(code.with_flipped_bit(8).is_err());
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn with_flipped_bit(&self, position: usize) -> Result<Self, Error> {
        check_position(position)?;
        let mut bits = self.0;
        bits[position - 1] = !bits[position - 1];
        Ok(Self(bits))
    }

    /// Returns data bits read from their positions, without any correction.
    fn data_bits(&self) -> [Bit; DATA_LEN] {
        DATA_POSITIONS.map(|position| self.0[position - 1])
    }
}

impl TryFrom<&[Bit]> for Codeword {
    type Error = Error;

    fn try_from(bits: &[Bit]) -> Result<Self, Error> {
        bits_from_slice(bits).map(Self)
    }
}

impl TryFrom<&[u8]> for Codeword {
    type Error = Error;

    fn try_from(values: &[u8]) -> Result<Self, Error> {
        Self::from_values(values)
    }
}

impl FromStr for Codeword {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        bits_from_str(s).map(Self)
    }
}

impl fmt::Display for Codeword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.iter().join(""))
    }
}

/// Result of re-evaluating the three parity checks against a received codeword
#[derive(Clone, Eq, Hash, PartialEq, Debug, Copy)]
pub struct Syndrome {
    /// Check over positions 1, 3, 5, 7
    pub s1: Bit,
    /// Check over positions 2, 3, 6, 7
    pub s2: Bit,
    /// Check over positions 4, 5, 6, 7
    pub s3: Bit,
}

impl Syndrome {
    /// Returns `true` if all parity checks are satisfied.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.value() == 0
    }

    /// Returns the syndrome as a 3-bit integer, with `s1` as the least significant bit.
    #[must_use]
    pub fn value(&self) -> usize {
        usize::from(self.s1.value())
            | (usize::from(self.s2.value()) << 1)
            | (usize::from(self.s3.value()) << 2)
    }

    /// Returns the position of the single-bit error indicated by the syndrome.
    #[must_use]
    pub fn error_position(&self) -> ErrorPosition {
        match SYNDROME_TO_POSITION[self.value()] {
            Some(position) => ErrorPosition::Position(position),
            None => ErrorPosition::NoError,
        }
    }
}

/// Position of the bit believed to be in error
#[derive(Clone, Eq, Hash, PartialEq, Debug, Copy)]
pub enum ErrorPosition {
    /// All parity checks are satisfied
    NoError,
    /// Single-bit error at the given position (in `1..=7`)
    Position(usize),
}

impl fmt::Display for ErrorPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorPosition::NoError => write!(f, "none"),
            ErrorPosition::Position(position) => write!(f, "{position}"),
        }
    }
}

/// Output of the decoder for a single codeword
#[derive(Clone, Eq, PartialEq, Debug, Copy)]
pub struct DecodedWord {
    /// Data bits extracted from the corrected codeword
    pub data: DataWord,
    /// Received codeword with the indicated bit (if any) flipped
    pub code: Codeword,
    /// Position of the corrected bit
    pub error_position: ErrorPosition,
    /// Syndrome of the received codeword
    pub syndrome: Syndrome,
}

/// Returns codeword for given data word.
///
/// # Examples
///
/// ```
/// use hamming74::{encode, DataWord};
///
/// let data = DataWord::from_values(&[1, 0, 1, 1])?;
/// assert_eq!(encode(data).to_string(), "0110011");
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[must_use]
pub fn encode(data: DataWord) -> Codeword {
    let mut bits = [Bit::Zero; CODEWORD_LEN];
    for (&position, &bit) in DATA_POSITIONS.iter().zip(data.0.iter()) {
        bits[position - 1] = bit;
    }
    for check in &PARITY_CHECKS {
        let parity = check[1 ..]
            .iter()
            .fold(Bit::Zero, |acc, &position| acc ^ bits[position - 1]);
        bits[check[0] - 1] = parity;
    }
    Codeword(bits)
}

/// Returns syndrome of given codeword.
#[must_use]
pub fn syndrome(code: &Codeword) -> Syndrome {
    let [s1, s2, s3] = PARITY_CHECKS.map(|check| {
        check
            .iter()
            .fold(Bit::Zero, |acc, &position| acc ^ code.0[position - 1])
    });
    Syndrome { s1, s2, s3 }
}

/// Returns decoder output for given (possibly corrupted) codeword.
///
/// Any single-bit error is corrected. If two or more bits were flipped, the output is a valid
/// codeword that need not equal the one transmitted.
///
/// # Examples
///
/// ```
/// use hamming74::{decode, encode, DataWord, ErrorPosition};
///
/// let data = DataWord::from_values(&[1, 0, 1, 1])?;
/// let received = encode(data).with_flipped_bit(5)?;
/// let decoded = decode(received);
/// assert_eq!(decoded.data, data);
/// assert_eq!(decoded.error_position, ErrorPosition::Position(5));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[must_use]
pub fn decode(code: Codeword) -> DecodedWord {
    let syndrome = syndrome(&code);
    let error_position = syndrome.error_position();
    let mut corrected = code;
    if let ErrorPosition::Position(position) = error_position {
        corrected.0[position - 1] = !corrected.0[position - 1];
    }
    DecodedWord {
        data: DataWord(corrected.data_bits()),
        code: corrected,
        error_position,
        syndrome,
    }
}

/// Returns code bits from the encoder for given data bits.
///
/// # Parameters
///
/// - `data_bits`: Data bits to be encoded. Consecutive groups of 4 bits are encoded into
///   consecutive codewords.
///
/// # Returns
///
/// - `code_bits`: Concatenated codewords.
///
/// # Errors
///
/// Returns an error if the number of data bits is not a multiple of `4`.
///
/// # Examples
/// ```
/// use hamming74::{encoder, Bit};
/// use Bit::{One, Zero};
///
/// let code_bits = encoder(&[One, Zero, One, One])?;
/// assert_eq!(code_bits, [Zero, One, One, Zero, Zero, One, One]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn encoder(data_bits: &[Bit]) -> Result<Vec<Bit>, Error> {
    check_block_len(data_bits.len(), DATA_LEN, "data")?;
    let mut code_bits = Vec::with_capacity(data_bits.len() / DATA_LEN * CODEWORD_LEN);
    for chunk in data_bits.chunks_exact(DATA_LEN) {
        code_bits.extend(encode(DataWord::try_from(chunk)?).bits());
    }
    Ok(code_bits)
}

/// Returns data bit decisions from the decoder for given code bits.
///
/// # Parameters
///
/// - `code_bits`: Received code bits. Consecutive groups of 7 bits are decoded as consecutive
///   codewords.
///
/// # Returns
///
/// - `data_bits_hat`: Decisions on the data bits, after correcting up to one bit per codeword.
///
/// # Errors
///
/// Returns an error if the number of code bits is not a multiple of `7`.
///
/// # Examples
/// ```
/// use hamming74::{decoder, Bit};
/// use Bit::{One, Zero};
///
/// let data_bits_hat = decoder(&[Zero, One, One, Zero, One, One, One])?;
/// assert_eq!(data_bits_hat, [One, Zero, One, One]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn decoder(code_bits: &[Bit]) -> Result<Vec<Bit>, Error> {
    check_block_len(code_bits.len(), CODEWORD_LEN, "code")?;
    let mut data_bits_hat = Vec::with_capacity(code_bits.len() / CODEWORD_LEN * DATA_LEN);
    for chunk in code_bits.chunks_exact(CODEWORD_LEN) {
        data_bits_hat.extend(decode(Codeword::try_from(chunk)?).data.bits());
    }
    Ok(data_bits_hat)
}

/// Checks that a bit sequence splits into whole words.
fn check_block_len(len: usize, word_len: usize, kind: &str) -> Result<(), Error> {
    if len % word_len == 0 {
        Ok(())
    } else {
        Err(Error::InvalidInput(format!(
            "Number of {kind} bits must be a multiple of {word_len} (found {len})"
        )))
    }
}

/// Checks that a codeword position is in `1..=7`.
fn check_position(position: usize) -> Result<(), Error> {
    if (1 ..= CODEWORD_LEN).contains(&position) {
        Ok(())
    } else {
        Err(Error::InvalidInput(format!(
            "Codeword position must be in the range [1, {CODEWORD_LEN}] (found {position})"
        )))
    }
}

/// Checks that a word has the expected number of bits.
fn check_word_len<const N: usize>(len: usize) -> Result<(), Error> {
    if len == N {
        Ok(())
    } else {
        Err(Error::InvalidInput(format!("Expected {} bits (found {len})", N)))
    }
}

/// Returns fixed-size bit array copied from a slice of exactly `N` bits.
fn bits_from_slice<const N: usize>(bits: &[Bit]) -> Result<[Bit; N], Error> {
    check_word_len::<N>(bits.len())?;
    let mut out = [Bit::Zero; N];
    out.copy_from_slice(bits);
    Ok(out)
}

/// Returns fixed-size bit array from exactly `N` integer values, each `0` or `1`.
fn bits_from_values<const N: usize>(values: &[u8]) -> Result<[Bit; N], Error> {
    check_word_len::<N>(values.len())?;
    let mut out = [Bit::Zero; N];
    for (idx, (bit, &value)) in out.iter_mut().zip(values).enumerate() {
        *bit = Bit::try_from(value).map_err(|_| {
            Error::InvalidInput(format!(
                "Expected binary value 0 or 1 at index {idx} (found {value})"
            ))
        })?;
    }
    Ok(out)
}

/// Returns fixed-size bit array from a string of exactly `N` binary digits.
fn bits_from_str<const N: usize>(s: &str) -> Result<[Bit; N], Error> {
    check_word_len::<N>(s.chars().count())?;
    let mut out = [Bit::Zero; N];
    for (idx, (bit, c)) in out.iter_mut().zip(s.chars()).enumerate() {
        *bit = Bit::try_from(c).map_err(|_| {
            Error::InvalidInput(format!(
                "Expected binary digit '0' or '1' at index {idx} (found {c:?})"
            ))
        })?;
    }
    Ok(out)
}
