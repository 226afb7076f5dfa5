//! This crate implements encoding and decoding functionality for the systematic (7,4) Hamming
//! code. The encoder maps 4 data bits to a 7-bit codeword carrying 3 parity bits, and the decoder
//! corrects any single-bit error in a received codeword by syndrome decoding.
//!
//! Channel models and a simulator for evaluating the bit and word error rates of the code are
//! also provided.
//!
//! # Examples
//!
//! ```
//! use hamming74::{decode, encode, DataWord, ErrorPosition};
//!
//! let data: DataWord = "1011".parse()?;
//! let code = encode(data);
//! assert_eq!(code.to_string(), "0110011");
//! let decoded = decode(code.with_flipped_bit(5)?);
//! assert_eq!(decoded.data, data);
//! assert_eq!(decoded.error_position, ErrorPosition::Position(5));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

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

pub mod channel;
mod common;
mod hamming;
pub mod sim;

pub use common::{Bit, Error};
pub use hamming::{
    decode, decoder, encode, encoder, syndrome, Codeword, DataWord, DecodedWord, ErrorPosition,
    Syndrome, CODEWORD_LEN, DATA_LEN, NUM_PARITY_BITS,
};
