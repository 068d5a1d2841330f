//! Genome ("DNA") encoding of decision-network parameters.
//!
//! A genome is a versioned text layout:
//!
//! ```text
//! dna-v1:<inputs>x<hidden>x<outputs>:<hex>
//! ```
//!
//! where `<hex>` is every parameter in [`Brain::to_flat_vector`] order, each
//! written as the 8 lowercase hex digits of its IEEE-754 bit pattern. Storing
//! bit patterns rather than decimal text makes `encode(decode(g)) == g` hold
//! exactly. Decoding rejects anything that would not re-encode to the same
//! string.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::brain::{Brain, Layout};
use crate::error::GenomeError;

/// Tag every genome starts with, followed by the version number.
pub const GENOME_HEADER: &str = "dna-v";
/// Current layout version.
pub const GENOME_VERSION: u32 = 1;

const HEX_DIGITS_PER_PARAM: usize = 8;

/// Serialised decision-network parameters, the unit of heredity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Genome(String);

impl Genome {
    /// Wraps arbitrary text without validating it. Use [`Genome::decode`] or
    /// [`str::parse`] to check it.
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Encodes a brain's parameters.
    pub fn encode(brain: &Brain) -> Self {
        let layout = brain.layout();
        let flat = brain.to_flat_vector();

        let mut text = format!(
            "{GENOME_HEADER}{GENOME_VERSION}:{}x{}x{}:",
            layout.inputs, layout.hidden, layout.outputs
        );
        text.reserve(flat.len() * HEX_DIGITS_PER_PARAM);
        for value in flat {
            text.push_str(&hex::encode(value.to_bits().to_be_bytes()));
        }
        Self(text)
    }

    /// The genome text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Reads the layout section without decoding the payload.
    pub fn layout(&self) -> Result<Layout, GenomeError> {
        let (layout, _) = self.sections()?;
        Ok(layout)
    }

    /// Decodes the genome into a brain.
    pub fn decode(&self) -> Result<Brain, GenomeError> {
        let (layout, payload) = self.sections()?;

        let expected = layout.parameter_count() * HEX_DIGITS_PER_PARAM;
        if payload.len() != expected {
            return Err(GenomeError::PayloadLength {
                expected,
                actual: payload.len(),
            });
        }

        let flat = payload
            .as_bytes()
            .chunks(HEX_DIGITS_PER_PARAM)
            .enumerate()
            .map(|(index, chunk)| decode_param(index, chunk))
            .collect::<Result<Vec<f32>, _>>()?;

        let brain = Brain::from_flat(layout, &flat).ok_or(GenomeError::PayloadLength {
            expected,
            actual: payload.len(),
        })?;

        if Genome::encode(&brain) != *self {
            return Err(GenomeError::NonCanonical);
        }
        Ok(brain)
    }

    /// Decodes the genome and checks it was built for `expected`.
    pub fn decode_for(&self, expected: Layout) -> Result<Brain, GenomeError> {
        let found = self.layout()?;
        if found != expected {
            return Err(GenomeError::LayoutMismatch {
                expected: expected.as_tuple(),
                found: found.as_tuple(),
            });
        }
        self.decode()
    }

    fn sections(&self) -> Result<(Layout, &str), GenomeError> {
        let body = self
            .0
            .strip_prefix(GENOME_HEADER)
            .ok_or(GenomeError::MissingHeader {
                expected: GENOME_HEADER,
            })?;

        let (version, rest) = body
            .split_once(':')
            .ok_or_else(|| GenomeError::UnsupportedVersion(body.to_string()))?;
        if version != GENOME_VERSION.to_string() {
            return Err(GenomeError::UnsupportedVersion(version.to_string()));
        }

        let (layout, payload) = rest
            .split_once(':')
            .ok_or_else(|| GenomeError::InvalidLayout(rest.to_string()))?;
        Ok((parse_layout(layout)?, payload))
    }
}

fn parse_layout(text: &str) -> Result<Layout, GenomeError> {
    let invalid = || GenomeError::InvalidLayout(text.to_string());

    let dims = text
        .split('x')
        .map(|part| part.parse::<usize>().ok().filter(|n| *n > 0))
        .collect::<Option<Vec<usize>>>()
        .ok_or_else(invalid)?;

    let layout = match dims.as_slice() {
        &[inputs, hidden, outputs] => Layout {
            inputs,
            hidden,
            outputs,
        },
        _ => return Err(invalid()),
    };

    // Reject layouts whose payload size would overflow.
    layout
        .checked_parameter_count()
        .and_then(|count| count.checked_mul(HEX_DIGITS_PER_PARAM))
        .ok_or_else(invalid)?;
    Ok(layout)
}

fn decode_param(index: usize, chunk: &[u8]) -> Result<f32, GenomeError> {
    let mut bytes = [0u8; 4];
    hex::decode_to_slice(chunk, &mut bytes).map_err(|_| GenomeError::InvalidHex { index })?;

    let value = f32::from_bits(u32::from_be_bytes(bytes));
    if !value.is_finite() {
        return Err(GenomeError::NonFinite { index });
    }
    Ok(value)
}

impl fmt::Display for Genome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Genome {
    type Err = GenomeError;

    /// Parses and validates genome text.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let genome = Genome::new(text);
        genome.decode()?;
        Ok(genome)
    }
}
