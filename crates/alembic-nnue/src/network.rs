//! Evaluation file header and the first-layer weights it describes.
//!
//! Binary layout (little-endian):
//! - `u32` file version, [`FILE_VERSION`]
//! - `u32` network hash
//! - `u32` description length, then the description bytes
//! - `u32` feature transformer hash, see [`transformer_hash`]
//!
//! Only the transformer hash ties a file to a layout; the network hash
//! covers layers this crate does not evaluate and is passed through.

use std::io::{Read, Write};

use alembic_variant::FeatureLayout;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use tracing::{debug, info};

use crate::accumulator::FeatureSink;
use crate::error::NetworkError;
use crate::features::HalfKav2Variants;

/// Version tag of supported evaluation files.
pub const FILE_VERSION: u32 = 0x7AF3_2F20;

/// Hash a feature transformer of `hidden` outputs over `layout` must carry.
#[inline]
pub fn transformer_hash(layout: &FeatureLayout, hidden: u32) -> u32 {
    HalfKav2Variants::hash_value(layout) ^ hidden.wrapping_mul(2)
}

/// Parsed evaluation file header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkHeader {
    pub network_hash: u32,
    pub description: String,
    pub transformer_hash: u32,
}

impl NetworkHeader {
    /// Header for a transformer of `hidden` outputs over `layout`.
    pub fn new(layout: &FeatureLayout, hidden: u32, network_hash: u32, description: &str) -> Self {
        Self {
            network_hash,
            description: description.to_owned(),
            transformer_hash: transformer_hash(layout, hidden),
        }
    }

    /// Read a header, rejecting unknown file versions.
    pub fn read<R: Read>(reader: &mut R) -> Result<Self, NetworkError> {
        let version = reader.read_u32::<LittleEndian>()?;
        if version != FILE_VERSION {
            return Err(NetworkError::Version { expected: FILE_VERSION, found: version });
        }
        let network_hash = reader.read_u32::<LittleEndian>()?;

        let len = reader.read_u32::<LittleEndian>()? as usize;
        let mut bytes = vec![0u8; len];
        reader.read_exact(&mut bytes)?;
        let description = String::from_utf8_lossy(&bytes).into_owned();

        let transformer_hash = reader.read_u32::<LittleEndian>()?;
        debug!(network_hash, transformer_hash, %description, "read network header");

        Ok(Self { network_hash, description, transformer_hash })
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> Result<(), NetworkError> {
        writer.write_u32::<LittleEndian>(FILE_VERSION)?;
        writer.write_u32::<LittleEndian>(self.network_hash)?;
        writer.write_u32::<LittleEndian>(self.description.len() as u32)?;
        writer.write_all(self.description.as_bytes())?;
        writer.write_u32::<LittleEndian>(self.transformer_hash)?;
        Ok(())
    }

    /// Check that the file was trained for `layout` with `hidden` outputs.
    pub fn verify(&self, layout: &FeatureLayout, hidden: u32) -> Result<(), NetworkError> {
        let expected = transformer_hash(layout, hidden);
        if self.transformer_hash != expected {
            return Err(NetworkError::TransformerHash { expected, found: self.transformer_hash });
        }
        Ok(())
    }
}

/// First-layer weights: one column of `hidden` values per feature.
#[derive(Debug, Clone)]
pub struct FeatureTransformer {
    hidden: usize,
    bias: Vec<i16>,
    /// Row-major `dimensions x hidden`.
    weights: Vec<i16>,
}

impl FeatureTransformer {
    /// Build from raw parameters, checking their sizes against `layout`.
    pub fn from_parts(layout: &FeatureLayout, bias: Vec<i16>, weights: Vec<i16>) -> Result<Self, NetworkError> {
        let hidden = bias.len();
        let expected = layout.dimensions() as usize * hidden;
        if weights.len() != expected {
            return Err(NetworkError::Shape { expected, found: weights.len() });
        }
        Ok(Self { hidden, bias, weights })
    }

    /// Read the header and the parameters that follow it.
    pub fn read<R: Read>(reader: &mut R, layout: &FeatureLayout, hidden: usize) -> Result<Self, NetworkError> {
        let header = NetworkHeader::read(reader)?;
        header.verify(layout, hidden as u32)?;

        let mut bias = vec![0i16; hidden];
        let mut weights = vec![0i16; layout.dimensions() as usize * hidden];
        reader.read_i16_into::<LittleEndian>(&mut bias)?;
        reader.read_i16_into::<LittleEndian>(&mut weights)?;
        info!(
            description = %header.description,
            dimensions = layout.dimensions(),
            hidden,
            "loaded feature transformer"
        );

        Self::from_parts(layout, bias, weights)
    }

    #[inline]
    pub fn hidden(&self) -> usize {
        self.hidden
    }

    #[inline]
    fn column(&self, index: u32) -> &[i16] {
        let start = index as usize * self.hidden;
        &self.weights[start..start + self.hidden]
    }

    /// Empty hidden state for one perspective.
    pub fn state(&self) -> HiddenState<'_> {
        HiddenState { transformer: self, vals: self.bias.clone() }
    }
}

/// Hidden-layer values of one perspective: bias plus the active columns.
#[derive(Debug, Clone)]
pub struct HiddenState<'a> {
    transformer: &'a FeatureTransformer,
    vals: Vec<i16>,
}

impl HiddenState<'_> {
    #[inline]
    pub fn values(&self) -> &[i16] {
        &self.vals
    }
}

impl FeatureSink for HiddenState<'_> {
    fn clear(&mut self) {
        self.vals.copy_from_slice(&self.transformer.bias);
    }

    #[inline]
    fn add(&mut self, index: u32) {
        for (v, &w) in self.vals.iter_mut().zip(self.transformer.column(index)) {
            *v = v.wrapping_add(w);
        }
    }

    #[inline]
    fn remove(&mut self, index: u32) {
        for (v, &w) in self.vals.iter_mut().zip(self.transformer.column(index)) {
            *v = v.wrapping_sub(w);
        }
    }
}
