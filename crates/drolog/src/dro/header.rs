//! DRO v2 file header.
//!
//! Layout (26 bytes, little-endian):
//!
//! | offset | size | field             |
//! |--------|------|-------------------|
//! | 0x00   | 8    | signature         |
//! | 0x08   | 2    | version major     |
//! | 0x0A   | 2    | version minor     |
//! | 0x0C   | 4    | length in pairs   |
//! | 0x10   | 4    | length in ms      |
//! | 0x14   | 1    | hardware type     |
//! | 0x15   | 1    | format            |
//! | 0x16   | 1    | compression       |
//! | 0x17   | 1    | short delay code  |
//! | 0x18   | 1    | long delay code   |
//! | 0x19   | 1    | codemap length    |
//!
//! Only the delay codes and the codemap length drive the transcoder; the
//! enumerated fields are kept for reporting and re-emitted verbatim.

use std::time::Duration;

use crate::binutil::{
    ParseError, read_slice, read_u8_at, read_u16_le_at, read_u32_le_at, write_slice, write_u16,
    write_u32,
};

/// Magic bytes at the start of every DRO capture.
pub const DRO_SIGNATURE: &[u8; 8] = b"DBRAWOPL";

/// Size of the fixed header preceding the codemap.
pub const DRO_HEADER_SIZE: usize = 26;

/// Sound hardware the capture was recorded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HardwareType {
    Opl2,
    DualOpl2,
    Opl3,
    Unknown(u8),
}

impl HardwareType {
    pub fn name(&self) -> &'static str {
        match self {
            HardwareType::Opl2 => "OPL2",
            HardwareType::DualOpl2 => "Dual OPL2",
            HardwareType::Opl3 => "OPL3",
            HardwareType::Unknown(_) => "(unknown)",
        }
    }
}

impl From<u8> for HardwareType {
    fn from(id: u8) -> Self {
        match id {
            0 => HardwareType::Opl2,
            1 => HardwareType::DualOpl2,
            2 => HardwareType::Opl3,
            other => HardwareType::Unknown(other),
        }
    }
}

impl From<HardwareType> for u8 {
    fn from(hardware: HardwareType) -> Self {
        match hardware {
            HardwareType::Opl2 => 0,
            HardwareType::DualOpl2 => 1,
            HardwareType::Opl3 => 2,
            HardwareType::Unknown(id) => id,
        }
    }
}

/// Layout of the pair data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Register and value bytes alternate.
    Interleaved,
    Unknown(u8),
}

impl Format {
    pub fn name(&self) -> &'static str {
        match self {
            Format::Interleaved => "Commands and data interleaved",
            Format::Unknown(_) => "(unknown)",
        }
    }
}

impl From<u8> for Format {
    fn from(id: u8) -> Self {
        match id {
            0 => Format::Interleaved,
            other => Format::Unknown(other),
        }
    }
}

impl From<Format> for u8 {
    fn from(format: Format) -> Self {
        match format {
            Format::Interleaved => 0,
            Format::Unknown(id) => id,
        }
    }
}

/// Compression applied to the pair data. Only `None` is defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    None,
    Unknown(u8),
}

impl Compression {
    pub fn name(&self) -> &'static str {
        match self {
            Compression::None => "No compression",
            Compression::Unknown(_) => "(unknown)",
        }
    }
}

impl From<u8> for Compression {
    fn from(id: u8) -> Self {
        match id {
            0 => Compression::None,
            other => Compression::Unknown(other),
        }
    }
}

impl From<Compression> for u8 {
    fn from(compression: Compression) -> Self {
        match compression {
            Compression::None => 0,
            Compression::Unknown(id) => id,
        }
    }
}

/// Parsed DRO v2 header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroHeader {
    pub version_major: u16,
    pub version_minor: u16,
    /// Number of register/value pairs following the codemap
    pub length_pairs: u32,
    pub length_ms: u32,
    pub hardware_type: HardwareType,
    pub format: Format,
    pub compression: Compression,
    /// Register index that marks a 1..=256 ms delay
    pub short_delay_code: u8,
    /// Register index that marks a (1..=256) * 256 ms delay
    pub long_delay_code: u8,
    pub codemap_length: u8,
}

impl Default for DroHeader {
    fn default() -> Self {
        // Values written by DOSBox 0.73 and later.
        Self {
            version_major: 2,
            version_minor: 0,
            length_pairs: 0,
            length_ms: 0,
            hardware_type: HardwareType::Opl2,
            format: Format::Interleaved,
            compression: Compression::None,
            short_delay_code: 0x3D,
            long_delay_code: 0x3E,
            codemap_length: 0,
        }
    }
}

impl DroHeader {
    /// Serialize the header back into its 26-byte on-disk form.
    pub fn to_bytes(&self) -> [u8; DRO_HEADER_SIZE] {
        let mut buf = [0u8; DRO_HEADER_SIZE];
        write_slice(&mut buf, 0x00, DRO_SIGNATURE);
        write_u16(&mut buf, 0x08, self.version_major);
        write_u16(&mut buf, 0x0A, self.version_minor);
        write_u32(&mut buf, 0x0C, self.length_pairs);
        write_u32(&mut buf, 0x10, self.length_ms);
        buf[0x14] = self.hardware_type.into();
        buf[0x15] = self.format.into();
        buf[0x16] = self.compression.into();
        buf[0x17] = self.short_delay_code;
        buf[0x18] = self.long_delay_code;
        buf[0x19] = self.codemap_length;
        buf
    }

    /// Song length as a `Duration`.
    pub fn duration(&self) -> Duration {
        Duration::from_millis(u64::from(self.length_ms))
    }
}

/// Parse the fixed DRO header from the start of `bytes`.
///
/// Bytes beyond the first 26 are ignored. Enumerated fields are never
/// rejected; unknown ids come back as `Unknown(id)`.
///
/// # Examples
///
/// ```
/// use drolog::dro::{DroHeader, parse_header};
///
/// let header = DroHeader { length_pairs: 3, ..DroHeader::default() };
/// assert_eq!(parse_header(&header.to_bytes()), Ok(header));
/// assert!(parse_header(b"NOTADRO!__________________").is_err());
/// ```
pub fn parse_header(bytes: &[u8]) -> Result<DroHeader, ParseError> {
    let signature = read_slice(bytes, 0x00, DRO_SIGNATURE.len())
        .map_err(|_| ParseError::HeaderTooShort("dro: signature (8)".into()))?;
    if signature != DRO_SIGNATURE {
        let mut sig: [u8; 8] = [0; 8];
        sig.copy_from_slice(signature);
        return Err(ParseError::InvalidSignature(sig));
    }
    if bytes.len() < DRO_HEADER_SIZE {
        return Err(ParseError::HeaderTooShort("dro: header (26)".into()));
    }

    Ok(DroHeader {
        version_major: read_u16_le_at(bytes, 0x08)?,
        version_minor: read_u16_le_at(bytes, 0x0A)?,
        length_pairs: read_u32_le_at(bytes, 0x0C)?,
        length_ms: read_u32_le_at(bytes, 0x10)?,
        hardware_type: read_u8_at(bytes, 0x14)?.into(),
        format: read_u8_at(bytes, 0x15)?.into(),
        compression: read_u8_at(bytes, 0x16)?.into(),
        short_delay_code: read_u8_at(bytes, 0x17)?,
        long_delay_code: read_u8_at(bytes, 0x18)?,
        codemap_length: read_u8_at(bytes, 0x19)?,
    })
}

impl TryFrom<&[u8]> for DroHeader {
    type Error = ParseError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        parse_header(bytes)
    }
}
