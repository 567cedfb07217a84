//! Register/value pairs as they appear in the capture.

/// Bit of the register byte selecting the second chip (or OPL3 high bank).
pub const BANK_SELECT: u8 = 0x80;

/// Chip bank a pair is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bank {
    /// First OPL2, or OPL3 registers 0x000-0x0FF
    Low,
    /// Second OPL2, or OPL3 registers 0x100-0x1FF
    High,
}

impl Bank {
    pub fn number(&self) -> u8 {
        match self {
            Bank::Low => 0,
            Bank::High => 1,
        }
    }
}

/// One raw (register, value) pair, register byte exactly as stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawPair {
    pub register: u8,
    pub value: u8,
}

impl RawPair {
    pub fn new(register: u8, value: u8) -> Self {
        Self { register, value }
    }

    pub fn bank(&self) -> Bank {
        if self.register & BANK_SELECT != 0 {
            Bank::High
        } else {
            Bank::Low
        }
    }

    /// Register byte with the bank bit cleared: a delay code or a codemap index.
    pub fn index(&self) -> u8 {
        self.register & !BANK_SELECT
    }

    pub fn to_bytes(&self) -> [u8; 2] {
        [self.register, self.value]
    }
}

impl From<[u8; 2]> for RawPair {
    fn from(bytes: [u8; 2]) -> Self {
        Self::new(bytes[0], bytes[1])
    }
}

/// What a pair means once delay codes and the codemap are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairKind {
    /// Wait `value + 1` milliseconds
    ShortDelay,
    /// Wait `(value + 1) * 256` milliseconds
    LongDelay,
    /// Write to the real register found through the codemap
    Write { register: u8 },
}

impl PairKind {
    pub fn is_delay(&self) -> bool {
        matches!(self, PairKind::ShortDelay | PairKind::LongDelay)
    }
}
