use core::fmt;

/// A 63-bit, time-sortable identifier.
///
/// - 1 bit reserved (always zero, so the value is non-negative as `i64`)
/// - 53 bits timestamp (ms since the configured epoch)
/// - 10 bits sequence (per-namespace counter modulo 1024)
///
/// ```text
///  Bit Index:  63           63 62            10 9              0
///              +--------------+----------------+---------------+
///  Field:      | reserved (1) | timestamp (53) | sequence (10) |
///              +--------------+----------------+---------------+
///              |<--------- MSB ----- 64 bits ----- LSB ------->|
/// ```
///
/// For a fixed namespace, IDs sort by mint time as long as the clock does
/// not regress and fewer than 1024 IDs are minted in one millisecond.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MintId {
    id: u64,
}

impl MintId {
    /// Number of bits in the timestamp field.
    pub const TIMESTAMP_BITS: u64 = 53;

    /// Number of bits in the sequence field.
    pub const SEQUENCE_BITS: u64 = 10;

    /// Bitmask for the 53-bit timestamp field. Occupies bits 10 through 62.
    pub const TIMESTAMP_MASK: u64 = (1 << Self::TIMESTAMP_BITS) - 1;

    /// Bitmask for the 10-bit sequence field. Occupies bits 0 through 9.
    pub const SEQUENCE_MASK: u64 = (1 << Self::SEQUENCE_BITS) - 1;

    /// Number of bits to shift the timestamp to its position.
    pub const TIMESTAMP_SHIFT: u64 = Self::SEQUENCE_BITS;

    /// Packs a timestamp offset and a sequence value into an ID.
    ///
    /// Both fields are masked to their width, so an oversized sequence is
    /// reduced modulo 1024 and an oversized timestamp wraps within 53 bits.
    ///
    /// # Example
    ///
    /// ```
    /// use mintid::MintId;
    ///
    /// let id = MintId::from_parts(1, 5);
    /// assert_eq!(id.to_raw(), 1029);
    /// assert_eq!(id.timestamp_offset(), 1);
    /// assert_eq!(id.sequence(), 5);
    /// ```
    pub const fn from_parts(timestamp_offset: u64, sequence: u64) -> Self {
        let timestamp = (timestamp_offset & Self::TIMESTAMP_MASK) << Self::TIMESTAMP_SHIFT;
        let sequence = sequence & Self::SEQUENCE_MASK;
        Self {
            id: timestamp | sequence,
        }
    }

    /// Extracts the timestamp offset (ms since the epoch) from the packed
    /// ID.
    pub const fn timestamp_offset(&self) -> u64 {
        (self.id >> Self::TIMESTAMP_SHIFT) & Self::TIMESTAMP_MASK
    }

    /// Extracts the sequence number from the packed ID.
    pub const fn sequence(&self) -> u64 {
        self.id & Self::SEQUENCE_MASK
    }

    /// Maximum representable timestamp offset: `2^53 - 1` ms, about
    /// 285,616 years past the epoch.
    pub const fn max_timestamp() -> u64 {
        Self::TIMESTAMP_MASK
    }

    /// Maximum sequence value before wraparound (1023).
    pub const fn max_sequence() -> u64 {
        Self::SEQUENCE_MASK
    }

    /// Returns the packed representation.
    pub const fn to_raw(&self) -> u64 {
        self.id
    }

    /// Reconstructs an ID from its packed representation.
    pub const fn from_raw(raw: u64) -> Self {
        Self { id: raw }
    }

    /// Returns the ID as a signed 64-bit integer.
    ///
    /// The top bit is always zero, so the result is non-negative and safe
    /// to store in a signed database column.
    pub const fn to_i64(&self) -> i64 {
        self.id as i64
    }

    /// Returns the ID as a zero-padded 19-digit string, preserving numeric
    /// sort order lexicographically.
    pub fn to_padded_string(&self) -> String {
        format!("{:019}", self.id)
    }
}

impl fmt::Display for MintId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl fmt::Debug for MintId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MintId")
            .field("timestamp_offset", &self.timestamp_offset())
            .field("sequence", &self.sequence())
            .finish()
    }
}

impl From<MintId> for u64 {
    fn from(id: MintId) -> Self {
        id.to_raw()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packs_and_unpacks_fields() {
        let id = MintId::from_parts(123_456_789, 1023);
        assert_eq!(id.timestamp_offset(), 123_456_789);
        assert_eq!(id.sequence(), 1023);
        assert_eq!(id.to_raw(), (123_456_789 << 10) | 1023);
    }

    #[test]
    fn masks_out_of_range_parts() {
        let id = MintId::from_parts(0, 1024 + 5);
        assert_eq!(id.sequence(), 5);

        let id = MintId::from_parts(MintId::max_timestamp() + 1, 0);
        assert_eq!(id.timestamp_offset(), 0);
    }

    #[test]
    fn sign_bit_is_always_clear() {
        let id = MintId::from_parts(MintId::max_timestamp(), MintId::max_sequence());
        assert_eq!(id.to_raw() >> 63, 0);
        assert!(id.to_i64() >= 0);
        assert_eq!(id.to_i64(), i64::MAX);
    }

    #[test]
    fn raw_round_trip() {
        let id = MintId::from_parts(42, 7);
        assert_eq!(MintId::from_raw(id.to_raw()), id);
    }

    #[test]
    fn sorts_by_timestamp_then_sequence() {
        let a = MintId::from_parts(1, 1023);
        let b = MintId::from_parts(2, 0);
        assert!(a < b);

        let c = MintId::from_parts(2, 1);
        assert!(b < c);
    }

    #[test]
    fn padded_string_preserves_order() {
        let a = MintId::from_parts(1, 0);
        let b = MintId::from_parts(MintId::max_timestamp(), 0);
        assert!(a.to_padded_string() < b.to_padded_string());
        assert_eq!(a.to_padded_string().len(), b.to_padded_string().len());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_round_trip() {
        let id = MintId::from_parts(99, 3);
        let json = serde_json::to_string(&id).unwrap();
        let back: MintId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, back);
    }
}
