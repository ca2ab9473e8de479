use core::fmt;
use core::time::Duration;

/// Number of bits reserved for the worker id.
pub const WORKER_ID_BITS: u32 = 10;

/// Number of bits reserved for the per-millisecond sequence.
pub const SEQUENCE_BITS: u32 = 12;

/// Largest accepted worker id (`1023`).
pub const MAX_WORKER_ID: u32 = (1 << WORKER_ID_BITS) - 1;

/// Largest sequence value before the generator must wait for the next
/// millisecond (`4095`).
pub const MAX_SEQUENCE: u32 = (1 << SEQUENCE_BITS) - 1;

/// A 64-bit Snowflake ID.
///
/// - 42 bits timestamp (ms since the generator's epoch)
/// - 10 bits worker ID
/// - 12 bits sequence
///
/// ```text
///  Bit Index:  63             22 21             12 11             0
///              +----------------+-----------------+---------------+
///  Field:      | timestamp (42) | worker ID (10)  | sequence (12) |
///              +----------------+-----------------+---------------+
///              |<----- MSB ---------- 64 bits --------- LSB ----->|
/// ```
///
/// There is no reserved sign bit: timestamps are truncated to whatever fits
/// above the worker field.
///
/// # Example
///
/// ```
/// use snowgen::SnowflakeId;
///
/// let id = SnowflakeId::from_components(1000, 2, 1);
/// assert_eq!(id.timestamp(), 1000);
/// assert_eq!(id.worker_id(), 2);
/// assert_eq!(id.sequence(), 1);
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SnowflakeId {
    id: u64,
}

impl SnowflakeId {
    /// Bitmask for extracting the 42-bit timestamp field. Occupies bits 22
    /// through 63.
    pub const TIMESTAMP_MASK: u64 = (1 << (64 - Self::TIMESTAMP_SHIFT)) - 1;

    /// Bitmask for extracting the 10-bit worker ID field. Occupies bits 12
    /// through 21.
    pub const WORKER_ID_MASK: u64 = MAX_WORKER_ID as u64;

    /// Bitmask for extracting the 12-bit sequence field. Occupies bits 0
    /// through 11.
    pub const SEQUENCE_MASK: u64 = MAX_SEQUENCE as u64;

    /// Number of bits to shift the timestamp to its correct position (bit 22).
    pub const TIMESTAMP_SHIFT: u64 = (WORKER_ID_BITS + SEQUENCE_BITS) as u64;

    /// Number of bits to shift the worker ID to its correct position (bit 12).
    pub const WORKER_ID_SHIFT: u64 = SEQUENCE_BITS as u64;

    /// Number of bits to shift the sequence field (bit 0).
    pub const SEQUENCE_SHIFT: u64 = 0;

    /// Packs the three fields into an ID. Out-of-range values are masked to
    /// their field width.
    pub const fn from_components(timestamp: u64, worker_id: u64, sequence: u64) -> Self {
        let timestamp = (timestamp & Self::TIMESTAMP_MASK) << Self::TIMESTAMP_SHIFT;
        let worker_id = (worker_id & Self::WORKER_ID_MASK) << Self::WORKER_ID_SHIFT;
        let sequence = (sequence & Self::SEQUENCE_MASK) << Self::SEQUENCE_SHIFT;
        Self {
            id: timestamp | worker_id | sequence,
        }
    }

    /// Extracts the timestamp from the packed ID.
    pub const fn timestamp(&self) -> u64 {
        (self.id >> Self::TIMESTAMP_SHIFT) & Self::TIMESTAMP_MASK
    }

    /// Extracts the worker ID from the packed ID.
    pub const fn worker_id(&self) -> u64 {
        (self.id >> Self::WORKER_ID_SHIFT) & Self::WORKER_ID_MASK
    }

    /// Extracts the sequence number from the packed ID.
    pub const fn sequence(&self) -> u64 {
        (self.id >> Self::SEQUENCE_SHIFT) & Self::SEQUENCE_MASK
    }

    pub const fn to_raw(&self) -> u64 {
        self.id
    }

    pub const fn from_raw(raw: u64) -> Self {
        Self { id: raw }
    }

    /// Milliseconds since the UNIX epoch at which this ID was minted, given
    /// the epoch its generator was configured with.
    ///
    /// ```
    /// use core::time::Duration;
    /// use snowgen::{SNOWGEN_EPOCH, SnowflakeId};
    ///
    /// let id = SnowflakeId::from_components(5, 0, 0);
    /// assert_eq!(id.unix_millis(SNOWGEN_EPOCH), 1_325_289_600_005);
    /// ```
    pub fn unix_millis(&self, epoch: Duration) -> u64 {
        epoch.as_millis() as u64 + self.timestamp()
    }

    /// Returns the ID as a zero-padded 20-digit string.
    pub fn to_padded_string(&self) -> String {
        format!("{:020}", self.id)
    }
}

impl From<SnowflakeId> for u64 {
    fn from(id: SnowflakeId) -> Self {
        id.to_raw()
    }
}

impl From<u64> for SnowflakeId {
    fn from(raw: u64) -> Self {
        Self::from_raw(raw)
    }
}

impl fmt::Display for SnowflakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl fmt::Debug for SnowflakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnowflakeId")
            .field("id", &format_args!("0x{:016x}", self.id))
            .field("timestamp", &self.timestamp())
            .field("worker_id", &self.worker_id())
            .field("sequence", &self.sequence())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snowflake_id_fields_and_bounds() {
        let ts = SnowflakeId::TIMESTAMP_MASK;
        let wid = u64::from(MAX_WORKER_ID);
        let seq = u64::from(MAX_SEQUENCE);

        let id = SnowflakeId::from_components(ts, wid, seq);
        assert_eq!(id.timestamp(), ts);
        assert_eq!(id.worker_id(), wid);
        assert_eq!(id.sequence(), seq);
        assert_eq!(id.to_raw(), u64::MAX);
    }

    #[test]
    fn test_layout_matches_shift_or() {
        let (ts, wid, seq) = (123_456_789_u64, 513_u64, 77_u64);
        let id = SnowflakeId::from_components(ts, wid, seq);
        assert_eq!(id.to_raw(), (ts << 22) | (wid << 12) | seq);
    }

    #[test]
    fn test_fields_round_trip_through_raw() {
        let samples = [
            (0, 0, 0),
            (1, 0, 0),
            (0, 1, 0),
            (0, 0, 1),
            (1_700_000_000_000 % SnowflakeId::TIMESTAMP_MASK, 1023, 4095),
            (SnowflakeId::TIMESTAMP_MASK, 0, 4095),
        ];
        for (ts, wid, seq) in samples {
            let id = SnowflakeId::from_components(ts, wid, seq);
            let decoded = SnowflakeId::from_raw(id.to_raw());
            assert_eq!(decoded, id);
            assert_eq!(
                SnowflakeId::from_components(
                    decoded.timestamp(),
                    decoded.worker_id(),
                    decoded.sequence()
                ),
                id
            );
        }
    }

    #[test]
    fn test_timestamp_is_truncated_to_field_width() {
        let id = SnowflakeId::from_components(SnowflakeId::TIMESTAMP_MASK + 2, 0, 0);
        assert_eq!(id.timestamp(), 1);
    }

    #[test]
    fn test_ordering_follows_timestamp_then_sequence() {
        let a = SnowflakeId::from_components(10, 1023, 4095);
        let b = SnowflakeId::from_components(11, 0, 0);
        let c = SnowflakeId::from_components(11, 0, 1);
        assert!(a < b && b < c);
    }

    #[test]
    fn test_display_and_padding() {
        let id = SnowflakeId::from_raw(42);
        assert_eq!(id.to_string(), "42");
        assert_eq!(id.to_padded_string(), "00000000000000000042");
        assert_eq!(u64::from(id), 42);
    }

    #[test]
    fn test_debug_shows_fields() {
        let id = SnowflakeId::from_components(3, 2, 1);
        let dbg = format!("{id:?}");
        assert!(dbg.contains("timestamp: 3"));
        assert!(dbg.contains("worker_id: 2"));
        assert!(dbg.contains("sequence: 1"));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_is_transparent_u64() {
        let id = SnowflakeId::from_components(1, 2, 3);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, id.to_raw().to_string());
        let back: SnowflakeId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
