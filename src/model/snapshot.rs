//! Persisted widget snapshot and its binary codec.
//!
//! A snapshot is created when the host asks the widget to save its instance
//! state and consumed once when the host restores it. It is a value object:
//! fields are private and there are no setters.
//!
//! # Wire layout
//!
//! All integers are big-endian.
//!
//! ```text
//! [parent_len: u32][parent state: parent_len bytes]
//! [is_visible: i32][speech_mode: i32][search_icon: i32][nav_icon: i32]
//! [hint_len: i32 (-1 = no hint)][hint: hint_len bytes of UTF-8]
//! ```
//!
//! The icon ids are read back in exactly the order they are written
//! (search icon first, then navigation icon).

use crate::model::{IconId, SnapshotError};
use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Cursor, Read, Write};

const VIEW_VISIBLE: i32 = 1;
const VIEW_INVISIBLE: i32 = 0;
const NULL_STRING: i32 = -1;

/// Serialized subset of widget state preserved across a lifecycle boundary.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PersistedSnapshot {
    parent_state: Vec<u8>,
    search_bar_visible: bool,
    speech_mode: bool,
    search_icon: IconId,
    nav_icon: IconId,
    hint: Option<String>,
}

impl PersistedSnapshot {
    /// Capture a snapshot. Used by `SearchBar::save`.
    pub fn new(
        parent_state: Vec<u8>,
        search_bar_visible: bool,
        speech_mode: bool,
        search_icon: IconId,
        nav_icon: IconId,
        hint: Option<String>,
    ) -> Self {
        Self {
            parent_state,
            search_bar_visible,
            speech_mode,
            search_icon,
            nav_icon,
            hint,
        }
    }

    /// Opaque state of the parent rendering surface.
    pub fn parent_state(&self) -> &[u8] {
        &self.parent_state
    }

    /// Whether the bar was expanded.
    pub fn search_bar_visible(&self) -> bool {
        self.search_bar_visible
    }

    /// Whether speech mode was on.
    pub fn speech_mode(&self) -> bool {
        self.speech_mode
    }

    /// Assigned search icon.
    pub fn search_icon(&self) -> IconId {
        self.search_icon
    }

    /// Assigned navigation icon.
    pub fn nav_icon(&self) -> IconId {
        self.nav_icon
    }

    /// Hint text, if one was set.
    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }

    /// Encode into the wire layout described in the module docs.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::InvalidLength`] when the parent state or the
    /// hint is too long for its length prefix.
    pub fn encode(&self) -> Result<Vec<u8>, SnapshotError> {
        let parent_len = u32::try_from(self.parent_state.len())
            .map_err(|_| too_long("parent_state", self.parent_state.len()))?;
        let hint_len = match &self.hint {
            Some(hint) => i32::try_from(hint.len()).map_err(|_| too_long("hint", hint.len()))?,
            None => NULL_STRING,
        };

        let mut out = Vec::with_capacity(
            4 + self.parent_state.len() + 20 + self.hint.as_ref().map_or(0, String::len),
        );
        out.write_u32::<BigEndian>(parent_len)?;
        out.write_all(&self.parent_state)?;
        out.write_i32::<BigEndian>(flag(self.search_bar_visible))?;
        out.write_i32::<BigEndian>(flag(self.speech_mode))?;
        out.write_i32::<BigEndian>(self.search_icon.raw())?;
        out.write_i32::<BigEndian>(self.nav_icon.raw())?;
        out.write_i32::<BigEndian>(hint_len)?;
        if let Some(hint) = &self.hint {
            out.write_all(hint.as_bytes())?;
        }
        Ok(out)
    }

    /// Decode from the wire layout.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError`] for truncated input, out-of-range flags or
    /// lengths, non-UTF-8 hints, and trailing bytes.
    pub fn decode(bytes: &[u8]) -> Result<Self, SnapshotError> {
        let mut cursor = Cursor::new(bytes);

        let parent_len = cursor
            .read_u32::<BigEndian>()
            .map_err(|_| SnapshotError::Truncated {
                field: "parent_len",
            })? as usize;
        let parent_state = read_exact(&mut cursor, parent_len, "parent_state")?;

        let search_bar_visible = read_flag(&mut cursor, "is_visible")?;
        let speech_mode = read_flag(&mut cursor, "speech_mode")?;
        let search_icon = IconId::new(read_i32(&mut cursor, "search_icon")?);
        let nav_icon = IconId::new(read_i32(&mut cursor, "nav_icon")?);

        let hint = match read_i32(&mut cursor, "hint_len")? {
            NULL_STRING => None,
            len if len < 0 => {
                return Err(SnapshotError::InvalidLength {
                    field: "hint",
                    length: i64::from(len),
                })
            }
            len => {
                let raw = read_exact(&mut cursor, len as usize, "hint")?;
                Some(String::from_utf8(raw).map_err(|_| SnapshotError::InvalidUtf8)?)
            }
        };

        let consumed = cursor.position() as usize;
        if consumed != bytes.len() {
            return Err(SnapshotError::TrailingBytes {
                count: bytes.len() - consumed,
            });
        }

        Ok(Self {
            parent_state,
            search_bar_visible,
            speech_mode,
            search_icon,
            nav_icon,
            hint,
        })
    }
}

fn flag(value: bool) -> i32 {
    if value {
        VIEW_VISIBLE
    } else {
        VIEW_INVISIBLE
    }
}

fn too_long(field: &'static str, len: usize) -> SnapshotError {
    SnapshotError::InvalidLength {
        field,
        length: i64::try_from(len).unwrap_or(i64::MAX),
    }
}

fn read_i32(cursor: &mut Cursor<&[u8]>, field: &'static str) -> Result<i32, SnapshotError> {
    cursor
        .read_i32::<BigEndian>()
        .map_err(|_| SnapshotError::Truncated { field })
}

fn read_flag(cursor: &mut Cursor<&[u8]>, field: &'static str) -> Result<bool, SnapshotError> {
    match read_i32(cursor, field)? {
        VIEW_VISIBLE => Ok(true),
        VIEW_INVISIBLE => Ok(false),
        value => Err(SnapshotError::InvalidFlag { field, value }),
    }
}

fn read_exact(
    cursor: &mut Cursor<&[u8]>,
    len: usize,
    field: &'static str,
) -> Result<Vec<u8>, SnapshotError> {
    let remaining = cursor.get_ref().len() - cursor.position() as usize;
    if len > remaining {
        return Err(SnapshotError::Truncated { field });
    }
    let mut buf = vec![0u8; len];
    cursor
        .read_exact(&mut buf)
        .map_err(|_| SnapshotError::Truncated { field })?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PersistedSnapshot {
        PersistedSnapshot::new(
            b"{\"inset\":4}".to_vec(),
            true,
            false,
            IconId::new(11),
            IconId::new(22),
            Some("search".to_string()),
        )
    }

    #[test]
    fn encode_writes_fields_in_documented_order() {
        let snapshot = PersistedSnapshot::new(
            vec![0xAA],
            true,
            true,
            IconId::new(3),
            IconId::new(4),
            None,
        );
        let bytes = snapshot.encode().unwrap();
        assert_eq!(
            bytes,
            vec![
                0, 0, 0, 1, 0xAA, // parent
                0, 0, 0, 1, // is_visible
                0, 0, 0, 1, // speech_mode
                0, 0, 0, 3, // search_icon
                0, 0, 0, 4, // nav_icon
                0xFF, 0xFF, 0xFF, 0xFF, // null hint
            ]
        );
    }

    #[test]
    fn decode_reads_icons_in_write_order() {
        let decoded = PersistedSnapshot::decode(&sample().encode().unwrap()).unwrap();
        assert_eq!(decoded.search_icon(), IconId::new(11));
        assert_eq!(decoded.nav_icon(), IconId::new(22));
    }

    #[test]
    fn decode_restores_every_field() {
        let original = sample();
        let decoded = PersistedSnapshot::decode(&original.encode().unwrap()).unwrap();
        assert_eq!(decoded, original);
        assert_eq!(decoded.hint(), Some("search"));
        assert_eq!(decoded.parent_state(), b"{\"inset\":4}");
    }

    #[test]
    fn absent_hint_stays_absent() {
        let snapshot = PersistedSnapshot::new(vec![], false, false, IconId::UNSET, IconId::UNSET, None);
        let decoded = PersistedSnapshot::decode(&snapshot.encode().unwrap()).unwrap();
        assert_eq!(decoded.hint(), None);
    }

    #[test]
    fn empty_hint_is_distinct_from_absent() {
        let snapshot = PersistedSnapshot::new(
            vec![],
            false,
            false,
            IconId::UNSET,
            IconId::UNSET,
            Some(String::new()),
        );
        let decoded = PersistedSnapshot::decode(&snapshot.encode().unwrap()).unwrap();
        assert_eq!(decoded.hint(), Some(""));
    }

    #[test]
    fn empty_input_is_truncated() {
        assert_eq!(
            PersistedSnapshot::decode(&[]),
            Err(SnapshotError::Truncated {
                field: "parent_len"
            })
        );
    }

    #[test]
    fn every_strict_prefix_fails_to_decode() {
        let bytes = sample().encode().unwrap();
        for len in 0..bytes.len() {
            assert!(
                PersistedSnapshot::decode(&bytes[..len]).is_err(),
                "prefix of length {} should not decode",
                len
            );
        }
    }

    #[test]
    fn parent_length_past_end_is_truncated() {
        let bytes = [0, 0, 0, 50, 1, 2, 3];
        assert_eq!(
            PersistedSnapshot::decode(&bytes),
            Err(SnapshotError::Truncated {
                field: "parent_state"
            })
        );
    }

    #[test]
    fn out_of_range_flag_is_rejected() {
        let mut bytes = sample().encode().unwrap();
        // is_visible starts after the 4-byte length and 11 parent bytes
        bytes[4 + 11 + 3] = 2;
        assert_eq!(
            PersistedSnapshot::decode(&bytes),
            Err(SnapshotError::InvalidFlag {
                field: "is_visible",
                value: 2
            })
        );
    }

    #[test]
    fn negative_hint_length_is_rejected() {
        let mut bytes = PersistedSnapshot::default().encode().unwrap();
        let len = bytes.len();
        bytes[len - 4..].copy_from_slice(&(-5i32).to_be_bytes());
        assert_eq!(
            PersistedSnapshot::decode(&bytes),
            Err(SnapshotError::InvalidLength {
                field: "hint",
                length: -5
            })
        );
    }

    #[test]
    fn invalid_utf8_hint_is_rejected() {
        let mut bytes = PersistedSnapshot::default().encode().unwrap();
        let len = bytes.len();
        bytes[len - 4..].copy_from_slice(&2i32.to_be_bytes());
        bytes.extend_from_slice(&[0xC3, 0x28]);
        assert_eq!(
            PersistedSnapshot::decode(&bytes),
            Err(SnapshotError::InvalidUtf8)
        );
    }

    #[test]
    fn trailing_bytes_are_rejected() {
        let mut bytes = sample().encode().unwrap();
        bytes.extend_from_slice(&[0, 0]);
        assert_eq!(
            PersistedSnapshot::decode(&bytes),
            Err(SnapshotError::TrailingBytes { count: 2 })
        );
    }

    #[test]
    fn oversized_length_reports_invalid_length() {
        assert_eq!(
            too_long("hint", usize::MAX),
            SnapshotError::InvalidLength {
                field: "hint",
                length: i64::MAX
            }
        );
        assert_eq!(
            too_long("parent_state", 1 << 33),
            SnapshotError::InvalidLength {
                field: "parent_state",
                length: 1 << 33
            }
        );
    }

    #[test]
    fn write_failures_keep_their_kind() {
        let err = SnapshotError::from(std::io::Error::from(std::io::ErrorKind::WriteZero));
        assert_eq!(err, SnapshotError::Write(std::io::ErrorKind::WriteZero));
    }
}
