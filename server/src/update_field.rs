//! The per-entity typed field array and its dirty-bit mask (spec.md §4.4).
//! Grounded on `ObjectManager.py`'s `UpdatePacketFactory`/`set_int32`/
//! `get_int32`/`_get_fields_update` family: a flat array of 32-bit words,
//! a parallel bitmask, and a field-delta wire layout that lists changed
//! words in ascending index order.

use core::{read_u32, write_u32, write_u8};

/// Flat per-kind field index enumeration (design note: "keep them as a
/// single flat enumeration per kind so encode/decode stay branchless").
/// Each kind's range starts where its parent's ends, matching spec.md's
/// "strict superset of its parent's field layout".
pub mod fields {
    pub const OBJECT_FIELD_GUID: usize = 0; // u64, occupies 0 and 1
    pub const OBJECT_FIELD_TYPE: usize = 2; // u32
    pub const OBJECT_FIELD_ENTRY: usize = 3; // u32
    pub const OBJECT_FIELD_SCALE_X: usize = 4; // f32
    pub const OBJECT_FIELD_COUNT: usize = 5;

    pub const UNIT_FIELD_HEALTH: usize = OBJECT_FIELD_COUNT; // u32
    pub const UNIT_FIELD_MAX_HEALTH: usize = UNIT_FIELD_HEALTH + 1; // u32
    pub const UNIT_FIELD_LEVEL: usize = UNIT_FIELD_HEALTH + 2; // u32
    pub const UNIT_FIELD_FLAGS: usize = UNIT_FIELD_HEALTH + 3; // u32
    pub const UNIT_FIELD_DISPLAY_ID: usize = UNIT_FIELD_HEALTH + 4; // u32
    pub const UNIT_FIELD_FACTION_TEMPLATE: usize = UNIT_FIELD_HEALTH + 5; // u32
    pub const UNIT_FIELD_COUNT: usize = UNIT_FIELD_HEALTH + 6;

    pub const PLAYER_FIELD_GOLD: usize = UNIT_FIELD_COUNT; // u64, two words
    pub const PLAYER_FIELD_COUNT: usize = PLAYER_FIELD_GOLD + 2;

    pub const GAMEOBJECT_FIELD_DISPLAY_ID: usize = OBJECT_FIELD_COUNT; // u32
    pub const GAMEOBJECT_FIELD_FLAGS: usize = GAMEOBJECT_FIELD_DISPLAY_ID + 1; // u32
    pub const GAMEOBJECT_FIELD_COUNT: usize = GAMEOBJECT_FIELD_FLAGS + 1;

    pub const ITEM_FIELD_OWNER: usize = OBJECT_FIELD_COUNT; // u64, two words
    pub const ITEM_FIELD_STACK_COUNT: usize = ITEM_FIELD_OWNER + 2; // u32
    pub const ITEM_FIELD_COUNT: usize = ITEM_FIELD_STACK_COUNT + 1;

    pub const CONTAINER_FIELD_SLOT_COUNT: usize = ITEM_FIELD_COUNT; // u32
    pub const CONTAINER_FIELD_COUNT: usize = CONTAINER_FIELD_SLOT_COUNT + 1;
}

/// Per-entity-kind field layout, used to size an [`UpdateFieldArray`] and to
/// validate writes stay inside the kind's own range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Object,
    Unit,
    Player,
    GameObject,
    Item,
    Container,
}

impl EntityKind {
    pub fn field_count(self) -> usize {
        match self {
            EntityKind::Object => fields::OBJECT_FIELD_COUNT,
            EntityKind::Unit => fields::UNIT_FIELD_COUNT,
            EntityKind::Player => fields::PLAYER_FIELD_COUNT,
            EntityKind::GameObject => fields::GAMEOBJECT_FIELD_COUNT,
            EntityKind::Item => fields::ITEM_FIELD_COUNT,
            EntityKind::Container => fields::CONTAINER_FIELD_COUNT,
        }
    }
}

/// Dirty-bit mask over an [`UpdateFieldArray`]'s word slots.
#[derive(Debug, Clone)]
pub struct UpdateMask {
    bits: Vec<bool>,
}

impl UpdateMask {
    fn new(field_count: usize) -> Self {
        UpdateMask { bits: vec![false; field_count] }
    }

    fn set(&mut self, index: usize) {
        self.bits[index] = true;
    }

    pub fn is_set(&self, index: usize) -> bool {
        self.bits[index]
    }

    fn reset(&mut self) {
        self.bits.iter_mut().for_each(|b| *b = false);
    }

    /// Number of 32-bit mask blocks needed to cover every field bit.
    pub fn block_count(&self) -> u8 {
        ((self.bits.len() + 31) / 32) as u8
    }

    /// Pack the bitmask into little-endian 32-bit words, one bit per field.
    fn to_words(&self) -> Vec<u32> {
        let mut words = vec![0u32; self.block_count() as usize];
        for (i, &set) in self.bits.iter().enumerate() {
            if set {
                words[i / 32] |= 1 << (i % 32);
            }
        }
        words
    }
}

/// A flat array of 32-bit word slots plus its dirty mask (spec.md §4.4).
/// 64-bit fields occupy two adjacent slots and set two adjacent mask bits.
#[derive(Debug, Clone)]
pub struct UpdateFieldArray {
    values: Vec<u32>,
    mask: UpdateMask,
}

impl UpdateFieldArray {
    pub fn new(kind: EntityKind) -> Self {
        let count = kind.field_count();
        UpdateFieldArray { values: vec![0; count], mask: UpdateMask::new(count) }
    }

    fn check_index(&self, index: usize) {
        assert!(index < self.values.len(), "update field index {index} out of range");
    }

    pub fn set_int32(&mut self, index: usize, value: i32) {
        self.check_index(index);
        self.values[index] = value as u32;
        self.mask.set(index);
    }

    pub fn get_int32(&self, index: usize) -> i32 {
        self.values[index] as i32
    }

    pub fn set_uint32(&mut self, index: usize, value: u32) {
        self.check_index(index);
        self.values[index] = value;
        self.mask.set(index);
    }

    pub fn get_uint32(&self, index: usize) -> u32 {
        self.values[index]
    }

    pub fn set_float(&mut self, index: usize, value: f32) {
        self.check_index(index);
        self.values[index] = value.to_bits();
        self.mask.set(index);
    }

    pub fn get_float(&self, index: usize) -> f32 {
        f32::from_bits(self.values[index])
    }

    pub fn set_int64(&mut self, index: usize, value: i64) {
        self.check_index(index + 1);
        let bytes = (value as u64).to_le_bytes();
        self.values[index] = u32::from_le_bytes(bytes[0..4].try_into().unwrap());
        self.values[index + 1] = u32::from_le_bytes(bytes[4..8].try_into().unwrap());
        self.mask.set(index);
        self.mask.set(index + 1);
    }

    pub fn get_int64(&self, index: usize) -> i64 {
        self.get_uint64(index) as i64
    }

    pub fn set_uint64(&mut self, index: usize, value: u64) {
        self.check_index(index + 1);
        let bytes = value.to_le_bytes();
        self.values[index] = u32::from_le_bytes(bytes[0..4].try_into().unwrap());
        self.values[index + 1] = u32::from_le_bytes(bytes[4..8].try_into().unwrap());
        self.mask.set(index);
        self.mask.set(index + 1);
    }

    pub fn get_uint64(&self, index: usize) -> u64 {
        let mut bytes = [0u8; 8];
        bytes[0..4].copy_from_slice(&self.values[index].to_le_bytes());
        bytes[4..8].copy_from_slice(&self.values[index + 1].to_le_bytes());
        u64::from_le_bytes(bytes)
    }

    /// Clear the dirty mask. Values are left untouched (spec.md §4.4:
    /// "a reset clears all bits without zeroing values").
    pub fn reset(&mut self) {
        self.mask.reset();
    }

    pub fn is_set(&self, index: usize) -> bool {
        self.mask.is_set(index)
    }

    /// `{blockCount:u8, maskWords:[u32; blockCount]}` followed, in strictly
    /// ascending index order, by the value word of each set mask bit.
    pub fn field_delta_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        write_u8!(buf, self.mask.block_count());
        for word in self.mask.to_words() {
            write_u32!(buf, word);
        }
        for (i, &word) in self.values.iter().enumerate() {
            if self.mask.is_set(i) {
                write_u32!(buf, word);
            }
        }
        buf
    }

    /// A field-delta as if every populated slot's mask bit were set — used
    /// for CREATE_OBJECT's initial full sync (spec.md §4.4).
    pub fn full_snapshot_bytes(&self) -> Vec<u8> {
        let mut full = self.clone();
        for i in 0..full.values.len() {
            full.mask.set(i);
        }
        full.field_delta_bytes()
    }
}

/// Decode a field-delta byte slice back into `(index, value_word)` pairs, in
/// the order they were written. Used by tests to assert mask/value ordering
/// (spec.md invariant 4) without re-deriving the encoder's own bookkeeping.
pub fn decode_field_delta(bytes: &[u8]) -> Vec<(usize, u32)> {
    let mut offset = 0usize;
    let block_count = read_u8_at(bytes, &mut offset) as usize;
    let mut mask_words = Vec::with_capacity(block_count);
    for _ in 0..block_count {
        mask_words.push(read_u32!(bytes, offset));
    }
    let mut out = Vec::new();
    for block in 0..block_count {
        for bit in 0..32 {
            if mask_words[block] & (1 << bit) != 0 {
                let index = block * 32 + bit;
                let value = read_u32!(bytes, offset);
                out.push((index, value));
            }
        }
    }
    out
}

fn read_u8_at(bytes: &[u8], offset: &mut usize) -> u8 {
    core::read_u8!(bytes, *offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_every_scalar_kind() {
        // `ITEM_FIELD_OWNER`/`UNIT_FIELD_HEALTH`/etc alias the same slots
        // across sibling kinds (each kind's own array only ever holds one
        // kind's fields at a time) — exercising every scalar width on a
        // single `Player` array must stick to indices that don't overlap
        // *within* that one kind. `UNIT_FIELD_MAX_HEALTH` is reused below
        // purely as a scratch two-word pair for the int64 check, not for its
        // usual u32 meaning.
        let mut arr = UpdateFieldArray::new(EntityKind::Player);
        arr.set_int32(fields::OBJECT_FIELD_ENTRY, -7);
        arr.set_uint32(fields::UNIT_FIELD_HEALTH, 42);
        arr.set_float(fields::OBJECT_FIELD_SCALE_X, 1.5);
        arr.set_int64(fields::UNIT_FIELD_MAX_HEALTH, -123456789012);
        arr.set_uint64(fields::PLAYER_FIELD_GOLD, 0xdead_beef_cafe_f00d);

        assert_eq!(arr.get_int32(fields::OBJECT_FIELD_ENTRY), -7);
        assert_eq!(arr.get_uint32(fields::UNIT_FIELD_HEALTH), 42);
        assert_eq!(arr.get_float(fields::OBJECT_FIELD_SCALE_X), 1.5);
        assert_eq!(arr.get_int64(fields::UNIT_FIELD_MAX_HEALTH), -123456789012);
        assert_eq!(arr.get_uint64(fields::PLAYER_FIELD_GOLD), 0xdead_beef_cafe_f00d);
    }

    #[test]
    fn reset_clears_mask_but_preserves_values() {
        let mut arr = UpdateFieldArray::new(EntityKind::Unit);
        arr.set_uint32(fields::UNIT_FIELD_FLAGS, 3);
        assert!(arr.is_set(fields::UNIT_FIELD_FLAGS));
        arr.reset();
        assert!(!arr.is_set(fields::UNIT_FIELD_FLAGS));
        assert_eq!(arr.get_uint32(fields::UNIT_FIELD_FLAGS), 3);
    }

    #[test]
    fn field_delta_lists_set_bits_in_ascending_index_order() {
        let mut arr = UpdateFieldArray::new(EntityKind::Player);
        arr.set_uint32(fields::UNIT_FIELD_FLAGS, 7);
        arr.set_float(fields::OBJECT_FIELD_SCALE_X, 2.0);

        let bytes = arr.field_delta_bytes();
        let decoded = decode_field_delta(&bytes);
        assert_eq!(decoded.len(), 2);
        assert_eq!(decoded[0].0, fields::OBJECT_FIELD_SCALE_X);
        assert_eq!(decoded[1].0, fields::UNIT_FIELD_FLAGS);
        assert_eq!(f32::from_bits(decoded[0].1), 2.0);
        assert_eq!(decoded[1].1, 7);
    }

    #[test]
    #[should_panic]
    fn writing_outside_kind_range_panics() {
        let mut arr = UpdateFieldArray::new(EntityKind::Object);
        arr.set_uint32(fields::UNIT_FIELD_HEALTH, 1);
    }
}
