//! Little-endian read/write helpers for the wire codec. The read macros are
//! a direct port of the teacher's `core::byte_operations`; the write macros
//! are the mirror image, added because the update-field wire format
//! (spec.md §4.4) needs to *produce* bytes, not just parse them.

#[macro_export]
macro_rules! read_u8 {
    ($bytes:expr, $offset:expr) => {{
        let val = $bytes[$offset];
        $offset += 1;
        val
    }};
}

#[macro_export]
macro_rules! read_u16 {
    ($bytes:expr, $offset:expr) => {{
        let val = u16::from_le_bytes([$bytes[$offset], $bytes[$offset + 1]]);
        $offset += 2;
        val
    }};
}

#[macro_export]
macro_rules! read_u32 {
    ($bytes:expr, $offset:expr) => {{
        let val = u32::from_le_bytes([
            $bytes[$offset],
            $bytes[$offset + 1],
            $bytes[$offset + 2],
            $bytes[$offset + 3],
        ]);
        $offset += 4;
        val
    }};
}

#[macro_export]
macro_rules! read_i32 {
    ($bytes:expr, $offset:expr) => {{
        let val = i32::from_le_bytes([
            $bytes[$offset],
            $bytes[$offset + 1],
            $bytes[$offset + 2],
            $bytes[$offset + 3],
        ]);
        $offset += 4;
        val
    }};
}

#[macro_export]
macro_rules! read_u64 {
    ($bytes:expr, $offset:expr) => {{
        let val = u64::from_le_bytes([
            $bytes[$offset],
            $bytes[$offset + 1],
            $bytes[$offset + 2],
            $bytes[$offset + 3],
            $bytes[$offset + 4],
            $bytes[$offset + 5],
            $bytes[$offset + 6],
            $bytes[$offset + 7],
        ]);
        $offset += 8;
        val
    }};
}

/// Append a little-endian `u8` to `buf`.
#[macro_export]
macro_rules! write_u8 {
    ($buf:expr, $val:expr) => {
        $buf.push($val as u8)
    };
}

/// Append a little-endian `u16` to `buf`.
#[macro_export]
macro_rules! write_u16 {
    ($buf:expr, $val:expr) => {
        $buf.extend_from_slice(&($val as u16).to_le_bytes())
    };
}

/// Append a little-endian `u32` to `buf`.
#[macro_export]
macro_rules! write_u32 {
    ($buf:expr, $val:expr) => {
        $buf.extend_from_slice(&($val as u32).to_le_bytes())
    };
}

/// Append a little-endian `u64` to `buf`.
#[macro_export]
macro_rules! write_u64 {
    ($buf:expr, $val:expr) => {
        $buf.extend_from_slice(&($val as u64).to_le_bytes())
    };
}

/// Append a little-endian `f32` to `buf`.
#[macro_export]
macro_rules! write_f32 {
    ($buf:expr, $val:expr) => {
        $buf.extend_from_slice(&($val as f32).to_le_bytes())
    };
}

/// Append a length-prefixed (u32 length, NUL included) UTF-8 string, matching
/// the wire convention described in spec.md §6.
pub fn push_length_prefixed_string(buf: &mut Vec<u8>, s: &str) {
    let mut bytes = s.as_bytes().to_vec();
    bytes.push(0);
    buf.extend_from_slice(&(bytes.len() as u32).to_le_bytes());
    buf.extend_from_slice(&bytes);
}

#[cfg(test)]
mod tests {
    #[test]
    fn read_u32_round_trips_with_write_u32() {
        let mut buf: Vec<u8> = Vec::new();
        write_u32!(buf, 0x12345678u32);
        let mut offset = 0;
        assert_eq!(read_u32!(buf, offset), 0x12345678u32);
        assert_eq!(offset, 4);
    }

    #[test]
    fn read_u64_round_trips_with_write_u64() {
        let mut buf: Vec<u8> = Vec::new();
        write_u64!(buf, 0xdeadbeefcafef00du64);
        let mut offset = 0;
        assert_eq!(read_u64!(buf, offset), 0xdeadbeefcafef00du64);
        assert_eq!(offset, 8);
    }

    #[test]
    fn length_prefixed_string_includes_trailing_nul_in_length() {
        let mut buf = Vec::new();
        super::push_length_prefixed_string(&mut buf, "hi");
        let mut offset = 0;
        let len = read_u32!(buf, offset);
        assert_eq!(len, 3);
        assert_eq!(&buf[offset..offset + 2], b"hi");
        assert_eq!(buf[offset + 2], 0);
    }
}
