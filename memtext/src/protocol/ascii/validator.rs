use bytes::Bytes;

/// Longest accepted key, exclusive
pub const MAX_KEY_LENGTH: usize = 250;

/// Largest accepted flags value, exclusive
pub const MAX_FLAGS_VALUE: u32 = 65535;

/// First protocol rule a write command breaks, checks run in a fixed
/// order and the first violation wins
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProtocolViolation {
    ArgumentCount,
    Key,
    Flags,
    Exptime,
    DataLength,
    CasToken,
}

impl ProtocolViolation {
    /// Reason phrase reported to the client after the CLIENT_ERROR prefix
    pub fn to_static_string(&self) -> &'static str {
        match self {
            ProtocolViolation::ArgumentCount => "Incorrect number of arguments",
            ProtocolViolation::Key => "Key is too long or contains control characters",
            ProtocolViolation::Flags => "Flags must be a number (16-bit unsigned integer)",
            ProtocolViolation::Exptime => "Expiration time must be a number",
            ProtocolViolation::DataLength => "bytes must be a positive number",
            ProtocolViolation::CasToken => "cas_unique must be a positive number",
        }
    }
}

/// Validated header of a write command, the data block is read
/// separately
#[derive(Clone, Debug, PartialEq)]
pub struct StorageHeader {
    pub(crate) key: Bytes,
    pub(crate) flags: u16,
    pub(crate) exptime: i64,
    pub(crate) bytes: usize,
    pub(crate) cas: u64,
}

fn is_unsigned_number(token: &str) -> bool {
    !token.is_empty() && token.bytes().all(|byte| byte.is_ascii_digit())
}

// a single leading minus is the only sign the protocol accepts
fn is_signed_number(token: &str) -> bool {
    is_unsigned_number(token.strip_prefix('-').unwrap_or(token))
}

fn is_valid_key(token: &str) -> bool {
    token.len() < MAX_KEY_LENGTH
        && token
            .bytes()
            .all(|byte| byte.is_ascii_alphanumeric() || byte == b'_')
}

/// Checks the arguments of a write command, `tokens` holds everything
/// after the command word with any noreply marker already stripped.
/// Checks run in a fixed order: argument count, key, flags, exptime,
/// data length and finally the cas token.
pub fn validate_storage_tokens(
    tokens: &[&str],
    has_cas: bool,
) -> Result<StorageHeader, ProtocolViolation> {
    let expected_tokens = if has_cas { 5 } else { 4 };
    if tokens.len() != expected_tokens {
        return Err(ProtocolViolation::ArgumentCount);
    }

    let key = tokens[0];
    if !is_valid_key(key) {
        return Err(ProtocolViolation::Key);
    }

    if !is_unsigned_number(tokens[1]) {
        return Err(ProtocolViolation::Flags);
    }
    let flags = match tokens[1].parse::<u32>() {
        Ok(value) if value < MAX_FLAGS_VALUE => value as u16,
        _ => return Err(ProtocolViolation::Flags),
    };

    if !is_signed_number(tokens[2]) {
        return Err(ProtocolViolation::Exptime);
    }
    let exptime = match tokens[2].parse::<i64>() {
        Ok(value) => value,
        Err(_) => return Err(ProtocolViolation::Exptime),
    };

    if !is_unsigned_number(tokens[3]) {
        return Err(ProtocolViolation::DataLength);
    }
    let bytes = match tokens[3].parse::<usize>() {
        Ok(value) => value,
        Err(_) => return Err(ProtocolViolation::DataLength),
    };

    let mut cas = 0;
    if has_cas {
        if !is_unsigned_number(tokens[4]) {
            return Err(ProtocolViolation::CasToken);
        }
        cas = match tokens[4].parse::<u64>() {
            Ok(value) => value,
            Err(_) => return Err(ProtocolViolation::CasToken),
        };
    }

    Ok(StorageHeader {
        key: Bytes::copy_from_slice(key.as_bytes()),
        flags,
        exptime,
        bytes,
        cas,
    })
}

/// Declared data block length of a write command that failed
/// validation. The bytes token sits at a fixed position, so the
/// stream can be drained and kept aligned even when other arguments
/// are broken. None means the stream position is lost.
pub fn declared_data_length(tokens: &[&str]) -> Option<usize> {
    let token = tokens.get(3)?;
    if !is_unsigned_number(token) {
        return None;
    }
    token.parse::<usize>().ok()
}
