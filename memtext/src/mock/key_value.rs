use bytes::{BufMut, Bytes, BytesMut};
use rand::Rng;

pub struct KeyValue {
    pub key: Bytes,
    pub value: Bytes,
}

/// Generates key value pairs with sizes drawn from 5 up to the given
/// maximums, keys stay within the character set the protocol accepts
pub fn generate_random_with_max_size(
    capacity: usize,
    max_key_size: usize,
    max_value_size: usize,
) -> Vec<KeyValue> {
    let mut rng = rand::rng();
    (0..capacity)
        .map(|_| {
            let key_size = rng.random_range(5..max_key_size);
            let value_size = rng.random_range(5..max_value_size);
            KeyValue {
                key: create_random_value(key_size),
                value: create_random_value(value_size),
            }
        })
        .collect()
}

pub fn generate_random_with_size(
    capacity: usize,
    key_size: usize,
    value_size: usize,
) -> Vec<KeyValue> {
    (0..capacity)
        .map(|_| KeyValue {
            key: create_random_value(key_size),
            value: create_random_value(value_size),
        })
        .collect()
}

pub fn create_random_value(capacity: usize) -> Bytes {
    let mut rng = rand::rng();
    let mut value = BytesMut::with_capacity(capacity);
    for _ in 0..capacity {
        value.put_u8(rng.random_range(b'a'..=b'z'));
    }
    value.freeze()
}
