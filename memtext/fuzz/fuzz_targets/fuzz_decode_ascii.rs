#![no_main]
use libfuzzer_sys::fuzz_target;
extern crate memtext;
use bytes::{BufMut, BytesMut};
use tokio_util::codec::Decoder;

fuzz_target!(|data: &[u8]| {
    // fuzzed code goes here
    let mut codec = memtext::protocol::ascii::decoder::MemcacheAsciiDecoder::new();
    let mut src = BytesMut::with_capacity(data.len());
    src.put(data);
    while let Ok(Some(_)) = codec.decode(&mut src) {}
});
