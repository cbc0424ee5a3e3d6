use crate::protocol::ascii::decoder::{AsciiRequest, MemcacheAsciiDecoder};
use crate::protocol::ascii::encoder::{AsciiResponse, MemcacheAsciiEncoder, ResponseMessage};
use bytes::BytesMut;
use std::io;
use std::io::{Error, ErrorKind};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio_util::codec::Decoder;

pub struct MemcacheAsciiConnection {
    stream: TcpStream,
    decoder: MemcacheAsciiDecoder,
    encoder: MemcacheAsciiEncoder,
    buffer: BytesMut,
}

impl MemcacheAsciiConnection {
    pub fn new(socket: TcpStream) -> Self {
        MemcacheAsciiConnection {
            stream: socket,
            decoder: MemcacheAsciiDecoder::new(),
            encoder: MemcacheAsciiEncoder::new(),
            buffer: BytesMut::with_capacity(4096),
        }
    }

    pub async fn read_frame(&mut self) -> Result<Option<AsciiRequest>, io::Error> {
        loop {
            // Attempt to parse a frame from the buffered data. If enough data
            // has been buffered, the frame is returned.
            if let Some(frame) = self.decoder.decode(&mut self.buffer)? {
                return Ok(Some(frame));
            }

            // There is not enough buffered data to read a frame. Attempt to
            // read more data from the socket.
            //
            // On success, the number of bytes is returned. `0` indicates "end
            // of stream".
            if 0 == self.stream.read_buf(&mut self.buffer).await? {
                // The remote closed the connection. For this to be a clean
                // shutdown, there should be no data in the read buffer. If
                // there is, this means that the peer closed the socket while
                // sending a frame.
                if self.buffer.is_empty() {
                    return Ok(None);
                } else {
                    return Err(Error::new(
                        ErrorKind::ConnectionReset,
                        "Connection reset by peer",
                    ));
                }
            }
        }
    }

    pub async fn write(&mut self, msg: &AsciiResponse) -> io::Result<()> {
        let message = self.encoder.encode_message(msg);
        self.write_msg_to_stream(message).await
    }

    async fn write_msg_to_stream(&mut self, msg: ResponseMessage) -> io::Result<()> {
        self.stream.write_all(&msg.data[..]).await
    }

    pub async fn shutdown(&mut self) -> io::Result<()> {
        self.stream.shutdown().await
    }
}
