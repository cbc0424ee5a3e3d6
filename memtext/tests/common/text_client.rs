use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpStream;
use std::time::Duration;

/// Raw protocol client used where tests assert on exact response bytes
#[allow(dead_code)]
pub struct TextClient {
    reader: BufReader<TcpStream>,
}

#[allow(dead_code)]
impl TextClient {
    pub fn connect(port: u16) -> TextClient {
        let stream = TcpStream::connect(("127.0.0.1", port)).unwrap();
        stream.set_nodelay(true).unwrap();
        stream
            .set_read_timeout(Some(Duration::from_secs(5)))
            .unwrap();
        TextClient {
            reader: BufReader::new(stream),
        }
    }

    pub fn send(&mut self, data: &[u8]) {
        let stream = self.reader.get_mut();
        stream.write_all(data).unwrap();
        stream.flush().unwrap();
    }

    pub fn read_line(&mut self) -> String {
        let mut line = String::new();
        self.reader.read_line(&mut line).unwrap();
        line
    }

    pub fn read_exact(&mut self, len: usize) -> Vec<u8> {
        let mut buffer = vec![0u8; len];
        self.reader.read_exact(&mut buffer).unwrap();
        buffer
    }

    /// Returns true once the server has closed its end of the connection
    pub fn is_closed(&mut self) -> bool {
        let mut byte = [0u8; 1];
        matches!(self.reader.read(&mut byte), Ok(0))
    }
}
