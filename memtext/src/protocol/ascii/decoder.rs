use crate::protocol::ascii::network;
use crate::protocol::ascii::validator::{
    declared_data_length, validate_storage_tokens, ProtocolViolation, StorageHeader,
};
use bytes::{Bytes, BytesMut};
use std::io;
use std::io::{Error, ErrorKind};
use tokio_util::codec::Decoder;

/// Client request
#[derive(Debug, PartialEq)]
pub enum AsciiRequest {
    Get(network::GetRequest),
    Gets(network::GetsRequest),
    Set(network::SetRequest),
    Add(network::AddRequest),
    Replace(network::ReplaceRequest),
    Append(network::AppendRequest),
    Prepend(network::PrependRequest),
    Cas(network::CasRequest),
    MalformedStorage(network::MalformedRequest),
    Quit(network::QuitRequest),
    Unknown(network::UnknownRequest),
}

impl AsciiRequest {
    /// Command word for logging
    pub fn name(&self) -> &'static str {
        match self {
            AsciiRequest::Get(_) => "get",
            AsciiRequest::Gets(_) => "gets",
            AsciiRequest::Set(_) => "set",
            AsciiRequest::Add(_) => "add",
            AsciiRequest::Replace(_) => "replace",
            AsciiRequest::Append(_) => "append",
            AsciiRequest::Prepend(_) => "prepend",
            AsciiRequest::Cas(_) => "cas",
            AsciiRequest::MalformedStorage(_) => "malformed",
            AsciiRequest::Quit(_) => "quit",
            AsciiRequest::Unknown(_) => "unknown",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum StorageCommand {
    Set,
    Add,
    Replace,
    Append,
    Prepend,
    Cas,
}

#[derive(Debug)]
enum RequestParserState {
    /// Waiting for a complete command line
    CommandLine,
    /// Command line accepted, reading the data block
    DataBlock {
        command: StorageCommand,
        header: StorageHeader,
        noreply: bool,
        payload: BytesMut,
    },
    /// Command line rejected, consuming the declared data block to
    /// keep the stream aligned
    DrainDataBlock {
        violation: ProtocolViolation,
        noreply: bool,
        declared: usize,
        drained: usize,
    },
}

pub struct MemcacheAsciiDecoder {
    state: RequestParserState,
}

impl Default for MemcacheAsciiDecoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Takes one newline terminated line off the buffer, terminator
/// included, or None when no full line is buffered yet
fn take_line(src: &mut BytesMut) -> Option<BytesMut> {
    let position = src.iter().position(|byte| *byte == b'\n')?;
    Some(src.split_to(position + 1))
}

fn trim_line(line: &[u8]) -> &[u8] {
    let mut end = line.len();
    if end > 0 && line[end - 1] == b'\n' {
        end -= 1;
    }
    if end > 0 && line[end - 1] == b'\r' {
        end -= 1;
    }
    &line[..end]
}

impl MemcacheAsciiDecoder {
    pub fn new() -> MemcacheAsciiDecoder {
        MemcacheAsciiDecoder {
            state: RequestParserState::CommandLine,
        }
    }

    fn init_parser(&mut self) {
        self.state = RequestParserState::CommandLine;
    }

    fn parse_command_line(
        &mut self,
        src: &mut BytesMut,
    ) -> Result<Option<AsciiRequest>, io::Error> {
        let line = match take_line(src) {
            Some(line) => line,
            None => return Ok(None),
        };
        let line = match std::str::from_utf8(trim_line(&line)) {
            Ok(line) => line,
            Err(_) => return Ok(Some(Self::unknown_request(b""))),
        };

        let tokens: Vec<&str> = line.split_whitespace().collect();
        let command = match tokens.first() {
            Some(command) => *command,
            None => return Ok(Some(Self::unknown_request(b""))),
        };

        // commands are case sensitive
        match command {
            "get" => Ok(Some(Self::retrieval_request(&tokens[1..], false))),
            "gets" => Ok(Some(Self::retrieval_request(&tokens[1..], true))),
            "set" => self.start_storage(StorageCommand::Set, &tokens[1..]),
            "add" => self.start_storage(StorageCommand::Add, &tokens[1..]),
            "replace" => self.start_storage(StorageCommand::Replace, &tokens[1..]),
            "append" => self.start_storage(StorageCommand::Append, &tokens[1..]),
            "prepend" => self.start_storage(StorageCommand::Prepend, &tokens[1..]),
            "cas" => self.start_storage(StorageCommand::Cas, &tokens[1..]),
            "quit" | "close" => Ok(Some(AsciiRequest::Quit(network::QuitRequest {}))),
            _ => Ok(Some(Self::unknown_request(command.as_bytes()))),
        }
    }

    fn unknown_request(command: &[u8]) -> AsciiRequest {
        AsciiRequest::Unknown(network::UnknownRequest {
            command: Bytes::copy_from_slice(command),
        })
    }

    fn retrieval_request(keys: &[&str], with_cas: bool) -> AsciiRequest {
        let keys = keys
            .iter()
            .map(|key| Bytes::copy_from_slice(key.as_bytes()))
            .collect();
        if with_cas {
            AsciiRequest::Gets(network::GetsRequest { keys })
        } else {
            AsciiRequest::Get(network::GetRequest { keys })
        }
    }

    /// Validates a write command line and switches the parser to the
    /// matching data block state. A broken bytes token means the data
    /// block length is unknown and the stream cannot be re-aligned.
    fn start_storage(
        &mut self,
        command: StorageCommand,
        tokens: &[&str],
    ) -> Result<Option<AsciiRequest>, io::Error> {
        let (arguments, noreply) = match tokens.split_last() {
            Some((last, rest)) if *last == "noreply" => (rest, true),
            _ => (tokens, false),
        };

        match validate_storage_tokens(arguments, command == StorageCommand::Cas) {
            Ok(header) => {
                self.state = RequestParserState::DataBlock {
                    command,
                    header,
                    noreply,
                    payload: BytesMut::new(),
                };
                Ok(None)
            }
            Err(violation) => match declared_data_length(arguments) {
                Some(declared) => {
                    debug!(
                        "Invalid {:?} command: {}",
                        command,
                        violation.to_static_string()
                    );
                    self.state = RequestParserState::DrainDataBlock {
                        violation,
                        noreply,
                        declared,
                        drained: 0,
                    };
                    Ok(None)
                }
                None => Err(Error::new(
                    ErrorKind::InvalidData,
                    "Cannot determine data block length",
                )),
            },
        }
    }

    /// Reads whole lines into the payload until it covers the declared
    /// length, then cuts the data block at exactly that length. Data
    /// may contain line terminators of its own.
    fn parse_data_block(&mut self, src: &mut BytesMut) -> Result<Option<AsciiRequest>, io::Error> {
        let RequestParserState::DataBlock {
            command,
            header,
            noreply,
            payload,
        } = &mut self.state
        else {
            return Err(Error::new(
                ErrorKind::InvalidData,
                "Incorrect parser state, no data block pending",
            ));
        };

        while payload.len() <= header.bytes {
            match take_line(src) {
                Some(line) => payload.extend_from_slice(&line),
                None => return Ok(None),
            }
        }

        let data = payload.split_to(header.bytes).freeze();
        let request = Self::storage_request(*command, header.clone(), data, *noreply);
        self.init_parser();
        Ok(Some(request))
    }

    fn parse_drain(&mut self, src: &mut BytesMut) -> Result<Option<AsciiRequest>, io::Error> {
        let RequestParserState::DrainDataBlock {
            violation,
            noreply,
            declared,
            drained,
        } = &mut self.state
        else {
            return Err(Error::new(
                ErrorKind::InvalidData,
                "Incorrect parser state, no drain pending",
            ));
        };

        while *drained <= *declared {
            match take_line(src) {
                Some(line) => *drained += line.len(),
                None => return Ok(None),
            }
        }

        let request = AsciiRequest::MalformedStorage(network::MalformedRequest {
            violation: *violation,
            noreply: *noreply,
        });
        self.init_parser();
        Ok(Some(request))
    }

    fn storage_request(
        command: StorageCommand,
        header: StorageHeader,
        data: Bytes,
        noreply: bool,
    ) -> AsciiRequest {
        if command == StorageCommand::Cas {
            return AsciiRequest::Cas(network::CasRequest {
                key: header.key,
                flags: header.flags,
                exptime: header.exptime,
                data,
                cas: header.cas,
                noreply,
            });
        }
        let request = network::StoreRequest {
            key: header.key,
            flags: header.flags,
            exptime: header.exptime,
            data,
            noreply,
        };
        match command {
            StorageCommand::Add => AsciiRequest::Add(request),
            StorageCommand::Replace => AsciiRequest::Replace(request),
            StorageCommand::Append => AsciiRequest::Append(request),
            StorageCommand::Prepend => AsciiRequest::Prepend(request),
            _ => AsciiRequest::Set(request),
        }
    }
}

impl Decoder for MemcacheAsciiDecoder {
    type Item = AsciiRequest;
    type Error = io::Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<AsciiRequest>, io::Error> {
        loop {
            match self.state {
                RequestParserState::CommandLine => {
                    if let Some(request) = self.parse_command_line(src)? {
                        return Ok(Some(request));
                    }
                    if matches!(self.state, RequestParserState::CommandLine) {
                        // no full command line buffered yet
                        return Ok(None);
                    }
                    // a data block is pending, it may already be buffered
                }
                RequestParserState::DataBlock { .. } => return self.parse_data_block(src),
                RequestParserState::DrainDataBlock { .. } => return self.parse_drain(src),
            }
        }
    }
}
