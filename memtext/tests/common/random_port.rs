use lazy_static::lazy_static;

use std::sync::Mutex;

const STARTING_PORT: u16 = 21000;
pub struct PseudoRandomMemtextdPort {
    port: u16,
}

impl PseudoRandomMemtextdPort {
    pub fn new() -> PseudoRandomMemtextdPort {
        PseudoRandomMemtextdPort {
            port: STARTING_PORT,
        }
    }

    pub fn get_next_port(&mut self) -> u16 {
        self.port += 10;
        self.port
    }
}

lazy_static! {
    pub static ref PSEUDO_RANDOM_PORT: Mutex<PseudoRandomMemtextdPort> =
        Mutex::new(PseudoRandomMemtextdPort::new());
}
