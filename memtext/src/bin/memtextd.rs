extern crate memtext;

fn main() {
    memtext::server::main::run(std::env::args().collect());
}
