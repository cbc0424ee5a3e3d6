pub mod params_builder;
pub mod random_port;
pub mod test_server;
pub mod text_client;

pub use params_builder::MemtextdServerParamsBuilder;
pub use test_server::spawn_server;
