pub mod connection;
pub mod decoder;
pub mod encoder;
pub mod network;
pub mod validator;
