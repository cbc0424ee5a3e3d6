mod common;
use common::text_client::TextClient;

#[test]
fn quit_closes_connection_silently_check() {
    let params_builder: common::MemtextdServerParamsBuilder =
        common::MemtextdServerParamsBuilder::new();
    let server_handle = common::spawn_server(params_builder);
    let mut client = TextClient::connect(server_handle.get_port());

    client.send(b"quit\r\n");
    assert!(client.is_closed());
}

#[test]
fn close_is_a_synonym_for_quit_check() {
    let params_builder: common::MemtextdServerParamsBuilder =
        common::MemtextdServerParamsBuilder::new();
    let server_handle = common::spawn_server(params_builder);
    let mut client = TextClient::connect(server_handle.get_port());

    client.send(b"close\r\n");
    assert!(client.is_closed());
}

#[test]
fn quit_after_pipelined_commands_check() {
    let params_builder: common::MemtextdServerParamsBuilder =
        common::MemtextdServerParamsBuilder::new();
    let server_handle = common::spawn_server(params_builder);
    let mut client = TextClient::connect(server_handle.get_port());

    client.send(b"set foo 0 0 3\r\nbar\r\nquit\r\n");
    assert_eq!(client.read_line(), "STORED\r\n");
    assert!(client.is_closed());
}

#[test]
fn server_outlives_disconnected_clients_check() {
    let params_builder: common::MemtextdServerParamsBuilder =
        common::MemtextdServerParamsBuilder::new();
    let server_handle = common::spawn_server(params_builder);

    let mut first = TextClient::connect(server_handle.get_port());
    first.send(b"set foo 0 0 3\r\nbar\r\n");
    assert_eq!(first.read_line(), "STORED\r\n");
    first.send(b"quit\r\n");
    assert!(first.is_closed());

    // the store is shared, the new connection sees the old value
    let mut second = TextClient::connect(server_handle.get_port());
    second.send(b"get foo\r\n");
    assert_eq!(second.read_line(), "VALUE foo 0 3\r\n");
    assert_eq!(second.read_exact(5), b"bar\r\n");
    assert_eq!(second.read_line(), "END\r\n");
}
