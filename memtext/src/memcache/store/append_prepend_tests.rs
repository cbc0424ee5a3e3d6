use super::test_utils::*;

#[test]
fn append_concatenates_after_stored_data() {
    let server = create_dash_map_server();
    let key = from_string("key");
    server
        .storage
        .set(key.clone(), Entry::new(from_string("foo"), 0, 0))
        .unwrap();
    server
        .storage
        .append(key.clone(), Entry::new(from_string("bar"), 0, 0))
        .unwrap();
    assert_eq!(server.storage.get(&key).unwrap().data, from_string("foobar"));
}

#[test]
fn prepend_concatenates_before_stored_data() {
    let server = create_dash_map_server();
    let key = from_string("key");
    server
        .storage
        .set(key.clone(), Entry::new(from_string("bar"), 0, 0))
        .unwrap();
    server
        .storage
        .prepend(key.clone(), Entry::new(from_string("foo"), 0, 0))
        .unwrap();
    assert_eq!(server.storage.get(&key).unwrap().data, from_string("foobar"));
}

#[test]
fn append_fails_when_key_is_absent() {
    let server = create_dash_map_server();
    let entry = Entry::new(from_string("bar"), 0, 0);
    match server.storage.append(from_string("key"), entry) {
        Ok(_) => unreachable!(),
        Err(err) => assert_eq!(err, CacheError::NotStored),
    }
}

#[test]
fn prepend_fails_when_key_is_absent() {
    let server = create_dash_map_server();
    let entry = Entry::new(from_string("foo"), 0, 0);
    match server.storage.prepend(from_string("key"), entry) {
        Ok(_) => unreachable!(),
        Err(err) => assert_eq!(err, CacheError::NotStored),
    }
}

#[test]
fn append_keeps_flags_and_expiration_of_stored_entry() {
    let server = create_dash_map_server();
    server.timer.set(100);
    let key = from_string("key");
    server
        .storage
        .set(key.clone(), Entry::new(from_string("foo"), 42, 500))
        .unwrap();

    server.timer.set(110);
    // flags and exptime of the append arguments are ignored
    server
        .storage
        .append(key.clone(), Entry::new(from_string("bar"), 7, 1))
        .unwrap();

    let stored = server.storage.get(&key).unwrap();
    assert_eq!(stored.header.flags, 42);
    assert_eq!(stored.header.exptime, 500);
    assert_eq!(stored.header.stored_time, 100);
}

#[test]
fn append_assigns_a_fresh_token() {
    let server = create_dash_map_server();
    let key = from_string("key");
    let first = server
        .storage
        .set(key.clone(), Entry::new(from_string("foo"), 0, 0))
        .unwrap();
    let second = server
        .storage
        .append(key.clone(), Entry::new(from_string("bar"), 0, 0))
        .unwrap();
    assert!(second.cas > first.cas);
    assert_eq!(server.storage.get(&key).unwrap().header.cas, second.cas);
}

#[test]
fn append_on_expired_entry_fails_and_evicts() {
    let server = create_dash_map_server();
    server.timer.set(100);
    let key = from_string("key");
    server
        .storage
        .set(key.clone(), Entry::new(from_string("foo"), 0, 10))
        .unwrap();

    server.timer.set(200);
    match server
        .storage
        .append(key.clone(), Entry::new(from_string("bar"), 0, 0))
    {
        Ok(_) => unreachable!(),
        Err(err) => assert_eq!(err, CacheError::NotStored),
    }
    assert!(server.storage.get(&key).is_err());
}
