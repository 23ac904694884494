use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::thread::{self, JoinHandle};

fn free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

fn server_command(port: u16) -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_server"));
    command
        .arg(port.to_string())
        .args(["--host", "127.0.0.1"])
        .env("RUST_LOG", "info")
        .stdin(Stdio::null())
        .stdout(Stdio::null());
    command
}

fn client_command(port: u16) -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_client"));
    command
        .arg("127.0.0.1")
        .arg(port.to_string())
        .env("RUST_LOG", "info")
        .stderr(Stdio::null());
    command
}

/// Block until the server logs that it is listening, then keep draining its log.
fn wait_until_listening(server: &mut Child) -> JoinHandle<()> {
    let mut lines = BufReader::new(server.stderr.take().unwrap()).lines();

    loop {
        match lines.next() {
            Some(Ok(line)) if line.contains("Waiting for connections") => break,
            Some(Ok(_)) => continue,
            other => panic!("server exited before listening: {:?}", other),
        }
    }

    thread::spawn(move || for _ in lines {})
}

#[test]
fn test_server_exits_one_when_port_in_use() {
    let occupied = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = occupied.local_addr().unwrap().port();

    let status = server_command(port)
        .stderr(Stdio::null())
        .status()
        .unwrap();

    assert_eq!(status.code(), Some(1));
}

#[test]
fn test_client_exits_one_when_nothing_listens() {
    let status = client_command(free_port())
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .status()
        .unwrap();

    assert_eq!(status.code(), Some(1));
}

#[test]
fn test_both_exit_zero_after_sentinel() {
    let port = free_port();

    let mut server = server_command(port)
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    let log_drain = wait_until_listening(&mut server);

    let mut client = client_command(port)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();
    client
        .stdin
        .take()
        .unwrap()
        .write_all(b"5\n6\n0\n")
        .unwrap();

    let output = client.wait_with_output().unwrap();
    assert_eq!(output.status.code(), Some(0));

    let printed = String::from_utf8_lossy(&output.stdout);
    assert!(printed.contains("Server replied: 6\n"));
    assert!(printed.contains("Server replied: 7\n"));
    assert!(printed.contains("Disconnected from server.\n"));

    assert_eq!(server.wait().unwrap().code(), Some(0));
    log_drain.join().unwrap();
}
