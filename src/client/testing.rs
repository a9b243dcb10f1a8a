//! Local chunked HTTP server for streaming tests.

use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// One action of the scripted response body.
pub(crate) enum Step {
    Chunk(&'static str),
    Pause(Duration),
    /// Close the socket without the terminating zero-length chunk.
    Abort,
}

/// Serve a single `text/plain` chunked response, then exit.
///
/// Returns the base URL and the server thread handle.
pub(crate) fn serve_chunked(steps: Vec<Step>) -> (String, JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    let handle = thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream.try_clone().unwrap());
        let mut line = String::new();
        loop {
            line.clear();
            if reader.read_line(&mut line).unwrap() == 0 || line == "\r\n" {
                break;
            }
        }
        let mut stream = stream;
        stream
            .write_all(
                b"HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\n\
                  Transfer-Encoding: chunked\r\nConnection: close\r\n\r\n",
            )
            .unwrap();
        stream.flush().unwrap();
        for step in steps {
            match step {
                Step::Chunk(text) => {
                    let frame = format!("{:x}\r\n{}\r\n", text.len(), text);
                    // The client may hang up early; that ends the script.
                    if stream.write_all(frame.as_bytes()).is_err() {
                        return;
                    }
                    let _ = stream.flush();
                }
                Step::Pause(delay) => thread::sleep(delay),
                Step::Abort => return,
            }
        }
        let _ = stream.write_all(b"0\r\n\r\n");
        let _ = stream.flush();
    });
    (url, handle)
}
