//! Threaded protocol loop: one producer, a pool of consumers.
//!
//! ```text
//! input --> reader --> producer --> queue --> consumer 0 --> UciEngine --> output
//!                                        \--> consumer 1 --/
//! ```
//!
//! - The reader thread performs blocking line reads and hands lines over.
//! - The producer waits for those lines at most one poll interval at a time,
//!   so it notices the quit flag promptly, and pushes them onto the queue.
//! - Each consumer waits on the queue with the same bounded wait and runs
//!   the command processor on whatever it receives.
//!
//! Consumers race for lines, so two commands sent back to back may be
//! processed out of order when more than one consumer is running. A search
//! blocks its consumer until it completes.
//!
//! When the input ends, the producer stops and closes the queue; consumers
//! finish what is already queued and then exit. The reader thread is never
//! joined since it may be stuck in a blocking read.

use std::io::{BufRead, Write};
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use anyhow::{anyhow, ensure, Context, Result};
use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use log::{debug, error, info, warn};

use crate::constants::EngineConfig;
use crate::uci::UciEngine;

/// Run the protocol loop until `quit` is received or the input is exhausted.
///
/// Blocks until the producer and every consumer have exited.
pub fn run<R, W>(input: R, output: W, config: EngineConfig) -> Result<()>
where
    R: BufRead + Send + 'static,
    W: Write + Send + 'static,
{
    ensure!(config.workers > 0, "at least one consumer is required");

    let quit = Arc::new(AtomicBool::new(false));
    let engine = Arc::new(UciEngine::new(config, Arc::clone(&quit)));
    let output = Arc::new(Mutex::new(output));
    let (queue_tx, queue_rx) = unbounded::<String>();

    let lines = spawn_reader(input)?;

    let mut handles: Vec<(String, JoinHandle<()>)> = Vec::with_capacity(config.workers + 1);

    for id in 0..config.workers {
        let name = format!("consumer-{id}");
        let queue = queue_rx.clone();
        let engine = Arc::clone(&engine);
        let output = Arc::clone(&output);
        let quit = Arc::clone(&quit);
        let poll = config.poll_interval;
        let handle = thread::Builder::new()
            .name(name.clone())
            .spawn(move || consumer(id, &queue, &engine, &output, &quit, poll))
            .with_context(|| format!("failed to spawn {name}"))?;
        handles.push((name, handle));
    }
    drop(queue_rx);

    {
        let quit = Arc::clone(&quit);
        let poll = config.poll_interval;
        let handle = thread::Builder::new()
            .name("producer".to_string())
            .spawn(move || producer(&lines, queue_tx, &quit, poll))
            .context("failed to spawn producer")?;
        handles.push(("producer".to_string(), handle));
    }

    let mut panicked = Vec::new();
    for (name, handle) in handles {
        if handle.join().is_err() {
            error!("{name} panicked");
            panicked.push(name);
        }
    }

    if panicked.is_empty() {
        Ok(())
    } else {
        Err(anyhow!("threads panicked: {}", panicked.join(", ")))
    }
}

/// Spawn the thread doing blocking reads on `input`.
///
/// Lines that are not valid UTF-8 are passed on with the bad bytes replaced.
/// The returned channel disconnects when the input reaches EOF or fails.
fn spawn_reader<R>(mut input: R) -> Result<Receiver<String>>
where
    R: BufRead + Send + 'static,
{
    let (tx, rx) = unbounded();
    thread::Builder::new()
        .name("reader".to_string())
        .spawn(move || {
            let mut buf = Vec::new();
            loop {
                buf.clear();
                match input.read_until(b'\n', &mut buf) {
                    Ok(0) => {
                        info!("input closed");
                        break;
                    }
                    Ok(_) => {
                        // Bad bytes only spoil their own command.
                        let line = String::from_utf8_lossy(&buf);
                        if tx.send(line.trim().to_string()).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        error!("failed to read input: {e}");
                        break;
                    }
                }
            }
        })
        .context("failed to spawn reader")?;
    Ok(rx)
}

/// Move lines from the reader onto the command queue until quit or EOF.
///
/// Takes the queue sender by value: dropping it on return tells the
/// consumers no more input is coming.
fn producer(lines: &Receiver<String>, queue: Sender<String>, quit: &AtomicBool, poll: Duration) {
    while !quit.load(Ordering::Acquire) {
        match lines.recv_timeout(poll) {
            Ok(line) => {
                if line.is_empty() {
                    continue;
                }
                debug!("Producer: {line}");
                if queue.send(line).is_err() {
                    break;
                }
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }
    debug!("Producer done");
}

/// Process queued commands until quit, or until the queue is closed and empty.
fn consumer<W: Write>(
    id: usize,
    queue: &Receiver<String>,
    engine: &UciEngine,
    output: &Mutex<W>,
    quit: &AtomicBool,
    poll: Duration,
) {
    while !quit.load(Ordering::Acquire) {
        match queue.recv_timeout(poll) {
            Ok(line) => {
                if quit.load(Ordering::Acquire) {
                    debug!("Consumer {id}: dropping `{line}` after quit");
                    break;
                }
                handle_line(id, &line, engine, output);
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }
    debug!("Consumer {id} done");
}

/// Run one command and send its response.
///
/// Errors and panics are confined to this command.
fn handle_line<W: Write>(id: usize, line: &str, engine: &UciEngine, output: &Mutex<W>) {
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| engine.execute(line)));
    match outcome {
        Ok(Ok(responses)) => {
            for response in responses {
                send_line(output, &response);
            }
        }
        Ok(Err(e)) => warn!("Consumer {id}: ignoring `{line}`: {e}"),
        Err(_) => error!("Consumer {id}: command `{line}` panicked"),
    }
}

/// Write one protocol line and flush it immediately.
pub fn send_line<W: Write>(output: &Mutex<W>, line: &str) {
    debug!("Command sent: {line}");
    let mut out = output.lock().unwrap_or_else(PoisonError::into_inner);
    if let Err(e) = writeln!(out, "{line}").and_then(|()| out.flush()) {
        error!("failed to write `{line}`: {e}");
    }
}
