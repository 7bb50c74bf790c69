use std::{
    io::{self, BufRead, Write},
    sync::Arc,
    thread,
};

use anyhow::Result;
use tokio::{
    sync::mpsc::{self, UnboundedReceiver, UnboundedSender},
    task::JoinHandle,
};

use crate::{
    classifier::{Classifier, ClassifyError},
    domain::{AttemptId, Label, ScanResult},
    infrastructure::shutdown::ShutdownListener,
    scan::{
        controller::log_latency, present, InputStaging, ScanController, ScanOutcome,
        GENERIC_FAILURE,
    },
};

use super::{
    commands::{parse_line, SessionCommand, HELP},
    terminal::{render_submit, write_plan},
};

#[derive(Debug)]
pub enum SessionEvent {
    Line(String),
    InputClosed,
    ScanResolved {
        attempt: AttemptId,
        outcome: Result<ScanResult, ClassifyError>,
    },
    ReportDelivered(Result<String, ClassifyError>),
    StatusChecked(Result<String, ClassifyError>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Interactive scanner. All state changes happen on the task that calls
/// [`InteractiveSession::run`]; network work is spawned and reports back as events.
pub struct InteractiveSession<W> {
    staging: InputStaging,
    controller: ScanController,
    classifier: Arc<dyn Classifier>,
    events_tx: UnboundedSender<SessionEvent>,
    events_rx: UnboundedReceiver<SessionEvent>,
    in_flight: Option<JoinHandle<()>>,
    /// Report and status requests that have not answered yet.
    side_requests: usize,
    input_closed: bool,
    out: W,
}

impl<W: Write> InteractiveSession<W> {
    pub fn new(classifier: Arc<dyn Classifier>, out: W) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            staging: InputStaging::new(),
            controller: ScanController::new(),
            classifier,
            events_tx,
            events_rx,
            in_flight: None,
            side_requests: 0,
            input_closed: false,
            out,
        }
    }

    pub fn sender(&self) -> UnboundedSender<SessionEvent> {
        self.events_tx.clone()
    }

    pub fn state(&self) -> &ScanOutcome {
        self.controller.state()
    }

    pub fn staging(&self) -> &InputStaging {
        &self.staging
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    pub async fn next_event(&mut self) -> Option<SessionEvent> {
        self.events_rx.recv().await
    }

    pub async fn run(mut self, mut shutdown: ShutdownListener) -> Result<W> {
        writeln!(self.out, "Spam Scanner. Paste your email or message content, then :scan.")?;
        writeln!(self.out, "Type :help for commands.")?;
        self.out.flush()?;

        loop {
            let event = tokio::select! {
                event = self.events_rx.recv() => event,
                _ = shutdown.notified() => {
                    tracing::info!(target: "session", "shutdown requested");
                    None
                }
            };
            let Some(event) = event else { break };
            if self.handle(event)? == Flow::Quit {
                break;
            }
        }

        self.abort_in_flight();
        tracing::info!(target: "session", "session closed");
        Ok(self.out)
    }

    pub fn handle(&mut self, event: SessionEvent) -> Result<Flow> {
        match event {
            SessionEvent::Line(line) => self.handle_command(parse_line(&line)),
            SessionEvent::InputClosed => {
                self.input_closed = true;
                if self.has_outstanding_work() {
                    tracing::debug!(
                        target: "session",
                        scan_pending = self.controller.is_pending(),
                        side_requests = self.side_requests,
                        "input closed, waiting for outstanding requests"
                    );
                }
                Ok(self.after_resolution())
            }
            SessionEvent::ScanResolved { attempt, outcome } => {
                if self.controller.resolve(attempt, outcome) {
                    self.in_flight = None;
                    self.render()?;
                }
                Ok(self.after_resolution())
            }
            SessionEvent::ReportDelivered(result) => {
                self.side_requests = self.side_requests.saturating_sub(1);
                match result {
                    Ok(message) => writeln!(self.out, "Feedback sent: {message}")?,
                    Err(err) => {
                        tracing::warn!(target: "session", error = %err, "report failed");
                        writeln!(self.out, "[!] {GENERIC_FAILURE}")?;
                    }
                }
                self.out.flush()?;
                Ok(self.after_resolution())
            }
            SessionEvent::StatusChecked(result) => {
                self.side_requests = self.side_requests.saturating_sub(1);
                match result {
                    Ok(message) => writeln!(self.out, "Service: {message}")?,
                    Err(err) => writeln!(self.out, "Service unavailable ({err})")?,
                }
                self.out.flush()?;
                Ok(self.after_resolution())
            }
        }
    }

    fn handle_command(&mut self, command: SessionCommand) -> Result<Flow> {
        match command {
            SessionCommand::Append(line) => self.staging.append_line(&line),
            SessionCommand::Replace(text) => {
                self.staging.set_text(text);
                self.print_submit()?;
            }
            SessionCommand::Clear => {
                self.staging.clear();
                self.print_submit()?;
            }
            SessionCommand::Show => {
                writeln!(self.out, "--- draft ---")?;
                writeln!(self.out, "{}", self.staging.text())?;
                writeln!(self.out, "-------------")?;
                self.print_submit()?;
            }
            SessionCommand::Scan => self.start_scan()?,
            SessionCommand::Cancel => {
                if self.controller.cancel() {
                    self.abort_in_flight();
                    self.render()?;
                } else {
                    writeln!(self.out, "No scan is running.")?;
                }
            }
            SessionCommand::Report(label) => self.start_report(label)?,
            SessionCommand::Status => {
                let classifier = self.classifier.clone();
                let tx = self.events_tx.clone();
                self.side_requests += 1;
                tokio::spawn(async move {
                    let result = classifier.status().await;
                    let _ = tx.send(SessionEvent::StatusChecked(result));
                });
            }
            SessionCommand::Help => writeln!(self.out, "{HELP}")?,
            SessionCommand::Quit => return Ok(Flow::Quit),
            SessionCommand::Invalid(message) => writeln!(self.out, "{message}")?,
        }
        self.out.flush()?;
        Ok(Flow::Continue)
    }

    fn start_scan(&mut self) -> Result<()> {
        let Some(attempt) = self.controller.submit(&self.staging) else {
            if self.controller.is_pending() {
                writeln!(self.out, "A scan is already running.")?;
            } else {
                writeln!(self.out, "Type or paste some text first.")?;
            }
            return Ok(());
        };
        self.render()?;

        let classifier = self.classifier.clone();
        let tx = self.events_tx.clone();
        self.in_flight = Some(tokio::spawn(async move {
            let outcome = classifier.classify(&attempt.text).await;
            log_latency(&attempt);
            let _ = tx.send(SessionEvent::ScanResolved {
                attempt: attempt.id,
                outcome,
            });
        }));
        Ok(())
    }

    fn start_report(&mut self, label: Label) -> Result<()> {
        if !self.staging.has_content() {
            writeln!(self.out, "Type or paste some text first.")?;
            return Ok(());
        }
        let text = self.staging.text().to_string();
        let classifier = self.classifier.clone();
        let tx = self.events_tx.clone();
        self.side_requests += 1;
        tokio::spawn(async move {
            let result = classifier.report(&text, label).await;
            let _ = tx.send(SessionEvent::ReportDelivered(result));
        });
        tracing::info!(target: "session", label = %label, "feedback queued");
        Ok(())
    }

    fn has_outstanding_work(&self) -> bool {
        self.controller.is_pending() || self.side_requests > 0
    }

    fn after_resolution(&self) -> Flow {
        if self.input_closed && !self.has_outstanding_work() {
            Flow::Quit
        } else {
            Flow::Continue
        }
    }

    fn abort_in_flight(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
    }

    fn print_submit(&mut self) -> io::Result<()> {
        let plan = present(self.controller.state(), &self.staging);
        writeln!(self.out, "{}", render_submit(&plan.submit))
    }

    fn render(&mut self) -> io::Result<()> {
        let plan = present(self.controller.state(), &self.staging);
        write_plan(&mut self.out, &plan)
    }
}

/// Reads stdin on a dedicated thread so a blocked read never holds up the runtime.
pub fn spawn_stdin_reader(events: UnboundedSender<SessionEvent>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    if events.send(SessionEvent::Line(line)).is_err() {
                        return;
                    }
                }
                Err(err) => {
                    tracing::warn!(target: "session", error = %err, "stdin read failed");
                    break;
                }
            }
        }
        let _ = events.send(SessionEvent::InputClosed);
    });
}
