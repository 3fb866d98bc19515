//! REPL (Read-Eval-Print Loop) for interactive chat

use crate::ConsoleRenderer;
use crate::TypingIndicator;
use neetchat_application::{AccessGate, SessionController, SubmitError};
use neetchat_domain::{AccessMode, Attachment};
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RlResult};
use std::path::Path;
use std::sync::Arc;

/// Interactive chat REPL
///
/// The prompt tracks the gate: while locked it collects an email, while
/// unlocking it collects the verification code, and once unlocked every
/// plain line is a question.
pub struct ChatRepl {
    gate: Arc<AccessGate>,
    session: Arc<SessionController>,
    show_progress: bool,
    printed: usize,
    pending_attachment: Option<Attachment>,
}

impl ChatRepl {
    /// Create a new ChatRepl
    pub fn new(gate: Arc<AccessGate>, session: Arc<SessionController>) -> Self {
        Self {
            gate,
            session,
            show_progress: true,
            printed: 0,
            pending_attachment: None,
        }
    }

    /// Set whether to show the typing indicator
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Run the interactive REPL
    pub async fn run(&mut self) -> RlResult<()> {
        let mut rl = DefaultEditor::new()?;

        // Try to load history
        let history_path = dirs::data_dir().map(|p| p.join("neetchat").join("history.txt"));

        if let Some(ref path) = history_path {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let _ = rl.load_history(path);
        }

        self.print_welcome();

        loop {
            let readline = rl.readline(self.prompt());

            match readline {
                Ok(line) => {
                    let line = line.trim().to_string();

                    // An empty line only means something when an attachment
                    // is waiting to be sent on its own.
                    if line.is_empty() && self.pending_attachment.is_none() {
                        continue;
                    }

                    // Handle commands
                    if line.starts_with('/') {
                        if self.handle_command(&line).await {
                            break;
                        }
                        continue;
                    }

                    match self.gate.mode() {
                        AccessMode::Locked => self.request_code(&line).await,
                        AccessMode::Unlocking => self.enter_code(&line).await,
                        AccessMode::Unlocked => {
                            if !line.is_empty() {
                                let _ = rl.add_history_entry(line.as_str());
                            }
                            self.ask(&line).await;
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("Bye!");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    break;
                }
            }
        }

        // Save history
        if let Some(ref path) = history_path {
            let _ = rl.save_history(path);
        }

        Ok(())
    }

    fn prompt(&self) -> &'static str {
        match self.gate.mode() {
            AccessMode::Locked => "email> ",
            AccessMode::Unlocking => "code> ",
            AccessMode::Unlocked => ">>> ",
        }
    }

    fn print_welcome(&self) {
        println!();
        println!("╭─────────────────────────────────────────────╮");
        println!("│            Neetchat - Chat Mode             │");
        println!("╰─────────────────────────────────────────────╯");
        println!();
        match self.gate.mode() {
            AccessMode::Locked => {
                println!("The chat is locked. Enter your email to receive a code,");
                println!("or use /key <api-key> to unlock directly.");
            }
            AccessMode::Unlocking => {
                println!("Enter the 4-digit code that was emailed to you.");
            }
            AccessMode::Unlocked => {
                println!("Ask anything about the NEET syllabus.");
            }
        }
        println!();
        println!("Commands:");
        println!("  /help     - Show this help");
        println!("  /key      - Unlock with an API key");
        println!("  /email    - Request a verification code");
        println!("  /attach   - Attach an image to the next message");
        println!("  /signout  - Lock the chat again");
        println!("  /quit     - Exit chat");
        println!();
    }

    /// Handle slash commands. Returns true if should exit.
    async fn handle_command(&mut self, cmd: &str) -> bool {
        let (name, arg) = match cmd.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (cmd, ""),
        };

        match name {
            "/quit" | "/exit" | "/q" => {
                println!("Bye!");
                true
            }
            "/help" | "/h" | "/?" => {
                println!();
                println!("Commands:");
                println!("  /help, /h, /?    - Show this help");
                println!("  /key <api-key>   - Unlock with an API key");
                println!("  /email <addr>    - Request a verification code");
                println!("  /attach <path>   - Attach an image to the next message");
                println!("  /signout         - Lock the chat again");
                println!("  /quit, /exit, /q - Exit chat");
                println!();
                false
            }
            "/key" => {
                if arg.is_empty() {
                    println!("Usage: /key <api-key>");
                } else {
                    match self.gate.unlock_with_secret(arg) {
                        Ok(()) => println!("Unlocked."),
                        Err(e) => eprintln!("{}", e),
                    }
                }
                false
            }
            "/email" => {
                if arg.is_empty() {
                    println!("Usage: /email <address>");
                } else {
                    self.request_code(arg).await;
                }
                false
            }
            "/attach" => {
                if arg.is_empty() {
                    println!("Usage: /attach <path>");
                } else if !Path::new(arg).is_file() {
                    eprintln!("No such file: {}", arg);
                } else {
                    let attachment = Attachment::new(arg);
                    println!(
                        "Attached {}. It will be shown with your next message.",
                        attachment.file_name().unwrap_or("image")
                    );
                    self.pending_attachment = Some(attachment);
                }
                false
            }
            "/signout" => {
                self.gate.sign_out();
                self.session.reset();
                self.printed = 0;
                self.pending_attachment = None;
                println!("Signed out. The chat is locked.");
                false
            }
            _ => {
                println!("Unknown command: {}", name);
                println!("Type /help for available commands");
                false
            }
        }
    }

    async fn request_code(&self, email: &str) {
        match self.gate.send_code(email).await {
            Ok(()) => println!("Code sent to {}. Check your inbox.", email),
            Err(e) => eprintln!("{}", e),
        }
    }

    async fn enter_code(&self, code: &str) {
        let email = self.gate.email().unwrap_or_default();
        match self.gate.verify_code(&email, code).await {
            Ok(()) => println!("Verified. Ask away."),
            Err(e) => eprintln!("{}", e),
        }
    }

    async fn ask(&mut self, question: &str) {
        let attachment = self.pending_attachment.take();

        let indicator = self.show_progress.then(TypingIndicator::start);
        let result = self.session.submit(question, attachment.clone()).await;
        if let Some(indicator) = indicator {
            indicator.finish();
        }

        match result {
            Ok(()) => {
                let transcript = self.session.transcript();
                self.printed = ConsoleRenderer::print_new_entries(&transcript, self.printed);
            }
            Err(SubmitError::Busy) => {
                // Nothing was sent; keep the attachment staged for the retry.
                self.pending_attachment = attachment;
                println!("Still working on the last question.");
            }
            Err(e) => eprintln!("{}", e),
        }
    }
}
