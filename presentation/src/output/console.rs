//! Console rendering of the chat transcript

use colored::Colorize;
use neetchat_domain::{Message, Sender};

/// Formats transcript entries for terminal display
pub struct ConsoleRenderer;

impl ConsoleRenderer {
    /// Format one transcript entry.
    pub fn format_message(message: &Message) -> String {
        let label = match message.sender {
            Sender::User => "you:".cyan().bold(),
            Sender::Bot => "bot:".green().bold(),
        };

        let mut output = String::new();
        if let Some(attachment) = &message.attachment {
            let name = attachment.file_name().unwrap_or("image");
            output.push_str(&format!(
                "{} {}\n",
                label,
                format!("[image] {}", name).yellow()
            ));
            if !message.text.is_empty() {
                output.push_str(&message.text);
                output.push('\n');
            }
        } else {
            output.push_str(&format!("{} {}\n", label, message.text));
        }
        output
    }

    /// Print every entry at or past `from`, returning the new high-water mark.
    ///
    /// The REPL keeps the returned count and passes it back on the next call,
    /// so each entry is printed exactly once.
    pub fn print_new_entries(entries: &[Message], from: usize) -> usize {
        for message in entries.iter().skip(from) {
            print!("{}", Self::format_message(message));
        }
        entries.len()
    }
}
