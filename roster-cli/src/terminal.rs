use std::io::{self, Write};

use async_trait::async_trait;
use colored::Colorize;
use roster_lib::{
    Student,
    notify::{Confirmation, ConfirmationPrompt, NotificationSink, Warning},
};
use tokio::task::spawn_blocking;
use tracing::warn;

/// Prints notifications to the terminal. Errors go to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalNotifier;

impl NotificationSink for TerminalNotifier {
    fn success(&self, message: &str) {
        println!("{} {message}", "✔".green().bold());
    }

    fn error(&self, message: &str) {
        eprintln!("{} {message}", "✘".red().bold());
    }
}

/// Asks for a yes/no answer on stdin, unless told to assume yes.
#[derive(Debug, Clone, Copy)]
pub struct TerminalPrompt {
    assume_yes: bool,
}

impl TerminalPrompt {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

#[async_trait]
impl ConfirmationPrompt for TerminalPrompt {
    async fn confirm(&self, warning: &Warning) -> Confirmation {
        if self.assume_yes {
            return Confirmation::Confirmed;
        }

        println!("{}", warning.title.yellow().bold());
        println!("{}", warning.text);
        print!("Yes, delete it! [y/N] ");
        if let Err(err) = io::stdout().flush() {
            warn!("Unable to flush the confirmation prompt: {err}");
        }

        match read_line().await {
            Ok(Some(answer)) => is_yes(&answer).into(),
            _ => Confirmation::Declined,
        }
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Read one line from stdin without blocking the runtime. Returns `None` at end of input.
pub async fn read_line() -> io::Result<Option<String>> {
    spawn_blocking(|| {
        let mut line = String::new();
        let read = io::stdin().read_line(&mut line)?;
        Ok((read > 0).then_some(line))
    })
    .await
    .map_err(io::Error::other)?
}

const HEADERS: [&str; 5] = ["Name", "Email", "Phone", "Gender", "Id"];

/// Print students as a table, in the order given.
pub fn print_table(students: &[Student]) {
    if students.is_empty() {
        println!("{}", "No students".dimmed());
        return;
    }

    let rows: Vec<[&str; 5]> = students.iter().map(row).collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    println!("{}", format_row(&HEADERS, &widths).bold());
    for row in &rows {
        println!("{}", format_row(row, &widths));
    }
}

/// Print the draft and whether it will be added or update an existing record.
pub fn print_draft(draft: &Student, submit_label: &str) {
    println!("{}", format!("[{submit_label}]").cyan().bold());
    println!("  name:   {}", draft.name);
    println!("  email:  {}", draft.email);
    println!("  phone:  {}", draft.phone_number);
    println!("  gender: {}", draft.gender);
}

fn row(student: &Student) -> [&str; 5] {
    [
        &student.name,
        &student.email,
        &student.phone_number,
        &student.gender,
        student.id.as_ref().map_or("", |id| id.as_str()),
    ]
}

fn format_row(cells: &[&str; 5], widths: &[usize; 5]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}
