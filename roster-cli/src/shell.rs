//! Interactive session around a single long-lived controller, so a draft can be built up and
//! edited over several commands before it is submitted.

use std::{
    io::{self, Write},
    str::FromStr,
};

use colored::Colorize;
use roster_lib::{Gender, Outcome, StudentId};
use sysexits::ExitCode;
use tracing::error;

use crate::{
    Controller,
    terminal::{print_draft, print_table, read_line},
};

const HELP: &str = "\
Commands:
  list                  reload and show all students
  show                  show the current draft
  set <field> <value>   set name, email, phone or gender on the draft
  edit <id>             load a listed student into the draft
  cancel                discard the draft and stop editing
  submit                add the draft, or update the student being edited
  delete <id>           delete a student
  genders               show the gender options
  help                  show this message
  quit                  leave the shell";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Email,
    Phone,
    Gender,
}

impl FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(Self::Name),
            "email" => Ok(Self::Email),
            "phone" | "phone_number" => Ok(Self::Phone),
            "gender" => Ok(Self::Gender),
            other => Err(format!("Unknown field `{other}`")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    List,
    Show,
    Set(Field, String),
    Edit(StudentId),
    Cancel,
    Submit,
    Delete(StudentId),
    Genders,
    Help,
    Quit,
}

impl FromStr for ShellCommand {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();

        let no_args = |cmd: ShellCommand| {
            if rest.is_empty() {
                Ok(cmd)
            } else {
                Err(format!("`{word}` takes no arguments"))
            }
        };
        let id = || {
            if rest.is_empty() {
                Err(format!("`{word}` needs a student id"))
            } else {
                Ok(StudentId::from(rest))
            }
        };

        match word {
            "list" | "ls" => no_args(Self::List),
            "show" => no_args(Self::Show),
            "set" => {
                let (field, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
                if field.is_empty() {
                    return Err("`set` needs a field and a value".into());
                }
                // Surrounding whitespace is dropped, empty values are allowed
                Ok(Self::Set(field.parse::<Field>()?, value.trim().to_string()))
            }
            "edit" => id().map(Self::Edit),
            "cancel" | "reset" => no_args(Self::Cancel),
            "submit" => no_args(Self::Submit),
            "delete" | "rm" => id().map(Self::Delete),
            "genders" => no_args(Self::Genders),
            "help" | "?" => no_args(Self::Help),
            "quit" | "exit" => no_args(Self::Quit),
            other => Err(format!("Unknown command `{other}`, try `help`")),
        }
    }
}

/// Run the shell until `quit` or end of input.
pub async fn run(controller: &mut Controller) -> ExitCode {
    if controller.load_all().await == Outcome::Completed {
        print_table(controller.records());
    }

    loop {
        print!("{} ", prompt(controller).bold());
        if let Err(err) = io::stdout().flush() {
            error!("Unable to write to stdout: {err}");
            return ExitCode::IoErr;
        }

        let line = match read_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(err) => {
                error!("Unable to read from stdin: {err}");
                return ExitCode::IoErr;
            }
        };

        if line.trim().is_empty() {
            continue;
        }

        match line.parse::<ShellCommand>() {
            Ok(ShellCommand::Quit) => break,
            Ok(cmd) => execute(controller, cmd).await,
            Err(message) => eprintln!("{}", message.red()),
        }
    }

    ExitCode::Ok
}

fn prompt(controller: &Controller) -> String {
    match controller.edit_target() {
        Some(id) => format!("roster (update {id})>"),
        None => "roster (add)>".to_string(),
    }
}

pub async fn execute(controller: &mut Controller, cmd: ShellCommand) {
    match cmd {
        ShellCommand::List => {
            if controller.load_all().await == Outcome::Completed {
                print_table(controller.records());
            }
        }
        ShellCommand::Show => print_draft(controller.draft(), controller.submit_label()),
        ShellCommand::Set(field, value) => match field {
            Field::Name => controller.set_name(value),
            Field::Email => controller.set_email(value),
            Field::Phone => controller.set_phone_number(value),
            Field::Gender => controller.set_gender(value),
        },
        ShellCommand::Edit(id) => match controller.find(&id).cloned() {
            Some(student) => {
                controller.begin_edit(&student);
                print_draft(controller.draft(), controller.submit_label());
            }
            None => eprintln!("{}", format!("No listed student with id {id}").red()),
        },
        ShellCommand::Cancel => controller.cancel_edit(),
        ShellCommand::Submit => {
            if controller.submit().await == Outcome::Completed {
                print_table(controller.records());
            }
        }
        ShellCommand::Delete(id) => {
            if controller.delete_record(&id).await == Outcome::Completed {
                print_table(controller.records());
            }
        }
        ShellCommand::Genders => {
            for gender in Gender::options() {
                println!("{:<8}{}", gender.to_string(), gender.label());
            }
        }
        ShellCommand::Help => println!("{HELP}"),
        ShellCommand::Quit => {}
    }
}
