use clap::Subcommand;
use colored::Colorize;
use roster_lib::{Outcome, StudentId, student::DEFAULT_GENDER};
use sysexits::ExitCode;

use crate::{Controller, exit_code, terminal::print_table};

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List students
    List,
    /// Add a new student
    Add {
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long, default_value = "")]
        phone: String,
        #[arg(long, default_value = DEFAULT_GENDER)]
        gender: String,
    },
    /// Update an existing student. Fields that aren't given keep their current value.
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        gender: Option<String>,
    },
    /// Delete a student
    Delete { id: String },
}

pub async fn handle(controller: &mut Controller, cmd: &Command) -> ExitCode {
    match cmd {
        Command::List => {
            let outcome = controller.load_all().await;
            if outcome == Outcome::Completed {
                print_table(controller.records());
            }
            exit_code(outcome)
        }
        Command::Add {
            name,
            email,
            phone,
            gender,
        } => {
            controller.reset_form();
            controller.set_name(name);
            controller.set_email(email);
            controller.set_phone_number(phone);
            controller.set_gender(gender);

            exit_code(controller.submit().await)
        }
        Command::Update {
            id,
            name,
            email,
            phone,
            gender,
        } => {
            if controller.load_all().await == Outcome::Failed {
                return ExitCode::Unavailable;
            }

            let id = StudentId::from(id.as_str());
            let Some(student) = controller.find(&id).cloned() else {
                eprintln!("{}", format!("No student with id {id}").red());
                return ExitCode::DataErr;
            };

            controller.begin_edit(&student);
            if let Some(name) = name {
                controller.set_name(name);
            }
            if let Some(email) = email {
                controller.set_email(email);
            }
            if let Some(phone) = phone {
                controller.set_phone_number(phone);
            }
            if let Some(gender) = gender {
                controller.set_gender(gender);
            }

            exit_code(controller.submit().await)
        }
        Command::Delete { id } => {
            exit_code(controller.delete_record(&StudentId::from(id.as_str())).await)
        }
    }
}
