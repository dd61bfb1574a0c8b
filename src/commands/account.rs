use crate::api::Session;
use crate::cells;
use crate::report::{yes_no, Printer};
use anyhow::Result;
use clap::Subcommand;
use std::io::Write;

#[derive(Subcommand, Debug)]
#[command(rename_all = "PascalCase")]
pub enum AccountCommand {
    /// Show basic account settings
    Settings,
    /// Show active operations
    RunningJobs,
    /// Show users
    Users,
}

pub async fn run<W: Write>(command: AccountCommand, session: &Session, printer: &mut Printer<W>) -> Result<()> {
    match command {
        AccountCommand::Settings => {
            let settings = session.account_settings().await?;
            printer.print_str("Account settings:")?;
            printer.print_key_value(
                Some(&["Key", "Value"]),
                [
                    ("1 Time zone", settings.time_zone),
                    ("2 Currency", settings.currency),
                    ("3 Date format", settings.date_format),
                    ("4 Availability zone", settings.availability_zone),
                    ("5 24h clock", yes_no(settings.clock_24h).to_string()),
                ]
                .map(|(key, value)| (key, [value])),
                true,
            )?;
        }
        AccountCommand::RunningJobs => {
            let ops = session.running_operations().await?;
            let printed = printer.print_rows(
                &[
                    "Operation ID",
                    "Started at",
                    "Started by",
                    "Operation type",
                    "Object",
                    "Progress",
                    "Status",
                ],
                &ops,
                |op| {
                    cells![
                        op.id,
                        op.creation_date,
                        op.creation_user_name,
                        op.operation_type,
                        format!("{}: {}", op.object_type, op.object_name),
                        format!("{}%", op.progress_percent),
                        op.status
                    ]
                },
            )?;
            if !printed {
                printer.print_str("No running operations")?;
            }
        }
        AccountCommand::Users => {
            let users = session.account_users().await?;
            let client_id = session.client_id();
            printer.print_rows(&["Client ID", "E-mail", "Name"], &users, |user| {
                cells![client_id, user.email, user.name]
            })?;
        }
    }
    Ok(())
}
