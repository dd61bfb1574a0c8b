use super::{ok, show_oci_logs, show_oci_settings, show_template_category, show_template_info};
use crate::api::fields::dict;
use crate::api::oci::CloneType;
use crate::api::ordb::Encoding;
use crate::api::Session;
use crate::cells;
use crate::report::{yes_no, Printer};
use crate::resolve::{Category, Resolver};
use anyhow::Result;
use clap::Subcommand;
use std::io::Write;

/// Database templates carry this marker in their names
const TEMPLATE_NAME_FILTER: &str = "ORDB";

#[derive(Subcommand, Debug)]
#[command(rename_all = "PascalCase")]
pub enum OrdbCommand {
    /// List database instances
    List,

    /// Turn a database instance on
    TurnOn {
        /// ORDB instance name or ID (as returned by ORDB List)
        id: String,
    },

    /// Turn a database instance off
    TurnOff {
        /// ORDB instance name or ID (as returned by ORDB List)
        id: String,
    },

    /// Restart a database instance
    Restart {
        /// ORDB instance name or ID (as returned by ORDB List)
        id: String,
    },

    /// Delete a logical database or database instance
    #[command(after_help = "If db_name is not specified, delete whole instance")]
    Delete {
        /// ORDB instance name or ID (as returned by ORDB List)
        id: String,
        /// logical database name
        db_name: Option<String>,
    },

    /// List database VM templates
    Templates,

    /// Clone an ORDB instance
    Clone {
        /// ORDB instance name or ID (as returned by ORDB List)
        id: String,
        /// new ORDB instance name
        name: String,
        /// clone type
        #[arg(value_enum)]
        clone_type: CloneType,
    },

    /// Show ORDB virtual machine logs
    Logs {
        /// ORDB instance name or ID (as returned by ORDB List)
        id: String,
    },

    /// Shows logical databases
    LogicalDatabases {
        /// ORDB instance name or ID (as returned by ORDB List); all instances when omitted
        id: Option<String>,
    },

    /// Show ORDB settings
    Settings {
        /// ORDB instance name or ID (as returned by ORDB List)
        id: String,
    },

    /// Create a new ORDB
    Create {
        /// new ORDB instance name
        name: String,
        /// template ID (as returned by ORDB Templates)
        template: i64,
        /// OCI class, e.g. v1.standard-1.09
        oci_class: Option<String>,
    },

    /// Show global database engine settings
    GlobalSettings {
        /// ORDB instance name or ID (as returned by ORDB List)
        id: String,
    },

    /// Show more detailed info about a particular template
    TemplateInfo {
        /// template ID (as returned by ORDB Templates)
        id: i64,
    },

    /// Create a new logical database within an instance
    CreateLogicalDatabase {
        /// ORDB instance name or ID (as returned by ORDB List)
        id: String,
        /// logical database name
        name: String,
        /// database character encoding
        #[arg(value_enum, default_value_t = Encoding::Utf8)]
        encoding: Encoding,
    },

    /// Create a backup of logical database
    BackupLogicalDatabase {
        /// ORDB instance name or ID (as returned by ORDB List)
        id: String,
        /// logical database name
        name: String,
    },

    /// Move a logical database between ORDB instances
    MoveLogicalDatabase {
        /// source ORDB name or ID (as returned by ORDB List)
        id_from: String,
        /// destination ORDB name or ID (as returned by ORDB List)
        id_to: String,
        /// logical database name
        name: String,
    },

    /// List logical database backups
    Backups,

    /// Restore a backup of logical database
    RestoreLogicalDatabase {
        /// ORDB instance name or ID (as returned by ORDB List)
        id: String,
        /// backup file name (as returned by ORDB Backups)
        backup_file: String,
        /// logical database name
        name: String,
    },
}

pub async fn run<W: Write>(command: OrdbCommand, session: &Session, printer: &mut Printer<W>) -> Result<()> {
    let mut resolver = Resolver::new(session);

    match command {
        OrdbCommand::List => {
            let dbs = session.ordb_list().await?;
            printer.print_rows(
                &["Virtual machine ID", "Name", "Type", "Size", "Available space"],
                &dbs,
                |db| cells![db.id, db.name, db.db_type, db.size, db.available_space],
            )?;
        }
        OrdbCommand::TurnOn { id } => {
            let id = resolver.resolve(Category::Ordb, &id).await?;
            session.oci_turn_on(id).await?;
            ok(printer)?;
        }
        OrdbCommand::TurnOff { id } => {
            let id = resolver.resolve(Category::Ordb, &id).await?;
            session.oci_turn_off(id).await?;
            ok(printer)?;
        }
        OrdbCommand::Restart { id } => {
            let id = resolver.resolve(Category::Ordb, &id).await?;
            session.oci_restart(id).await?;
            ok(printer)?;
        }
        OrdbCommand::Delete { id, db_name } => {
            let id = resolver.resolve(Category::Ordb, &id).await?;
            session.ordb_delete(id, db_name.as_deref()).await?;
            ok(printer)?;
        }
        OrdbCommand::Templates => {
            printer.print_str("\nCategory: MySQL")?;
            show_template_category(
                session,
                printer,
                dict::MYSQL_TEMPLATE_CATEGORY,
                TEMPLATE_NAME_FILTER,
            )
            .await?;
            printer.print_str("Category: PostgreSQL")?;
            show_template_category(
                session,
                printer,
                dict::POSTGRESQL_TEMPLATE_CATEGORY,
                TEMPLATE_NAME_FILTER,
            )
            .await?;
        }
        OrdbCommand::Clone {
            id,
            name,
            clone_type,
        } => {
            let id = resolver.resolve(Category::Ordb, &id).await?;
            session.oci_clone(id, &name, clone_type).await?;
            ok(printer)?;
        }
        OrdbCommand::Logs { id } => {
            let id = resolver.resolve(Category::Ordb, &id).await?;
            show_oci_logs(session, printer, id).await?;
        }
        OrdbCommand::LogicalDatabases { id } => {
            let id = resolver.resolve_opt(Category::Ordb, id.as_deref()).await?;
            let dbs = session.ordb_logical_databases(id).await?;
            printer.print_rows(
                &["Virtual machine ID", "Name", "Type", "Encoding", "Running", "QPS", "Size"],
                &dbs,
                |db| {
                    cells![
                        db.instance_id,
                        db.name,
                        db.db_type,
                        db.encoding,
                        yes_no(db.is_running),
                        db.qps,
                        db.size
                    ]
                },
            )?;
        }
        OrdbCommand::Settings { id } => {
            let id = resolver.resolve(Category::Ordb, &id).await?;
            show_oci_settings(session, printer, id).await?;
        }
        OrdbCommand::Create {
            name,
            template,
            oci_class,
        } => {
            session
                .ordb_create(&name, template, oci_class.as_deref())
                .await?;
            ok(printer)?;
        }
        OrdbCommand::GlobalSettings { id } => {
            let id = resolver.resolve(Category::Ordb, &id).await?;
            let settings = session.ordb_global_settings(id).await?;
            printer.print_rows(&["Name", "Value"], &settings, |item| {
                cells![item.name, item.value]
            })?;
        }
        OrdbCommand::TemplateInfo { id } => show_template_info(session, printer, id).await?,
        OrdbCommand::CreateLogicalDatabase { id, name, encoding } => {
            let id = resolver.resolve(Category::Ordb, &id).await?;
            session
                .ordb_create_logical_database(id, &name, encoding)
                .await?;
            ok(printer)?;
        }
        OrdbCommand::BackupLogicalDatabase { id, name } => {
            let id = resolver.resolve(Category::Ordb, &id).await?;
            session.ordb_backup_logical_database(id, &name).await?;
            ok(printer)?;
        }
        OrdbCommand::MoveLogicalDatabase {
            id_from,
            id_to,
            name,
        } => {
            let from = resolver.resolve(Category::Ordb, &id_from).await?;
            let to = resolver.resolve(Category::Ordb, &id_to).await?;
            session.ordb_move_logical_database(from, to, &name).await?;
            ok(printer)?;
        }
        OrdbCommand::Backups => {
            let backups = session.ordb_backups().await?;
            printer.print_rows(
                &["File name", "Database type", "Full path"],
                &backups,
                |b| cells![b.file_name, b.db_type, b.path],
            )?;
        }
        OrdbCommand::RestoreLogicalDatabase {
            id,
            backup_file,
            name,
        } => {
            let id = resolver.resolve(Category::Ordb, &id).await?;
            session
                .ordb_restore_logical_database(id, &name, &backup_file)
                .await?;
            ok(printer)?;
        }
    }
    Ok(())
}
