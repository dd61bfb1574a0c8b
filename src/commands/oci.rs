use super::{ok, show_oci_logs, show_oci_settings, show_template_category, show_template_info};
use crate::api::oci::{CloneType, TemplateType};
use crate::api::Session;
use crate::cells;
use crate::report::Printer;
use crate::resolve::{Category, Resolver};
use anyhow::Result;
use clap::Subcommand;
use std::io::Write;

const CLONE_TYPES_HELP: &str = "Runtime: new root/administrator password will be generated, new host name set etc. \
(Unmodified tech-support account required on OCI)\n\n\
AbsoluteCopy: initialization process will be skipped, only new IP address and domain name will be assigned.";

#[derive(Subcommand, Debug)]
#[command(rename_all = "PascalCase")]
pub enum OciCommand {
    /// List available template categories
    TemplateCategories,

    /// List templates in a category
    Templates {
        /// template category (as returned by OCI TemplateCategories)
        id: i64,
    },

    /// Show more detailed info about a particular template
    TemplateInfo {
        /// template ID (as returned by OCI Templates)
        id: i64,
    },

    /// List virtual machines
    List,

    /// List virtual machines with more detail
    ListDetails,

    /// Restart a VM
    Restart {
        /// OCI name or ID (as returned by OCI List)
        id: String,
    },

    /// Turn off a VM
    TurnOff {
        /// OCI name or ID (as returned by OCI List)
        id: String,
    },

    /// Turn on a VM
    TurnOn {
        /// OCI name or ID (as returned by OCI List)
        id: String,
    },

    /// Delete a VM
    Delete {
        /// OCI name or ID (as returned by OCI List)
        id: String,
    },

    /// Show virtual machine logs
    Logs {
        /// OCI name or ID (as returned by OCI List)
        id: String,
    },

    /// Show basic VM settings (IP addresses, OS, names, autoscaling etc.)
    Settings {
        /// OCI name or ID (as returned by OCI List)
        id: String,
    },

    /// Creates a new instance from template
    Create {
        /// new OCI name
        name: String,
        /// template ID (as returned by OCI Templates)
        template: i64,
        /// OCI class, e.g. v1.standard-1.09, defaults to minimal class of template
        oci_class: Option<String>,
    },

    /// Change running instance class
    ChangeClass {
        /// OCI name or ID (as returned by OCI List)
        id: String,
        /// OCI class, e.g. v1.standard-1.09
        oci_class: String,
        /// Apply the change at midnight instead of now
        #[arg(long)]
        at_midnight: bool,
    },

    /// Clone a VM
    #[command(after_help = CLONE_TYPES_HELP)]
    Clone {
        /// OCI name or ID (as returned by OCI List)
        id: String,
        /// new OCI name
        name: String,
        /// clone type
        #[arg(value_enum)]
        clone_type: CloneType,
    },
}

pub async fn run<W: Write>(command: OciCommand, session: &Session, printer: &mut Printer<W>) -> Result<()> {
    let mut resolver = Resolver::new(session);

    match command {
        OciCommand::TemplateCategories => {
            let categories = session.template_categories().await?;
            printer.print_rows(
                &["Template category ID", "Name", "Description"],
                &categories,
                |cat| {
                    let id = match cat.parent_id {
                        Some(_) => format!("  {}", cat.id),
                        None => cat.id.to_string(),
                    };
                    cells![id, cat.name, cat.description]
                },
            )?;
        }
        OciCommand::Templates { id } => show_template_category(session, printer, id, "").await?,
        OciCommand::TemplateInfo { id } => show_template_info(session, printer, id).await?,
        OciCommand::List => {
            let vms = session.oci_list().await?;
            printer.print_rows(&["Virtual machine ID", "Name", "Status"], &vms, |vm| {
                cells![vm.id, vm.name, vm.status]
            })?;
        }
        OciCommand::ListDetails => {
            let vms = session.oci_list_details().await?;
            printer.print_rows(
                &["Virtual machine ID", "Name", "Status", "Class", "CPU", "Memory"],
                &vms,
                |d| cells![d.vm.id, d.vm.name, d.vm.status, d.vm.class_name, d.cpu(), d.memory()],
            )?;
        }
        OciCommand::Restart { id } => {
            let id = resolver.resolve(Category::Oci, &id).await?;
            session.oci_restart(id).await?;
            ok(printer)?;
        }
        OciCommand::TurnOff { id } => {
            let id = resolver.resolve(Category::Oci, &id).await?;
            session.oci_turn_off(id).await?;
            ok(printer)?;
        }
        OciCommand::TurnOn { id } => {
            let id = resolver.resolve(Category::Oci, &id).await?;
            session.oci_turn_on(id).await?;
            ok(printer)?;
        }
        OciCommand::Delete { id } => {
            let id = resolver.resolve(Category::Oci, &id).await?;
            session.oci_delete(id).await?;
            ok(printer)?;
        }
        OciCommand::Logs { id } => {
            let id = resolver.resolve(Category::Oci, &id).await?;
            show_oci_logs(session, printer, id).await?;
        }
        OciCommand::Settings { id } => {
            let id = resolver.resolve(Category::Oci, &id).await?;
            show_oci_settings(session, printer, id).await?;
        }
        OciCommand::Create {
            name,
            template,
            oci_class,
        } => {
            session
                .oci_create(&name, template, oci_class.as_deref(), TemplateType::Machine, None)
                .await?;
            ok(printer)?;
        }
        OciCommand::ChangeClass {
            id,
            oci_class,
            at_midnight,
        } => {
            let id = resolver.resolve(Category::Oci, &id).await?;
            session.oci_change_class(id, &oci_class, at_midnight).await?;
            ok(printer)?;
        }
        OciCommand::Clone {
            id,
            name,
            clone_type,
        } => {
            let id = resolver.resolve(Category::Oci, &id).await?;
            session.oci_clone(id, &name, clone_type).await?;
            ok(printer)?;
        }
    }
    Ok(())
}
