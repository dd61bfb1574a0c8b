//! Command-line surface
//!
//! One subcommand group per resource category. Handlers resolve name-or-id
//! arguments, call the session and print through a [`Printer`].

pub mod account;
pub mod container;
pub mod oci;
pub mod opn;
pub mod ordb;
pub mod ovs;

use crate::api::Session;
use crate::cells;
use crate::report::{yes_no, Printer};
use anyhow::Result;
use clap::Subcommand;
use std::io::Write;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show account information
    #[command(subcommand, name = "Account")]
    Account(account::AccountCommand),

    /// Manage OCI instances
    #[command(subcommand, name = "OCI")]
    Oci(oci::OciCommand),

    /// Manage OVS volumes
    #[command(subcommand, name = "OVS")]
    Ovs(ovs::OvsCommand),

    /// Manage database instances and logical databases
    #[command(subcommand, name = "ORDB")]
    Ordb(ordb::OrdbCommand),

    /// Manage instance containers
    #[command(subcommand, name = "Container")]
    Container(container::ContainerCommand),

    /// Manage private networks
    #[command(subcommand, name = "OPN")]
    Opn(opn::OpnCommand),
}

/// Run one command against an open session
pub async fn run<W: Write>(command: Command, session: &Session, printer: &mut Printer<W>) -> Result<()> {
    tracing::debug!("Running {:?}", command);
    match command {
        Command::Account(command) => account::run(command, session, printer).await,
        Command::Oci(command) => oci::run(command, session, printer).await,
        Command::Ovs(command) => ovs::run(command, session, printer).await,
        Command::Ordb(command) => ordb::run(command, session, printer).await,
        Command::Container(command) => container::run(command, session, printer).await,
        Command::Opn(command) => opn::run(command, session, printer).await,
    }
}

fn ok<W: Write>(printer: &mut Printer<W>) -> Result<()> {
    printer.print_str("OK")?;
    Ok(())
}

/// Templates of a category whose name contains `name_filter`
pub(crate) async fn show_template_category<W: Write>(
    session: &Session,
    printer: &mut Printer<W>,
    category_id: i64,
    name_filter: &str,
) -> Result<()> {
    let templates = session.templates(category_id, name_filter).await?;
    let data = templates
        .iter()
        .map(|t| (t.id.to_string(), [t.name.as_str()]));

    if !printer.print_key_value(Some(&["Template ID", "Template name"]), data, false)? {
        printer.print_str("No templates in this category.\n")?;
    }
    Ok(())
}

pub(crate) async fn show_oci_logs<W: Write>(session: &Session, printer: &mut Printer<W>, id: i64) -> Result<()> {
    let logs = session.oci_logs(id).await?;
    printer.print_rows(
        &["Time", "Operation type", "User", "Status", "Parameters"],
        &logs,
        |op| {
            cells![
                op.time,
                op.operation_type,
                op.user_name,
                op.status,
                op.parameters.join(" ")
            ]
        },
    )?;
    Ok(())
}

pub(crate) async fn show_oci_settings<W: Write>(session: &Session, printer: &mut Printer<W>, id: i64) -> Result<()> {
    let s = session.oci_settings(id).await?;

    printer.print_str("Basic VM settings and statistics")?;
    printer.print_key_value(
        Some(&["Key", "Value"]),
        [
            ("1 Autoscaling", s.autoscaling.clone()),
            ("2 Connection", s.connection_type.clone()),
            ("3 CPU (MHz)", s.cpu_mhz.to_string()),
            ("4 CPU usage (MHz)", s.cpu_usage_mhz.to_string()),
            ("5 Creation date", s.creation_date.clone()),
            ("6 Created by", s.creation_user_name.clone()),
            ("7 IOPS usage", s.iops_usage.to_string()),
            ("8 Last changed", s.last_change_date.clone()),
            ("9 Payment type", s.payment_type.clone()),
            ("10 RAM (MB)", s.memory_mb.to_string()),
            ("11 RAM usage (MB)", s.memory_usage_mb.to_string()),
            ("12 Status", s.status.clone()),
            ("13 Name", s.name.clone()),
            ("14 Class", s.vm_class_name.clone()),
        ]
        .map(|(key, value)| (key, [value])),
        true,
    )?;

    printer.print_str("Hard disks")?;
    printer.print_rows(
        &["ID", "Name", "Capacity (GB)", "Created at", "Created by", "Primary", "Shared"],
        &s.disks,
        |disk| {
            cells![
                disk.id,
                disk.name,
                disk.capacity_gb,
                disk.creation_date,
                disk.creation_user_name,
                yes_no(disk.is_primary),
                yes_no(disk.is_shared)
            ]
        },
    )?;

    printer.print_str("IP addresses")?;
    printer.print_rows(
        &[
            "IPv4 address",
            "IPv6 address",
            "Created at",
            "DHCP branch",
            "Gateway",
            "Status",
            "Last changed",
            "MAC address",
        ],
        &s.ips,
        |ip| {
            cells![
                format!("{}/{}", ip.ipv4, ip.netmask),
                ip.ipv6,
                ip.creation_date,
                ip.dhcp_branch,
                ip.gateway,
                ip.status,
                ip.last_change_date,
                ip.macaddr
            ]
        },
    )?;

    if !s.vlans.is_empty() {
        printer.print_str("Private vlans")?;
        printer.print_rows(
            &["IPv4 address", "Created at", "MAC address"],
            &s.vlans,
            |vlan| cells![vlan.ipv4, vlan.creation_date, vlan.macaddr],
        )?;
    }
    Ok(())
}

pub(crate) async fn show_template_info<W: Write>(session: &Session, printer: &mut Printer<W>, id: i64) -> Result<()> {
    let ti = session.template_info(id).await?;
    let disks = ti
        .disks
        .iter()
        .map(|disk| disk.label())
        .collect::<Vec<_>>()
        .join(", ");

    printer.print_key_value(
        Some(&["Key", "Value"]),
        [
            ("1 Template ID", ti.template_id.to_string()),
            (
                "2 VM class",
                format!("{} (class ID: {})", ti.vm_class_name, ti.vm_class_id),
            ),
            ("3 Name", ti.label.clone()),
            ("4 Template name", ti.template_name.clone()),
            ("5 System category", ti.system_category_name.clone()),
            ("6 Template category", ti.template_category.clone()),
            ("7 Software", ti.software.clone()),
            ("8 Ethernet controllers", ti.eth_count.to_string()),
            ("9 Connection", ti.connection_type.clone()),
            ("10 Disk drives", disks),
            ("11 Description", ti.description.clone()),
        ]
        .map(|(key, value)| (key, [value])),
        true,
    )?;
    Ok(())
}
