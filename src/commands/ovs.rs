use super::ok;
use crate::api::Session;
use crate::cells;
use crate::report::{yes_no, Printer};
use crate::resolve::{Category, Resolver};
use anyhow::Result;
use clap::{Subcommand, ValueEnum};
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Sharing {
    /// allow attaching the volume to several instances
    Shared,
    Unshared,
}

#[derive(Subcommand, Debug)]
#[command(rename_all = "PascalCase")]
pub enum OvsCommand {
    /// Lists disks
    List,

    /// Add a disk
    Create {
        /// OVS volume name
        name: String,
        /// OVS volume size in GB
        capacity: i64,
        /// OVS volume tier (1...5)
        #[arg(default_value_t = 1, value_parser = clap::value_parser!(u8).range(1..=5))]
        tier: u8,
        /// allow sharing volume between instances
        #[arg(value_enum, default_value_t = Sharing::Unshared)]
        disktype: Sharing,
    },

    /// Delete a disk
    Delete {
        /// OVS name or id (as returned by OVS List)
        ovs_id: String,
    },

    /// Connect a disk to an instance
    Map {
        /// OVS name or id (as returned by OVS List)
        ovs_id: String,
        /// OCI name or ID (as returned by OCI List)
        oci_id: String,
    },

    /// Disconnect a disk from an instance
    Unmap {
        /// OVS name or id (as returned by OVS List)
        ovs_id: String,
        /// OCI name or ID (as returned by OCI List)
        oci_id: String,
    },

    /// Change OVS tier
    ChangeTier {
        /// OVS name or id (as returned by OVS List)
        ovs_id: String,
        /// OVS volume tier (1...5)
        #[arg(value_parser = clap::value_parser!(u8).range(1..=5))]
        tier: u8,
    },

    /// Resize OVS volume
    Extend {
        /// OVS name or id (as returned by OVS List)
        ovs_id: String,
        /// new size in GB (must be larger than current size)
        size: i64,
    },
}

pub async fn run<W: Write>(command: OvsCommand, session: &Session, printer: &mut Printer<W>) -> Result<()> {
    let mut resolver = Resolver::new(session);

    match command {
        OvsCommand::List => {
            let disks = session.ovs_list().await?;
            printer.print_rows(
                &["ID", "Name", "Tier", "Capacity", "Used", "Shared", "VMs"],
                &disks,
                |disk| {
                    let vms = disk
                        .vms
                        .iter()
                        .map(|vm| vm.label())
                        .collect::<Vec<_>>()
                        .join("\n");
                    cells![
                        disk.id,
                        disk.name,
                        disk.tier,
                        format!("{} GB", disk.capacity_gb),
                        format!("{} GB", disk.used_gb),
                        yes_no(disk.is_shared),
                        vms
                    ]
                },
            )?;
        }
        OvsCommand::Create {
            name,
            capacity,
            tier,
            disktype,
        } => {
            session
                .ovs_create(&name, capacity, tier, disktype == Sharing::Shared)
                .await?;
            ok(printer)?;
        }
        OvsCommand::Delete { ovs_id } => {
            let ovs_id = resolver.resolve(Category::Ovs, &ovs_id).await?;
            session.ovs_delete(ovs_id).await?;
            ok(printer)?;
        }
        OvsCommand::Map { ovs_id, oci_id } => {
            let ovs_id = resolver.resolve(Category::Ovs, &ovs_id).await?;
            let oci_id = resolver.resolve(Category::Oci, &oci_id).await?;
            session.ovs_map(ovs_id, oci_id).await?;
            ok(printer)?;
        }
        OvsCommand::Unmap { ovs_id, oci_id } => {
            let ovs_id = resolver.resolve(Category::Ovs, &ovs_id).await?;
            let oci_id = resolver.resolve(Category::Oci, &oci_id).await?;
            session.ovs_unmap(ovs_id, oci_id).await?;
            ok(printer)?;
        }
        OvsCommand::ChangeTier { ovs_id, tier } => {
            let ovs_id = resolver.resolve(Category::Ovs, &ovs_id).await?;
            session.ovs_change_tier(ovs_id, tier).await?;
            ok(printer)?;
        }
        OvsCommand::Extend { ovs_id, size } => {
            let ovs_id = resolver.resolve(Category::Ovs, &ovs_id).await?;
            session.ovs_extend(ovs_id, size).await?;
            ok(printer)?;
        }
    }
    Ok(())
}
