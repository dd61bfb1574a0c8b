use super::ok;
use crate::api::opn::AddressPool;
use crate::api::Session;
use crate::cells;
use crate::report::Printer;
use crate::resolve::{Category, Resolver};
use anyhow::Result;
use clap::Subcommand;
use std::io::Write;

#[derive(Subcommand, Debug)]
#[command(rename_all = "PascalCase")]
pub enum OpnCommand {
    /// List private networks
    List,

    /// Display OPN info
    Get {
        /// OPN name or ID (as returned by OPN List)
        opn_id: String,
    },

    /// Create a new OPN
    Create {
        /// OPN name
        name: String,
        /// address class
        #[arg(value_enum, default_value_t = AddressPool::TenNet)]
        address_pool: AddressPool,
    },

    /// Delete a private network
    Delete {
        /// OPN name or ID (as returned by OPN List)
        opn_id: String,
    },

    /// Change OPN name
    Rename {
        /// OPN name or ID (as returned by OPN List)
        opn_id: String,
        /// OPN name
        name: String,
    },

    /// Add an OCI to an OPN
    #[command(name = "AddOCI")]
    AddOci {
        /// OPN name or ID (as returned by OPN List)
        opn_id: String,
        /// OCI name or ID (as returned by OCI List)
        oci_id: String,
        /// OCI IP address
        ip_address: String,
    },

    /// Remove an OCI from an OPN
    #[command(name = "RemoveOCI")]
    RemoveOci {
        /// OPN name or ID (as returned by OPN List)
        opn_id: String,
        /// OCI name or ID (as returned by OCI List)
        oci_id: String,
    },
}

pub async fn run<W: Write>(command: OpnCommand, session: &Session, printer: &mut Printer<W>) -> Result<()> {
    let mut resolver = Resolver::new(session);

    match command {
        OpnCommand::List => {
            let networks = session.opn_list().await?;
            printer.print_rows(
                &["OPN ID", "Name", "Address pool", "Payment type"],
                &networks,
                |opn| cells![opn.id, opn.name, opn.address_pool, opn.payment_type],
            )?;
        }
        OpnCommand::Get { opn_id } => {
            let opn_id = resolver.resolve(Category::Opn, &opn_id).await?;
            let details = session.opn_get(opn_id).await?;
            let opn = &details.network;

            printer.print_str("\nBasic OPN settings")?;
            printer.print_key_value(
                Some(&["Key", "Value"]),
                [
                    ("ID", opn.id.to_string()),
                    ("Name", opn.name.clone()),
                    ("Address pool", opn.address_pool.clone()),
                    ("Payment type", opn.payment_type.clone()),
                ]
                .map(|(key, value)| (key, [value])),
                false,
            )?;

            printer.print_str("Virtual machines")?;
            printer.print_rows(
                &["OCI ID", "Name", "MAC address", "Private IP address"],
                &details.vms,
                |vm| cells![vm.vm_id, vm.vm_name, vm.mac_address, vm.private_ip],
            )?;
        }
        OpnCommand::Create { name, address_pool } => {
            session.opn_create(&name, address_pool).await?;
            ok(printer)?;
        }
        OpnCommand::Delete { opn_id } => {
            let opn_id = resolver.resolve(Category::Opn, &opn_id).await?;
            session.opn_delete(opn_id).await?;
            ok(printer)?;
        }
        OpnCommand::Rename { opn_id, name } => {
            let opn_id = resolver.resolve(Category::Opn, &opn_id).await?;
            session.opn_rename(opn_id, &name).await?;
            ok(printer)?;
        }
        OpnCommand::AddOci {
            opn_id,
            oci_id,
            ip_address,
        } => {
            let opn_id = resolver.resolve(Category::Opn, &opn_id).await?;
            let oci_id = resolver.resolve(Category::Oci, &oci_id).await?;
            session.opn_add_oci(opn_id, oci_id, &ip_address).await?;
            ok(printer)?;
        }
        OpnCommand::RemoveOci { opn_id, oci_id } => {
            let opn_id = resolver.resolve(Category::Opn, &opn_id).await?;
            let oci_id = resolver.resolve(Category::Oci, &oci_id).await?;
            session.opn_remove_oci(opn_id, oci_id).await?;
            ok(printer)?;
        }
    }
    Ok(())
}
