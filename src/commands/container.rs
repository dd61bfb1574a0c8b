use super::ok;
use crate::api::container::{
    ContainerDetails, ContainerSpec, IpVersion, LoadBalancerAlgorithm, Service, SessionPersistence,
};
use crate::api::Session;
use crate::cells;
use crate::report::{yes_no, Printer};
use crate::resolve::{Category, Lister, Resolver};
use anyhow::Result;
use clap::{Args, Subcommand};
use std::io::Write;

/// Settings shared by `Create` and `Edit`
#[derive(Args, Debug)]
pub struct ContainerOptions {
    /// enable load-balancer
    #[arg(long)]
    load_balancer: bool,
    /// load balancer service
    #[arg(long, value_enum, default_value_t = Service::Port)]
    service: Service,
    /// load balancer port (ignored unless --service=Port)
    #[arg(long)]
    port: Option<i64>,
    /// enable proxy cache
    #[arg(long)]
    proxy_cache: bool,
    /// enable SSL
    #[arg(long)]
    use_ssl: bool,
    /// enable healthcheck
    #[arg(long)]
    healthcheck: bool,
    /// MySQL master OCI name or ID (will be added to container)
    #[arg(long)]
    mysql_master_id: Option<String>,
    /// session persistence type
    #[arg(long, value_enum, default_value_t = SessionPersistence::None)]
    session_persistence: SessionPersistence,
    /// load balancer algorithm
    #[arg(long, value_enum, default_value_t = LoadBalancerAlgorithm::LeastResponseTime)]
    load_balancer_algorithm: LoadBalancerAlgorithm,
    /// IP version
    #[arg(long, value_enum, default_value_t = IpVersion::V4)]
    ip_version: IpVersion,
    /// autoscaling
    #[arg(long)]
    autoscaling: bool,
}

impl ContainerOptions {
    async fn into_spec<L: Lister>(self, name: &str, resolver: &mut Resolver<'_, L>) -> Result<ContainerSpec> {
        let master_service_id = resolver
            .resolve_opt(Category::Oci, self.mysql_master_id.as_deref())
            .await?;
        Ok(ContainerSpec {
            is_load_balancer: self.load_balancer,
            service: self.service,
            is_proxy_cache: self.proxy_cache,
            is_ssl_used: self.use_ssl,
            is_service_check_available: self.healthcheck,
            master_service_id,
            session_type: self.session_persistence,
            load_balancer_algorithm: self.load_balancer_algorithm,
            ip_version: self.ip_version,
            ..ContainerSpec::new(name)
        }
        .with_port(self.port)
        .with_autoscaling(self.autoscaling))
    }
}

#[derive(Subcommand, Debug)]
#[command(rename_all = "PascalCase")]
pub enum ContainerCommand {
    /// List containers
    List,

    /// Display container information
    Get {
        /// container name or ID (as returned by Container List)
        container_id: String,
    },

    /// Create a new container
    Create {
        /// container name
        name: String,
        #[command(flatten)]
        options: ContainerOptions,
    },

    /// Modify a container
    Edit {
        /// container name or ID (as returned by Container List)
        container_id: String,
        /// container name
        name: String,
        #[command(flatten)]
        options: ContainerOptions,
    },

    /// Delete a container
    Delete {
        /// container name or ID (as returned by Container List)
        container_id: String,
    },

    /// Add an OCI to a container
    #[command(name = "AddOCI")]
    AddOci {
        /// container name or ID (as returned by Container List)
        container_id: String,
        /// OCI name or ID (as returned by OCI List)
        oci_id: String,
    },

    /// Remove an OCI from a container
    #[command(name = "RemoveOCI")]
    RemoveOci {
        /// container name or ID (as returned by Container List)
        container_id: String,
        /// OCI name or ID (as returned by OCI List)
        oci_id: String,
    },
}

pub async fn run<W: Write>(command: ContainerCommand, session: &Session, printer: &mut Printer<W>) -> Result<()> {
    let mut resolver = Resolver::new(session);

    match command {
        ContainerCommand::List => {
            let containers = session.container_list().await?;
            printer.print_rows(&["Container ID", "Name", "VMs"], &containers, |c| {
                cells![c.id, c.name, c.vm_count]
            })?;
        }
        ContainerCommand::Get { container_id } => {
            let container_id = resolver.resolve(Category::Container, &container_id).await?;
            let container = session.container_get(container_id).await?;
            printer.print_str("\nBasic container settings")?;
            printer.print_key_value(Some(&["Key", "Value"]), container_settings(&container), false)?;

            let vms = session.container_vms(container_id).await?;
            printer.print_str("\nAttached OCIs")?;
            printer.print_rows(&["ID", "Name", "Status"], &vms, |vm| {
                cells![vm.oci_id, vm.oci_name, vm.status]
            })?;
        }
        ContainerCommand::Create { name, options } => {
            let spec = options.into_spec(&name, &mut resolver).await?;
            let container_id = session.container_create(&spec).await?;
            printer.print_str(&format!("OK, new container ID: {}.", container_id))?;
        }
        ContainerCommand::Edit {
            container_id,
            name,
            options,
        } => {
            let container_id = resolver.resolve(Category::Container, &container_id).await?;
            let spec = options.into_spec(&name, &mut resolver).await?;
            session.container_edit(container_id, spec).await?;
            ok(printer)?;
        }
        ContainerCommand::Delete { container_id } => {
            let container_id = resolver.resolve(Category::Container, &container_id).await?;
            session.container_delete(container_id).await?;
            ok(printer)?;
        }
        ContainerCommand::AddOci {
            container_id,
            oci_id,
        } => {
            let container_id = resolver.resolve(Category::Container, &container_id).await?;
            let oci_id = resolver.resolve(Category::Oci, &oci_id).await?;
            session.container_add_oci(container_id, oci_id).await?;
            ok(printer)?;
        }
        ContainerCommand::RemoveOci {
            container_id,
            oci_id,
        } => {
            let container_id = resolver.resolve(Category::Container, &container_id).await?;
            let oci_id = resolver.resolve(Category::Oci, &oci_id).await?;
            session.container_remove_oci(container_id, oci_id).await?;
            ok(printer)?;
        }
    }
    Ok(())
}

/// Key/value rows of `Container Get`; load balancer rows only when enabled
fn container_settings(c: &ContainerDetails) -> Vec<(String, [String; 1])> {
    let mut rows = vec![
        ("ID", c.id.to_string()),
        ("Name", c.name.clone()),
        ("Autoscaling", c.autoscaling.clone()),
        ("Healthcheck", yes_no(c.healthcheck).to_string()),
        ("Load balancer", yes_no(c.load_balancer).to_string()),
        ("Schedulers", c.schedulers.to_string()),
        ("Virtual machines", c.vm_count.to_string()),
    ];
    if c.load_balancer {
        let ipv4 = c.ips.iter().map(|ip| ip.ipv4.as_str()).collect::<Vec<_>>();
        let ipv6 = c.ips.iter().map(|ip| ip.ipv6.as_str()).collect::<Vec<_>>();
        rows.extend([
            ("IP version", c.ip_version.clone()),
            ("Load balancer algorithm", c.load_balancer_algorithm.clone()),
            ("Proxy cache", yes_no(c.proxy_cache).to_string()),
            ("SSL enabled", yes_no(c.ssl).to_string()),
            ("Service", c.service_label()),
            ("Session type", c.session_type.clone()),
            ("IPv4 addresses", ipv4.join("\n")),
            ("IPv6 addresses", ipv6.join("\n")),
        ]);
    }
    if let Some(master_id) = c.master_service_id {
        rows.push((
            "Master OCI (MySQL)",
            format!("{} ({})", c.master_service_name, master_id),
        ));
    }
    if let Some(user) = &c.db_user {
        rows.push(("Database user", user.clone()));
    }
    if let Some(password) = &c.db_password {
        rows.push(("Database password", password.clone()));
    }
    rows.into_iter()
        .map(|(key, value)| (key.to_string(), [value]))
        .collect()
}
