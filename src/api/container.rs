//! Instance container operations

use super::client::Session;
use super::fields::{bool_field, dict_field, int_field, opt_int, opt_str, required_int, results, str_field};
use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;
use serde_json::{json, Value};

/// Service balanced by a container's load balancer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize)]
pub enum Service {
    #[value(name = "HTTP")]
    #[serde(rename = "HTTP")]
    Http,
    #[value(name = "HTTPS")]
    #[serde(rename = "HTTPS")]
    Https,
    #[value(name = "SMTP")]
    #[serde(rename = "SMTP")]
    Smtp,
    #[value(name = "MySQL")]
    #[serde(rename = "MySQL")]
    MySql,
    #[default]
    #[value(name = "Port")]
    Port,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize)]
#[value(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SessionPersistence {
    #[default]
    None,
    SourceIp,
    ByCookie,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize)]
#[value(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum LoadBalancerAlgorithm {
    #[default]
    LeastResponseTime,
    LeastConnections,
    SourceIpHash,
    RoundRobin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize)]
pub enum IpVersion {
    #[default]
    #[value(name = "4")]
    #[serde(rename = "4")]
    V4,
    #[value(name = "6")]
    #[serde(rename = "6")]
    V6,
    #[value(name = "both")]
    #[serde(rename = "both")]
    Both,
}

/// Container record sent by `CreateContainer` and `UpdateContainer`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ContainerSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container_id: Option<i64>,
    pub container_name: String,
    pub is_load_balancer: bool,
    pub service: Service,
    /// Only sent for [`Service::Port`]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port_number: Option<i64>,
    pub is_proxy_cache: bool,
    #[serde(rename = "IsSSLUsed")]
    pub is_ssl_used: bool,
    pub is_service_check_available: bool,
    pub master_service_id: Option<i64>,
    pub session_type: SessionPersistence,
    pub load_balancer_algorithm: LoadBalancerAlgorithm,
    #[serde(rename = "IPVersion")]
    pub ip_version: IpVersion,
    pub autoscaling_type: &'static str,
}

impl ContainerSpec {
    pub fn new(name: &str) -> Self {
        Self {
            container_id: None,
            container_name: name.to_string(),
            is_load_balancer: false,
            service: Service::default(),
            port_number: None,
            is_proxy_cache: false,
            is_ssl_used: false,
            is_service_check_available: false,
            master_service_id: None,
            session_type: SessionPersistence::default(),
            load_balancer_algorithm: LoadBalancerAlgorithm::default(),
            ip_version: IpVersion::default(),
            autoscaling_type: "off",
        }
    }

    pub fn with_port(mut self, port: Option<i64>) -> Self {
        self.port_number = match self.service {
            Service::Port => port,
            _ => None,
        };
        self
    }

    pub fn with_autoscaling(mut self, enabled: bool) -> Self {
        self.autoscaling_type = if enabled { "on" } else { "off" };
        self
    }
}

/// A container as shown in listings
#[derive(Debug, Clone)]
pub struct ContainerSummary {
    pub id: i64,
    pub name: String,
    pub vm_count: i64,
}

impl From<&Value> for ContainerSummary {
    fn from(value: &Value) -> Self {
        Self {
            id: int_field(value, "ContainerId"),
            name: str_field(value, "ContainerName"),
            vm_count: int_field(value, "VirtualMachineCount"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ContainerIp {
    pub ipv4: String,
    pub ipv6: String,
}

/// Full container settings as returned by `GetContainer`
#[derive(Debug, Clone)]
pub struct ContainerDetails {
    pub id: i64,
    pub name: String,
    pub autoscaling: String,
    pub healthcheck: bool,
    pub load_balancer: bool,
    pub schedulers: i64,
    pub vm_count: i64,
    pub ip_version: String,
    pub load_balancer_algorithm: String,
    pub proxy_cache: bool,
    pub ssl: bool,
    pub service: String,
    pub port: Option<i64>,
    pub session_type: String,
    pub ips: Vec<ContainerIp>,
    pub master_service_id: Option<i64>,
    pub master_service_name: String,
    pub db_user: Option<String>,
    pub db_password: Option<String>,
}

impl ContainerDetails {
    /// Service label; the port is shown for plain port balancing
    pub fn service_label(&self) -> String {
        match self.port {
            Some(port) if self.service == "Port" => format!("Port ({})", port),
            _ => self.service.clone(),
        }
    }
}

impl From<&Value> for ContainerDetails {
    fn from(value: &Value) -> Self {
        let ips = results(value.get("IPs").unwrap_or(&Value::Null))
            .iter()
            .map(|ip| ContainerIp {
                ipv4: str_field(ip, "Address"),
                ipv6: str_field(ip, "AddressV6"),
            })
            .collect();

        Self {
            id: int_field(value, "ContainerId"),
            name: str_field(value, "ContainerName"),
            autoscaling: dict_field(value, "AutoscalingType"),
            healthcheck: bool_field(value, "IsServiceCheckAvailable"),
            load_balancer: bool_field(value, "IsLoadBalancer"),
            schedulers: int_field(value, "SchedulersCount"),
            vm_count: int_field(value, "VirtualMachineCount"),
            ip_version: dict_field(value, "IPVersion"),
            load_balancer_algorithm: dict_field(value, "LoadBalancerAlgorithm"),
            proxy_cache: bool_field(value, "IsProxyCache"),
            ssl: bool_field(value, "IsSSLUsed"),
            service: dict_field(value, "Service"),
            port: opt_int(value, "PortNumber"),
            session_type: dict_field(value, "SessionType"),
            ips,
            master_service_id: opt_int(value, "MasterServiceId"),
            master_service_name: str_field(value, "MasterServiceName"),
            db_user: opt_str(value, "DatabaseUserLogin"),
            db_password: opt_str(value, "DatabaseUserPassword"),
        }
    }
}

/// An instance attached to a container
#[derive(Debug, Clone)]
pub struct ContainerVm {
    pub oci_id: i64,
    pub oci_name: String,
    pub status: String,
}

impl From<&Value> for ContainerVm {
    fn from(value: &Value) -> Self {
        let vm = value.get("VirtualMachine").unwrap_or(value);
        Self {
            oci_id: int_field(vm, "VirtualMachineId"),
            oci_name: str_field(vm, "VirtualMachineName"),
            status: dict_field(vm, "Status"),
        }
    }
}

impl Session {
    pub async fn container_list(&self) -> Result<Vec<ContainerSummary>> {
        let containers = self.search("GetContainers").await?;
        Ok(containers.iter().map(ContainerSummary::from).collect())
    }

    pub async fn container_get(&self, container_id: i64) -> Result<ContainerDetails> {
        let reply = self
            .clients(
                "GetContainer",
                json!({ "containerId": container_id, "clientId": self.client_id() }),
            )
            .await?;
        Ok(ContainerDetails::from(&reply))
    }

    pub async fn container_vms(&self, container_id: i64) -> Result<Vec<ContainerVm>> {
        let reply = self
            .clients(
                "GetContainerVirtualMachines",
                json!({ "containerId": container_id, "clientId": self.client_id() }),
            )
            .await?;
        Ok(results(&reply).iter().map(ContainerVm::from).collect())
    }

    /// Create a container and return its ID
    pub async fn container_create(&self, spec: &ContainerSpec) -> Result<i64> {
        let reply = self
            .clients(
                "CreateContainer",
                json!({ "container": spec, "clientId": self.client_id() }),
            )
            .await?;
        let id = match reply.as_i64() {
            Some(id) => id,
            None => required_int("CreateContainer", &reply, "ContainerId")?,
        };
        tracing::info!("Created container {}", id);
        Ok(id)
    }

    /// Replace the settings of an existing container
    pub async fn container_edit(&self, container_id: i64, spec: ContainerSpec) -> Result<()> {
        let spec = ContainerSpec {
            container_id: Some(container_id),
            ..spec
        };
        self.clients(
            "UpdateContainer",
            json!({ "container": spec, "clientId": self.client_id() }),
        )
        .await?;
        Ok(())
    }

    pub async fn container_delete(&self, container_id: i64) -> Result<()> {
        self.clients(
            "DeleteContainers",
            json!({ "containerIds": [container_id], "clientId": self.client_id() }),
        )
        .await?;
        Ok(())
    }

    pub async fn container_add_oci(&self, container_id: i64, oci_id: i64) -> Result<()> {
        self.clients(
            "AddVirtualMachineToContainer",
            json!({
                "containerId": container_id,
                "virtualMachineId": oci_id,
                "clientId": self.client_id(),
            }),
        )
        .await?;
        Ok(())
    }

    pub async fn container_remove_oci(&self, container_id: i64, oci_id: i64) -> Result<()> {
        self.clients(
            "RemoveVirtualMachineFromContainer",
            json!({
                "containerId": container_id,
                "virtualMachineId": oci_id,
                "clientId": self.client_id(),
            }),
        )
        .await?;
        Ok(())
    }
}
