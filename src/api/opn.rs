//! OPN (private network) operations

use super::client::Session;
use super::fields::{dict_field, int_field, results, str_field};
use anyhow::Result;
use clap::ValueEnum;
use serde_json::{json, Value};

/// Address range of a new private network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum AddressPool {
    #[default]
    #[value(name = "10.0.0.0/24")]
    TenNet,
    #[value(name = "192.168.0.0/24")]
    OneNineTwoNet,
}

impl AddressPool {
    pub fn as_str(self) -> &'static str {
        match self {
            AddressPool::TenNet => "10.0.0.0/24",
            AddressPool::OneNineTwoNet => "192.168.0.0/24",
        }
    }
}

#[derive(Debug, Clone)]
pub struct PrivateNetwork {
    pub id: i64,
    pub name: String,
    pub address_pool: String,
    pub payment_type: String,
}

impl From<&Value> for PrivateNetwork {
    fn from(value: &Value) -> Self {
        Self {
            id: int_field(value, "OpnId"),
            name: str_field(value, "OpnName"),
            address_pool: str_field(value, "AddressPool"),
            payment_type: dict_field(value, "PaymentType"),
        }
    }
}

/// An instance attached to a private network
#[derive(Debug, Clone)]
pub struct OpnVm {
    pub vm_id: i64,
    pub vm_name: String,
    pub mac_address: String,
    pub private_ip: String,
}

impl From<&Value> for OpnVm {
    fn from(value: &Value) -> Self {
        let vm = value.get("VirtualMachine").unwrap_or(&Value::Null);
        Self {
            vm_id: int_field(vm, "VirtualMachineId"),
            vm_name: str_field(vm, "VirtualMachineName"),
            mac_address: str_field(value, "MacAddress"),
            private_ip: str_field(value, "PrivateIpAddress"),
        }
    }
}

/// A private network with its attached instances
#[derive(Debug, Clone)]
pub struct OpnDetails {
    pub network: PrivateNetwork,
    pub vms: Vec<OpnVm>,
}

impl From<&Value> for OpnDetails {
    fn from(value: &Value) -> Self {
        Self {
            network: PrivateNetwork::from(value),
            vms: results(value.get("PrivateIps").unwrap_or(&Value::Null))
                .iter()
                .map(OpnVm::from)
                .collect(),
        }
    }
}

impl Session {
    pub async fn opn_list(&self) -> Result<Vec<PrivateNetwork>> {
        let networks = self.search("GetOpns").await?;
        Ok(networks.iter().map(PrivateNetwork::from).collect())
    }

    pub async fn opn_get(&self, opn_id: i64) -> Result<OpnDetails> {
        let reply = self
            .clients(
                "GetOpn",
                json!({ "opnId": opn_id, "clientId": self.client_id() }),
            )
            .await?;
        Ok(OpnDetails::from(&reply))
    }

    pub async fn opn_create(&self, name: &str, address_pool: AddressPool) -> Result<()> {
        self.clients(
            "CreateOpn",
            json!({
                "name": name,
                "addressPool": address_pool.as_str(),
                "clientId": self.client_id(),
            }),
        )
        .await?;
        Ok(())
    }

    pub async fn opn_delete(&self, opn_id: i64) -> Result<()> {
        self.clients(
            "DeleteOpn",
            json!({ "opnId": opn_id, "clientId": self.client_id() }),
        )
        .await?;
        Ok(())
    }

    pub async fn opn_rename(&self, opn_id: i64, name: &str) -> Result<()> {
        self.clients(
            "UpdateOpn",
            json!({ "opnId": opn_id, "name": name, "clientId": self.client_id() }),
        )
        .await?;
        Ok(())
    }

    /// Attach an instance with a fixed private address
    pub async fn opn_add_oci(&self, opn_id: i64, oci_id: i64, ip_address: &str) -> Result<()> {
        self.clients(
            "AddVirtualMachineToOpn",
            json!({
                "opnId": opn_id,
                "virtualMachineId": oci_id,
                "privateIpAddress": ip_address,
                "clientId": self.client_id(),
            }),
        )
        .await?;
        Ok(())
    }

    pub async fn opn_remove_oci(&self, opn_id: i64, oci_id: i64) -> Result<()> {
        self.clients(
            "RemoveVirtualMachineFromOpn",
            json!({
                "opnId": opn_id,
                "virtualMachineId": oci_id,
                "clientId": self.client_id(),
            }),
        )
        .await?;
        Ok(())
    }
}
