//! OCI (virtual machine) operations

use super::client::Session;
use super::fields::{
    array_field, bool_field, date_field, dict, dict_field, dict_item_name, dict_names, int_field,
    opt_int, results, str_field,
};
use crate::error::ApiError;
use anyhow::{Context, Result};
use clap::ValueEnum;
use serde_json::{json, Value};

/// How a clone is initialized
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "PascalCase")]
pub enum CloneType {
    /// New root/administrator password, host name etc. are generated
    Runtime,
    /// Initialization is skipped; only a new IP address and domain name are assigned
    AbsoluteCopy,
}

impl CloneType {
    fn id(self) -> i64 {
        match self {
            CloneType::Runtime => 0,
            CloneType::AbsoluteCopy => 1,
        }
    }
}

/// Kind of machine created from a template
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateType {
    Machine,
    Database,
}

impl TemplateType {
    fn id(self) -> i64 {
        match self {
            TemplateType::Machine => 1,
            TemplateType::Database => 2,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TemplateCategory {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub parent_id: Option<i64>,
}

impl TemplateCategory {
    fn from_value(value: &Value, parent_id: Option<i64>) -> Self {
        let names = array_field(value, "TemplateCategoryNames");
        Self {
            id: int_field(value, "TemplateCategoryId"),
            name: first_or_dash(dict_names(names, "CategoryName")),
            description: first_or_dash(dict_names(names, "CategoryDescription")),
            parent_id,
        }
    }
}

fn first_or_dash(names: Vec<String>) -> String {
    names.into_iter().next().unwrap_or_else(|| "-".to_string())
}

#[derive(Debug, Clone)]
pub struct Template {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct TemplateDisk {
    pub name: String,
    pub capacity_gb: i64,
    pub is_primary: bool,
}

impl TemplateDisk {
    pub fn label(&self) -> String {
        if self.is_primary {
            format!("{} ({} GB, Primary)", self.name, self.capacity_gb)
        } else {
            format!("{} ({} GB)", self.name, self.capacity_gb)
        }
    }
}

#[derive(Debug, Clone)]
pub struct TemplateInfo {
    pub template_id: i64,
    pub template_name: String,
    pub template_category: String,
    pub vm_class_id: i64,
    pub vm_class_name: String,
    pub system_category_name: String,
    pub label: String,
    pub software: String,
    pub eth_count: i64,
    pub connection_type: String,
    pub disks: Vec<TemplateDisk>,
    pub description: String,
}

impl From<&Value> for TemplateInfo {
    fn from(value: &Value) -> Self {
        let category_names = value
            .get("TemplateCategory")
            .map(|c| array_field(c, "TemplateCategoryNames"))
            .unwrap_or(&[]);

        let software = array_field(value, "SoftwareList")
            .iter()
            .map(|s| {
                let names = s
                    .get("Software")
                    .map(|sw| array_field(sw, "SoftwareNames"))
                    .unwrap_or(&[]);
                dict_names(names, "Name").join("/")
            })
            .collect::<Vec<_>>()
            .join(", ");

        Self {
            template_id: int_field(value, "TemplateId"),
            template_name: str_field(value, "TemplateName"),
            template_category: dict_names(category_names, "CategoryName").join("/"),
            vm_class_id: value
                .get("VMClass")
                .map(|c| int_field(c, "DictionaryItemId"))
                .unwrap_or(0),
            vm_class_name: dict_field(value, "VMClass"),
            system_category_name: dict_field(value, "TemplateSystemCategory"),
            label: str_field(value, "Name"),
            software,
            eth_count: int_field(value, "EthernetControllersCount"),
            connection_type: dict_field(value, "ConnectionType"),
            disks: array_field(value, "DiskDrives")
                .iter()
                .map(|hdd| TemplateDisk {
                    name: str_field(hdd, "HddName"),
                    capacity_gb: int_field(hdd, "CapacityGB"),
                    is_primary: bool_field(hdd, "IsPrimary"),
                })
                .collect(),
            description: str_field(value, "Description"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct VirtualMachine {
    pub id: i64,
    pub name: String,
    pub status: String,
    pub class_name: String,
}

impl From<&Value> for VirtualMachine {
    fn from(value: &Value) -> Self {
        Self {
            id: int_field(value, "VirtualMachineId"),
            name: str_field(value, "VirtualMachineName"),
            status: dict_field(value, "Status"),
            class_name: dict_field(value, "VMClass"),
        }
    }
}

/// A VM with its current CPU and memory usage
#[derive(Debug, Clone)]
pub struct VmDetails {
    pub vm: VirtualMachine,
    pub cpu_mhz: i64,
    pub cpu_usage_mhz: i64,
    pub memory_mb: i64,
    pub memory_usage_mb: i64,
}

impl VmDetails {
    pub fn cpu(&self) -> String {
        format!("{}/{} MHz", self.cpu_usage_mhz, self.cpu_mhz)
    }

    pub fn memory(&self) -> String {
        format!("{}/{} MB", self.memory_usage_mb, self.memory_mb)
    }
}

impl From<&Value> for VmDetails {
    fn from(value: &Value) -> Self {
        Self {
            vm: VirtualMachine::from(value),
            cpu_mhz: int_field(value, "CpuMhz"),
            cpu_usage_mhz: int_field(value, "CpuMhzUsage"),
            memory_mb: int_field(value, "RamMB"),
            memory_usage_mb: int_field(value, "RamMBUsage"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct VmHistoryEntry {
    pub time: String,
    pub operation_type: String,
    pub user_name: String,
    pub status: String,
    pub parameters: Vec<String>,
}

impl From<&Value> for VmHistoryEntry {
    fn from(value: &Value) -> Self {
        Self {
            time: date_field(value, "CreationDate"),
            operation_type: dict_field(value, "OperationType"),
            user_name: value
                .get("CreationUser")
                .map(|u| str_field(u, "FullName"))
                .unwrap_or_else(|| "-".to_string()),
            status: dict_field(value, "Status"),
            parameters: array_field(value, "Parameters")
                .iter()
                .map(|p| match p.as_str() {
                    Some(s) => s.to_string(),
                    None => str_field(p, "Value"),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct VmDisk {
    pub id: i64,
    pub name: String,
    pub capacity_gb: i64,
    pub creation_date: String,
    pub creation_user_name: String,
    pub is_primary: bool,
    pub is_shared: bool,
}

#[derive(Debug, Clone)]
pub struct VmIp {
    pub ipv4: String,
    pub netmask: String,
    pub ipv6: String,
    pub creation_date: String,
    pub dhcp_branch: String,
    pub gateway: String,
    pub status: String,
    pub last_change_date: String,
    pub macaddr: String,
}

#[derive(Debug, Clone)]
pub struct VmVlan {
    pub ipv4: String,
    pub creation_date: String,
    pub macaddr: String,
}

/// VM settings and usage statistics
#[derive(Debug, Clone)]
pub struct VmSettings {
    pub autoscaling: String,
    pub connection_type: String,
    pub cpu_mhz: i64,
    pub cpu_usage_mhz: i64,
    pub creation_date: String,
    pub creation_user_name: String,
    pub iops_usage: i64,
    pub last_change_date: String,
    pub payment_type: String,
    pub memory_mb: i64,
    pub memory_usage_mb: i64,
    pub status: String,
    pub name: String,
    pub vm_class_name: String,
    pub disks: Vec<VmDisk>,
    pub ips: Vec<VmIp>,
    pub vlans: Vec<VmVlan>,
}

impl From<&Value> for VmSettings {
    fn from(value: &Value) -> Self {
        let disks = array_field(value, "DiskDrives")
            .iter()
            .map(|drive| {
                let hdd = drive.get("ClientHdd").unwrap_or(&Value::Null);
                VmDisk {
                    id: int_field(hdd, "ClientHddId"),
                    name: str_field(hdd, "HddName"),
                    capacity_gb: int_field(hdd, "CapacityGB"),
                    creation_date: date_field(hdd, "CreationDate"),
                    creation_user_name: hdd
                        .get("CreationUser")
                        .map(|u| str_field(u, "FullName"))
                        .unwrap_or_else(|| "-".to_string()),
                    is_primary: bool_field(drive, "IsPrimary"),
                    is_shared: bool_field(hdd, "IsShared"),
                }
            })
            .collect();

        let ips = array_field(value, "IPs")
            .iter()
            .map(|ip| VmIp {
                ipv4: str_field(ip, "Address"),
                netmask: str_field(ip, "NetMask"),
                ipv6: str_field(ip, "AddressV6"),
                creation_date: date_field(ip, "CreationDate"),
                dhcp_branch: str_field(ip, "DhcpBranch"),
                gateway: str_field(ip, "Gateway"),
                status: dict_field(ip, "IPStatus"),
                last_change_date: date_field(ip, "LastChangeDate"),
                macaddr: str_field(ip, "MacAddress"),
            })
            .collect();

        let vlans = array_field(value, "PrivateIpv4")
            .iter()
            .map(|vlan| VmVlan {
                ipv4: str_field(vlan, "PrivateIpAddress"),
                creation_date: date_field(vlan, "CreationDate"),
                macaddr: str_field(vlan, "MacAddress"),
            })
            .collect();

        Self {
            autoscaling: dict_field(value, "AutoScalingType"),
            connection_type: dict_field(value, "ConnectionType"),
            cpu_mhz: int_field(value, "CpuMhz"),
            cpu_usage_mhz: int_field(value, "CpuMhzUsage"),
            creation_date: date_field(value, "CreationDate"),
            creation_user_name: value
                .get("CreationUserSimple")
                .map(|u| str_field(u, "FullName"))
                .unwrap_or_else(|| "-".to_string()),
            iops_usage: int_field(value, "IopsUsage"),
            last_change_date: date_field(value, "LastChangeDate"),
            payment_type: dict_field(value, "PaymentType"),
            memory_mb: int_field(value, "RamMB"),
            memory_usage_mb: int_field(value, "RamMBUsage"),
            status: dict_field(value, "Status"),
            name: str_field(value, "VirtualMachineName"),
            vm_class_name: dict_field(value, "VMClass"),
            disks,
            ips,
            vlans,
        }
    }
}

/// Machine record carrying a new class, ready for `UpdateVirtualMachine`.
///
/// The update is refused when `PrivateIpv4` is absent, so a missing key is
/// filled with an empty string; an explicit value (even null) is kept.
pub fn with_class(mut machine: Value, class_item: Value) -> Option<Value> {
    let fields = machine.as_object_mut()?;
    fields.insert("VMClass".to_string(), class_item);
    fields
        .entry("PrivateIpv4")
        .or_insert_with(|| Value::String(String::new()));
    Some(machine)
}

/// Page size used when fetching VM history
const HISTORY_PAGE_SIZE: i64 = 100;

impl Session {
    /// Template categories, children listed right after their parent
    pub async fn template_categories(&self) -> Result<Vec<TemplateCategory>> {
        let reply = self
            .common(
                "GetTemplateCategories",
                json!({ "clientId": self.client_id() }),
            )
            .await?;

        let mut categories = Vec::new();
        for tc in results(&reply) {
            let parent = TemplateCategory::from_value(tc, None);
            let parent_id = parent.id;
            categories.push(parent);
            for child in array_field(tc, "CategoryChildren") {
                categories.push(TemplateCategory::from_value(child, Some(parent_id)));
            }
        }
        Ok(categories)
    }

    /// Templates in a category whose name contains `name_filter`
    pub async fn templates(&self, category_id: i64, name_filter: &str) -> Result<Vec<Template>> {
        let reply = self
            .common(
                "GetTemplatesByCategory",
                json!({
                    "categoryId": category_id,
                    "categorySystemId": null,
                    "type": null,
                    "clientId": self.client_id(),
                }),
            )
            .await?;

        Ok(results(&reply)
            .iter()
            .map(|t| Template {
                id: int_field(t, "TemplateId"),
                name: str_field(t, "TemplateName"),
            })
            .filter(|t| t.name.contains(name_filter))
            .collect())
    }

    pub(crate) async fn raw_template(&self, template_id: i64) -> Result<Value> {
        self.clients(
            "GetTemplate",
            json!({ "templateId": template_id, "clientId": self.client_id() }),
        )
        .await
    }

    pub async fn template_info(&self, template_id: i64) -> Result<TemplateInfo> {
        let data = self.raw_template(template_id).await?;
        Ok(TemplateInfo::from(&data))
    }

    pub async fn oci_list(&self) -> Result<Vec<VirtualMachine>> {
        let vms = self.search("GetVirtualMachines").await?;
        Ok(vms.iter().map(VirtualMachine::from).collect())
    }

    /// Every VM with its usage figures; one `GetVirtualMachineById` per VM
    pub async fn oci_list_details(&self) -> Result<Vec<VmDetails>> {
        let mut details = Vec::new();
        for vm in self.oci_list().await? {
            let machine = self.vm_call("GetVirtualMachineById", vm.id).await?;
            details.push(VmDetails::from(&machine));
        }
        tracing::debug!("Fetched details of {} VMs", details.len());
        Ok(details)
    }

    pub async fn oci_restart(&self, oci_id: i64) -> Result<()> {
        self.vm_call("RestartVirtualMachine", oci_id).await?;
        Ok(())
    }

    pub async fn oci_turn_off(&self, oci_id: i64) -> Result<()> {
        self.vm_call("TurnoffVirtualMachine", oci_id).await?;
        Ok(())
    }

    pub async fn oci_turn_on(&self, oci_id: i64) -> Result<()> {
        self.vm_call("TurnOnVirtualMachine", oci_id).await?;
        Ok(())
    }

    pub async fn oci_delete(&self, oci_id: i64) -> Result<()> {
        self.vm_call("DeleteVirtualMachine", oci_id).await?;
        Ok(())
    }

    /// Most recent history entries first
    pub async fn oci_logs(&self, oci_id: i64) -> Result<Vec<VmHistoryEntry>> {
        let reply = self
            .clients(
                "GetVirtualMachineHistories",
                json!({
                    "searchParams": {
                        "VirtualMachineId": oci_id,
                        "PageSize": HISTORY_PAGE_SIZE,
                        "SortingDirection": 0,
                    },
                    "clientId": self.client_id(),
                }),
            )
            .await?;
        Ok(results(&reply).iter().map(VmHistoryEntry::from).collect())
    }

    pub async fn oci_settings(&self, oci_id: i64) -> Result<VmSettings> {
        let data = self.vm_call("GetVirtualMachineById", oci_id).await?;
        Ok(VmSettings::from(&data))
    }

    /// Dictionary ID of the OCI class with the given display name
    pub async fn oci_class_id(&self, class_name: &str) -> Result<Option<i64>> {
        let reply = self
            .common(
                "GetDictionaryItems",
                json!({
                    "dictionaryId": dict::OCI_CLASSES_DICT_ID,
                    "clientId": self.client_id(),
                }),
            )
            .await?;

        Ok(results(&reply)
            .iter()
            .find(|class| dict_item_name(class) == class_name)
            .and_then(|class| opt_int(class, "DictionaryItemId")))
    }

    async fn require_class_id(&self, class_name: &str) -> Result<i64> {
        match self.oci_class_id(class_name).await? {
            Some(id) => Ok(id),
            None => Err(ApiError::OciClassNotFound(class_name.to_string()).into()),
        }
    }

    /// Change the class of a VM, optionally deferred to the nightly scheduler
    pub async fn oci_change_class(&self, oci_id: i64, class_name: &str, at_midnight: bool) -> Result<()> {
        let machine = self.vm_call("GetVirtualMachineById", oci_id).await?;
        let class_id = self.require_class_id(class_name).await?;
        let class_item = self
            .common(
                "GetDictionaryItemById",
                json!({ "dictionaryItemId": class_id }),
            )
            .await?;

        let Some(machine) = with_class(machine, class_item) else {
            anyhow::bail!("GetVirtualMachineById returned no machine for {}", oci_id);
        };

        self.clients(
            "UpdateVirtualMachine",
            json!({
                "machine": machine,
                "clientId": self.client_id(),
                "classChangeInScheduler": at_midnight,
            }),
        )
        .await
        .context("UpdateVirtualMachine failed")?;
        Ok(())
    }

    /// Create an instance from a template
    pub async fn oci_create(
        &self,
        name: &str,
        template_id: i64,
        class_name: Option<&str>,
        template_type: TemplateType,
        db_type: Option<i64>,
    ) -> Result<()> {
        let class_id = match class_name {
            Some(class_name) => Some(self.require_class_id(class_name).await?),
            None => None,
        };

        self.clients(
            "CreateVirtualMachine",
            json!({
                "templateId": template_id,
                "disks": null,
                "additionalDisks": null,
                "machineName": name,
                "selectedClass": class_id,
                "selectedContainer": null,
                "selectedPaymentMethod": dict::OCI_PAYMENT_ID,
                "selectedConnectionType": dict::OCI_CONNECTION_ID,
                "clientId": self.client_id(),
                "providervAppClientId": null,
                "vAppType": template_type.id(),
                "databaseTypeId": db_type,
                "clientVmParameter": null,
                "autoScalingTypeId": dict::OCI_AUTOSCALING_ID,
            }),
        )
        .await?;
        Ok(())
    }

    pub async fn oci_clone(&self, oci_id: i64, name: &str, clone_type: CloneType) -> Result<()> {
        self.clients(
            "CloneVirtualMachine",
            json!({
                "virtualMachineID": oci_id,
                "cloneName": name,
                "cloneType": clone_type.id(),
                "clientId": self.client_id(),
            }),
        )
        .await?;
        Ok(())
    }
}
