//! OVS (disk volume) operations

use super::client::{accepted, Session};
use super::fields::{array_field, bool_field, dict, dict_field, int_field, opt_int, str_field};
use crate::error::ApiError;
use anyhow::Result;
use serde_json::{json, Value};

/// An instance a disk is attached to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiskMapping {
    pub vm_id: i64,
    pub vm_name: String,
    pub is_primary: bool,
}

impl DiskMapping {
    pub fn label(&self) -> String {
        if self.is_primary {
            format!("{} ({}: primary)", self.vm_id, self.vm_name)
        } else {
            format!("{} ({})", self.vm_id, self.vm_name)
        }
    }
}

#[derive(Debug, Clone)]
pub struct Disk {
    pub id: i64,
    pub name: String,
    pub tier: String,
    pub capacity_gb: i64,
    pub used_gb: i64,
    pub is_shared: bool,
    pub vms: Vec<DiskMapping>,
}

impl From<&Value> for Disk {
    fn from(value: &Value) -> Self {
        let vms = mapped_vms(value)
            .iter()
            .map(|hdd| {
                let vm = hdd.get("VirtualMachine").unwrap_or(&Value::Null);
                DiskMapping {
                    vm_id: int_field(vm, "VirtualMachineId"),
                    vm_name: str_field(vm, "VirtualMachineName"),
                    is_primary: bool_field(hdd, "IsPrimary"),
                }
            })
            .collect();

        Self {
            id: int_field(value, "ClientHddId"),
            name: str_field(value, "HddName"),
            tier: dict_field(value, "HddStandard"),
            capacity_gb: int_field(value, "CapacityGB"),
            used_gb: int_field(value, "UsedCapacityGB"),
            is_shared: bool_field(value, "IsShared"),
            vms,
        }
    }
}

/// Attachment records of a disk; null and nested-page forms are flattened
fn mapped_vms(disk: &Value) -> &[Value] {
    match array_field(disk, "VirtualMachineHdds") {
        [Value::Array(inner)] => inner.as_slice(),
        hdds => hdds,
    }
}

fn mapped_vm_ids(disk: &Value) -> Vec<i64> {
    mapped_vms(disk)
        .iter()
        .filter_map(|hdd| hdd.get("VirtualMachine"))
        .filter_map(|vm| opt_int(vm, "VirtualMachineId"))
        .collect()
}

/// Build the `UpdateDisk` payload that attaches `oci_id` to `disk`
pub fn map_update(disk: &Value, oci_id: i64) -> Result<Value, ApiError> {
    let mut vms = mapped_vm_ids(disk);
    if vms.contains(&oci_id) {
        return Err(ApiError::OvsMapped);
    }
    vms.push(oci_id);
    Ok(disk_update(disk, vms))
}

/// Build the `UpdateDisk` payload that detaches `oci_id` from `disk`
pub fn unmap_update(disk: &Value, oci_id: i64) -> Result<Value, ApiError> {
    let vms = mapped_vm_ids(disk);
    if !vms.contains(&oci_id) {
        return Err(ApiError::OvsUnmapped);
    }
    let remaining = vms.into_iter().filter(|vm| *vm != oci_id).collect();
    Ok(disk_update(disk, remaining))
}

/// Build the `UpdateDisk` payload that moves `disk` to `tier` (1-5)
pub fn tier_update(disk: &Value, tier: u8) -> Value {
    let mut update = disk_update(disk, mapped_vm_ids(disk));
    update["HddStandardId"] = json!(dict::HDD_STANDARD_BASE + i64::from(tier));
    update
}

/// Build the `UpdateDisk` payload that grows `disk` to `size_gb`.
///
/// Only detached disks can be resized, and never below their current size.
pub fn extend_update(disk: &Value, size_gb: i64) -> Result<Value, ApiError> {
    let vms = mapped_vm_ids(disk);
    if !vms.is_empty() {
        return Err(ApiError::OvsInUse);
    }
    if size_gb < int_field(disk, "CapacityGB") {
        return Err(ApiError::OvsTooSmall);
    }
    let mut update = disk_update(disk, vms);
    update["CapacityGB"] = json!(size_gb);
    Ok(update)
}

fn disk_update(disk: &Value, vm_ids: Vec<i64>) -> Value {
    let standard = disk.get("HddStandard").unwrap_or(&Value::Null);
    let payment = disk.get("PaymentType").unwrap_or(&Value::Null);
    json!({
        "CapacityGB": disk.get("CapacityGB"),
        "ClientHddId": disk.get("ClientHddId"),
        "HddName": disk.get("HddName"),
        "IsShared": disk.get("IsShared"),
        "HddStandardId": opt_int(standard, "DictionaryItemId"),
        "PaymentTypeId": opt_int(payment, "DictionaryItemId"),
        "VirtualMachineIds": vm_ids,
    })
}

impl Session {
    async fn raw_disks(&self) -> Result<Vec<Value>> {
        self.search("GetDisks").await
    }

    async fn find_disk(&self, ovs_id: i64) -> Result<Value> {
        self.raw_disks()
            .await?
            .into_iter()
            .find(|disk| opt_int(disk, "ClientHddId") == Some(ovs_id))
            .ok_or_else(|| ApiError::OvsNotFound(ovs_id).into())
    }

    pub async fn ovs_list(&self) -> Result<Vec<Disk>> {
        Ok(self.raw_disks().await?.iter().map(Disk::from).collect())
    }

    /// Create a disk; `tier` is 1-5
    pub async fn ovs_create(&self, name: &str, capacity_gb: i64, tier: u8, shared: bool) -> Result<()> {
        self.clients(
            "CreateDisk",
            json!({
                "disk": {
                    "CapacityGB": capacity_gb,
                    "HddName": name,
                    "HddStandardId": dict::HDD_STANDARD_BASE + i64::from(tier),
                    "IsShared": shared,
                    "PaymentTypeId": dict::DISK_PAYMENT_ID,
                    "VirtualMachineIds": [],
                },
                "clientId": self.client_id(),
            }),
        )
        .await?;
        Ok(())
    }

    pub async fn ovs_delete(&self, ovs_id: i64) -> Result<()> {
        let reply = self
            .clients(
                "DeleteDisk",
                json!({ "clientHddId": ovs_id, "clientId": self.client_id() }),
            )
            .await?;
        if !accepted(&reply) {
            return Err(ApiError::OvsDelete.into());
        }
        Ok(())
    }

    pub async fn ovs_map(&self, ovs_id: i64, oci_id: i64) -> Result<()> {
        let disk = self.find_disk(ovs_id).await?;
        let update = map_update(&disk, oci_id)?;
        if !self.update_disk(update).await? {
            return Err(ApiError::OvsMap.into());
        }
        Ok(())
    }

    pub async fn ovs_unmap(&self, ovs_id: i64, oci_id: i64) -> Result<()> {
        let disk = self.find_disk(ovs_id).await?;
        let update = unmap_update(&disk, oci_id)?;
        if !self.update_disk(update).await? {
            return Err(ApiError::OvsUnmap.into());
        }
        Ok(())
    }

    pub async fn ovs_change_tier(&self, ovs_id: i64, tier: u8) -> Result<()> {
        let disk = self.find_disk(ovs_id).await?;
        if !self.update_disk(tier_update(&disk, tier)).await? {
            return Err(ApiError::OvsChangeTier.into());
        }
        Ok(())
    }

    /// Resize a detached disk
    pub async fn ovs_extend(&self, ovs_id: i64, size_gb: i64) -> Result<()> {
        let disk = self.find_disk(ovs_id).await?;
        let update = extend_update(&disk, size_gb)?;
        if !self.update_disk(update).await? {
            return Err(ApiError::OvsExtend.into());
        }
        Ok(())
    }

    async fn update_disk(&self, disk: Value) -> Result<bool> {
        let reply = self
            .clients(
                "UpdateDisk",
                json!({ "disk": disk, "clientId": self.client_id() }),
            )
            .await?;
        Ok(accepted(&reply))
    }
}
