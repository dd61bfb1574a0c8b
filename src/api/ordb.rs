//! ORDB (managed database) operations
//!
//! Database instances are virtual machines, so power operations, logs,
//! settings and cloning go through the OCI calls with an ORDB id.

use super::client::Session;
use super::fields::{array_field, bool_field, dict, dict_field, num_display, opt_int, results, str_field, int_field};
use super::oci::TemplateType;
use crate::error::ApiError;
use anyhow::Result;
use clap::ValueEnum;
use serde_json::{json, Value};

/// Character encoding of a new logical database
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Encoding {
    Utf8,
    Latin2,
}

impl Encoding {
    fn dictionary_id(self) -> i64 {
        match self {
            Encoding::Utf8 => dict::UTF8_ENCODING,
            Encoding::Latin2 => dict::LATIN2_ENCODING,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DatabaseInstance {
    pub id: i64,
    pub name: String,
    pub db_type: String,
    pub size: String,
    pub available_space: String,
}

impl From<&Value> for DatabaseInstance {
    fn from(value: &Value) -> Self {
        Self {
            id: int_field(value, "VirtualMachineId"),
            name: str_field(value, "VirtualMachineName"),
            db_type: dict_field(value, "DatabaseType"),
            size: num_display(value, "Size"),
            available_space: num_display(value, "AvailableSpace"),
        }
    }
}

/// A database living inside an ORDB instance
#[derive(Debug, Clone)]
pub struct LogicalDatabase {
    pub instance_id: i64,
    pub name: String,
    pub db_type: String,
    pub encoding: String,
    pub is_running: bool,
    pub qps: String,
    pub size: String,
}

impl From<&Value> for LogicalDatabase {
    fn from(value: &Value) -> Self {
        Self {
            instance_id: int_field(value, "VirtualMachineId"),
            name: str_field(value, "DatabaseName"),
            db_type: dict_field(value, "DatabaseType"),
            encoding: str_field(value, "Encoding"),
            is_running: bool_field(value, "IsRunning"),
            qps: num_display(value, "QPS"),
            size: num_display(value, "Size"),
        }
    }
}

/// One global engine setting
#[derive(Debug, Clone)]
pub struct DatabaseSetting {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone)]
pub struct DatabaseBackup {
    pub file_name: String,
    pub db_type: &'static str,
    pub path: String,
}

impl DatabaseBackup {
    fn from_value(value: &Value, db_type: &'static str) -> Self {
        Self {
            file_name: str_field(value, "Name"),
            db_type,
            path: format!(
                "{}/{}",
                str_field(value, "ContainerName"),
                str_field(value, "FullPath")
            ),
        }
    }
}

/// Databases of an instance record; the list may come nested one level deep
fn instance_databases(instance: &Value) -> &[Value] {
    match array_field(instance, "Databases") {
        [Value::Array(inner)] => inner.as_slice(),
        dbs => dbs,
    }
}

impl Session {
    async fn raw_database_instances(&self) -> Result<Vec<Value>> {
        self.search("GetDatabaseInstances").await
    }

    pub async fn ordb_list(&self) -> Result<Vec<DatabaseInstance>> {
        Ok(self
            .raw_database_instances()
            .await?
            .iter()
            .map(DatabaseInstance::from)
            .collect())
    }

    /// Delete a whole instance, or only the named logical database in it
    pub async fn ordb_delete(&self, ordb_id: i64, db_name: Option<&str>) -> Result<()> {
        match db_name {
            None => self.oci_delete(ordb_id).await,
            Some(db_name) => {
                self.clients(
                    "DeleteDatabase",
                    json!({
                        "virtualMachineId": ordb_id,
                        "databaseName": db_name,
                        "clientId": self.client_id(),
                    }),
                )
                .await?;
                Ok(())
            }
        }
    }

    /// Logical databases, limited to one instance when `ordb_id` is given
    pub async fn ordb_logical_databases(&self, ordb_id: Option<i64>) -> Result<Vec<LogicalDatabase>> {
        Ok(self
            .raw_database_instances()
            .await?
            .iter()
            .filter(|vm| ordb_id.is_none() || opt_int(vm, "VirtualMachineId") == ordb_id)
            .flat_map(|vm| instance_databases(vm).iter().map(LogicalDatabase::from))
            .collect())
    }

    pub async fn ordb_global_settings(&self, ordb_id: i64) -> Result<Vec<DatabaseSetting>> {
        let reply = self
            .clients(
                "GetDatabaseConfig",
                json!({ "virtualMachineId": ordb_id, "clientId": self.client_id() }),
            )
            .await?;

        Ok(results(&reply)
            .iter()
            .map(|item| DatabaseSetting {
                name: str_field(item, "Name"),
                value: str_field(item, "Value"),
            })
            .collect())
    }

    /// Create a database instance; the template must be a database template
    pub async fn ordb_create(&self, name: &str, template_id: i64, class_name: Option<&str>) -> Result<()> {
        let template = self.raw_template(template_id).await?;
        let template_type = template.get("TemplateType").and_then(|t| opt_int(t, "DictionaryItemId"));
        if template_type != Some(dict::DB_VM_CATEGORY) {
            return Err(ApiError::OrdbInvalidTemplate.into());
        }
        let db_type = template
            .get("DatabaseType")
            .and_then(|t| opt_int(t, "DictionaryItemId"));

        self.oci_create(name, template_id, class_name, TemplateType::Database, db_type)
            .await
    }

    pub async fn ordb_create_logical_database(&self, ordb_id: i64, name: &str, encoding: Encoding) -> Result<()> {
        self.clients(
            "CreateDatabase",
            json!({
                "virtualMachineId": ordb_id,
                "databaseName": name,
                "encodingId": encoding.dictionary_id(),
                "clientId": self.client_id(),
            }),
        )
        .await?;
        Ok(())
    }

    pub async fn ordb_backup_logical_database(&self, ordb_id: i64, name: &str) -> Result<()> {
        self.clients(
            "BackupDatabase",
            json!({
                "virtualMachineId": ordb_id,
                "databaseName": name,
                "clientId": self.client_id(),
            }),
        )
        .await?;
        Ok(())
    }

    pub async fn ordb_move_logical_database(&self, from_id: i64, to_id: i64, name: &str) -> Result<()> {
        self.clients(
            "MoveDatabase",
            json!({
                "virtualMachineIdFrom": from_id,
                "virtualMachineIdTo": to_id,
                "databaseName": name,
                "clientId": self.client_id(),
            }),
        )
        .await?;
        Ok(())
    }

    pub async fn ordb_restore_logical_database(&self, ordb_id: i64, name: &str, backup_file: &str) -> Result<()> {
        self.clients(
            "RestoreDatabase",
            json!({
                "virtualMachineId": ordb_id,
                "databaseName": name,
                "backupFileName": backup_file,
                "clientId": self.client_id(),
            }),
        )
        .await?;
        Ok(())
    }

    /// MySQL backups first, then PostgreSQL
    pub async fn ordb_backups(&self) -> Result<Vec<DatabaseBackup>> {
        let mut backups = Vec::new();
        for (type_id, label) in [
            (dict::MYSQL_DB, "MySQL"),
            (dict::POSTGRESQL_DB, "PostgreSQL"),
        ] {
            let reply = self
                .clients(
                    "GetBackups",
                    json!({ "databaseTypeId": type_id, "clientId": self.client_id() }),
                )
                .await?;
            backups.extend(
                results(&reply)
                    .iter()
                    .map(|b| DatabaseBackup::from_value(b, label)),
            );
        }
        Ok(backups)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_from_value() {
        let value = json!({
            "VirtualMachineId": 77,
            "VirtualMachineName": "db1",
            "DatabaseType": {"DictionaryItemNames": [{"LanguageDictId": 2, "ItemName": "MySQL"}]},
            "Size": 120,
            "AvailableSpace": 880
        });
        let db = DatabaseInstance::from(&value);
        assert_eq!(db.id, 77);
        assert_eq!(db.db_type, "MySQL");
        assert_eq!(db.size, "120");
        assert_eq!(db.available_space, "880");
    }

    #[test]
    fn test_instance_databases_nested() {
        let value = json!({"Databases": [[
            {"VirtualMachineId": 77, "DatabaseName": "shop", "IsRunning": true, "Encoding": "utf8"}
        ]]});
        let dbs: Vec<LogicalDatabase> = instance_databases(&value)
            .iter()
            .map(LogicalDatabase::from)
            .collect();
        assert_eq!(dbs.len(), 1);
        assert_eq!(dbs[0].name, "shop");
        assert!(dbs[0].is_running);
        assert_eq!(dbs[0].qps, "-");
    }

    #[test]
    fn test_backup_path() {
        let value = json!({"Name": "shop.sql.gz", "ContainerName": "backups", "FullPath": "2014/shop.sql.gz"});
        let backup = DatabaseBackup::from_value(&value, "MySQL");
        assert_eq!(backup.path, "backups/2014/shop.sql.gz");
        assert_eq!(backup.db_type, "MySQL");
    }

    #[test]
    fn test_encoding_ids() {
        assert_eq!(Encoding::Utf8.dictionary_id(), 549);
        assert_eq!(Encoding::Latin2.dictionary_id(), 550);
    }
}
