//! Account information

use super::client::Session;
use super::fields::{bool_field, date_field, dict_field, dict_item_name, int_field, results, str_field};
use anyhow::Result;
use serde_json::{json, Value};

/// Basic account settings
#[derive(Debug, Clone)]
pub struct AccountSettings {
    pub time_zone: String,
    pub currency: String,
    pub date_format: String,
    pub availability_zone: String,
    pub clock_24h: bool,
}

/// An asynchronous operation still in progress
#[derive(Debug, Clone)]
pub struct RunningOperation {
    pub id: i64,
    pub creation_date: String,
    pub creation_user_name: String,
    pub operation_type: String,
    pub object_type: String,
    pub object_name: String,
    pub progress_percent: i64,
    pub status: String,
}

impl From<&Value> for RunningOperation {
    fn from(value: &Value) -> Self {
        Self {
            id: int_field(value, "AsynchronousOperationId"),
            creation_date: date_field(value, "CreationDate"),
            creation_user_name: str_field(value, "CreationUserFullName"),
            operation_type: dict_field(value, "OperationType"),
            object_type: dict_field(value, "ObjectType"),
            object_name: str_field(value, "ObjectName"),
            progress_percent: int_field(value, "Progress"),
            status: dict_field(value, "Status"),
        }
    }
}

/// A user of the client account
#[derive(Debug, Clone)]
pub struct AccountUser {
    pub email: String,
    pub name: String,
}

impl From<&Value> for AccountUser {
    fn from(value: &Value) -> Self {
        Self {
            email: str_field(value, "Email"),
            name: str_field(value, "FullName"),
        }
    }
}

impl Session {
    /// Settings come from the logon record plus one dictionary lookup
    pub async fn account_settings(&self) -> Result<AccountSettings> {
        let logon = self.logon();

        let zone_item = self
            .common(
                "GetDictionaryItemById",
                json!({ "dictionaryItemId": int_field(logon, "AvailabilityZone") }),
            )
            .await?;

        Ok(AccountSettings {
            time_zone: logon
                .get("TimeZone")
                .map(|tz| str_field(tz, "DisplayName"))
                .unwrap_or_else(|| "-".to_string()),
            currency: dict_field(logon, "Currency"),
            date_format: dict_field(logon, "DateFormat"),
            availability_zone: dict_item_name(&zone_item),
            clock_24h: bool_field(logon, "Is24HourClock"),
        })
    }

    pub async fn running_operations(&self) -> Result<Vec<RunningOperation>> {
        let reply = self
            .common(
                "GetRunningOperations",
                json!({ "clientId": self.client_id() }),
            )
            .await?;
        Ok(results(&reply).iter().map(RunningOperation::from).collect())
    }

    pub async fn account_users(&self) -> Result<Vec<AccountUser>> {
        let reply = self
            .clients("GetClientUsers", json!({ "clientId": self.client_id() }))
            .await?;
        Ok(results(&reply).iter().map(AccountUser::from).collect())
    }
}
