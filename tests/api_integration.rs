//! Integration tests for the Oktawave client using wiremock
//!
//! These tests run the client and whole commands against mocked service
//! endpoints, checking request shapes, envelope handling and error mapping.

use oktawave::api::{Credentials, OktawaveClient, Session};
use clap::Parser;
use oktawave::commands::{
    self, account::AccountCommand, container::ContainerCommand, oci::OciCommand, opn::OpnCommand,
    ordb::OrdbCommand, ovs::OvsCommand, Command,
};
use oktawave::error::{ApiError, ResolveError};
use oktawave::report::Printer;
use serde_json::{json, Value};
use wiremock::matchers::{basic_auth, body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CLIENT_ID: i64 = 42;

fn credentials() -> Credentials {
    Credentials {
        username: "jan".to_string(),
        password: "secret".to_string(),
    }
}

fn common(method_name: &str) -> String {
    format!("/CommonService.svc/json/{}", method_name)
}

fn clients(method_name: &str) -> String {
    format!("/ClientsService.svc/json/{}", method_name)
}

/// Reply wrapped in the `{"<Method>Result": ...}` envelope
fn wrapped(method_name: &str, value: Value) -> ResponseTemplate {
    let mut envelope = serde_json::Map::new();
    envelope.insert(format!("{}Result", method_name), value);
    ResponseTemplate::new(200).set_body_json(Value::Object(envelope))
}

async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(common("LogonUser")))
        .and(basic_auth("API\\jan", "secret"))
        .respond_with(wrapped(
            "LogonUser",
            json!({"Client": {"ClientId": CLIENT_ID}, "FullName": "Jan Kowalski"}),
        ))
        .mount(server)
        .await;
}

async fn login(server: &MockServer) -> Session {
    mount_login(server).await;
    OktawaveClient::new(&server.uri(), &credentials())
        .expect("client should build")
        .login()
        .await
        .expect("login should succeed")
}

fn vm(id: i64, name: &str) -> Value {
    json!({
        "VirtualMachineId": id,
        "VirtualMachineName": name,
        "Status": {"DictionaryItemNames": [{"LanguageDictId": 2, "ItemName": "Running"}]}
    })
}

async fn mount_vm_listing(server: &MockServer, vms: Vec<Value>) {
    Mock::given(method("POST"))
        .and(path(clients("GetVirtualMachines")))
        .and(body_partial_json(json!({"searchParams": {"ClientId": CLIENT_ID}})))
        .respond_with(wrapped("GetVirtualMachines", json!({"_results": vms})))
        .mount(server)
        .await;
}

/// Command line parsed the way the binary parses it
#[derive(Parser)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

fn parse(args: &[&str]) -> Command {
    Cli::try_parse_from(std::iter::once("oktawave").chain(args.iter().copied()))
        .expect("arguments should parse")
        .command
}

async fn run_command(session: &Session, command: Command) -> (anyhow::Result<()>, String) {
    let mut printer = Printer::new(Vec::new());
    let result = commands::run(command, session, &mut printer).await;
    let output = String::from_utf8(printer.into_inner()).expect("output should be UTF-8");
    (result, output)
}

mod login_tests {
    use super::*;

    /// Login sends API-prefixed basic auth and unwraps the result envelope
    #[tokio::test]
    async fn test_login_returns_session() {
        let server = MockServer::start().await;
        let session = login(&server).await;

        assert_eq!(session.client_id(), CLIENT_ID);
        assert_eq!(session.logon()["FullName"], "Jan Kowalski");
    }

    /// Rejected credentials surface as the login error
    #[tokio::test]
    async fn test_401_on_login_is_login_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(common("LogonUser")))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let err = OktawaveClient::new(&server.uri(), &credentials())
            .unwrap()
            .login()
            .await
            .err()
            .expect("login should fail");

        assert!(matches!(err.downcast_ref::<ApiError>(), Some(ApiError::Login)));
        assert_eq!(err.to_string(), "Couldn't login to Oktawave.");
    }

    /// A logon record without a client is not a usable session
    #[tokio::test]
    async fn test_login_without_client_id_fails() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(common("LogonUser")))
            .respond_with(wrapped("LogonUser", json!({"Client": null})))
            .mount(&server)
            .await;

        let err = OktawaveClient::new(&server.uri(), &credentials())
            .unwrap()
            .login()
            .await
            .err()
            .expect("login should fail");

        assert!(matches!(err.downcast_ref::<ApiError>(), Some(ApiError::Login)));
    }
}

mod transport_tests {
    use super::*;

    /// Non-2xx replies become status errors naming the method
    #[tokio::test]
    async fn test_500_is_status_error() {
        let server = MockServer::start().await;
        let session = login(&server).await;

        Mock::given(method("POST"))
            .and(path(clients("GetDisks")))
            .respond_with(ResponseTemplate::new(500).set_body_string("internal failure"))
            .mount(&server)
            .await;

        let err = session.ovs_list().await.unwrap_err();
        match err.downcast_ref::<ApiError>() {
            Some(ApiError::Status { method, status }) => {
                assert_eq!(method, "GetDisks");
                assert_eq!(*status, 500);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    /// Unwrapped replies are accepted as-is
    #[tokio::test]
    async fn test_bare_reply_without_envelope() {
        let server = MockServer::start().await;
        let session = login(&server).await;

        Mock::given(method("POST"))
            .and(path(clients("GetVirtualMachines")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([vm(1, "web1")])))
            .mount(&server)
            .await;

        let vms = session.oci_list().await.unwrap();
        assert_eq!(vms.len(), 1);
        assert_eq!(vms[0].name, "web1");
        assert_eq!(vms[0].status, "Running");
    }
}

mod command_tests {
    use super::*;

    /// A name is resolved through the listing and the ID reaches the mutation
    #[tokio::test]
    async fn test_restart_by_name() {
        let server = MockServer::start().await;
        let session = login(&server).await;
        mount_vm_listing(&server, vec![vm(7, "web1"), vm(8, "web2")]).await;

        Mock::given(method("POST"))
            .and(path(clients("RestartVirtualMachine")))
            .and(body_partial_json(json!({"virtualMachineId": 8, "clientId": CLIENT_ID})))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let (result, output) = run_command(
            &session,
            Command::Oci(OciCommand::Restart {
                id: "web2".to_string(),
            }),
        )
        .await;

        result.unwrap();
        assert_eq!(output, "OK\n");
    }

    /// Duplicate names fail before anything is mutated
    #[tokio::test]
    async fn test_ambiguous_name_is_refused() {
        let server = MockServer::start().await;
        let session = login(&server).await;
        mount_vm_listing(&server, vec![vm(7, "web"), vm(8, "web")]).await;

        Mock::given(method("POST"))
            .and(path(clients("DeleteVirtualMachine")))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let (result, output) = run_command(
            &session,
            Command::Oci(OciCommand::Delete {
                id: "web".to_string(),
            }),
        )
        .await;

        let err = result.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ResolveError>(),
            Some(ResolveError::Ambiguous { matches: 2, .. })
        ));
        assert!(output.is_empty());
    }

    /// Numeric IDs never trigger a listing
    #[tokio::test]
    async fn test_numeric_id_skips_listing() {
        let server = MockServer::start().await;
        let session = login(&server).await;

        Mock::given(method("POST"))
            .and(path(clients("GetVirtualMachines")))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path(clients("TurnOnVirtualMachine")))
            .and(body_partial_json(json!({"virtualMachineId": 1234})))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let (result, _) = run_command(
            &session,
            Command::Oci(OciCommand::TurnOn {
                id: "1234".to_string(),
            }),
        )
        .await;
        result.unwrap();
    }

    /// Two names of the same category cost one listing call
    #[tokio::test]
    async fn test_move_database_lists_instances_once() {
        let server = MockServer::start().await;
        let session = login(&server).await;

        Mock::given(method("POST"))
            .and(path(clients("GetDatabaseInstances")))
            .respond_with(wrapped(
                "GetDatabaseInstances",
                json!({"_results": [
                    {"VirtualMachineId": 11, "VirtualMachineName": "db-a"},
                    {"VirtualMachineId": 12, "VirtualMachineName": "db-b"}
                ]}),
            ))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path(clients("MoveDatabase")))
            .and(body_partial_json(json!({
                "virtualMachineIdFrom": 11,
                "virtualMachineIdTo": 12,
                "databaseName": "shop"
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let (result, output) = run_command(
            &session,
            Command::Ordb(OrdbCommand::MoveLogicalDatabase {
                id_from: "db-a".to_string(),
                id_to: "db-b".to_string(),
                name: "shop".to_string(),
            }),
        )
        .await;

        result.unwrap();
        assert_eq!(output, "OK\n");
    }

    /// Mapping a disk to an instance it is already mapped to never updates it
    #[tokio::test]
    async fn test_map_already_mapped_disk() {
        let server = MockServer::start().await;
        let session = login(&server).await;

        Mock::given(method("POST"))
            .and(path(clients("GetDisks")))
            .respond_with(wrapped(
                "GetDisks",
                json!({"_results": [{
                    "ClientHddId": 5,
                    "HddName": "data",
                    "VirtualMachineHdds": [{"VirtualMachine": {"VirtualMachineId": 7}}]
                }]}),
            ))
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path(clients("UpdateDisk")))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let (result, _) = run_command(
            &session,
            Command::Ovs(OvsCommand::Map {
                ovs_id: "5".to_string(),
                oci_id: "7".to_string(),
            }),
        )
        .await;

        let err = result.unwrap_err();
        assert!(matches!(err.downcast_ref::<ApiError>(), Some(ApiError::OvsMapped)));
    }

    /// A refused update is reported as a failed mapping
    #[tokio::test]
    async fn test_map_refused_by_service() {
        let server = MockServer::start().await;
        let session = login(&server).await;

        Mock::given(method("POST"))
            .and(path(clients("GetDisks")))
            .respond_with(wrapped(
                "GetDisks",
                json!({"_results": [{"ClientHddId": 5, "HddName": "data", "VirtualMachineHdds": null}]}),
            ))
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path(clients("UpdateDisk")))
            .and(body_partial_json(json!({"disk": {"VirtualMachineIds": [7]}})))
            .respond_with(wrapped("UpdateDisk", json!(false)))
            .expect(1)
            .mount(&server)
            .await;

        let err = session.ovs_map(5, 7).await.unwrap_err();
        assert!(matches!(err.downcast_ref::<ApiError>(), Some(ApiError::OvsMap)));
    }

    /// Unknown disk IDs are reported without an update
    #[tokio::test]
    async fn test_unmap_unknown_disk() {
        let server = MockServer::start().await;
        let session = login(&server).await;

        Mock::given(method("POST"))
            .and(path(clients("GetDisks")))
            .respond_with(wrapped("GetDisks", json!({"_results": []})))
            .mount(&server)
            .await;

        let err = session.ovs_unmap(99, 7).await.unwrap_err();
        assert!(matches!(err.downcast_ref::<ApiError>(), Some(ApiError::OvsNotFound(99))));
    }

    /// An empty operation list prints the explicit message instead of a table
    #[tokio::test]
    async fn test_no_running_jobs() {
        let server = MockServer::start().await;
        let session = login(&server).await;

        Mock::given(method("POST"))
            .and(path(common("GetRunningOperations")))
            .respond_with(wrapped("GetRunningOperations", json!({"_results": []})))
            .mount(&server)
            .await;

        let (result, output) = run_command(&session, Command::Account(AccountCommand::RunningJobs)).await;

        result.unwrap();
        assert_eq!(output, "No running operations\n");
    }

    /// Listing output is a margin-wrapped table in input order
    #[tokio::test]
    async fn test_oci_list_table() {
        let server = MockServer::start().await;
        let session = login(&server).await;
        mount_vm_listing(&server, vec![vm(2, "web2"), vm(1, "web1")]).await;

        let (result, output) = run_command(&session, Command::Oci(OciCommand::List)).await;
        result.unwrap();

        assert!(output.starts_with("\n+"));
        assert!(output.ends_with("+\n\n"));
        let web2 = output.find("web2").unwrap();
        let web1 = output.find("web1").unwrap();
        assert!(web2 < web1);
        assert!(output.contains("Virtual machine ID"));
    }

    /// Database creation refuses templates that are not database templates
    #[tokio::test]
    async fn test_ordb_create_rejects_machine_template() {
        let server = MockServer::start().await;
        let session = login(&server).await;

        Mock::given(method("POST"))
            .and(path(clients("GetTemplate")))
            .respond_with(wrapped(
                "GetTemplate",
                json!({"TemplateId": 1, "TemplateType": {"DictionaryItemId": 100}}),
            ))
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path(clients("CreateVirtualMachine")))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = session.ordb_create("db1", 1, None).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ApiError>(),
            Some(ApiError::OrdbInvalidTemplate)
        ));
    }
}

mod detail_tests {
    use super::*;

    fn disk(mapped: &[i64]) -> Value {
        let hdds: Vec<Value> = mapped
            .iter()
            .map(|id| json!({"VirtualMachine": {"VirtualMachineId": id}}))
            .collect();
        json!({
            "ClientHddId": 5,
            "HddName": "data",
            "CapacityGB": 50,
            "IsShared": false,
            "HddStandard": {"DictionaryItemId": 48},
            "PaymentType": {"DictionaryItemId": 37},
            "VirtualMachineHdds": hdds
        })
    }

    async fn mount_disks(server: &MockServer, disks: Vec<Value>) {
        Mock::given(method("POST"))
            .and(path(clients("GetDisks")))
            .respond_with(wrapped("GetDisks", json!({"_results": disks})))
            .mount(server)
            .await;
    }

    /// Detailed listing fetches every machine and shows usage over capacity
    #[tokio::test]
    async fn test_oci_list_details() {
        let server = MockServer::start().await;
        let session = login(&server).await;
        mount_vm_listing(&server, vec![vm(1, "web1"), vm(2, "web2")]).await;

        for (id, cpu_usage) in [(1, 150), (2, 900)] {
            Mock::given(method("POST"))
                .and(path(clients("GetVirtualMachineById")))
                .and(body_partial_json(json!({"virtualMachineId": id})))
                .respond_with(wrapped(
                    "GetVirtualMachineById",
                    json!({
                        "VirtualMachineId": id,
                        "VirtualMachineName": format!("web{}", id),
                        "CpuMhz": 2000,
                        "CpuMhzUsage": cpu_usage,
                        "RamMB": 1024,
                        "RamMBUsage": 512
                    }),
                ))
                .expect(1)
                .mount(&server)
                .await;
        }

        let (result, output) = run_command(&session, parse(&["OCI", "ListDetails"])).await;
        result.unwrap();

        assert!(output.contains("150/2000 MHz"));
        assert!(output.contains("900/2000 MHz"));
        assert!(output.contains("512/1024 MB"));
        assert!(output.find("web1").unwrap() < output.find("web2").unwrap());
    }

    /// A class change fills a missing private address list with an empty string
    #[tokio::test]
    async fn test_change_class_sends_empty_private_ips() {
        let server = MockServer::start().await;
        let session = login(&server).await;

        Mock::given(method("POST"))
            .and(path(clients("GetVirtualMachineById")))
            .respond_with(wrapped(
                "GetVirtualMachineById",
                json!({"VirtualMachineId": 3, "VirtualMachineName": "web1"}),
            ))
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path(common("GetDictionaryItems")))
            .respond_with(wrapped(
                "GetDictionaryItems",
                json!([{"DictionaryItemId": 35, "DictionaryItemNames": [
                    {"LanguageDictId": 2, "ItemName": "v1.standard-2.2"}
                ]}]),
            ))
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path(common("GetDictionaryItemById")))
            .and(body_partial_json(json!({"dictionaryItemId": 35})))
            .respond_with(wrapped("GetDictionaryItemById", json!({"DictionaryItemId": 35})))
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path(clients("UpdateVirtualMachine")))
            .and(body_partial_json(json!({
                "machine": {"PrivateIpv4": "", "VMClass": {"DictionaryItemId": 35}},
                "classChangeInScheduler": false
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let (result, output) =
            run_command(&session, parse(&["OCI", "ChangeClass", "3", "v1.standard-2.2"])).await;
        result.unwrap();
        assert_eq!(output, "OK\n");
    }

    /// A tier change keeps the disk's mappings
    #[tokio::test]
    async fn test_ovs_change_tier() {
        let server = MockServer::start().await;
        let session = login(&server).await;
        mount_disks(&server, vec![disk(&[7])]).await;

        Mock::given(method("POST"))
            .and(path(clients("UpdateDisk")))
            .and(body_partial_json(json!({
                "disk": {"ClientHddId": 5, "HddStandardId": 51, "VirtualMachineIds": [7]}
            })))
            .respond_with(wrapped("UpdateDisk", json!(true)))
            .expect(1)
            .mount(&server)
            .await;

        let (result, output) = run_command(&session, parse(&["OVS", "ChangeTier", "data", "4"])).await;
        result.unwrap();
        assert_eq!(output, "OK\n");
    }

    /// Tiers outside 1-5 are rejected by the argument parser
    #[test]
    fn test_ovs_change_tier_range() {
        let cli = Cli::try_parse_from(["oktawave", "OVS", "ChangeTier", "data", "6"]);
        assert!(cli.is_err());
    }

    /// Extending sends the new capacity for a detached disk
    #[tokio::test]
    async fn test_ovs_extend() {
        let server = MockServer::start().await;
        let session = login(&server).await;
        mount_disks(&server, vec![disk(&[])]).await;

        Mock::given(method("POST"))
            .and(path(clients("UpdateDisk")))
            .and(body_partial_json(json!({"disk": {"ClientHddId": 5, "CapacityGB": 80}})))
            .respond_with(wrapped("UpdateDisk", json!(true)))
            .expect(1)
            .mount(&server)
            .await;

        let (result, output) = run_command(
            &session,
            Command::Ovs(OvsCommand::Extend {
                ovs_id: "5".to_string(),
                size: 80,
            }),
        )
        .await;
        result.unwrap();
        assert_eq!(output, "OK\n");
    }

    /// Mapped disks and shrinking requests never reach the update
    #[tokio::test]
    async fn test_ovs_extend_refusals() {
        let server = MockServer::start().await;
        let session = login(&server).await;
        let mut small = disk(&[]);
        small["ClientHddId"] = json!(6);
        mount_disks(&server, vec![disk(&[7]), small]).await;

        Mock::given(method("POST"))
            .and(path(clients("UpdateDisk")))
            .respond_with(wrapped("UpdateDisk", json!(true)))
            .expect(0)
            .mount(&server)
            .await;

        let mapped = session.ovs_extend(5, 80).await.unwrap_err();
        assert!(matches!(mapped.downcast_ref::<ApiError>(), Some(ApiError::OvsInUse)));

        let shrink = session.ovs_extend(6, 20).await.unwrap_err();
        assert!(matches!(shrink.downcast_ref::<ApiError>(), Some(ApiError::OvsTooSmall)));
        assert_eq!(
            oktawave::api::format_api_error(&shrink),
            "Requested size smaller than current size"
        );
    }

    /// Container creation sends the chosen settings and prints the new ID
    #[tokio::test]
    async fn test_container_create() {
        let server = MockServer::start().await;
        let session = login(&server).await;
        mount_vm_listing(&server, vec![vm(9, "db1")]).await;

        Mock::given(method("POST"))
            .and(path(clients("CreateContainer")))
            .and(body_partial_json(json!({
                "container": {
                    "ContainerName": "web",
                    "IsLoadBalancer": true,
                    "Service": "HTTP",
                    "MasterServiceId": 9,
                    "SessionType": "source_ip",
                    "IPVersion": "both",
                    "AutoscalingType": "on"
                },
                "clientId": CLIENT_ID
            })))
            .respond_with(wrapped("CreateContainer", json!(15)))
            .expect(1)
            .mount(&server)
            .await;

        let command = parse(&[
            "Container",
            "Create",
            "web",
            "--load-balancer",
            "--service",
            "HTTP",
            "--mysql-master-id",
            "db1",
            "--session-persistence",
            "source_ip",
            "--ip-version",
            "both",
            "--autoscaling",
        ]);
        let (result, output) = run_command(&session, command).await;
        result.unwrap();
        assert_eq!(output, "OK, new container ID: 15.\n");
    }

    /// Editing resolves the container and sends its ID with the settings
    #[tokio::test]
    async fn test_container_edit_by_name() {
        let server = MockServer::start().await;
        let session = login(&server).await;

        Mock::given(method("POST"))
            .and(path(clients("GetContainers")))
            .respond_with(wrapped(
                "GetContainers",
                json!({"_results": [{"ContainerId": 4, "ContainerName": "web"}]}),
            ))
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path(clients("UpdateContainer")))
            .and(body_partial_json(json!({
                "container": {"ContainerId": 4, "ContainerName": "web-new", "PortNumber": 8080}
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let command = parse(&["Container", "Edit", "web", "web-new", "--port", "8080"]);
        let (result, output) = run_command(&session, command).await;
        result.unwrap();
        assert_eq!(output, "OK\n");
    }

    /// Container details show load balancer rows and the attached instances
    #[tokio::test]
    async fn test_container_get() {
        let server = MockServer::start().await;
        let session = login(&server).await;

        Mock::given(method("POST"))
            .and(path(clients("GetContainer")))
            .and(body_partial_json(json!({"containerId": 4})))
            .respond_with(wrapped(
                "GetContainer",
                json!({
                    "ContainerId": 4,
                    "ContainerName": "web",
                    "IsLoadBalancer": true,
                    "Service": {"DictionaryItemNames": [{"LanguageDictId": 2, "ItemName": "Port"}]},
                    "PortNumber": 8080,
                    "IPs": [{"Address": "1.2.3.4", "AddressV6": "::1"}],
                    "DatabaseUserLogin": "admin"
                }),
            ))
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path(clients("GetContainerVirtualMachines")))
            .respond_with(wrapped(
                "GetContainerVirtualMachines",
                json!([{"VirtualMachine": vm(7, "web1")}]),
            ))
            .mount(&server)
            .await;

        let (result, output) = run_command(
            &session,
            Command::Container(ContainerCommand::Get {
                container_id: "4".to_string(),
            }),
        )
        .await;
        result.unwrap();

        assert!(output.starts_with("\nBasic container settings\n"));
        assert!(output.contains("Port (8080)"));
        assert!(output.contains("1.2.3.4"));
        assert!(output.contains("Database user"));
        assert!(!output.contains("Master OCI"));
        let attached = output.find("Attached OCIs").unwrap();
        assert!(output[attached..].contains("web1"));
    }

    /// OPN details list the attached instances with their private addresses
    #[tokio::test]
    async fn test_opn_get() {
        let server = MockServer::start().await;
        let session = login(&server).await;

        Mock::given(method("POST"))
            .and(path(clients("GetOpn")))
            .and(body_partial_json(json!({"opnId": 9, "clientId": CLIENT_ID})))
            .respond_with(wrapped(
                "GetOpn",
                json!({
                    "OpnId": 9,
                    "OpnName": "backend",
                    "AddressPool": "192.168.0.0/24",
                    "PrivateIps": [{
                        "VirtualMachine": {"VirtualMachineId": 3, "VirtualMachineName": "web1"},
                        "MacAddress": "00:15:5d:01:02:03",
                        "PrivateIpAddress": "192.168.0.10"
                    }]
                }),
            ))
            .expect(1)
            .mount(&server)
            .await;

        let (result, output) = run_command(
            &session,
            Command::Opn(OpnCommand::Get {
                opn_id: "9".to_string(),
            }),
        )
        .await;
        result.unwrap();

        assert!(output.contains("Basic OPN settings"));
        assert!(output.contains("backend"));
        let vms = output.find("Virtual machines").unwrap();
        assert!(output[vms..].contains("192.168.0.10"));
        assert!(output[vms..].contains("00:15:5d:01:02:03"));
    }
}
