//! Configuration structs for the services that ship with this crate.

use crate::impl_configure;
use std::time::Duration;

/// Build metadata, embedded into each service's root config.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Version {
    pub build: String,
    pub desc: String,
    pub env: String,
}

impl_configure!(Version {
    leaf build,
    leaf desc,
    leaf env,
});

/// HTTP listener settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Web {
    pub debug_host: String,
    pub api_host: String,
    pub read_timeout: Duration,
    pub write_timeout: Duration,
    pub idle_timeout: Duration,
    pub shutdown_timeout: Duration,
    pub cors_origin: String,
}

impl_configure!(Web {
    leaf debug_host: "default:0.0.0.0:4000,help:address of the debug and metrics listener",
    leaf api_host: "default:0.0.0.0:3000,help:address the API listens on",
    leaf read_timeout: "default:5s",
    leaf write_timeout: "default:10s",
    leaf idle_timeout: "default:120s",
    leaf shutdown_timeout: "default:20s,help:grace period for in-flight requests",
    leaf cors_origin: "default:*",
});

/// Postgres connection settings, resolvable from the secret store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Db {
    pub user: String,
    pub password: String,
    pub host: String,
    pub name: String,
    pub max_idle_conns: i32,
    pub max_open_conns: i32,
    pub disable_tls: bool,
    pub sync: bool,
}

impl_configure!(Db {
    leaf user: "default:postgres,secret:RDS_DB_USER",
    leaf password: "default:postgres,secret:RDS_DB_PASSWORD,noPrint",
    leaf host: "default:0.0.0.0:5432,secret:RDS_DB_HOST,help:database 'host:port'",
    leaf name: "default:postgres,secret:RDS_DB_NAME",
    leaf max_idle_conns: "default:0",
    leaf max_open_conns: "default:0",
    leaf disable_tls: "default:true",
    leaf sync: "default:true,help:run schema migrations on start-up",
});

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stripe {
    pub key: String,
}

impl_configure!(Stripe {
    leaf key: "default:sk_test_changeme,mask,help:Stripe secret API key",
});

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cognito {
    pub user_pool_id: String,
    pub client_id: String,
    /// Used to derive unique usernames.
    pub seed: String,
}

impl_configure!(Cognito {
    leaf user_pool_id: "default:userpool",
    leaf client_id: "default:userpool",
    leaf seed: "default:userpool,mask",
});

/// Root configuration of the HTTP API service.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiConfig {
    pub version: Version,
    pub web: Web,
    pub db: Db,
    pub stripe: Stripe,
    pub cognito: Cognito,
}

impl_configure!(ApiConfig {
    embed version,
    nested web,
    nested db,
    nested stripe,
    nested cognito,
});

/// Root configuration of the admin command dispatcher.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdminConfig {
    pub commands: Vec<String>,
    pub version: String,
    pub env: String,
    pub aws_account: String,
}

impl_configure!(AdminConfig {
    leaf commands: "required,help:commands to run in order",
    leaf version: "required",
    leaf env: "default:development",
    leaf aws_account: "required",
});

/// Database settings for a single admin command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DbConfig {
    pub user: String,
    pub password: String,
    pub host: String,
    pub name: String,
    pub max_idle_conns: i32,
    pub max_open_conns: i32,
    pub disable_tls: bool,
}

impl_configure!(DbConfig {
    leaf user: "default:postgres",
    leaf password: "default:postgres,noPrint",
    leaf host: "default:0.0.0.0:5432",
    leaf name: "default:postgres",
    leaf max_idle_conns: "default:0",
    leaf max_open_conns: "default:0",
    leaf disable_tls: "default:true",
});
