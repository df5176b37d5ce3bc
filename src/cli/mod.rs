pub mod config;
pub mod menu;

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "sshmenu-azure")]
#[command(about = "Builds a dynamic Azure VM address list like sshmenu")]
#[command(override_usage = "sshmenu-azure [OPTIONS] [-- <SSH_ARGS>...]")]
#[command(version)]
pub struct Cli {
    /// Instance tags in "key1:value1;key2:value2" format. If undefined, full list will be shown
    #[arg(short, long, default_value = "")]
    pub tags: String,

    /// Azure resource group name. If undefined, resource groups list will be shown
    ///
    /// Falls back to AZURE_BASE_GROUP_NAME, then the config file.
    #[arg(short = 'g', long, env = "AZURE_DEFAULTS_GROUP")]
    pub resource_group: Option<String>,

    /// Azure resource groups location (region). If undefined, full resource groups list will be shown
    #[arg(short, long, env = "AZURE_DEFAULTS_LOCATION")]
    pub location: Option<String>,

    /// Use public ip instead of private
    #[arg(short, long)]
    pub public_ip: bool,

    /// Maximum concurrent Azure requests while probing VMs
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Print the VM list as JSON instead of prompting
    #[arg(long)]
    pub json: bool,

    /// Path to config file (defaults to the user config directory)
    #[arg(long, env = "SSHMENU_AZURE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Extra arguments passed to ssh before the address
    #[arg(last = true)]
    pub ssh_args: Vec<String>,
}
