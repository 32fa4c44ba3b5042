use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use env_logger::Env;
use log::info;

use fabnetgen::config::Topology;
use fabnetgen::config_loader::{self, DEFAULT_TOPOLOGY_FILE};
use fabnetgen::configtx::{self, ConsenterOrder, HostResolvers, DEFAULT_TEMPLATE_PATH};
use fabnetgen::hosts::{HostMap, NodeNameHosts};
use fabnetgen::profile::{self, DeploymentContext, ProfileOptions};
use fabnetgen::{affiliations, lookups};

/// Deployment generators for the permissioned-blockchain test network
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the network topology YAML file
    #[arg(short, long, global = true, default_value = DEFAULT_TOPOLOGY_FILE)]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "info")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate client connection profiles for every organization
    ConnectionProfiles {
        #[command(subcommand)]
        target: ProfileTarget,
    },

    /// Render configtx.yaml from the channel configuration template
    Configtx {
        /// Network base directory holding hyperledger/
        #[arg(long)]
        basedir: String,

        /// JSON map of orderer name to host (AWS flavour)
        #[arg(long, requires = "peer_hosts")]
        orderer_hosts: Option<String>,

        /// JSON map of peer name to host (AWS flavour)
        #[arg(long, requires = "orderer_hosts")]
        peer_hosts: Option<String>,

        /// Outer configtx template
        #[arg(long, default_value = DEFAULT_TEMPLATE_PATH)]
        template: PathBuf,

        /// Directory that receives generated-config[-aws]/
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,

        /// List consenters in declaration order
        #[arg(long)]
        declaration_order: bool,
    },

    /// Print the default orderer of a system channel profile
    DefaultOrderer {
        /// Generated configtx.yaml
        configtx: PathBuf,
        /// Profile name under `Profiles`
        profile: String,
    },

    /// Print the organizations of a channel profile
    ChannelOrgs {
        /// Generated configtx.yaml
        configtx: PathBuf,
        /// Profile name under `Profiles`
        profile: String,
    },

    /// Print installed chaincode package ids, one per line
    ChaincodeIds {
        /// JSON output of the installed chaincode query, `@FILE` to read it
        /// from a file or `-` for stdin
        json: String,
    },

    /// Restrict a CA server config to a single affiliation
    CaAffiliations {
        /// Organization name
        org: String,
        /// Directory holding fabric-ca-server-config.yaml
        ca_dir: PathBuf,
    },
}

#[derive(Args, Debug)]
struct ProfileArgs {
    /// Directory that receives generated-connection-tls/
    #[arg(long)]
    basedir: PathBuf,

    /// MSP id written on every orderer entry (defaults to the owning organization)
    #[arg(long)]
    orderer_mspid: Option<String>,

    /// Profile name
    #[arg(long)]
    name: Option<String>,
}

#[derive(Subcommand, Debug)]
enum ProfileTarget {
    /// Client on a host reaching AWS instances
    Aws {
        #[command(flatten)]
        common: ProfileArgs,

        /// Network root on the client host
        #[arg(long)]
        aws_basedir: String,

        /// JSON map of orderer name to host
        #[arg(long)]
        orderer_hosts: String,

        /// JSON map of peer name to host
        #[arg(long)]
        peer_hosts: String,
    },

    /// Client inside the Docker network
    Docker {
        #[command(flatten)]
        common: ProfileArgs,
    },

    /// Client on the Docker host through published ports
    Localhost {
        #[command(flatten)]
        common: ProfileArgs,

        /// JSON map of lower-case organization name to CA port
        #[arg(long)]
        ca_ports: String,

        /// JSON map of orderer name to port
        #[arg(long)]
        orderer_ports: String,

        /// JSON map of peer name to port
        #[arg(long)]
        peer_ports: String,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    env_logger::Builder::from_env(Env::default().default_filter_or(&cli.log_level)).init();

    match cli.command {
        Commands::ConnectionProfiles { target } => {
            let topology = load(&cli.config)?;
            run_connection_profiles(&topology, target)?;
        }
        Commands::Configtx {
            basedir,
            orderer_hosts,
            peer_hosts,
            template,
            output_dir,
            declaration_order,
        } => {
            let topology = load(&cli.config)?;
            let order = if declaration_order {
                ConsenterOrder::Declaration
            } else {
                ConsenterOrder::Legacy
            };

            let path = match (orderer_hosts, peer_hosts) {
                (Some(orderer_hosts), Some(peer_hosts)) => {
                    let orderers = HostMap::from_json("orderer hosts", &orderer_hosts)?;
                    let peers = HostMap::from_json("peer hosts", &peer_hosts)?;
                    let hosts = HostResolvers {
                        orderers: &orderers,
                        peers: &peers,
                    };
                    configtx::write_configtx(
                        &topology,
                        &hosts,
                        &basedir,
                        &template,
                        &output_dir.join("generated-config-aws"),
                        order,
                    )?
                }
                _ => {
                    let hosts = HostResolvers {
                        orderers: &NodeNameHosts,
                        peers: &NodeNameHosts,
                    };
                    configtx::write_configtx(
                        &topology,
                        &hosts,
                        &basedir,
                        &template,
                        &output_dir.join("generated-config"),
                        order,
                    )?
                }
            };
            info!("Channel configuration ready: {}", path.display());
        }
        Commands::DefaultOrderer { configtx, profile } => {
            let text = read(&configtx)?;
            print!("{}", lookups::default_orderer(&text, &profile)?);
        }
        Commands::ChannelOrgs { configtx, profile } => {
            let text = read(&configtx)?;
            let names = lookups::organizations_in_channel(&text, &profile)?;
            print!("{}", lookups::format_organization_list(&names));
        }
        Commands::ChaincodeIds { json } => {
            print!("{}", chaincode_ids_output(&json)?);
        }
        Commands::CaAffiliations { org, ca_dir } => {
            affiliations::rewrite_affiliations_file(&ca_dir, &org)?;
        }
    }

    Ok(())
}

fn load(config: &Path) -> Result<Topology> {
    config_loader::load_topology(config)
        .wrap_err_with(|| format!("Failed to load topology '{}'", config.display()))
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).wrap_err_with(|| format!("Failed to read '{}'", path.display()))
}

/// Inline JSON is used as is; `@FILE` and `-` read the JSON from a file or stdin
fn chaincode_ids_json(arg: &str) -> Result<String> {
    if arg == "-" {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .wrap_err("Failed to read installed chaincodes from stdin")?;
        Ok(text)
    } else if let Some(path) = arg.strip_prefix('@') {
        read(Path::new(path))
    } else {
        Ok(arg.to_string())
    }
}

fn chaincode_ids_output(arg: &str) -> Result<String> {
    let json = chaincode_ids_json(arg)?;
    let ids = lookups::chaincode_package_ids(&json)?;
    Ok(ids.iter().map(|id| format!("{}\n", id)).collect())
}

fn profile_options(common: &ProfileArgs) -> ProfileOptions {
    let mut options = ProfileOptions {
        orderer_msp_id: common.orderer_mspid.clone(),
        ..ProfileOptions::default()
    };
    if let Some(name) = &common.name {
        options.name = name.clone();
    }
    options
}

fn run_connection_profiles(topology: &Topology, target: ProfileTarget) -> Result<()> {
    let (common, context) = match target {
        ProfileTarget::Aws {
            common,
            aws_basedir,
            orderer_hosts,
            peer_hosts,
        } => {
            let context = DeploymentContext::Aws {
                credential_root: aws_basedir,
                orderer_hosts: HostMap::from_json("orderer hosts", &orderer_hosts)?,
                peer_hosts: HostMap::from_json("peer hosts", &peer_hosts)?,
            };
            (common, context)
        }
        ProfileTarget::Docker { common } => (common, DeploymentContext::Docker),
        ProfileTarget::Localhost {
            common,
            ca_ports,
            orderer_ports,
            peer_ports,
        } => {
            let context = DeploymentContext::Localhost {
                credential_root: common.basedir.display().to_string(),
                ca_ports: HostMap::from_json("ca ports", &ca_ports)?,
                orderer_ports: HostMap::from_json("orderer ports", &orderer_ports)?,
                peer_ports: HostMap::from_json("peer ports", &peer_ports)?,
            };
            (common, context)
        }
    };

    info!(
        "Generating {} connection profiles for {} organizations",
        context.name(),
        topology.organizations.len()
    );
    let options = profile_options(&common);
    let written = profile::write_profiles(&common.basedir, topology, &context, &options)?;
    info!("Wrote {} connection profiles", written.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from([
            "fabnetgen",
            "connection-profiles",
            "docker",
            "--basedir",
            "/net",
        ]);

        assert_eq!(cli.config, PathBuf::from(DEFAULT_TOPOLOGY_FILE));
        assert_eq!(cli.log_level, "info");
        match cli.command {
            Commands::ConnectionProfiles {
                target: ProfileTarget::Docker { common },
            } => {
                assert_eq!(common.basedir, PathBuf::from("/net"));
                assert!(common.orderer_mspid.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_aws_profile_args() {
        let cli = Cli::parse_from([
            "fabnetgen",
            "--config",
            "net.yaml",
            "connection-profiles",
            "aws",
            "--basedir",
            ".",
            "--aws-basedir",
            "/home/ubuntu/net",
            "--orderer-hosts",
            r#"{"orderer1-org1":"h1"}"#,
            "--peer-hosts",
            r#"{"peer1-org1":"h3"}"#,
            "--orderer-mspid",
            "UFSC",
        ]);

        assert_eq!(cli.config, PathBuf::from("net.yaml"));
        match cli.command {
            Commands::ConnectionProfiles {
                target: ProfileTarget::Aws { common, aws_basedir, .. },
            } => {
                assert_eq!(aws_basedir, "/home/ubuntu/net");
                assert_eq!(profile_options(&common).orderer_msp_id.as_deref(), Some("UFSC"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_configtx_args() {
        let cli = Cli::parse_from([
            "fabnetgen",
            "configtx",
            "--basedir",
            "/net",
            "--declaration-order",
        ]);
        match cli.command {
            Commands::Configtx {
                template,
                output_dir,
                declaration_order,
                orderer_hosts,
                ..
            } => {
                assert_eq!(template, PathBuf::from(DEFAULT_TEMPLATE_PATH));
                assert_eq!(output_dir, PathBuf::from("."));
                assert!(declaration_order);
                assert!(orderer_hosts.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_configtx_hosts_require_each_other() {
        let result = Cli::try_parse_from([
            "fabnetgen",
            "configtx",
            "--basedir",
            "/net",
            "--orderer-hosts",
            "{}",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_lookup_args() {
        let cli = Cli::parse_from([
            "fabnetgen",
            "default-orderer",
            "configtx.yaml",
            "SampleMultiNodeEtcdRaft",
        ]);
        match cli.command {
            Commands::DefaultOrderer { configtx, profile } => {
                assert_eq!(configtx, PathBuf::from("configtx.yaml"));
                assert_eq!(profile, "SampleMultiNodeEtcdRaft");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    const INSTALLED: &str =
        r#"{"installed_chaincodes":[{"package_id":"energy_1:abc"},{"package_id":"energy_2:def"}]}"#;

    #[test]
    fn test_chaincode_ids_takes_inline_json() {
        let cli = Cli::parse_from(["fabnetgen", "chaincode-ids", INSTALLED]);
        match cli.command {
            Commands::ChaincodeIds { json } => {
                assert_eq!(json, INSTALLED);
                assert_eq!(chaincode_ids_output(&json).unwrap(), "energy_1:abc\nenergy_2:def\n");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_chaincode_ids_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, INSTALLED.as_bytes()).unwrap();

        let arg = format!("@{}", file.path().display());
        assert_eq!(chaincode_ids_output(&arg).unwrap(), "energy_1:abc\nenergy_2:def\n");
        assert!(chaincode_ids_output("@/nonexistent/installed.json").is_err());
    }

    #[test]
    fn test_chaincode_ids_rejects_malformed_json() {
        assert!(chaincode_ids_output("cc.json").is_err());
    }
}
