#[cfg(test)]
mod generation_tests {
    use std::collections::BTreeMap;
    use std::fs;
    use std::io::Write;

    use tempfile::NamedTempFile;

    use fabnetgen::config::Topology;
    use fabnetgen::config_loader::load_topology;
    use fabnetgen::configtx::{self, ConsenterOrder, HostResolvers};
    use fabnetgen::error::GenError;
    use fabnetgen::hosts::{HostMap, NodeNameHosts};
    use fabnetgen::profile::{self, ConnectionProfile, DeploymentContext, ProfileOptions};
    use fabnetgen::stats::{self, aggregate, parser, ReportOptions, PADDING};

    const TOPOLOGY: &str = r#"
organizations:
  - name: org1
    orderer-quantity: 2
    peer-quantity: 1
  - name: Org2
    orderer-quantity: 1
    peer-quantity: 2
    msptype: idemix
  - name: solo
    orderer-quantity: 1
    peer-quantity: 0
applications-quantity: 1
"#;

    const TEMPLATE: &str = "\
---
Organizations:

Orderer: &OrdererDefaults
    OrdererType: etcdraft
    EtcdRaft:
        Consenters:

Profiles:
    SampleMultiNodeEtcdRaft:
        Orderer:
            <<: *OrdererDefaults
            Organizations:
                - *SampleOrg
";

    fn topology() -> Topology {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(TOPOLOGY.as_bytes()).unwrap();
        load_topology(file.path()).unwrap()
    }

    fn aws_context() -> DeploymentContext {
        DeploymentContext::Aws {
            credential_root: "/home/ubuntu/net".to_string(),
            orderer_hosts: HostMap::from_json(
                "orderer hosts",
                r#"{"orderer1-org1": "h1", "orderer2-org1": "h2", "orderer1-org2": "h4", "orderer1-solo": "h5"}"#,
            )
            .unwrap(),
            peer_hosts: HostMap::from_json(
                "peer hosts",
                r#"{"peer1-org1": "h3", "peer1-org2": "h6", "peer2-org2": "h7"}"#,
            )
            .unwrap(),
        }
    }

    fn localhost_context() -> DeploymentContext {
        DeploymentContext::Localhost {
            credential_root: "/home/me/net".to_string(),
            ca_ports: HostMap::from_json(
                "ca ports",
                r#"{"org1": 7054, "org2": 8054, "solo": 9054}"#,
            )
            .unwrap(),
            orderer_ports: HostMap::from_json(
                "orderer ports",
                r#"{"orderer1-org1": 7050, "orderer2-org1": 7060, "orderer1-org2": 8050, "orderer1-solo": 9050}"#,
            )
            .unwrap(),
            peer_ports: HostMap::from_json(
                "peer ports",
                r#"{"peer1-org1": 7051, "peer1-org2": 8051, "peer2-org2": 8061}"#,
            )
            .unwrap(),
        }
    }

    fn assert_channel_consistent(built: &ConnectionProfile) {
        let channel = &built.channels[profile::CHANNEL_NAME];
        for orderer in &channel.orderers {
            assert!(built.orderers.contains_key(orderer), "missing orderer {}", orderer);
        }
        for peer in channel.peers.keys() {
            assert!(built.peers.contains_key(peer), "missing peer {}", peer);
        }
    }

    #[test]
    fn test_channel_orderers_cover_every_organization() {
        let topology = topology();
        for context in [aws_context(), DeploymentContext::Docker, localhost_context()] {
            let built =
                profile::build_profile(&topology, &context, &ProfileOptions::default()).unwrap();
            let orderers = &built.channels[profile::CHANNEL_NAME].orderers;

            assert_eq!(orderers.len() as u32, topology.total_orderers());
            for org in &topology.organizations {
                for name in org.orderer_names() {
                    assert!(orderers.contains(&name), "{} missing for {}", name, context.name());
                }
            }
            assert_eq!(built.peers.len() as u32, topology.total_peers());
            assert_channel_consistent(&built);
        }
    }

    #[test]
    fn test_rendering_is_byte_identical() {
        let topology = topology();
        let context = localhost_context();
        let render = || {
            let base =
                profile::build_profile(&topology, &context, &ProfileOptions::default()).unwrap();
            profile::render_variants(&base, &topology, &context)
                .iter()
                .map(|r| profile::to_pretty_json(&r.profile).unwrap())
                .collect::<Vec<_>>()
        };
        assert_eq!(render(), render());

        let hosts = HostResolvers {
            orderers: &NodeNameHosts,
            peers: &NodeNameHosts,
        };
        let render_text = || {
            configtx::render_configtx(
                &topology,
                &hosts,
                "/net",
                TEMPLATE,
                "t",
                ConsenterOrder::Legacy,
            )
            .unwrap()
        };
        let first = render_text();
        let second = render_text();
        assert_eq!(first, second);
    }

    #[test]
    fn test_write_aws_profiles() {
        let dir = tempfile::tempdir().unwrap();
        let topology = topology();
        let options = ProfileOptions::default();
        let written =
            profile::write_profiles(dir.path(), &topology, &aws_context(), &options).unwrap();
        assert_eq!(written.len(), 6);

        let out = dir.path().join("generated-connection-tls");
        let blocking: serde_json::Value = serde_json::from_str(
            &fs::read_to_string(out.join("aws-org2-connection-tls.json")).unwrap(),
        )
        .unwrap();
        let non_blocking: serde_json::Value = serde_json::from_str(
            &fs::read_to_string(out.join("aws-non-blocking-org2-connection-tls.json")).unwrap(),
        )
        .unwrap();

        assert_eq!(blocking["client"]["organization"], "ORG2");
        assert_eq!(blocking["channels"]["canal"]["peers"]["peer1-org1"]["eventSource"], true);
        assert_eq!(non_blocking["channels"]["canal"]["peers"]["peer1-org1"]["eventSource"], false);
        assert_eq!(blocking["channels"]["canal"]["peers"]["peer1-org1"]["discover"], true);
        assert_eq!(blocking["orderers"]["orderer2-org1"]["url"], "grpcs://h2:7050");
        assert_eq!(blocking["orderers"]["orderer2-org1"]["mspid"], "ORG1");
        assert_eq!(blocking["certificateAuthorities"]["rca-org1"]["url"], "https://null");
        assert_eq!(
            blocking["organizations"]["ORG1"]["adminPrivateKeyPEM"]["path"],
            "/home/ubuntu/net/hyperledger/org1/admin1/msp/keystore/key.pem"
        );
    }

    #[test]
    fn test_write_localhost_profiles_with_legacy_orderer_msp() {
        let dir = tempfile::tempdir().unwrap();
        let options = ProfileOptions {
            orderer_msp_id: Some("UFSC".to_string()),
            ..ProfileOptions::default()
        };
        profile::write_profiles(dir.path(), &topology(), &localhost_context(), &options).unwrap();

        let text = fs::read_to_string(
            dir.path()
                .join("generated-connection-tls")
                .join("non-blocking-solo-connection-tls.json"),
        )
        .unwrap();
        assert!(text.starts_with("{\n    \""));

        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json["client"]["organization"], "SOLO");
        assert_eq!(json["orderers"]["orderer1-org2"]["mspid"], "UFSC");
        assert_eq!(json["orderers"]["orderer1-org2"]["url"], "grpcs://localhost:8050");
        assert_eq!(json["peers"]["peer2-org2"]["url"], "grpcs://localhost:8061");
        assert_eq!(json["certificateAuthorities"]["rca-org2"]["url"], "https://localhost:8054");
        assert_eq!(json["channels"]["canal"]["peers"]["peer1-org1"]["discover"], false);
    }

    #[test]
    fn test_localhost_missing_port_is_lookup_error() {
        let context = DeploymentContext::Localhost {
            credential_root: "/net".to_string(),
            ca_ports: HostMap::new("ca ports", BTreeMap::new()),
            orderer_ports: HostMap::new("orderer ports", BTreeMap::new()),
            peer_ports: HostMap::new("peer ports", BTreeMap::new()),
        };
        let err =
            profile::build_profile(&topology(), &context, &ProfileOptions::default()).unwrap_err();
        assert!(matches!(err, GenError::Lookup { .. }));
    }

    #[test]
    fn test_docker_forces_discover_in_both_variants() {
        let topology = topology();
        let base = profile::build_profile(
            &topology,
            &DeploymentContext::Docker,
            &ProfileOptions::default(),
        )
        .unwrap();
        for rendered in profile::render_variants(&base, &topology, &DeploymentContext::Docker) {
            assert!(rendered.file_name.starts_with("docker-"));
            for roles in rendered.profile.channels[profile::CHANNEL_NAME].peers.values() {
                assert!(roles.discover);
            }
        }
    }

    #[test]
    fn test_aws_configtx_scenario() {
        let dir = tempfile::tempdir().unwrap();
        let template_path = dir.path().join("configtxTemplate.yaml");
        fs::write(&template_path, TEMPLATE).unwrap();

        let (orderers, peers) = match aws_context() {
            DeploymentContext::Aws {
                orderer_hosts,
                peer_hosts,
                ..
            } => (orderer_hosts, peer_hosts),
            _ => unreachable!(),
        };
        let hosts = HostResolvers {
            orderers: &orderers,
            peers: &peers,
        };
        let path = configtx::write_configtx(
            &topology(),
            &hosts,
            "/home/ubuntu/net",
            &template_path,
            &dir.path().join("generated-config-aws"),
            ConsenterOrder::Legacy,
        )
        .unwrap();
        let text = fs::read_to_string(path).unwrap();

        assert!(text.contains("OrdererEndpoints:\n            - \"h1:7050\"\n            - \"h2:7050\"\n"));
        assert!(text.contains("AnchorPeers:\n            - Host: h3\n              Port: 7051\n"));
        assert!(text.contains("ID: ORG2\n\n        msptype: idemix\n"));
        assert_eq!(text.matches("msptype: idemix").count(), 1);
        assert_eq!(text.matches("AnchorPeers:").count(), 2);
        assert!(!text.contains("SampleOrg"));
        assert!(text.contains("- *ORG1"));

        // Legacy consenter order: organizations reversed, orderers ascending
        let h5 = text.find("- Host: h5").unwrap();
        let h4 = text.find("- Host: h4").unwrap();
        let h1 = text.find("- Host: h1").unwrap();
        let h2 = text.find("- Host: h2").unwrap();
        assert!(h5 < h4 && h4 < h1 && h1 < h2);

        // Parses as YAML and the default orderer lookup sees the first organization
        assert_eq!(
            fabnetgen::lookups::default_orderer(&text, "SampleMultiNodeEtcdRaft").unwrap(),
            "orderer1-org1"
        );
    }

    #[test]
    fn test_configtx_missing_marker() {
        let hosts = HostResolvers {
            orderers: &NodeNameHosts,
            peers: &NodeNameHosts,
        };
        let err = configtx::render_configtx(
            &topology(),
            &hosts,
            "/net",
            "Organizations:\n",
            "broken.yaml",
            ConsenterOrder::Legacy,
        )
        .unwrap_err();
        assert!(matches!(err, GenError::TemplateMarkerNotFound { .. }));
    }

    #[test]
    fn test_memory_units() {
        let cases = [
            ("512MiB / 1GiB", 0.5),
            ("2GiB / 4GiB", 2.0),
            ("100KiB / 1MiB", 100.0 / 1_048_576.0),
        ];
        for (field, expected) in cases {
            let value = parser::memory_to_gib(field).unwrap();
            assert!((value - expected).abs() < 1e-12, "{} -> {}", field, value);
        }
    }

    #[test]
    fn test_series_alignment() {
        let mut short = stats::ResourceSample::new("short");
        let mut long = stats::ResourceSample::new("long");
        short.cpu = vec![Some(1.0), Some(2.0), Some(3.0)];
        long.cpu = vec![Some(9.0); 5];

        let mut samples = vec![short, long];
        assert_eq!(aggregate::align_series(&mut samples), 5);
        assert_eq!(
            samples[0].cpu,
            vec![PADDING, PADDING, Some(1.0), Some(2.0), Some(3.0)]
        );
        assert_eq!(samples[0].memory, vec![PADDING; 5]);
        assert_eq!(samples[1].cpu, vec![Some(9.0); 5]);
    }

    #[test]
    fn test_stats_report_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let topology: Topology = fabnetgen::config_loader::parse_topology(
            "organizations:\n  - name: org1\n    orderer-quantity: 1\n    peer-quantity: 1\napplications-quantity: 1\n",
            "test",
        )
        .unwrap();

        let nodes = stats::monitored_nodes(&topology);
        assert_eq!(
            nodes,
            vec!["orderer1-org1", "peer1-org1", "chaincode-peer1-org1", "cli-applications-1"]
        );
        for (i, node) in nodes.iter().enumerate() {
            let mut text = String::from("\x1b[2J\x1b[H--:-- / --:--:--\n");
            for tick in 0..=i {
                text.push_str(&format!(
                    "\x1b[2J\x1b[H{}.5%:{}MiB / 2GiB:1kB / 2MB:0B / 1.5GB\n",
                    tick, 256 * (tick + 1)
                ));
            }
            fs::write(stats::stats_file(dir.path(), node), text).unwrap();
        }

        let samples = stats::load_samples(dir.path(), &nodes).unwrap();
        assert_eq!(samples[3].node, "cli-applications-1");
        assert_eq!(samples[3].len(), 5);

        let report =
            stats::generate_report(dir.path(), samples, &ReportOptions::default()).unwrap();
        assert_eq!(report.metadata.total_nodes, 4);
        assert_eq!(report.metadata.aligned_length, 5);
        assert_eq!(report.nodes[0].missing_ticks, 1);
        assert_eq!(report.nodes[0].cpu.unwrap().mean, 0.5);

        let plots = dir.path().join(stats::PLOTS_SUBDIR);
        assert_eq!(
            fs::read_dir(&plots).unwrap().count(),
            4 * 6 + 2,
            "six charts per container plus two summaries"
        );
        let summary = fs::read_to_string(plots.join("summary.txt")).unwrap();
        assert!(summary.contains("cli-applications-1 (5 ticks, 1 without data)"));
    }

    #[test]
    fn test_malformed_stats_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(stats::stats_file(dir.path(), "peer1-org1"), "1%:1GiB / 2GiB\n").unwrap();
        assert!(stats::load_samples(dir.path(), &["peer1-org1".to_string()]).is_err());
    }
}
