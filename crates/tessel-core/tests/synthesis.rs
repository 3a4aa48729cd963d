//! End-to-end synthesis scenarios over the public API.

use tessel_core::hash::{content_hash, hash_hex};
use tessel_core::parse::{generate_template, load_config_toml, parse_config_toml};
use tessel_core::{
    ConfigError, ConfigFile, Configuration, ControllerSpec, Generator, InterconnectKind, Isa,
    TargetKind, Topology, MAX_PARALLELISM,
};

fn synthesize(target: TargetKind, parallelism: u32) -> Generator {
    let config = Configuration::with_knobs(target, parallelism, Isa::Riscv)
        .expect("headline knobs should validate");
    let mut session = Generator::new(config);
    session.synthesize().expect("synthesis should succeed");
    session
}

#[test]
fn eu_count_matches_parallelism_everywhere() {
    for target in [TargetKind::Cpu, TargetKind::Npu] {
        for p in 1..=MAX_PARALLELISM {
            let stats = synthesize(target, p).stats().expect("stats after synthesis");
            assert_eq!(stats.eu_count, p as usize, "{target} with P={p}");
        }
    }
}

#[test]
fn register_ports_track_unit_count() {
    for p in [1u32, 7, 64, 333, 1024] {
        let design = synthesize(TargetKind::Npu, p).design().expect("design");
        assert_eq!(design.register_file.read_ports, 2 * p);
        assert_eq!(design.register_file.write_ports, p);
    }
}

#[test]
fn cpu_four_way_from_toml() {
    let toml = r#"
target = "CPU"
parallelism = 4
isa = "RISCV"

[interconnect]
topology = "crossbar"
"#;
    let config = parse_config_toml(toml)
        .and_then(|f| f.validate())
        .expect("config should validate");
    let mut session = Generator::new(config);
    let design = session.synthesize().expect("synthesize");

    assert_eq!(design.eu_count(), 4);
    assert_eq!(design.register_file.read_ports, 8);
    assert_eq!(design.register_file.write_ports, 4);
    assert_eq!(design.interconnect.kind, InterconnectKind::Crossbar { n: 4 });
    assert_eq!(
        design.interconnect.edge_count(),
        12,
        "a 4-unit crossbar links every ordered pair"
    );
}

#[test]
fn npu_256_uses_systolic_control_and_noc() {
    let session = synthesize(TargetKind::Npu, 256);
    let design = session.design().expect("design");
    assert_eq!(design.controller, ControllerSpec::Systolic { dim: 256 });
    assert_eq!(design.memory.lsu_ports, 128);
    assert_eq!(design.memory.mshrs, 512);
    assert_eq!(design.topology(), Topology::Noc);
    assert_eq!(design.interconnect.router_to_router_count(), 0);
}

#[test]
fn single_unit_designs_have_no_links() {
    for target in [TargetKind::Cpu, TargetKind::Npu] {
        let design = synthesize(target, 1).design().expect("design");
        assert_eq!(design.interconnect.edge_count(), 0);
        assert_eq!(design.memory.lsu_ports, 0);
    }
}

#[test]
fn fingerprint_separates_configurations() {
    let a = synthesize(TargetKind::Cpu, 8).stats().expect("stats");
    let b = synthesize(TargetKind::Cpu, 8).stats().expect("stats");
    let c = synthesize(TargetKind::Cpu, 9).stats().expect("stats");
    assert_eq!(a.fingerprint, b.fingerprint);
    assert_ne!(a.fingerprint, c.fingerprint);
}

#[test]
fn fingerprint_is_the_hash_of_the_serialized_design() {
    let design = synthesize(TargetKind::Npu, 16).design().expect("design");
    let expected = hash_hex(&content_hash(&*design).expect("design serializes"));
    assert_eq!(design.fingerprint(), expected);
    assert_eq!(expected.len(), 64);
}

#[test]
fn invalid_values_name_the_field() {
    let file = ConfigFile {
        parallelism: 2048,
        ..ConfigFile::default()
    };
    match file.validate() {
        Err(ConfigError::OutOfRange { field, value, .. }) => {
            assert_eq!(field, "parallelism");
            assert_eq!(value, "2048");
        }
        other => panic!("expected OutOfRange, got {other:?}"),
    }

    let mut file = ConfigFile::default();
    file.interconnect.topology = Some("torus".into());
    let msg = file.validate().unwrap_err().to_string();
    assert!(msg.contains("interconnect.topology"), "{msg}");
    assert!(msg.contains("torus"), "{msg}");
}

#[test]
fn template_file_round_trips_through_disk() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("tessel.toml");
    let text = generate_template("NPU", 32).expect("template");
    std::fs::write(&path, text).expect("write template");

    let config = load_config_toml(&path)
        .and_then(|f| f.validate())
        .expect("template should validate");
    assert_eq!(config.target(), TargetKind::Npu);
    assert_eq!(config.parallelism(), 32);
}
