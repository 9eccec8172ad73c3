//! Property-based tests for argument parsing and host naming.

#![allow(clippy::expect_used)]

use dodocker_cli::application::services::hosts::unique_host_name;
use dodocker_cli::domain::{DeploymentRequest, PortMapping};
use proptest::prelude::*;

proptest! {
    /// Any in-range pair parses back to the same mapping.
    #[test]
    fn prop_valid_pairs_parse(host in 1u16.., container in 1u16..) {
        let parsed: PortMapping = format!("{host}:{container}").parse().expect("parse");
        prop_assert_eq!(parsed, PortMapping { host, container });
    }

    /// Every mapping appears exactly once in the run command, in order.
    #[test]
    fn prop_run_command_keeps_mapping_order(ports in proptest::collection::vec((1u16.., 1u16..), 0..6)) {
        let mappings: Vec<PortMapping> = ports
            .iter()
            .map(|&(host, container)| PortMapping { host, container })
            .collect();
        let cmd = DeploymentRequest::new("nginx", mappings.clone()).expect("valid").run_command();
        let flags: Vec<String> = cmd
            .split(" -p ")
            .skip(1)
            .map(|s| s.split(' ').next().unwrap_or_default().to_string())
            .collect();
        let expected: Vec<String> = mappings.iter().map(ToString::to_string).collect();
        prop_assert_eq!(flags, expected);
        prop_assert!(cmd.ends_with(" nginx"));
    }

    /// Non-numeric ports never parse.
    #[test]
    fn prop_non_numeric_ports_rejected(raw in "[a-z]{1,8}(:[a-z]{1,8})?") {
        prop_assert!(raw.parse::<PortMapping>().is_err());
    }
}

#[test]
fn host_names_are_unique_and_prefixed() {
    let names: std::collections::HashSet<_> =
        (0..100).map(|_| unique_host_name("dodocker")).collect();
    assert_eq!(names.len(), 100, "duplicate names generated");
    assert!(names.iter().all(|n| n.starts_with("dodocker-")));
}
