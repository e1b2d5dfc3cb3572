use agent_bootstrap::config::{BootstrapConfig, AGENT_PATH_KEY, CORE_LIB_PATH_KEY};
use agent_bootstrap::starter::ChainPlan;
use proptest::prelude::*;
use sdk::params::AgentParams;

fn pairs() -> impl Strategy<Value = Vec<(String, String)>> {
    prop::collection::vec(("[a-z][a-zA-Z0-9]{0,8}", "[a-zA-Z0-9/._-]{0,12}"), 0..8)
}

// Configuration entries always win over host options with the same key
proptest! {
    #[test]
    fn test_config_wins_on_merge(
        host in pairs(),
        config in pairs(),
        agent_path in "/[a-z]{1,8}/lib[a-z]{1,8}[.]so",
    ) {
        let initial: AgentParams = host.into_iter().collect();

        let mut lines = format!("{}={}\n", AGENT_PATH_KEY, agent_path);
        for (k, v) in &config {
            lines.push_str(&format!("{}={}\n", k, v));
        }
        let config = BootstrapConfig::from_lines_str(&lines).unwrap();

        let plan = ChainPlan::from_parts(&initial, &config).unwrap();
        for (key, value) in config.params().iter() {
            prop_assert_eq!(plan.options.get(key), Some(value));
        }
        for (key, _) in initial.iter() {
            prop_assert!(plan.options.get(key).is_some());
        }
        if config.get(CORE_LIB_PATH_KEY).is_none() {
            prop_assert_eq!(plan.options.get(CORE_LIB_PATH_KEY), config.get(AGENT_PATH_KEY));
        }
    }
}

// Host options keep their relative order in the final string
proptest! {
    #[test]
    fn test_host_order_preserved(host in pairs()) {
        let initial: AgentParams = host.into_iter().collect();
        let config = BootstrapConfig::from_lines_str("agentPath=/opt/libagent.so").unwrap();

        let plan = ChainPlan::from_parts(&initial, &config).unwrap();
        let final_keys: Vec<&str> = plan.options.iter().map(|(k, _)| k).collect();
        let host_keys: Vec<&str> = initial.iter().map(|(k, _)| k).collect();
        prop_assert_eq!(&final_keys[..host_keys.len()], &host_keys[..]);
    }
}
