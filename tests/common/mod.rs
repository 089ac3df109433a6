// Shared test helpers
#![allow(dead_code)]

use portstats::hub::StatsHub;
use portstats::models::{ConnectionInfo, Port, PortMap, ServerVersion};
use portstats::stats::{GlobalStats, Snapshot};

pub const TEST_CONFIG: &str = r#"
[server]
port = 8090
host = "127.0.0.1"

[engine]
server = "1.2.3.4"
sync_port = 4501
version = "v2.3"

[publishing]
report_interval_ms = 500

[monitoring]
stale_check_interval_ms = 1000
stats_log_interval_secs = 60

[[ports]]
id = 0
driver = "ixgbe"
speed_gbps = 10

[[ports]]
id = 1
driver = "ixgbe"
speed_gbps = 10
owner = "bob"
"#;

pub fn snap(pairs: &[(&str, f64)]) -> Snapshot {
    pairs.iter().map(|(k, v)| (*k, *v)).collect()
}

pub fn global_stats() -> GlobalStats {
    GlobalStats::new(
        ConnectionInfo {
            server: "1.2.3.4".into(),
            sync_port: 4501,
        },
        ServerVersion {
            version: Some("v2.3".into()),
            uuid: None,
        },
    )
}

/// Ports 0..n, driver "ixgbe", 10 Gb/s, no owner.
pub fn ports(n: u8) -> PortMap {
    (0..n).map(|id| (id, Port::new(id, "ixgbe", 10))).collect()
}

pub fn hub(n: u8) -> StatsHub {
    StatsHub::new(global_stats(), ports(n))
}
