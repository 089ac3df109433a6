// Snapshot store and entity report tests

mod common;

use common::{global_stats, ports, snap};
use portstats::models::{FieldValue, Port, PortState};
use portstats::stats::{
    CounterStats, GLOBAL_STATS_FIELDS, PortStats, StatsStore, format_num, format_value,
};
use std::time::{Duration, Instant};

#[test]
fn updates_within_window_measure_against_first_snapshot() {
    let t0 = Instant::now();
    let mut store = StatsStore::new();
    store.update_at(snap(&[("opackets", 100.0), ("obytes", 6400.0)]), t0);
    store.update_at(
        snap(&[("opackets", 150.0), ("obytes", 9600.0)]),
        t0 + Duration::from_millis(1500),
    );
    assert_eq!(store.get_relative("opackets"), Some(50.0));
    assert_eq!(store.get_relative("obytes"), Some(3200.0));
}

#[test]
fn late_update_repins_and_relative_reads_zero() {
    let t0 = Instant::now();
    let mut store = StatsStore::new();
    store.update_at(snap(&[("opackets", 100.0), ("ibytes", 10.0)]), t0);
    store.update_at(
        snap(&[("opackets", 500.0), ("ibytes", 90.0)]),
        t0 + Duration::from_secs(5),
    );
    assert_eq!(store.get_relative("opackets"), Some(0.0));
    assert_eq!(store.get_relative("ibytes"), Some(0.0));
}

#[test]
fn custom_window_controls_repin() {
    let t0 = Instant::now();
    let mut store = StatsStore::with_window(Duration::from_millis(500));
    store.update_at(snap(&[("opackets", 1.0)]), t0);
    store.update_at(snap(&[("opackets", 9.0)]), t0 + Duration::from_secs(1));
    assert_eq!(store.get_relative("opackets"), Some(0.0));
}

#[test]
fn clear_stats_repins_regardless_of_elapsed_time() {
    let mut stats = PortStats::new();
    stats.update(snap(&[("opackets", 10.0)]));
    stats.update(snap(&[("opackets", 30.0)]));
    assert_eq!(stats.get_rel("opackets"), FieldValue::Number(20.0));
    stats.clear_stats();
    assert_eq!(stats.get_rel("opackets"), FieldValue::Number(0.0));
    assert_eq!(stats.get("opackets"), FieldValue::Number(30.0));
}

#[test]
fn invalidate_makes_fields_unavailable() {
    let mut stats = PortStats::new();
    stats.update(snap(&[("m_total_tx_bps", 2000.0)]));
    stats.invalidate();
    assert_eq!(stats.get("m_total_tx_bps"), FieldValue::Unavailable);
    assert_eq!(stats.get_fmt("m_total_tx_bps", "bps").to_string(), "N/A");
}

#[test]
fn relative_on_missing_field_is_na() {
    let stats = PortStats::new();
    assert_eq!(stats.get_rel("ierrors").to_string(), "N/A");
    assert_eq!(stats.get_rel_fmt("ierrors", "pkts").to_string(), "N/A");
}

#[test]
fn lookup_formats_rate_fields_by_suffix() {
    let mut stats = global_stats();
    stats.update(snap(&[
        ("m_tx_bps", 1_000_000.0),
        ("m_rx_pps", 2500.0),
        ("m_active_cps", 12.0),
        ("ibytes", 4000.0),
        ("m_cpu_util", 12.0),
    ]));
    assert_eq!(stats.lookup("m_tx_bps").to_string(), "1.00 Mb/sec");
    assert_eq!(stats.lookup("m_rx_pps").to_string(), "2.50 Kpkt/sec");
    assert_eq!(stats.lookup("m_active_cps").to_string(), "12.00 cps");
    assert_eq!(stats.lookup("ibytes"), FieldValue::Unavailable);
    assert_eq!(stats.lookup("m_cpu_util"), FieldValue::Unavailable);
    assert_eq!(stats.lookup("m_missing_bps"), FieldValue::Unavailable);
}

#[test]
fn magnitude_formatter_examples() {
    assert_eq!(format_num(999.0, "B"), "999.00 B");
    assert_eq!(format_num(1000.0, "B"), "1.00 KB");
    assert_eq!(format_num(1_000_000.0, "b/sec"), "1.00 Mb/sec");
    assert_eq!(format_value(&FieldValue::text("n/a"), "B"), "N/A");
}

#[test]
fn global_report_matches_console_layout() {
    let mut stats = global_stats();
    stats.update(snap(&[
        ("m_cpu_util", 12.0),
        ("m_tx_bps", 1_500_000.0),
        ("m_rx_bps", 999.0),
        ("m_tx_pps", 600.0),
        ("m_rx_pps", 400.0),
    ]));
    let mut ports = ports(3);
    ports.get_mut(&0).unwrap().streams = vec![1, 2, 3];
    ports.get_mut(&2).unwrap().streams = vec![7];
    ports.get_mut(&0).unwrap().state = PortState::Active;
    ports.get_mut(&1).unwrap().state = PortState::Paused;

    let report = stats.generate_stats(&ports);
    let names: Vec<&str> = report.names().collect();
    assert_eq!(names, GLOBAL_STATS_FIELDS);
    assert_eq!(report.get("connection").unwrap().to_string(), "1.2.3.4, Port 4501");
    assert_eq!(report.get("version").unwrap().to_string(), "v2.3, UUID: N/A");
    assert_eq!(report.get("cpu_util").unwrap().to_string(), "12%");
    assert_eq!(report.get("total_tx").unwrap().to_string(), "1.50 Mb/sec");
    assert_eq!(report.get("total_rx").unwrap().to_string(), "999.00 b/sec");
    assert_eq!(report.get("total_pps").unwrap().to_string(), "1.00 Kpkt/sec");
    assert_eq!(report.get("total_streams"), Some(&FieldValue::Number(4.0)));
    assert_eq!(report.get("active_ports"), Some(&FieldValue::Number(2.0)));
}

#[test]
fn global_report_without_snapshot_is_na() {
    let stats = global_stats();
    let report = stats.generate_stats(&ports(0));
    assert_eq!(report.get("cpu_util").unwrap().to_string(), "N/A");
    assert_eq!(report.get("total_tx").unwrap().to_string(), "N/A");
    assert_eq!(report.get("total_pps").unwrap().to_string(), "N/A");
    assert_eq!(report.get("total_streams"), Some(&FieldValue::Number(0.0)));
}

#[test]
fn global_cpu_keeps_fraction() {
    let mut stats = global_stats();
    stats.update(snap(&[("m_cpu_util", 12.5)]));
    let report = stats.generate_stats(&ports(0));
    assert_eq!(report.get("cpu_util").unwrap().to_string(), "12.5%");
}

#[test]
fn port_report_has_relative_and_rate_tiers() {
    let t0 = Instant::now();
    let mut port = Port::new(3, "ixgbe", 40);
    port.owner = "alice".into();
    port.state = PortState::Active;
    port.stats.store_mut().update_at(
        snap(&[
            ("opackets", 1000.0),
            ("obytes", 64_000.0),
            ("ipackets", 10.0),
            ("ibytes", 640.0),
            ("ierrors", 0.0),
            ("oerrors", 1.0),
        ]),
        t0,
    );
    port.stats.store_mut().update_at(
        snap(&[
            ("opackets", 3000.0),
            ("obytes", 2_064_000.0),
            ("ipackets", 10.0),
            ("ibytes", 640.0),
            ("ierrors", 2.0),
            ("oerrors", 1.0),
            ("m_total_tx_bps", 9_500_000_000.0),
            ("m_total_rx_bps", 0.0),
            ("m_total_tx_pps", 14_880_000.0),
        ]),
        t0 + Duration::from_secs(1),
    );

    let report = port.generate_port_stats();
    let field = |name: &str| report.get(name).unwrap().to_string();
    assert_eq!(field("owner"), "alice");
    assert_eq!(field("state"), "ACTIVE");
    assert_eq!(field("--"), "");
    assert_eq!(report.get("opackets"), Some(&FieldValue::Number(2000.0)));
    assert_eq!(report.get("obytes"), Some(&FieldValue::Number(2_000_000.0)));
    assert_eq!(report.get("ipackets"), Some(&FieldValue::Number(0.0)));
    assert_eq!(report.get("ierrors"), Some(&FieldValue::Number(2.0)));
    assert_eq!(field("tx-bytes"), "2.00 MB");
    assert_eq!(field("rx-bytes"), "0.00 B");
    assert_eq!(field("tx-pkts"), "2.00 Kpkts");
    assert_eq!(field("Tx bps"), "9.50 Gbps");
    assert_eq!(field("Rx bps"), "0.00 bps");
    assert_eq!(field("Tx pps"), "14.88 Mpps");
    assert_eq!(field("Rx pps"), "N/A");
}
