// Per-port counters: relative packet/byte totals and current rates

use std::time::Duration;

use super::{CounterStats, StatsStore};
use crate::models::{Fields, Port};

#[derive(Debug, Default)]
pub struct PortStats {
    store: StatsStore,
}

impl PortStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_window(window: Duration) -> Self {
        Self {
            store: StatsStore::with_window(window),
        }
    }

    /// Ordered port report; `port` supplies owner and state.
    /// `--`, `---` and `----` are blank row separators.
    pub fn generate_stats(&self, port: &Port) -> Fields {
        Fields::new()
            .with("owner", port.owner.as_str())
            .with("state", port.port_state_name())
            .with("--", "")
            .with("opackets", self.get_rel("opackets"))
            .with("obytes", self.get_rel("obytes"))
            .with("ipackets", self.get_rel("ipackets"))
            .with("ibytes", self.get_rel("ibytes"))
            .with("ierrors", self.get_rel("ierrors"))
            .with("oerrors", self.get_rel("oerrors"))
            .with("tx-bytes", self.get_rel_fmt("obytes", "B"))
            .with("rx-bytes", self.get_rel_fmt("ibytes", "B"))
            .with("tx-pkts", self.get_rel_fmt("opackets", "pkts"))
            .with("rx-pkts", self.get_rel_fmt("ipackets", "pkts"))
            .with("---", "")
            .with("Tx bps", self.get_fmt("m_total_tx_bps", "bps"))
            .with("Rx bps", self.get_fmt("m_total_rx_bps", "bps"))
            .with("----", "")
            .with("Tx pps", self.get_fmt("m_total_tx_pps", "pps"))
            .with("Rx pps", self.get_fmt("m_total_rx_pps", "pps"))
    }
}

impl CounterStats for PortStats {
    fn store(&self) -> &StatsStore {
        &self.store
    }

    fn store_mut(&mut self) -> &mut StatsStore {
        &mut self.store
    }
}
