// Report generation: folds global and per-port fields into exportable tables.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::StatsError;
use crate::models::{Align, ExportableReport, Fields, Port, PortId, PortMap, RawData, Reports, Table};
use crate::stats::GlobalStats;

pub const GLOBAL_STATISTICS: &str = "global_statistics";
pub const PORT_STATISTICS: &str = "port_statistics";
pub const PORT_STATUS: &str = "port_status";

/// How many port columns fit in one console table.
pub const DEFAULT_MAX_DISPLAY_PORTS: usize = 4;

const FIELD_COLUMN_WIDTH: usize = 10;
const PORT_COLUMN_WIDTH: usize = 20;

/// Row order of the port statistics table.
pub const PORT_STATS_FIELDS: [&str; 19] = [
    "owner", "state", "--", "opackets", "obytes", "ipackets", "ibytes", "ierrors", "oerrors",
    "tx-bytes", "rx-bytes", "tx-pkts", "rx-pkts", "---", "Tx bps", "Rx bps", "----", "Tx pps",
    "Rx pps",
];

/// Row order of the port status table.
pub const PORT_STATUS_FIELDS: [&str; 3] = ["port-type", "maximum", "port-status"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    Global,
    PortStats,
    PortStatus,
}

impl ReportKind {
    pub const ALL: [ReportKind; 3] = [
        ReportKind::Global,
        ReportKind::PortStats,
        ReportKind::PortStatus,
    ];
    pub const COMPACT: [ReportKind; 2] = [ReportKind::Global, ReportKind::PortStats];

    /// Short console code ("g", "p", "ps").
    pub fn code(self) -> &'static str {
        match self {
            ReportKind::Global => "g",
            ReportKind::PortStats => "p",
            ReportKind::PortStatus => "ps",
        }
    }

    pub fn report_name(self) -> &'static str {
        match self {
            ReportKind::Global => GLOBAL_STATISTICS,
            ReportKind::PortStats => PORT_STATISTICS,
            ReportKind::PortStatus => PORT_STATUS,
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for ReportKind {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "g" | "global" => Ok(ReportKind::Global),
            "p" | "port_stats" => Ok(ReportKind::PortStats),
            "ps" | "port_status" => Ok(ReportKind::PortStatus),
            _ => Err(StatsError::UnknownReportKind(s.to_string())),
        }
    }
}

/// Builds reports from borrowed entities; it never mutates or owns them.
pub struct StatsGenerator<'a> {
    global: &'a GlobalStats,
    ports: &'a PortMap,
    max_display_ports: usize,
}

impl<'a> StatsGenerator<'a> {
    pub fn new(global: &'a GlobalStats, ports: &'a PortMap) -> Self {
        Self {
            global,
            ports,
            max_display_ports: DEFAULT_MAX_DISPLAY_PORTS,
        }
    }

    pub fn with_max_display_ports(mut self, max: usize) -> Self {
        self.max_display_ports = max;
        self
    }

    /// Report for a console kind code. Unknown codes yield an empty bundle.
    pub fn generate_single_statistic(&self, port_ids: &[PortId], kind: &str) -> Reports {
        match kind.parse::<ReportKind>() {
            Ok(kind) => self.generate(port_ids, kind),
            Err(e) => {
                debug!(error = %e, "ignoring report request");
                Reports::new()
            }
        }
    }

    pub fn generate(&self, port_ids: &[PortId], kind: ReportKind) -> Reports {
        let report = match kind {
            ReportKind::Global => self.generate_global_stats(),
            ReportKind::PortStats => self.generate_port_report(
                port_ids,
                &PORT_STATS_FIELDS,
                Align::Right,
                Port::generate_port_stats,
            ),
            ReportKind::PortStatus => self.generate_port_report(
                port_ids,
                &PORT_STATUS_FIELDS,
                Align::Center,
                Port::generate_port_status,
            ),
        };
        Reports::from([(kind.report_name(), report)])
    }

    /// Merges the bundles of several kinds, e.g. [`ReportKind::COMPACT`].
    pub fn generate_statistics(&self, port_ids: &[PortId], kinds: &[ReportKind]) -> Reports {
        kinds
            .iter()
            .flat_map(|kind| self.generate(port_ids, *kind))
            .collect()
    }

    fn generate_global_stats(&self) -> ExportableReport {
        let stats = self.global.generate_stats(self.ports);

        let mut table = Table::new(vec![Align::Left, Align::Left]);
        for (key, value) in stats.iter() {
            table.add_row(vec![title_case(key), value.to_string()]);
        }

        ExportableReport {
            raw_data: RawData::Flat(stats),
            table,
        }
    }

    fn generate_port_report(
        &self,
        port_ids: &[PortId],
        field_names: &[&str],
        port_align: Align,
        build: fn(&Port) -> Fields,
    ) -> ExportableReport {
        let relevant = self.relevant_ports(port_ids);

        let mut raw = BTreeMap::new();
        let mut per_field: Vec<(&str, Vec<String>)> =
            field_names.iter().map(|name| (*name, Vec::new())).collect();

        for port in &relevant {
            let fields = build(port);
            for (name, column) in per_field.iter_mut() {
                column.push(fields.get(*name).map(ToString::to_string).unwrap_or_default());
            }
            raw.insert(port.id, fields);
        }

        let n = relevant.len();
        let mut align = vec![Align::Left];
        align.extend(std::iter::repeat_n(port_align, n));
        let mut widths = vec![FIELD_COLUMN_WIDTH];
        widths.extend(std::iter::repeat_n(PORT_COLUMN_WIDTH, n));

        let mut table = Table::new(align).with_widths(widths);
        for (name, values) in per_field {
            let mut row = Vec::with_capacity(n + 1);
            row.push(name.to_string());
            row.extend(values);
            table.add_row(row);
        }
        let mut header = vec!["port".to_string()];
        header.extend(relevant.iter().map(|p| p.id.to_string()));
        table.set_header(header);

        ExportableReport {
            raw_data: RawData::PerPort(raw),
            table,
        }
    }

    /// Ports whose id was requested, in collection order, capped for display.
    fn relevant_ports(&self, port_ids: &[PortId]) -> Vec<&'a Port> {
        let mut ports: Vec<&Port> = self
            .ports
            .values()
            .filter(|p| port_ids.contains(&p.id))
            .collect();
        if ports.len() > self.max_display_ports {
            warn!(
                requested = ports.len(),
                shown = self.max_display_ports,
                "displaying up to {} ports",
                self.max_display_ports
            );
            ports.truncate(self.max_display_ports);
        }
        ports
    }
}

/// "total_tx" -> "Total Tx".
fn title_case(key: &str) -> String {
    key.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
