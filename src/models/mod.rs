// Domain models: field values, ports, engine descriptors and reports

mod engine;
mod field;
mod port;
mod report;

pub use engine::{ConnectionInfo, ServerVersion};
pub use field::{FieldValue, Fields, NOT_AVAILABLE};
pub use port::{Port, PortId, PortMap, PortState, parse_port_list};
pub use report::{Align, ExportableReport, RawData, Reports, Table};
