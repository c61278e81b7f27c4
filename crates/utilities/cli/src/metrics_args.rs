//! Prometheus exporter arguments.

use crate::{PrometheusError, init_prometheus_server};
use clap::Args;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

/// Configuration for the Prometheus exporter.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct MetricsArgs {
    /// Serve Prometheus metrics.
    #[arg(long = "metrics.enabled", global = true, env = "VRANK_METRICS_ENABLED")]
    pub enabled: bool,
    /// The address the metrics server listens on.
    #[arg(
        long = "metrics.addr",
        global = true,
        default_value = "0.0.0.0",
        env = "VRANK_METRICS_ADDR"
    )]
    pub addr: IpAddr,
    /// The port the metrics server listens on. 0 picks a free port.
    #[arg(
        long = "metrics.port",
        global = true,
        default_value_t = 9090,
        env = "VRANK_METRICS_PORT"
    )]
    pub port: u16,
}

impl Default for MetricsArgs {
    fn default() -> Self {
        Self { enabled: false, addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED), port: 9090 }
    }
}

impl MetricsArgs {
    /// Starts the exporter if enabled and returns the address it serves on.
    pub fn init_metrics(&self) -> Result<Option<SocketAddr>, PrometheusError> {
        if !self.enabled {
            return Ok(None);
        }
        init_prometheus_server(self.addr, self.port).map(Some)
    }
}
