//! One-shot startup dump.
//!
//! Printed once before the table so that a saved terminal log also records
//! which node produced it and how it was configured.

use latency_monitor::MonitorConfig;
use std::ffi::OsString;
use std::io::{self, Write};
use std::net::IpAddr;
use sysinfo::{Networks, System};

/// One network interface as printed in the dump.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct Interface {
    name: String,
    mac: String,
    addresses: Vec<Address>,
}

/// One address of an interface with its reverse-resolved host name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct Address {
    addr: IpAddr,
    host: String,
}

impl Address {
    /// Falls back to the literal address when reverse lookup fails.
    fn resolve(addr: IpAddr) -> Self {
        let host = dns_lookup::lookup_addr(&addr).unwrap_or_else(|e| {
            tracing::debug!("Reverse lookup of {} failed: {}", addr, e);
            addr.to_string()
        });
        Self { addr, host }
    }

    fn family(&self) -> &'static str {
        match self.addr {
            IpAddr::V4(_) => "IPv4",
            IpAddr::V6(_) => "IPv6",
        }
    }
}

/// Print configuration, host facts, network interfaces and environment.
pub fn dump<W: Write>(out: &mut W, config: &MonitorConfig) -> io::Result<()> {
    write_config(out, config)?;
    write_system(out)?;

    let networks = Networks::new_with_refreshed_list();
    write_interfaces(
        out,
        networks.iter().map(|(name, data)| Interface {
            name: name.clone(),
            mac: data.mac_address().to_string(),
            addresses: data
                .ip_networks()
                .iter()
                .map(|network| Address::resolve(network.addr))
                .collect(),
        }),
    )?;

    write_environment(out, std::env::vars_os())?;
    out.flush()
}

fn write_config<W: Write>(out: &mut W, config: &MonitorConfig) -> io::Result<()> {
    writeln!(
        out,
        "Sleep duration {} milliseconds",
        config.interval.as_millis()
    )?;
    writeln!(out, "Checking directory {}", config.directory.display())?;
    writeln!(out, "Marker suffix {}", config.suffix)
}

fn write_system<W: Write>(out: &mut W) -> io::Result<()> {
    let unknown = || "unknown".to_string();

    writeln!(out, "\nSystem:")?;
    writeln!(out, "    host {}", System::host_name().unwrap_or_else(unknown))?;
    writeln!(
        out,
        "    os {} {}",
        System::name().unwrap_or_else(unknown),
        System::os_version().unwrap_or_default()
    )?;
    writeln!(
        out,
        "    kernel {}",
        System::kernel_version().unwrap_or_else(unknown)
    )
}

/// `name (mac)` per interface, sorted by name, then one
/// `    IPv4|IPv6 host (addr)` line per address.
fn write_interfaces<W, I>(out: &mut W, interfaces: I) -> io::Result<()>
where
    W: Write,
    I: IntoIterator<Item = Interface>,
{
    let mut interfaces: Vec<_> = interfaces.into_iter().collect();
    interfaces.sort();

    writeln!(out, "\nNetwork interfaces:")?;
    for interface in interfaces {
        writeln!(out, "{} ({})", interface.name, interface.mac)?;
        for address in &interface.addresses {
            writeln!(
                out,
                "    {} {} ({})",
                address.family(),
                address.host,
                address.addr
            )?;
        }
    }
    Ok(())
}

/// `KEY=VALUE` per variable, sorted by key.
fn write_environment<W, I>(out: &mut W, vars: I) -> io::Result<()>
where
    W: Write,
    I: IntoIterator<Item = (OsString, OsString)>,
{
    let mut vars: Vec<(String, String)> = vars
        .into_iter()
        .map(|(k, v)| {
            (
                k.to_string_lossy().into_owned(),
                v.to_string_lossy().into_owned(),
            )
        })
        .collect();
    vars.sort();

    writeln!(out, "\nEnvironment:")?;
    for (key, value) in vars {
        writeln!(out, "{}={}", key, value)?;
    }
    Ok(())
}
