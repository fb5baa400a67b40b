//! Static route-table seeding.
//!
//! Spec.md §1/§6 treats route-table population as an opaque, out-of-scope
//! collaborator: "bootstrap populates from a static source (e.g. a file
//! or control-plane RPC, out of scope)". This module is that one concrete
//! source a runnable crate needs: a TOML file of `[[route]]` entries, fed
//! through [`crate::trie::Trie::insert`] exactly as any other seeder would
//! be. It does not change trie or worker semantics, only populates one
//! before freezing it.

use std::fs;
use std::net::Ipv4Addr;
use std::path::Path;
use std::str::FromStr;

use ipnet::Ipv4Net;
use serde::Deserialize;

use crate::error::{ForwarderError, Result};
use crate::trie::Trie;

#[derive(Debug, Deserialize, Default)]
struct RouteFile {
    #[serde(default, rename = "route")]
    routes: Vec<RouteEntry>,
}

#[derive(Debug, Deserialize)]
struct RouteEntry {
    /// CIDR prefix, e.g. `"10.0.0.0/8"`.
    prefix: String,
    /// Next-hop IP to record alongside the route. `0.0.0.0` is a valid,
    /// legitimate value (spec.md §3/§9): it means "on-link, no rewrite",
    /// not "unset". Only `next_hop_interface == 0` is reserved for that.
    #[serde(default)]
    next_hop_ip: Ipv4Addr,
    /// 1-based interface index. Must be nonzero; see
    /// [`crate::trie::UNSET_INTERFACE`].
    interface: u8,
}

/// Parses `path` as a route-seed TOML file and inserts every entry into
/// `trie`. Returns the number of routes inserted. Rejects `interface ==
/// 0` up front with a descriptive error rather than letting
/// [`Trie::insert`] panic on a malformed seed file.
pub fn load_routes_into<P: AsRef<Path>>(trie: &mut Trie, path: P) -> Result<usize> {
    let path = path.as_ref();
    let txt = fs::read_to_string(path)
        .map_err(|e| ForwarderError::RouteSeed(format!("failed to read route file {}: {e}", path.display())))?;
    let parsed: RouteFile = toml::from_str(&txt)
        .map_err(|e| ForwarderError::RouteSeed(format!("failed to parse route file {}: {e}", path.display())))?;

    for entry in &parsed.routes {
        let net = Ipv4Net::from_str(&entry.prefix)
            .map_err(|e| ForwarderError::RouteSeed(format!("invalid prefix '{}': {e}", entry.prefix)))?;
        if entry.interface == 0 {
            return Err(ForwarderError::RouteSeed(format!(
                "route {} has interface 0, which is reserved as the unset sentinel",
                entry.prefix
            )));
        }
        trie.insert(net.addr().octets(), net.prefix_len(), u32::from(entry.next_hop_ip), entry.interface);
    }

    Ok(parsed.routes.len())
}
