//! Chain presets the client knows how to reach without explicit configuration.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NativeCurrency {
    pub name: &'static str,
    pub symbol: &'static str,
    pub decimals: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Explorer {
    pub name: &'static str,
    pub url: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Multicall {
    pub address: &'static str,
    pub block_created: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Chain {
    pub id: u64,
    /// Short name used in config files and on the command line.
    pub key: &'static str,
    pub name: &'static str,
    pub native_currency: NativeCurrency,
    pub rpc_url: &'static str,
    pub explorer: Option<Explorer>,
    pub multicall3: Option<Multicall>,
}

const XDC_CURRENCY: NativeCurrency = NativeCurrency { name: "XDC", symbol: "XDC", decimals: 18 };

pub const XDC: Chain = Chain {
    id: 50,
    key: "xdc",
    name: "XinFin Network",
    native_currency: XDC_CURRENCY,
    rpc_url: "https://rpc.ankr.com/xdc",
    explorer: Some(Explorer { name: "xdcscan", url: "https://xdcscan.com" }),
    multicall3: Some(Multicall { address: "0x0B1795ccA8E4eC4df02346a082df54D437F8D9aF", block_created: 75_884_020 }),
};

pub const XDC_DEVNET: Chain = Chain {
    id: 551,
    key: "xdc-devnet",
    name: "XDC Devnet",
    native_currency: XDC_CURRENCY,
    rpc_url: "https://devnetstats.apothem.network/devnet",
    explorer: None,
    multicall3: None,
};

pub const CHAINS: &[Chain] = &[XDC, XDC_DEVNET];

pub fn by_id(id: u64) -> Option<&'static Chain> {
    CHAINS.iter().find(|c| c.id == id)
}

/// Look up by short name (case-insensitive) or by numeric id.
pub fn lookup(name_or_id: &str) -> Option<&'static Chain> {
    let s = name_or_id.trim();
    if let Ok(id) = s.parse::<u64>() {
        return by_id(id);
    }
    CHAINS.iter().find(|c| c.key.eq_ignore_ascii_case(s))
}
