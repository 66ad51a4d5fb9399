//! Container headers of the `.dsz` file format used by the CLI layer.
//!
//! The container wraps one core subsequence payload with a magic tag, a
//! format version and the JSON-serialized codec configuration, making the
//! file self-describing. The core codec itself never reads these headers;
//! its configuration is always supplied externally.

use binrw::binrw;

/// Current container format version.
pub const CONTAINER_VERSION: u8 = 1;

#[binrw]
#[brw(big, magic = b"DESCOMP")]
#[derive(Debug, PartialEq, Eq)]
pub struct ContainerHeader {
    pub version: u8,
}

#[binrw]
#[brw(big)]
#[derive(Debug, PartialEq, Eq)]
pub struct ContainerConfig {
    pub config_len: u32,

    #[br(count = config_len)]
    pub config_json: Vec<u8>,
}

impl ContainerConfig {
    #[must_use]
    pub fn new(config_json: Vec<u8>) -> Self {
        Self {
            config_len: config_json.len() as u32,
            config_json,
        }
    }
}
