use serde::{Deserialize, Deserializer};

/// Marker TrueNAS puts in front of the address of jails attached to a vnet interface.
pub const INTERFACE_PREFIX: &str = "vnet0|";

/// One jail as reported by the TrueNAS jail listing endpoint.
///
/// Missing keys and `null` values decode to the field's default, so a stopped
/// jail (which reports `"jid": null`) still produces a row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Jail {
    #[serde(default, deserialize_with = "null_as_default")]
    pub jid: i64,
    #[serde(rename = "id", default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub state: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub release: String,
    #[serde(rename = "ip4_addr", default, deserialize_with = "null_as_default")]
    pub address: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub last_started: String,
}

impl Jail {
    pub fn normalize_address(&mut self) {
        if self.address.starts_with(INTERFACE_PREFIX) {
            self.address = strip_interface_prefix(&self.address).to_string();
        }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Removes a single leading `vnet0|` from an address.
pub fn strip_interface_prefix(address: &str) -> &str {
    address.strip_prefix(INTERFACE_PREFIX).unwrap_or(address)
}

/// Decodes the upstream body as a JSON array of jails and strips the
/// interface prefix from every address.
pub fn decode_jails(body: &[u8]) -> Result<Vec<Jail>, serde_json::Error> {
    let mut jails: Vec<Jail> = serde_json::from_slice(body)?;
    for jail in &mut jails {
        jail.normalize_address();
    }
    Ok(jails)
}
