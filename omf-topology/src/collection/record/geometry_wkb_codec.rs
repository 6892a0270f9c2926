use geo::{Geometry, LineString};
use geozero::{wkb::Wkb, ToGeo};
use serde::{Deserialize, Deserializer, Serializer};
use wkt::ToWkt;

/// deserialize a linestring from either raw WKB bytes, a hex-encoded WKB string
/// or a WKT string. coordinates are expected in EPSG:4326 (lon, lat).
pub fn deserialize<'de, D>(deserializer: D) -> Result<LineString<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BytesOrString {
        Bytes(Vec<u8>),
        String(String),
    }

    let geometry = match BytesOrString::deserialize(deserializer)? {
        BytesOrString::Bytes(b) => decode_wkb(b),
        BytesOrString::String(s) => decode_string(&s),
    }
    .map_err(serde::de::Error::custom)?;

    LineString::try_from(geometry)
        .map_err(|e| serde::de::Error::custom(format!("segment geometry must be a LINESTRING: {e}")))
}

/// serialize a linestring as WKT.
pub fn serialize<S>(t: &LineString<f64>, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serialize_wkt(t, s)
}

/// serialize any geometry with a WKT representation, used for output table columns.
pub fn serialize_wkt<G, S>(t: &G, s: S) -> Result<S::Ok, S::Error>
where
    G: ToWkt<f64>,
    S: Serializer,
{
    s.serialize_str(&t.to_wkt().to_string())
}

fn decode_string(s: &str) -> Result<Geometry<f64>, String> {
    let trimmed = s.trim();
    let is_hex = !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_hexdigit());
    if is_hex {
        let bytes = hex::decode(trimmed).map_err(|e| format!("Could not decode hex wkb: {e}"))?;
        decode_wkb(bytes)
    } else {
        let wkt: wkt::Wkt<f64> = trimmed
            .parse()
            .map_err(|e| format!("Could not decode wkt: {e}"))?;
        wkt.try_into()
            .map_err(|e| format!("Could not decode wkt: {e}"))
    }
}

fn decode_wkb(bytes: Vec<u8>) -> Result<Geometry<f64>, String> {
    Wkb(bytes)
        .to_geo()
        .map_err(|e| format!("Could not decode wkb: {e}"))
}
