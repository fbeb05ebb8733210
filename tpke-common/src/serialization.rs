//! A `serde::with` bridge for `CanonicalSerialize`/`CanonicalDeserialize`
//! types, so structs that hold curve points or field elements can still
//! derive `serde::Serialize`/`Deserialize` for the wire formats that need
//! it (JSON configs, `bincode` transcripts) without hand-writing a codec
//! per point type.
//!
//! Usage: `#[serde(with = "tpke_common::serialization::ark_serde")]` on a
//! field whose type implements `CanonicalSerialize`/`CanonicalDeserialize`.

#[cfg(feature = "serialization")]
pub mod ark_serde {
    use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
    use serde::de::Error as _;
    use serde::ser::Error as _;
    use serde::{Deserialize, Serialize};
    use serde_bytes::{ByteBuf, Bytes};

    pub fn serialize<S, T>(data: &T, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
        T: CanonicalSerialize,
    {
        let mut bytes = Vec::new();
        data.serialize_compressed(&mut bytes).map_err(S::Error::custom)?;
        Bytes::new(&bytes).serialize(serializer)
    }

    pub fn deserialize<'d, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: serde::Deserializer<'d>,
        T: CanonicalDeserialize,
    {
        let bytes = ByteBuf::deserialize(deserializer)?;
        T::deserialize_compressed(bytes.as_slice()).map_err(D::Error::custom)
    }
}
