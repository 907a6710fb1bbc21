use serde::de::SeqAccess;
use serde::de::Visitor;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;

use super::Multirange;
use crate::interval::Interval;

impl<'de, R: Interval> Deserialize<'de> for Multirange<R> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct MultirangeVisitor<R>(std::marker::PhantomData<fn() -> R>);

        impl<'de, R: Interval> Visitor<'de> for MultirangeVisitor<R> {
            type Value = Multirange<R>;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("packed multirange")
            }

            fn visit_bytes<E>(self, bytes: &[u8]) -> Result<Multirange<R>, E>
            where
                E: serde::de::Error,
            {
                Multirange::from_packed(bytes).map_err(serde::de::Error::custom)
            }

            // some formats hand bytes over as a sequence
            fn visit_seq<A>(self, mut seq: A) -> Result<Multirange<R>, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut bytes: Vec<u8> = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(el) = seq.next_element()? {
                    bytes.push(el);
                }
                Multirange::from_packed(bytes).map_err(serde::de::Error::custom)
            }
        }

        deserializer.deserialize_bytes(MultirangeVisitor(std::marker::PhantomData))
    }
}

impl<R> Serialize for Multirange<R> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_bytes(self.as_bytes())
    }
}
