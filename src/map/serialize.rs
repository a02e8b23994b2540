use std::fmt;
use std::marker::PhantomData;

use serde::{
    de::{MapAccess, Visitor},
    ser::SerializeMap,
    Deserialize, Deserializer, Serialize, Serializer,
};

use super::TreeMap;

/// Entries are written in sorted order, so the tree shape is not preserved
impl<K: Serialize, V: Serialize> Serialize for TreeMap<K, V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

struct TreeMapVisitor<K, V> {
    marker: PhantomData<fn() -> TreeMap<K, V>>,
}

impl<'de, K, V> Visitor<'de> for TreeMapVisitor<K, V>
    where K: Deserialize<'de> + Ord,
          V: Deserialize<'de>,
{
    type Value = TreeMap<K, V>;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a map")
    }

    fn visit_map<M>(self, mut access: M) -> Result<Self::Value, M::Error>
        where M: MapAccess<'de>,
    {
        // Don't trust the size hint with a huge allocation
        let capacity = access.size_hint().unwrap_or(0).min(4096);
        let mut map = TreeMap::with_capacity(capacity);

        // Later duplicates replace earlier values, like the standard maps
        while let Some((key, value)) = access.next_entry()? {
            map.insert_or_assign(key, value);
        }

        Ok(map)
    }
}

impl<'de, K, V> Deserialize<'de> for TreeMap<K, V>
    where K: Deserialize<'de> + Ord,
          V: Deserialize<'de>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(TreeMapVisitor {marker: PhantomData})
    }
}

#[cfg(test)]
mod tests {
    use crate::TreeMap;

    #[test]
    fn serialize_sorted() {
        let map: TreeMap<_, _> = vec![(5, "a"), (3, "b"), (8, "c")].into_iter().collect();
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"3":"b","5":"a","8":"c"}"#);
    }

    #[test]
    fn round_trip() {
        let map: TreeMap<String, Vec<i32>> = (0..20)
            .map(|i| (format!("key{:02}", (i * 7) % 20), vec![i, -i]))
            .collect();

        let json = serde_json::to_string(&map).unwrap();
        let decoded: TreeMap<String, Vec<i32>> = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, map);
        decoded.assert_invariants();
    }

    #[test]
    fn duplicate_keys_keep_last() {
        let decoded: TreeMap<String, i32> = serde_json::from_str(r#"{"a":1,"b":2,"a":3}"#).unwrap();
        assert_eq!(decoded.get("a"), Some(&3));
        assert_eq!(decoded.len(), 2);
    }

    #[test]
    fn rejects_non_map() {
        let result: Result<TreeMap<String, i32>, _> = serde_json::from_str("[1, 2]");
        assert!(result.is_err());
    }
}
