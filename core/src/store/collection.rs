use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::prelude::{StoreError, StoreResult};

/// Key under which every stored document carries its collection-local id.
pub const ID_FIELD: &str = "$id";

/// Named list of JSON documents in insertion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    name: String,
    documents: Vec<Value>,
    next_id: u64,
}

impl Collection {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            documents: Vec::new(),
            next_id: 1,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Stores `document` and returns the id assigned to it. Ids keep
    /// increasing across `clear`.
    pub fn insert<T: Serialize>(&mut self, document: &T) -> StoreResult<u64> {
        let mut value = serde_json::to_value(document)?;
        let id = self.next_id;
        match value.as_object_mut() {
            Some(object) => {
                object.insert(ID_FIELD.to_string(), Value::from(id));
            }
            None => return Err(StoreError::NotADocument(value.to_string())),
        }
        self.next_id += 1;
        self.documents.push(value);
        Ok(id)
    }

    pub fn insert_many<T: Serialize>(&mut self, documents: &[T]) -> StoreResult<usize> {
        for document in documents {
            self.insert(document)?;
        }
        Ok(documents.len())
    }

    pub fn raw(&self) -> &[Value] {
        &self.documents
    }

    pub fn all<T: DeserializeOwned>(&self) -> StoreResult<Vec<T>> {
        self.documents
            .iter()
            .map(|value| T::deserialize(value).map_err(StoreError::from))
            .collect()
    }

    pub fn find<T, F>(&self, predicate: F) -> StoreResult<Vec<T>>
    where
        T: DeserializeOwned,
        F: Fn(&T) -> bool,
    {
        let mut found = Vec::new();
        for value in &self.documents {
            let document = T::deserialize(value)?;
            if predicate(&document) {
                found.push(document);
            }
        }
        Ok(found)
    }

    pub fn clear(&mut self) {
        self.documents.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Station;

    fn station(net: &str, stat: &str) -> Station {
        Station {
            net: net.into(),
            stat: stat.into(),
            ..Default::default()
        }
    }

    #[test]
    fn insert_assigns_increasing_ids() {
        let mut collection = Collection::new("stations");
        assert_eq!(collection.insert(&station("GE", "APE")).unwrap(), 1);
        assert_eq!(collection.insert(&station("HL", "ATH")).unwrap(), 2);
        collection.clear();
        assert_eq!(collection.insert(&station("HL", "KTHA")).unwrap(), 3);
        assert_eq!(collection.raw()[0][ID_FIELD], 3);
    }

    #[test]
    fn find_deserializes_and_filters() {
        let mut collection = Collection::new("stations");
        collection
            .insert_many(&[station("GE", "APE"), station("HL", "ATH")])
            .unwrap();
        let found: Vec<Station> = collection.find(|s: &Station| s.net == "HL").unwrap();
        assert_eq!(found, vec![station("HL", "ATH")]);
        let all: Vec<Station> = collection.all().unwrap();
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn scalars_are_not_documents() {
        let mut collection = Collection::new("junk");
        assert!(matches!(
            collection.insert(&42),
            Err(StoreError::NotADocument(_))
        ));
        assert!(collection.is_empty());
    }
}
