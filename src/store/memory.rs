//! In-memory repository used by the test suites.
//!
//! Interprets the same bson filter and update documents as the Mongo
//! implementation, for the subset of operators this application emits:
//! equality, `$gte`/`$gt`/`$lte`/`$lt` comparisons, and `$set`/`$inc`/
//! `$push`/`$pull` updates.

use std::cmp::Ordering;
use std::marker::PhantomData;
use std::sync::Mutex;

use async_trait::async_trait;
use mongodb::bson::{from_document, oid::ObjectId, to_document, Bson, Document};

use super::{FindSpec, Repository, StoreResult};
use crate::models::Entity;

pub struct MemoryRepository<T: Entity> {
    docs: Mutex<Vec<Document>>,
    marker: PhantomData<fn() -> T>,
}

impl<T: Entity> MemoryRepository<T> {
    pub fn new() -> Self {
        Self { docs: Mutex::new(Vec::new()), marker: PhantomData }
    }
}

/// Total-enough ordering over the bson values this application stores.
/// Numeric types compare across representations, everything else only
/// within its own type.
fn cmp_bson(a: &Bson, b: &Bson) -> Option<Ordering> {
    if let (Some(x), Some(y)) = (as_number(a), as_number(b)) {
        return x.partial_cmp(&y);
    }
    match (a, b) {
        (Bson::String(x), Bson::String(y)) => Some(x.cmp(y)),
        (Bson::ObjectId(x), Bson::ObjectId(y)) => Some(x.bytes().cmp(&y.bytes())),
        (Bson::DateTime(x), Bson::DateTime(y)) => Some(x.cmp(y)),
        (Bson::Boolean(x), Bson::Boolean(y)) => Some(x.cmp(y)),
        (Bson::Null, Bson::Null) => Some(Ordering::Equal),
        _ => None,
    }
}

fn as_number(b: &Bson) -> Option<f64> {
    match b {
        Bson::Int32(v) => Some(f64::from(*v)),
        Bson::Int64(v) => Some(*v as f64),
        Bson::Double(v) => Some(*v),
        _ => None,
    }
}

fn bson_eq(a: &Bson, b: &Bson) -> bool {
    cmp_bson(a, b) == Some(Ordering::Equal)
}

fn matches(doc: &Document, filter: &Document) -> bool {
    filter.iter().all(|(key, cond)| {
        let value = doc.get(key);
        match cond {
            Bson::Document(ops) if ops.keys().all(|k| k.starts_with('$')) => {
                ops.iter().all(|(op, operand)| {
                    let Some(value) = value else { return false };
                    let Some(ord) = cmp_bson(value, operand) else { return false };
                    match op.as_str() {
                        "$gte" => ord != Ordering::Less,
                        "$gt" => ord == Ordering::Greater,
                        "$lte" => ord != Ordering::Greater,
                        "$lt" => ord == Ordering::Less,
                        "$ne" => ord != Ordering::Equal,
                        _ => false,
                    }
                })
            }
            expected => value.is_some_and(|v| bson_eq(v, expected)),
        }
    })
}

fn apply_update(doc: &mut Document, update: &Document) {
    for (op, spec) in update {
        let Bson::Document(fields) = spec else { continue };
        for (field, value) in fields {
            match op.as_str() {
                "$set" => {
                    doc.insert(field.clone(), value.clone());
                }
                "$inc" => {
                    let current = doc.get(field).and_then(as_number).unwrap_or(0.0);
                    let delta = as_number(value).unwrap_or(0.0);
                    let next = current + delta;
                    // keep integer fields integral
                    if next.fract() == 0.0 && !matches!(doc.get(field), Some(Bson::Double(_))) {
                        doc.insert(field.clone(), Bson::Int64(next as i64));
                    } else {
                        doc.insert(field.clone(), Bson::Double(next));
                    }
                }
                "$push" => match doc.get_mut(field) {
                    Some(Bson::Array(items)) => items.push(value.clone()),
                    _ => {
                        doc.insert(field.clone(), Bson::Array(vec![value.clone()]));
                    }
                },
                "$pull" => {
                    if let Some(Bson::Array(items)) = doc.get_mut(field) {
                        items.retain(|item| !bson_eq(item, value));
                    }
                }
                _ => {}
            }
        }
    }
}

fn sort_docs(docs: &mut [Document], sort: &Document) {
    docs.sort_by(|a, b| {
        for (field, dir) in sort {
            let ord = match (a.get(field), b.get(field)) {
                (Some(x), Some(y)) => cmp_bson(x, y).unwrap_or(Ordering::Equal),
                (Some(_), None) => Ordering::Greater,
                (None, Some(_)) => Ordering::Less,
                (None, None) => Ordering::Equal,
            };
            let descending = as_number(dir).unwrap_or(1.0) < 0.0;
            let ord = if descending { ord.reverse() } else { ord };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    });
}

#[async_trait]
impl<T: Entity> Repository<T> for MemoryRepository<T> {
    async fn insert(&self, mut doc: T) -> StoreResult<T> {
        let id = ObjectId::new();
        doc.set_id(id);
        let encoded = to_document(&doc)?;
        self.docs.lock().unwrap().push(encoded);
        Ok(doc)
    }

    async fn find_by_id(&self, id: ObjectId) -> StoreResult<Option<T>> {
        self.find_one(mongodb::bson::doc! { "_id": id }).await
    }

    async fn find_one(&self, filter: Document) -> StoreResult<Option<T>> {
        let docs = self.docs.lock().unwrap();
        docs.iter()
            .find(|d| matches(d, &filter))
            .cloned()
            .map(|d| from_document(d).map_err(Into::into))
            .transpose()
    }

    async fn find(&self, spec: FindSpec) -> StoreResult<Vec<T>> {
        let mut found: Vec<Document> = {
            let docs = self.docs.lock().unwrap();
            docs.iter().filter(|d| matches(d, &spec.filter)).cloned().collect()
        };
        if !spec.sort.is_empty() {
            sort_docs(&mut found, &spec.sort);
        }
        let skip = spec.skip as usize;
        let found = found.into_iter().skip(skip);
        let found: Vec<Document> = if spec.limit > 0 {
            found.take(spec.limit as usize).collect()
        } else {
            found.collect()
        };
        found.into_iter().map(|d| from_document(d).map_err(Into::into)).collect()
    }

    async fn count(&self, filter: Document) -> StoreResult<u64> {
        let docs = self.docs.lock().unwrap();
        Ok(docs.iter().filter(|d| matches(d, &filter)).count() as u64)
    }

    async fn update_by_id(&self, id: ObjectId, update: Document) -> StoreResult<Option<T>> {
        self.update_one(mongodb::bson::doc! { "_id": id }, update).await
    }

    async fn update_one(&self, filter: Document, update: Document) -> StoreResult<Option<T>> {
        let mut docs = self.docs.lock().unwrap();
        if let Some(doc) = docs.iter_mut().find(|d| matches(d, &filter)) {
            apply_update(doc, &update);
            return from_document(doc.clone()).map(Some).map_err(Into::into);
        }
        Ok(None)
    }

    async fn delete_by_id(&self, id: ObjectId) -> StoreResult<Option<T>> {
        let mut docs = self.docs.lock().unwrap();
        let Some(pos) = docs.iter().position(|d| d.get_object_id("_id") == Ok(id)) else {
            return Ok(None);
        };
        let doc = docs.remove(pos);
        from_document(doc).map(Some).map_err(Into::into)
    }

    async fn delete_many(&self, filter: Document) -> StoreResult<u64> {
        let mut docs = self.docs.lock().unwrap();
        let before = docs.len();
        docs.retain(|d| !matches(d, &filter));
        Ok((before - docs.len()) as u64)
    }

    async fn batch_update(&self, ops: Vec<(Document, Document)>) -> StoreResult<()> {
        for (filter, update) in ops {
            self.update_one(filter, update).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;

    #[test]
    fn comparison_filters() {
        let doc = doc! { "price": 15.0, "brand": "Apple" };
        assert!(matches(&doc, &doc! { "price": { "$gte": 10 } }));
        assert!(matches(&doc, &doc! { "price": { "$gt": 10, "$lt": 20 } }));
        assert!(!matches(&doc, &doc! { "price": { "$lte": 10 } }));
        assert!(matches(&doc, &doc! { "brand": "Apple" }));
        assert!(!matches(&doc, &doc! { "brand": "Samsung" }));
        assert!(!matches(&doc, &doc! { "missing": { "$gt": 1 } }));
    }

    #[test]
    fn set_inc_push_pull() {
        let mut doc = doc! { "quantity": 10i64, "tags": ["a", "b"] };
        apply_update(&mut doc, &doc! { "$inc": { "quantity": -2i64 } });
        assert_eq!(doc.get_i64("quantity").unwrap(), 8);
        apply_update(&mut doc, &doc! { "$push": { "tags": "c" } });
        apply_update(&mut doc, &doc! { "$pull": { "tags": "a" } });
        let tags = doc.get_array("tags").unwrap();
        assert_eq!(tags.len(), 2);
        apply_update(&mut doc, &doc! { "$set": { "quantity": 0i64 } });
        assert_eq!(doc.get_i64("quantity").unwrap(), 0);
    }

    #[test]
    fn sorting_respects_direction() {
        let mut docs = vec![doc! { "n": 1 }, doc! { "n": 3 }, doc! { "n": 2 }];
        sort_docs(&mut docs, &doc! { "n": -1 });
        let ns: Vec<i32> = docs.iter().map(|d| d.get_i32("n").unwrap()).collect();
        assert_eq!(ns, vec![3, 2, 1]);
    }
}
