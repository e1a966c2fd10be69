//! List-query parsing: filtering, sorting, field selection and pagination
//! for collection endpoints.
//!
//! The query string is taken as the filter, minus the reserved keys. A key
//! written `field[op]` with op in gte/gt/lte/lt becomes the corresponding
//! `$`-operator in the persistence filter; everything else is an equality
//! match.

use std::collections::HashMap;

use mongodb::bson::{doc, Bson, Document};
use serde_json::Value;

use crate::store::FindSpec;

const RESERVED: [&str; 4] = ["page", "sort", "limit", "fields"];
const COMPARISONS: [&str; 4] = ["gte", "gt", "lte", "lt"];
const DEFAULT_LIMIT: i64 = 10;

#[derive(Debug, Clone, Default)]
pub struct ListQuery {
    pub filter: Document,
    pub sort: Document,
    pub fields: Option<Vec<String>>,
    pub page: Option<u64>,
    pub limit: Option<i64>,
}

impl ListQuery {
    pub fn parse(params: &HashMap<String, String>) -> Self {
        let mut filter = Document::new();
        for (key, raw) in params {
            if RESERVED.contains(&key.as_str()) {
                continue;
            }
            let value = parse_scalar(raw);
            match split_operator(key) {
                Some((field, op)) => match filter.get_mut(field) {
                    Some(Bson::Document(ops)) => {
                        ops.insert(format!("${op}"), value);
                    }
                    _ => {
                        filter.insert(field, doc! { format!("${op}"): value });
                    }
                },
                None => {
                    filter.insert(key.clone(), value);
                }
            }
        }

        let sort = match params.get("sort") {
            Some(spec) => parse_sort(spec),
            None => doc! { "created_at": -1 },
        };
        let fields = params.get("fields").map(|spec| {
            spec.split(',').map(|f| f.trim().to_string()).filter(|f| !f.is_empty()).collect()
        });
        let page = params.get("page").and_then(|p| p.parse().ok());
        let limit = params.get("limit").and_then(|l| l.parse().ok());

        Self { filter, sort, fields, page, limit }
    }

    pub fn skip(&self) -> u64 {
        let page = self.page.unwrap_or(1).max(1);
        // saturate: an absurd page number is out of range, not a panic
        (page - 1).saturating_mul(self.effective_limit() as u64)
    }

    fn effective_limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT).max(1)
    }

    pub fn find_spec(&self) -> FindSpec {
        FindSpec {
            filter: self.filter.clone(),
            sort: self.sort.clone(),
            skip: self.skip(),
            limit: if self.page.is_some() || self.limit.is_some() {
                self.effective_limit()
            } else {
                0
            },
        }
    }
}

/// `"price[gte]"` -> `("price", "gte")` for the supported comparison ops.
fn split_operator(key: &str) -> Option<(&str, &str)> {
    let open = key.find('[')?;
    let inner = key.get(open + 1..key.len() - 1)?;
    if key.ends_with(']') && COMPARISONS.contains(&inner) {
        Some((&key[..open], inner))
    } else {
        None
    }
}

/// Numbers become bson numbers, bools become bools, the rest stays a string.
fn parse_scalar(raw: &str) -> Bson {
    if let Ok(n) = raw.parse::<i64>() {
        return Bson::Int64(n);
    }
    if let Ok(f) = raw.parse::<f64>() {
        return Bson::Double(f);
    }
    match raw {
        "true" => Bson::Boolean(true),
        "false" => Bson::Boolean(false),
        _ => Bson::String(raw.to_string()),
    }
}

/// `"category,-price"` -> `{category: 1, price: -1}`.
fn parse_sort(spec: &str) -> Document {
    let mut sort = Document::new();
    for part in spec.split(',') {
        let part = part.trim();
        if let Some(field) = part.strip_prefix('-') {
            sort.insert(field, -1);
        } else if !part.is_empty() {
            sort.insert(part, 1);
        }
    }
    sort
}

/// Response-level field selection; typed documents cannot drop required
/// fields before deserialization, so the projection happens on the JSON.
pub fn project_fields(value: &mut Value, fields: &[String]) {
    if let Value::Object(map) = value {
        map.retain(|key, _| key == "_id" || fields.iter().any(|f| f == key));
    }
}
