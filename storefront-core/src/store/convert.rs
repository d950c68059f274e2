//! Conversion between JSON fields and Automerge objects.
//!
//! JSON objects map to Automerge maps, arrays to lists, and scalars to the
//! matching scalar value. Reading converts back; Automerge text objects read
//! as strings, and scalars with no JSON counterpart read as `null`.

use automerge::{
    transaction::Transactable, AutoCommit, AutomergeError, ObjId, ObjType, ReadDoc, ScalarValue,
};
use serde_json::{Number, Value};

use super::Fields;

/// Writes every field into the map object `obj`, replacing existing keys.
pub fn write_fields(
    doc: &mut AutoCommit,
    obj: &ObjId,
    fields: &Fields,
) -> Result<(), AutomergeError> {
    for (key, value) in fields {
        put_value(doc, obj, key, value)?;
    }
    Ok(())
}

fn put_value(
    doc: &mut AutoCommit,
    obj: &ObjId,
    key: &str,
    value: &Value,
) -> Result<(), AutomergeError> {
    match value {
        Value::Array(items) => {
            let list = doc.put_object(obj, key, ObjType::List)?;
            write_list(doc, &list, items)
        }
        Value::Object(map) => {
            let child = doc.put_object(obj, key, ObjType::Map)?;
            write_fields(doc, &child, map)
        }
        scalar => doc.put(obj, key, to_scalar(scalar)),
    }
}

fn write_list(doc: &mut AutoCommit, list: &ObjId, items: &[Value]) -> Result<(), AutomergeError> {
    for (index, item) in items.iter().enumerate() {
        match item {
            Value::Array(nested) => {
                let child = doc.insert_object(list, index, ObjType::List)?;
                write_list(doc, &child, nested)?;
            }
            Value::Object(map) => {
                let child = doc.insert_object(list, index, ObjType::Map)?;
                write_fields(doc, &child, map)?;
            }
            scalar => doc.insert(list, index, to_scalar(scalar))?,
        }
    }
    Ok(())
}

fn to_scalar(value: &Value) -> ScalarValue {
    match value {
        Value::Bool(b) => ScalarValue::Boolean(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                ScalarValue::Int(i)
            } else if let Some(u) = n.as_u64() {
                ScalarValue::Uint(u)
            } else {
                ScalarValue::F64(n.as_f64().unwrap_or_default())
            }
        }
        Value::String(s) => ScalarValue::from(s.as_str()),
        _ => ScalarValue::Null,
    }
}

/// Reads a map object back into JSON fields.
pub fn read_fields(doc: &AutoCommit, obj: &ObjId) -> Result<Fields, AutomergeError> {
    let mut fields = Fields::new();
    for key in doc.keys(obj) {
        if let Some((value, id)) = doc.get(obj, key.as_str())? {
            let json = read_value(doc, value, &id)?;
            fields.insert(key, json);
        }
    }
    Ok(fields)
}

fn read_list(doc: &AutoCommit, list: &ObjId) -> Result<Vec<Value>, AutomergeError> {
    let mut items = Vec::with_capacity(doc.length(list));
    for index in 0..doc.length(list) {
        if let Some((value, id)) = doc.get(list, index)? {
            items.push(read_value(doc, value, &id)?);
        }
    }
    Ok(items)
}

fn read_value(
    doc: &AutoCommit,
    value: automerge::Value<'_>,
    id: &ObjId,
) -> Result<Value, AutomergeError> {
    match value {
        automerge::Value::Object(ObjType::List) => read_list(doc, id).map(Value::Array),
        automerge::Value::Object(ObjType::Text) => doc.text(id).map(Value::String),
        automerge::Value::Object(_) => read_fields(doc, id).map(Value::Object),
        automerge::Value::Scalar(scalar) => Ok(from_scalar(scalar.as_ref())),
    }
}

fn from_scalar(scalar: &ScalarValue) -> Value {
    match scalar {
        ScalarValue::Str(s) => Value::String(s.to_string()),
        ScalarValue::Int(i) => Value::from(*i),
        ScalarValue::Uint(u) => Value::from(*u),
        ScalarValue::F64(f) => Number::from_f64(*f).map_or(Value::Null, Value::Number),
        ScalarValue::Timestamp(t) => Value::from(*t),
        ScalarValue::Boolean(b) => Value::Bool(*b),
        _ => Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use automerge::ROOT;
    use serde_json::json;

    fn write_then_read(value: Value) -> Fields {
        let fields = value.as_object().unwrap().clone();
        let mut doc = AutoCommit::new();
        let obj = doc.put_object(ROOT, "doc", ObjType::Map).unwrap();
        write_fields(&mut doc, &obj, &fields).unwrap();
        read_fields(&doc, &obj).unwrap()
    }

    #[test]
    fn test_product_shaped_document() {
        let value = json!({
            "Id": "1b4e28ba-2fa1-11",
            "Name": "Kurti A",
            "Price": 499.5,
            "Rating": 5.0,
            "Reviews": [],
            "Stock": 10,
        });
        assert_eq!(Value::Object(write_then_read(value.clone())), value);
    }

    #[test]
    fn test_nested_lists_and_maps() {
        let value = json!({
            "wishList": [
                { "userId": "u1", "productId": "p1" },
                { "userId": "u1", "productId": "p2" }
            ],
            "matrix": [[1, 2], [3]],
            "flags": { "active": true, "note": null },
        });
        assert_eq!(Value::Object(write_then_read(value.clone())), value);
    }

    #[test]
    fn test_overwrite_field() {
        let mut doc = AutoCommit::new();
        let obj = doc.put_object(ROOT, "doc", ObjType::Map).unwrap();
        let first = json!({ "wishList": ["a", "b"], "name": "x" });
        write_fields(&mut doc, &obj, first.as_object().unwrap()).unwrap();
        let second = json!({ "wishList": ["c"] });
        write_fields(&mut doc, &obj, second.as_object().unwrap()).unwrap();

        let fields = read_fields(&doc, &obj).unwrap();
        assert_eq!(fields["wishList"], json!(["c"]));
        assert_eq!(fields["name"], json!("x"));
    }

    #[test]
    fn test_large_unsigned_number() {
        let value = json!({ "big": u64::MAX });
        assert_eq!(write_then_read(value)["big"], json!(u64::MAX));
    }
}
