use serde_json::json;
use synced_json::{AttrDict, SyncedDict};

fn main() -> Result<(), synced_json::Error> {
    let path = std::env::temp_dir().join("synced_json_demo_attrdict.json");
    let _ = std::fs::remove_file(&path);

    let doc = AttrDict::new(SyncedDict::open(&path, false)?);

    // attribute-style and item-style access observe the same entries
    doc.set_attr("name", "experiment-7")?;
    assert_eq!(doc.attr("name")?, doc.get("name")?.unwrap());

    // nested objects come back attribute-enabled
    doc.insert("params", json!({"temperature": 300}))?;
    let params = doc.dict("params")?;
    params.set_attr("temperature", 310)?;
    println!("params.temperature = {}", params.attr("temperature")?);

    // a key named after an operation is data, but only item access reaches it
    doc.insert("keys", json!(["not", "the", "method"]))?;
    println!("doc[\"keys\"] = {:?}", doc.get("keys")?);
    println!("doc.attr(\"keys\") -> {:?}", doc.attr("keys").unwrap_err());

    println!("file = {}", std::fs::read_to_string(&path).unwrap());
    let _ = std::fs::remove_file(&path);
    Ok(())
}
